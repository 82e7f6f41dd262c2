//! Deterministic funnel seed generation.
//!
//! All randomness flows from a single ChaCha8 RNG seeded from the plan, so a
//! plan always produces identical tables. Users are drawn first and movements
//! second from the same stream.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use fake::Fake;
use fake::faker::internet::raw::FreeEmail;
use fake::faker::name::raw::Name;
use fake::locales::EN;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use uuid::{Builder, Uuid};

use crate::error::GenerationError;
use crate::rows::{MovementRow, UserRow};
use crate::status::{STATUS_DIMENSION, StatusRow, status_dimension};

/// Maximum number of draws spent looking for an unused email.
const MAX_EMAIL_ATTEMPTS: usize = 1000;

/// Upper bound on storage reserved ahead of user generation.
const MAX_PREALLOCATED_USERS: usize = 4096;

/// Age in days of the oldest possible user on the reference date.
const OLDEST_USER_AGE_DAYS: u64 = 730;

/// Age in days of the newest possible user on the reference date.
const NEWEST_USER_AGE_DAYS: u64 = 365;

/// Width of the creation window in days.
const CREATION_WINDOW_DAYS: u64 = OLDEST_USER_AGE_DAYS - NEWEST_USER_AGE_DAYS;

/// Fewest funnel stages a user passes through.
const MIN_STAGES: usize = 2;

/// Most funnel stages a user passes through.
const MAX_STAGES: usize = STATUS_DIMENSION.len();

/// Shortest gap between consecutive transitions.
const MIN_STAGE_GAP_DAYS: u64 = 5;

/// Longest gap between consecutive transitions.
const MAX_STAGE_GAP_DAYS: u64 = 15;

/// Inputs that fully determine a generated data set.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use funnel_seeds::SeedPlan;
///
/// let reference = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
/// let plan = SeedPlan::new(42, 150, 500, reference);
///
/// assert_eq!(plan.target_rows(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPlan {
    seed: u64,
    user_count: usize,
    target_rows: usize,
    reference_date: NaiveDate,
}

impl SeedPlan {
    /// Creates a plan from explicit values.
    #[must_use]
    pub const fn new(
        seed: u64,
        user_count: usize,
        target_rows: usize,
        reference_date: NaiveDate,
    ) -> Self {
        Self {
            seed,
            user_count,
            target_rows,
            reference_date,
        }
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of users to generate.
    #[must_use]
    pub const fn user_count(&self) -> usize {
        self.user_count
    }

    /// Returns the cap on movement rows.
    #[must_use]
    pub const fn target_rows(&self) -> usize {
        self.target_rows
    }

    /// Returns the date the user creation window is measured from.
    #[must_use]
    pub const fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }
}

/// The three generated tables of a seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTables {
    /// Funnel status dimension.
    pub statuses: Vec<StatusRow>,
    /// Generated users.
    pub users: Vec<UserRow>,
    /// Funnel transitions, capped at the plan's target.
    pub movements: Vec<MovementRow>,
}

/// Generates all seed tables for a plan.
///
/// # Errors
///
/// Returns [`GenerationError`] if a unique email cannot be drawn or date
/// arithmetic leaves the calendar range.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use funnel_seeds::{SeedPlan, generate_seed_tables};
///
/// let reference = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
/// let plan = SeedPlan::new(42, 20, 50, reference);
///
/// let tables = generate_seed_tables(&plan).expect("generated");
/// assert_eq!(tables.statuses.len(), 6);
/// assert_eq!(tables.users.len(), 20);
/// assert!(tables.movements.len() <= 50);
///
/// // Same plan produces identical tables
/// assert_eq!(tables, generate_seed_tables(&plan).expect("generated"));
/// ```
pub fn generate_seed_tables(plan: &SeedPlan) -> Result<SeedTables, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(plan.seed());

    let statuses = status_dimension();
    let users = generate_users(&mut rng, plan.user_count(), plan.reference_date())?;
    let movements = generate_funnel_movements(&mut rng, &users, plan.target_rows())?;

    debug!(
        seed = plan.seed(),
        users = users.len(),
        movements = movements.len(),
        "seed tables generated"
    );

    Ok(SeedTables {
        statuses,
        users,
        movements,
    })
}

/// Generates `user_count` users created one to two years before
/// `reference_date`.
///
/// # Errors
///
/// Returns [`GenerationError::EmailGenerationExhausted`] if no unused email
/// turns up within the retry budget, or [`GenerationError::DateOutOfRange`]
/// if the creation window cannot be computed.
pub fn generate_users<R: Rng>(
    rng: &mut R,
    user_count: usize,
    reference_date: NaiveDate,
) -> Result<Vec<UserRow>, GenerationError> {
    let window_start = shift_back(reference_date, OLDEST_USER_AGE_DAYS)?;
    let capacity = user_count.min(MAX_PREALLOCATED_USERS);
    let mut emails = HashSet::with_capacity(capacity);
    let mut users = Vec::with_capacity(capacity);

    for _ in 0..user_count {
        let user_id = random_uuid(rng);
        let name: String = Name(EN).fake_with_rng(rng);
        let email = draw_unique(&mut emails, MAX_EMAIL_ATTEMPTS, || {
            FreeEmail(EN).fake_with_rng(rng)
        })?;
        let offset = rng.random_range(0..=CREATION_WINDOW_DAYS);
        let created_at = shift_forward(window_start, offset)?;

        users.push(UserRow {
            user_id,
            name,
            email,
            created_at,
        });
    }

    Ok(users)
}

/// Generates funnel transitions for `users`, stopping at `target_rows`.
///
/// Each user passes through between two and six stages starting at the
/// first. The first transition falls on the creation date and each later one
/// is five to fifteen days after the previous. Once the cap is reached no
/// further rows are emitted, even part way through a user.
///
/// # Errors
///
/// Returns [`GenerationError::DateOutOfRange`] if a transition date cannot
/// be represented.
pub fn generate_funnel_movements<R: Rng>(
    rng: &mut R,
    users: &[UserRow],
    target_rows: usize,
) -> Result<Vec<MovementRow>, GenerationError> {
    let capacity = target_rows.min(users.len().saturating_mul(MAX_STAGES));
    let mut movements = Vec::with_capacity(capacity);

    for user in users {
        let remaining = target_rows.saturating_sub(movements.len());
        if remaining == 0 {
            break;
        }

        let stages = rng.random_range(MIN_STAGES..=MAX_STAGES);
        if stages > remaining {
            debug!(
                user_id = %user.user_id,
                stages,
                remaining,
                "row target reached; truncating funnel"
            );
        }
        push_user_movements(rng, user, stages.min(remaining), &mut movements)?;
    }

    Ok(movements)
}

fn push_user_movements<R: Rng>(
    rng: &mut R,
    user: &UserRow,
    stages: usize,
    movements: &mut Vec<MovementRow>,
) -> Result<(), GenerationError> {
    let mut transition_date = user.created_at;

    for (index, status) in STATUS_DIMENSION.iter().take(stages).enumerate() {
        if index > 0 {
            let gap = rng.random_range(MIN_STAGE_GAP_DAYS..=MAX_STAGE_GAP_DAYS);
            transition_date = shift_forward(transition_date, gap)?;
        }

        movements.push(MovementRow {
            movement_id: random_uuid(rng),
            user_id: user.user_id,
            status_id: status.status_id,
            transition_date,
        });
    }

    Ok(())
}

/// Draws a version 4 UUID from the RNG so identifiers stay reproducible.
fn random_uuid<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.random()).into_uuid()
}

/// Calls `draw` until it yields a value not yet in `seen`.
fn draw_unique<F>(
    seen: &mut HashSet<String>,
    max_attempts: usize,
    mut draw: F,
) -> Result<String, GenerationError>
where
    F: FnMut() -> String,
{
    for _ in 0..max_attempts {
        let candidate = draw();
        if !seen.contains(&candidate) {
            seen.insert(candidate.clone());
            return Ok(candidate);
        }
    }

    Err(GenerationError::EmailGenerationExhausted {
        attempts: max_attempts,
    })
}

fn shift_back(date: NaiveDate, days: u64) -> Result<NaiveDate, GenerationError> {
    date.checked_sub_days(Days::new(days))
        .ok_or(GenerationError::DateOutOfRange { date, days })
}

fn shift_forward(date: NaiveDate, days: u64) -> Result<NaiveDate, GenerationError> {
    date.checked_add_days(Days::new(days))
        .ok_or(GenerationError::DateOutOfRange { date, days })
}
