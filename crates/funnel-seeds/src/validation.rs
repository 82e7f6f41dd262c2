//! Data-model checks for generated seed tables.
//!
//! Downstream models assume these invariants, so a run refuses to export
//! tables that break any of them.
//!
//! # Invariants
//!
//! - The status dimension holds IDs 1 to 6 in order
//! - User IDs, emails, and movement IDs are unique
//! - Every movement references a known user and status
//! - Per user, statuses run 1, 2, 3, ... with strictly increasing dates
//! - No transition precedes the user's creation date
//! - Movement rows do not exceed the target

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::generator::SeedTables;
use crate::rows::{MovementRow, UserRow};
use crate::status::{FIRST_STATUS_ID, STATUS_DIMENSION, StatusRow, is_known_status};

/// Checks every data-model invariant of `tables`.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use funnel_seeds::{SeedPlan, generate_seed_tables, validate_tables};
///
/// let reference = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
/// let plan = SeedPlan::new(42, 10, 30, reference);
/// let tables = generate_seed_tables(&plan).expect("generated");
///
/// assert_eq!(validate_tables(&tables, plan.target_rows()), Ok(()));
/// ```
pub fn validate_tables(tables: &SeedTables, target_rows: usize) -> Result<(), ValidationError> {
    validate_status_dimension(&tables.statuses)?;
    let created = validate_users(&tables.users)?;
    validate_movements(&tables.movements, &created)?;

    if tables.movements.len() > target_rows {
        return Err(ValidationError::TargetExceeded {
            rows: tables.movements.len(),
            target_rows,
        });
    }

    Ok(())
}

fn validate_status_dimension(statuses: &[StatusRow]) -> Result<(), ValidationError> {
    if statuses.len() != STATUS_DIMENSION.len() {
        return Err(ValidationError::StatusDimensionSize {
            expected: STATUS_DIMENSION.len(),
            actual: statuses.len(),
        });
    }

    for (index, (row, expected)) in statuses.iter().zip(STATUS_DIMENSION.iter()).enumerate() {
        if row.status_id != expected.status_id {
            return Err(ValidationError::StatusDimensionOutOfOrder {
                index,
                expected: expected.status_id,
                actual: row.status_id,
            });
        }
    }

    Ok(())
}

/// Returns each user's creation date keyed by ID.
fn validate_users(users: &[UserRow]) -> Result<HashMap<Uuid, NaiveDate>, ValidationError> {
    let mut created = HashMap::with_capacity(users.len());
    let mut emails = HashSet::with_capacity(users.len());

    for user in users {
        if created.insert(user.user_id, user.created_at).is_some() {
            return Err(ValidationError::DuplicateUserId {
                user_id: user.user_id,
            });
        }
        if !emails.insert(user.email.as_str()) {
            return Err(ValidationError::DuplicateEmail {
                email: user.email.clone(),
            });
        }
    }

    Ok(created)
}

/// Last status and date seen for a user.
#[derive(Debug, Clone, Copy)]
struct Progress {
    status_id: u8,
    transition_date: NaiveDate,
}

fn validate_movements(
    movements: &[MovementRow],
    created: &HashMap<Uuid, NaiveDate>,
) -> Result<(), ValidationError> {
    let mut movement_ids = HashSet::with_capacity(movements.len());
    let mut progress: HashMap<Uuid, Progress> = HashMap::new();

    for movement in movements {
        if !movement_ids.insert(movement.movement_id) {
            return Err(ValidationError::DuplicateMovementId {
                movement_id: movement.movement_id,
            });
        }

        let Some(&created_at) = created.get(&movement.user_id) else {
            return Err(ValidationError::UnknownUser {
                movement_id: movement.movement_id,
                user_id: movement.user_id,
            });
        };

        if !is_known_status(movement.status_id) {
            return Err(ValidationError::UnknownStatus {
                movement_id: movement.movement_id,
                status_id: movement.status_id,
            });
        }

        if movement.transition_date < created_at {
            return Err(ValidationError::TransitionBeforeCreation {
                movement_id: movement.movement_id,
                transition_date: movement.transition_date,
                created_at,
            });
        }

        let previous = progress.get(&movement.user_id).copied();
        check_progression(movement, previous)?;
        progress.insert(
            movement.user_id,
            Progress {
                status_id: movement.status_id,
                transition_date: movement.transition_date,
            },
        );
    }

    Ok(())
}

fn check_progression(
    movement: &MovementRow,
    previous: Option<Progress>,
) -> Result<(), ValidationError> {
    let expected = previous.map_or(FIRST_STATUS_ID, |p| p.status_id.saturating_add(1));
    if movement.status_id != expected {
        return Err(ValidationError::StatusSequenceBroken {
            user_id: movement.user_id,
            expected,
            actual: movement.status_id,
        });
    }

    match previous {
        Some(p) if movement.transition_date <= p.transition_date => {
            Err(ValidationError::TransitionOutOfOrder {
                movement_id: movement.movement_id,
                transition_date: movement.transition_date,
                previous: p.transition_date,
            })
        }
        _ => Ok(()),
    }
}
