//! Seed table row types.
//!
//! Each struct serializes to one CSV record. Field names are the column
//! names, so renaming a field changes the exported header.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A row type that can be exported as a CSV table.
///
/// `COLUMNS` lists the header in field order. The exporter writes it
/// explicitly so empty tables still carry a header.
pub trait SeedRow: Serialize {
    /// Column names in serialization order.
    const COLUMNS: &'static [&'static str];
}

/// A generated user record.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use funnel_seeds::UserRow;
/// use uuid::Uuid;
///
/// let user = UserRow {
///     user_id: Uuid::nil(),
///     name: "Ada Lovelace".to_owned(),
///     email: "ada@example.com".to_owned(),
///     created_at: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
/// };
///
/// assert_eq!(user.name, "Ada Lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    /// Unique identifier for the user.
    pub user_id: Uuid,
    /// Full display name.
    pub name: String,
    /// Email address, unique within a run.
    pub email: String,
    /// Day the user entered the funnel.
    pub created_at: NaiveDate,
}

impl SeedRow for UserRow {
    const COLUMNS: &'static [&'static str] = &["user_id", "name", "email", "created_at"];
}

/// A single funnel transition for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRow {
    /// Unique identifier for the transition.
    pub movement_id: Uuid,
    /// User that moved.
    pub user_id: Uuid,
    /// Status the user moved into.
    pub status_id: u8,
    /// Day the transition happened.
    pub transition_date: NaiveDate,
}

impl SeedRow for MovementRow {
    const COLUMNS: &'static [&'static str] =
        &["movement_id", "user_id", "status_id", "transition_date"];
}
