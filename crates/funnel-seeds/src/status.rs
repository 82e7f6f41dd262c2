//! Sales funnel status dimension.
//!
//! The dimension is fixed: six stages from first contact to a closed deal.
//! Movements reference stages by ID and always progress through them in
//! order, so the row order here is part of the data contract.

use serde::Serialize;

use crate::rows::SeedRow;

/// ID of the first funnel stage.
pub const FIRST_STATUS_ID: u8 = 1;

/// ID of the last funnel stage.
pub const LAST_STATUS_ID: u8 = 6;

/// One row of the status dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StatusRow {
    /// Stage identifier.
    pub status_id: u8,
    /// Human-readable stage name.
    pub status_name: &'static str,
}

impl SeedRow for StatusRow {
    const COLUMNS: &'static [&'static str] = &["status_id", "status_name"];
}

/// The funnel stages in progression order.
pub const STATUS_DIMENSION: [StatusRow; 6] = [
    StatusRow {
        status_id: 1,
        status_name: "Lead",
    },
    StatusRow {
        status_id: 2,
        status_name: "Contacted",
    },
    StatusRow {
        status_id: 3,
        status_name: "Qualified",
    },
    StatusRow {
        status_id: 4,
        status_name: "Proposal Sent",
    },
    StatusRow {
        status_id: 5,
        status_name: "Negotiation",
    },
    StatusRow {
        status_id: 6,
        status_name: "Closed",
    },
];

/// Builds the status dimension table.
///
/// # Example
///
/// ```
/// use funnel_seeds::status_dimension;
///
/// let statuses = status_dimension();
///
/// assert_eq!(statuses.len(), 6);
/// assert_eq!(statuses.first().map(|s| s.status_name), Some("Lead"));
/// ```
#[must_use]
pub fn status_dimension() -> Vec<StatusRow> {
    STATUS_DIMENSION.to_vec()
}

/// Returns `true` if `status_id` names a known funnel stage.
#[must_use]
pub const fn is_known_status(status_id: u8) -> bool {
    status_id >= FIRST_STATUS_ID && status_id <= LAST_STATUS_ID
}
