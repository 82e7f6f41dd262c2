//! Deterministic sales-funnel seed data for ingestion testing.
//!
//! This crate generates three related tables and writes them as CSV files:
//! a fixed status dimension, fake users, and per-user funnel movements
//! capped at a target row count.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Deterministic generation from a named RNG seed and reference date
//! - Invariant checks on the generated tables before export
//! - Atomic CSV export into a capability-scoped output directory
//! - Layered settings via OrthoConfig
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use funnel_seeds::{SeedPlan, generate_seed_tables, validate_tables};
//!
//! let reference = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
//! let plan = SeedPlan::new(42, 150, 500, reference);
//!
//! let tables = generate_seed_tables(&plan).expect("generation succeeds");
//! validate_tables(&tables, plan.target_rows()).expect("tables are valid");
//!
//! assert_eq!(tables.statuses.len(), 6);
//! assert_eq!(tables.users.len(), 150);
//! assert_eq!(tables.movements.len(), 500);
//! ```

mod atomic_io;
mod config;
mod error;
mod export;
mod generator;
mod pipeline;
mod rows;
mod status;
mod validation;

pub use config::{
    DEFAULT_OUTPUT_DIR, DEFAULT_SEED, DEFAULT_TARGET_ROWS, DEFAULT_USER_COUNT, MAX_USER_COUNT,
    SeedSettings,
};
pub use error::{ConfigError, ExportError, GenerationError, SeedError, ValidationError};
pub use export::{
    ExportSummary, MOVEMENTS_FILE_NAME, STATUS_FILE_NAME, USERS_FILE_NAME, export_message,
    export_seed_tables, export_table, open_output_dir, ready_message,
};
pub use generator::{
    SeedPlan, SeedTables, generate_funnel_movements, generate_seed_tables, generate_users,
};
pub use pipeline::{RunReport, run, run_with_progress};
pub use rows::{MovementRow, SeedRow, UserRow};
pub use status::{FIRST_STATUS_ID, LAST_STATUS_ID, STATUS_DIMENSION, StatusRow, status_dimension};
pub use validation::validate_tables;
