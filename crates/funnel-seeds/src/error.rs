//! Error types for the funnel-seeds crate.
//!
//! Each stage of a seed run has its own semantic error enum built with
//! `thiserror`. [`SeedError`] wraps them so the pipeline and binary can use
//! `?` throughout.

use std::path::PathBuf;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while resolving seed settings into a generation plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Layered configuration could not be loaded.
    #[error("failed to load settings: {message}")]
    Load {
        /// Description of the loader failure.
        message: String,
    },

    /// The reference date override is not an ISO-8601 calendar date.
    #[error("invalid reference date '{value}': {message}")]
    InvalidReferenceDate {
        /// Raw value supplied for the reference date.
        value: String,
        /// Parser error message.
        message: String,
    },

    /// The requested user count exceeds the supported maximum.
    #[error("user count {value} exceeds the maximum of {max}")]
    UserCountOutOfRange {
        /// Requested user count.
        value: usize,
        /// Largest accepted user count.
        max: usize,
    },
}

/// Errors raised while generating seed tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No unused email address was produced within the retry budget.
    #[error("failed to generate a unique email after {attempts} attempts")]
    EmailGenerationExhausted {
        /// Number of attempts made before giving up.
        attempts: usize,
    },

    /// Date arithmetic left the representable calendar range.
    #[error("date arithmetic overflowed: {date} offset by {days} days")]
    DateOutOfRange {
        /// Date the offset was applied to.
        date: NaiveDate,
        /// Offset in days.
        days: u64,
    },
}

/// Errors raised when generated tables break a data-model invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The status dimension does not hold IDs 1 through 6 in order.
    #[error("status dimension row {index} has id {actual}, expected {expected}")]
    StatusDimensionOutOfOrder {
        /// Zero-based row index.
        index: usize,
        /// Expected status ID.
        expected: u8,
        /// Status ID found at that row.
        actual: u8,
    },

    /// The status dimension has the wrong number of rows.
    #[error("status dimension has {actual} rows, expected {expected}")]
    StatusDimensionSize {
        /// Expected row count.
        expected: usize,
        /// Row count found.
        actual: usize,
    },

    /// Two users share an identifier.
    #[error("duplicate user id {user_id}")]
    DuplicateUserId {
        /// Repeated identifier.
        user_id: Uuid,
    },

    /// Two users share an email address.
    #[error("duplicate email '{email}'")]
    DuplicateEmail {
        /// Repeated email address.
        email: String,
    },

    /// Two movements share an identifier.
    #[error("duplicate movement id {movement_id}")]
    DuplicateMovementId {
        /// Repeated identifier.
        movement_id: Uuid,
    },

    /// A movement references a user that does not exist.
    #[error("movement {movement_id} references unknown user {user_id}")]
    UnknownUser {
        /// Offending movement.
        movement_id: Uuid,
        /// Missing user.
        user_id: Uuid,
    },

    /// A movement references a status that does not exist.
    #[error("movement {movement_id} references unknown status {status_id}")]
    UnknownStatus {
        /// Offending movement.
        movement_id: Uuid,
        /// Missing status.
        status_id: u8,
    },

    /// A user's status sequence skips, repeats, or does not start at 1.
    #[error("user {user_id} moved to status {actual}, expected {expected}")]
    StatusSequenceBroken {
        /// User whose sequence is broken.
        user_id: Uuid,
        /// Status that should have come next.
        expected: u8,
        /// Status that was found.
        actual: u8,
    },

    /// A transition is dated before its user was created.
    #[error("movement {movement_id} on {transition_date} precedes user creation on {created_at}")]
    TransitionBeforeCreation {
        /// Offending movement.
        movement_id: Uuid,
        /// Transition date of the movement.
        transition_date: NaiveDate,
        /// Creation date of the user.
        created_at: NaiveDate,
    },

    /// A transition is not dated after the user's previous transition.
    #[error("movement {movement_id} on {transition_date} does not follow {previous}")]
    TransitionOutOfOrder {
        /// Offending movement.
        movement_id: Uuid,
        /// Transition date of the movement.
        transition_date: NaiveDate,
        /// Date of the previous transition for the same user.
        previous: NaiveDate,
    },

    /// More movement rows exist than the configured cap allows.
    #[error("{rows} movement rows exceed the target of {target_rows}")]
    TargetExceeded {
        /// Rows generated.
        rows: usize,
        /// Configured cap.
        target_rows: usize,
    },
}

/// Errors raised while writing seed tables to disk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The output directory could not be created or opened.
    #[error("failed to open output directory '{path}': {message}")]
    OutputDir {
        /// Directory path.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// Rows could not be encoded as CSV.
    #[error("failed to encode '{file_name}' as CSV: {message}")]
    Encode {
        /// Target file name.
        file_name: String,
        /// Description of the encoder error.
        message: String,
    },

    /// The CSV file could not be written.
    #[error("failed to write seed file at '{path}': {message}")]
    WriteError {
        /// Path being written.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

/// Any failure that aborts a seed run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    /// Settings could not be resolved.
    #[error("configuration error: {source}")]
    Config {
        /// Underlying configuration error.
        #[from]
        #[source]
        source: ConfigError,
    },
    /// Table generation failed.
    #[error("generation error: {source}")]
    Generation {
        /// Underlying generation error.
        #[from]
        #[source]
        source: GenerationError,
    },
    /// Generated tables failed validation.
    #[error("validation error: {source}")]
    Validation {
        /// Underlying validation error.
        #[from]
        #[source]
        source: ValidationError,
    },
    /// Writing tables failed.
    #[error("export error: {source}")]
    Export {
        /// Underlying export error.
        #[from]
        #[source]
        source: ExportError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_reference_date_formats_correctly() {
        let err = ConfigError::InvalidReferenceDate {
            value: "yesterday".to_owned(),
            message: "input contains invalid characters".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid reference date 'yesterday': input contains invalid characters"
        );
    }

    #[test]
    fn config_error_user_count_formats_correctly() {
        let err = ConfigError::UserCountOutOfRange {
            value: 2_000_000,
            max: 1_000_000,
        };
        assert_eq!(
            err.to_string(),
            "user count 2000000 exceeds the maximum of 1000000"
        );
    }

    #[test]
    fn generation_error_email_formats_correctly() {
        let err = GenerationError::EmailGenerationExhausted { attempts: 1000 };
        assert_eq!(
            err.to_string(),
            "failed to generate a unique email after 1000 attempts"
        );
    }

    #[test]
    fn generation_error_date_formats_correctly() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
        let err = GenerationError::DateOutOfRange { date, days: 730 };
        assert_eq!(
            err.to_string(),
            "date arithmetic overflowed: 2025-03-01 offset by 730 days"
        );
    }

    #[test]
    fn validation_error_target_formats_correctly() {
        let err = ValidationError::TargetExceeded {
            rows: 501,
            target_rows: 500,
        };
        assert_eq!(
            err.to_string(),
            "501 movement rows exceed the target of 500"
        );
    }

    #[test]
    fn validation_error_sequence_formats_correctly() {
        let err = ValidationError::StatusSequenceBroken {
            user_id: Uuid::nil(),
            expected: 1,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "user 00000000-0000-0000-0000-000000000000 moved to status 3, expected 1"
        );
    }

    #[test]
    fn export_error_write_formats_correctly() {
        let err = ExportError::WriteError {
            path: Utf8PathBuf::from("seeds/dim_users.csv"),
            message: "disk full".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to write seed file at 'seeds/dim_users.csv': disk full"
        );
    }

    #[test]
    fn seed_error_wraps_sources() {
        let err = SeedError::from(GenerationError::EmailGenerationExhausted { attempts: 3 });
        assert_eq!(
            err.to_string(),
            "generation error: failed to generate a unique email after 3 attempts"
        );
    }
}
