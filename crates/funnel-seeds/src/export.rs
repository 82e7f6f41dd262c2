//! CSV export of seed tables.
//!
//! Tables are encoded in memory with the `csv` crate and then written
//! atomically into a capability handle on the output directory.

use std::path::Path;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use tracing::info;

use crate::atomic_io::write_atomic;
use crate::error::ExportError;
use crate::generator::SeedTables;
use crate::rows::SeedRow;

/// File name of the status dimension table.
pub const STATUS_FILE_NAME: &str = "dim_status.csv";

/// File name of the users table.
pub const USERS_FILE_NAME: &str = "dim_users.csv";

/// File name of the movements table.
pub const MOVEMENTS_FILE_NAME: &str = "status_movements.csv";

/// Outcome of writing one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// File written inside the output directory.
    pub file_name: &'static str,
    /// Number of data rows, excluding the header.
    pub row_count: usize,
}

/// Creates `path` if needed and opens it as a capability handle.
///
/// # Errors
///
/// Returns [`ExportError::OutputDir`] if the directory cannot be created or
/// opened.
pub fn open_output_dir(path: &Path) -> Result<Dir, ExportError> {
    let to_error = |err: std::io::Error| ExportError::OutputDir {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    Dir::create_ambient_dir_all(path, ambient_authority()).map_err(to_error)?;
    Dir::open_ambient_dir(path, ambient_authority()).map_err(to_error)
}

/// Encodes `rows` as CSV with a header and writes them to `file_name`.
///
/// The header is written even when `rows` is empty.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if a row cannot be serialized, or
/// [`ExportError::WriteError`] if the file cannot be written.
pub fn export_table<T: SeedRow>(
    dir: &Dir,
    file_name: &'static str,
    rows: &[T],
) -> Result<ExportSummary, ExportError> {
    let contents = encode_csv(file_name, rows)?;
    write_atomic(dir, Utf8Path::new(file_name), &contents)?;

    info!(file_name, row_count = rows.len(), "seed table exported");

    Ok(ExportSummary {
        file_name,
        row_count: rows.len(),
    })
}

/// Writes the status, users, and movements tables in that order.
///
/// `on_export` is called after each file is in place, before the next table
/// is written.
///
/// # Errors
///
/// Returns the first [`ExportError`] encountered; tables already written
/// stay in place.
pub fn export_seed_tables<F>(
    dir: &Dir,
    tables: &SeedTables,
    mut on_export: F,
) -> Result<Vec<ExportSummary>, ExportError>
where
    F: FnMut(&ExportSummary),
{
    let mut exports = Vec::with_capacity(3);
    let mut record = |summary: ExportSummary| {
        on_export(&summary);
        exports.push(summary);
    };

    record(export_table(dir, STATUS_FILE_NAME, &tables.statuses)?);
    record(export_table(dir, USERS_FILE_NAME, &tables.users)?);
    record(export_table(dir, MOVEMENTS_FILE_NAME, &tables.movements)?);

    Ok(exports)
}

/// Formats the progress line printed after a table is written.
///
/// # Example
///
/// ```
/// use funnel_seeds::{ExportSummary, export_message};
///
/// let summary = ExportSummary {
///     file_name: "dim_status.csv",
///     row_count: 6,
/// };
///
/// assert_eq!(export_message(&summary), "Exported dim_status.csv (6 rows)");
/// ```
#[must_use]
pub fn export_message(summary: &ExportSummary) -> String {
    format!("Exported {} ({} rows)", summary.file_name, summary.row_count)
}

/// Formats the closing line printed once every table is written.
#[must_use]
pub fn ready_message(output_dir: &Path) -> String {
    format!("Data ready in {} for dbt ingestion.", output_dir.display())
}

fn encode_csv<T: SeedRow>(file_name: &str, rows: &[T]) -> Result<Vec<u8>, ExportError> {
    let to_error = |message: String| ExportError::Encode {
        file_name: file_name.to_owned(),
        message,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(T::COLUMNS)
        .map_err(|err| to_error(err.to_string()))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| to_error(err.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|err| to_error(err.error().to_string()))
}
