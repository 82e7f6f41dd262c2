//! End-to-end seed run: generate, validate, export.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::SeedError;
use crate::export::{ExportSummary, export_seed_tables, open_output_dir};
use crate::generator::{SeedPlan, generate_seed_tables};
use crate::validation::validate_tables;

/// Outcome of a completed seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Directory the tables were written to.
    pub output_dir: PathBuf,
    /// One entry per written table, in write order.
    pub exports: Vec<ExportSummary>,
}

/// Generates the tables for `plan`, validates them, and writes them to
/// `output_dir`.
///
/// Nothing is written unless every table passes validation.
///
/// # Errors
///
/// Returns [`SeedError`] wrapping the first generation, validation, or
/// export failure.
pub fn run(plan: &SeedPlan, output_dir: &Path) -> Result<RunReport, SeedError> {
    run_with_progress(plan, output_dir, |_| {})
}

/// Like [`run`], calling `on_export` as each table lands on disk.
///
/// When a later table fails to write, `on_export` has already seen every
/// table written before it.
///
/// # Errors
///
/// Returns [`SeedError`] wrapping the first generation, validation, or
/// export failure.
pub fn run_with_progress<F>(
    plan: &SeedPlan,
    output_dir: &Path,
    on_export: F,
) -> Result<RunReport, SeedError>
where
    F: FnMut(&ExportSummary),
{
    info!(
        seed = plan.seed(),
        user_count = plan.user_count(),
        target_rows = plan.target_rows(),
        reference_date = %plan.reference_date(),
        output_dir = %output_dir.display(),
        "seed run started"
    );

    let tables = generate_seed_tables(plan)?;
    validate_tables(&tables, plan.target_rows())?;

    let dir = open_output_dir(output_dir)?;
    let exports = export_seed_tables(&dir, &tables, on_export)?;

    info!(tables = exports.len(), "seed run finished");

    Ok(RunReport {
        output_dir: output_dir.to_path_buf(),
        exports,
    })
}
