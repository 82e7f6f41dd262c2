//! Funnel seed generator.
//!
//! Writes the status dimension, users, and status movements as CSV files for
//! downstream ingestion. Settings come from `FUNNEL_SEEDS_*` environment
//! variables, config files, and flags; see `funnel_seeds::SeedSettings`.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use funnel_seeds::{
    SeedError, SeedPlan, SeedSettings, export_message, ready_message, run_with_progress,
};
use mockable::DefaultClock;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> ExitCode {
    if let Err(err) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        write_error(&format!("tracing init failed: {err}"));
    }

    match run_seed() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            write_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run_seed() -> Result<(), SeedError> {
    let settings = SeedSettings::load_from_args(env::args_os())?;
    let plan = SeedPlan::from_settings(&settings, &DefaultClock)?;
    let output_dir = settings.output_dir();

    write_line(&format!(
        "Generating {} fake funnel transitions...",
        plan.target_rows()
    ));

    let report = run_with_progress(&plan, &output_dir, |summary| {
        write_line(&export_message(summary));
    })?;
    write_line(&ready_message(&report.output_dir));

    Ok(())
}

fn write_line(message: &str) {
    if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
        drop(err);
    }
}

fn write_error(message: &str) {
    if let Err(err) = writeln!(io::stderr().lock(), "{message}") {
        drop(err);
    }
}
