//! Staged writes of seed files.
//!
//! A table is first written in full to a hidden staging file next to its
//! target, synced, and only then renamed into place. The CSV ingestion job
//! therefore sees either the previous file or the complete new one.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::error::ExportError;

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `contents` to the seed file `path` inside `dir`, replacing any
/// previous version in one step.
///
/// `path` must be a bare file name such as `dim_users.csv`.
///
/// # Errors
///
/// Returns [`ExportError::WriteError`] naming the staging file if it cannot
/// be written, or the target if it cannot be put in place.
pub(crate) fn write_atomic(
    dir: &Dir,
    path: &Utf8Path,
    contents: &[u8],
) -> Result<(), ExportError> {
    let file_name = bare_file_name(path)?;
    let staging = staging_name(file_name);
    let write_failed = |at: &Utf8Path, err: io::Error| ExportError::WriteError {
        path: at.to_path_buf(),
        message: err.to_string(),
    };

    if let Err(err) = stage(dir, &staging, contents) {
        discard(dir, &staging);
        return Err(write_failed(path.with_file_name(&staging).as_path(), err));
    }
    if let Err(err) = replace(dir, &staging, file_name) {
        discard(dir, &staging);
        return Err(write_failed(path, err));
    }

    // Best-effort directory sync.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
    Ok(())
}

fn bare_file_name(path: &Utf8Path) -> Result<&str, ExportError> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(name)), None) => Ok(name),
        _ => Err(ExportError::WriteError {
            path: path.to_path_buf(),
            message: "seed path must be a file name".to_owned(),
        }),
    }
}

/// Hidden sibling name, unique per process and call.
fn staging_name(file_name: &str) -> String {
    let counter = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    format!(
        ".{file_name}.{}.{nanos}.{counter}.partial",
        std::process::id()
    )
}

fn stage(dir: &Dir, staging: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(staging, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(not(windows))]
fn replace(dir: &Dir, staging: &str, file_name: &str) -> io::Result<()> {
    dir.rename(staging, dir, file_name)
}

#[cfg(windows)]
fn replace(dir: &Dir, staging: &str, file_name: &str) -> io::Result<()> {
    // Renaming onto an existing file fails on Windows.
    match dir.remove_file(file_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(staging, dir, file_name)
}

fn discard(dir: &Dir, staging: &str) {
    drop(dir.remove_file(staging));
}
