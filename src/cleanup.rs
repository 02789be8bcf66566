use crate::runtime::Runtime;
use anyhow::Result;
use log::debug;
use std::path::Path;

/// What happened to the downloaded archive after extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Removed,
    /// Nothing was there to delete; not an error
    AlreadyAbsent,
}

/// Delete the archive at `path` if it still exists.
#[tracing::instrument(skip(runtime))]
pub fn remove_archive<R: Runtime>(runtime: &R, path: &Path) -> Result<CleanupOutcome> {
    if !runtime.exists(path) {
        debug!("Archive {:?} already gone", path);
        return Ok(CleanupOutcome::AlreadyAbsent);
    }

    runtime.remove_file(path)?;
    debug!("Removed archive {:?}", path);
    Ok(CleanupOutcome::Removed)
}
