//! Read-only listing of previous run directories.
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::UNIX_EPOCH;

#[derive(Serialize)]
pub struct RunEntry {
    pub name: String,
    pub modified_epoch_ms: u128,
}

/// Collect run directories under `runs_dir`, newest first. A missing runs
/// directory is an empty listing, not an error.
pub fn list_runs(runs_dir: &Path) -> Result<Vec<RunEntry>> {
    let mut entries = Vec::new();
    if !runs_dir.is_dir() {
        return Ok(entries);
    }
    for entry in
        fs::read_dir(runs_dir).with_context(|| format!("read {}", runs_dir.display()))?
    {
        let entry = entry.with_context(|| format!("read {}", runs_dir.display()))?;
        if !entry.path().is_dir() {
            continue;
        }
        let modified_epoch_ms = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        entries.push(RunEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            modified_epoch_ms,
        });
    }
    entries.sort_by(|a, b| {
        b.modified_epoch_ms
            .cmp(&a.modified_epoch_ms)
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(entries)
}
