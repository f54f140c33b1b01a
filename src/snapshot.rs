//! Snapshot writer - idempotent persistence of the resolved entry list
//!
//! The snapshot is replaced wholesale on every write; the only read of the
//! previous file is the structural comparison that decides whether a write
//! is needed at all.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::resolver::ProjectEntry;

/// Result of a snapshot write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// The existing snapshot already matched; nothing was written.
    Unchanged,
    /// A new snapshot with this many entries was written.
    Written(usize),
}

/// Sort entries by last activity, most recent first. The comparison is
/// lexical on the ISO-8601 string, so entries without a timestamp sort
/// last; equal timestamps keep their listing order.
pub fn sort_entries(entries: &mut [ProjectEntry]) {
    entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Sort the entries and persist them at `path`, unless the existing
/// snapshot is structurally identical.
pub fn write_snapshot(entries: &mut Vec<ProjectEntry>, path: &Path) -> Result<SnapshotOutcome> {
    sort_entries(entries);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    if let Some(previous) = read_previous(path) {
        if previous == *entries {
            debug!("Snapshot at {} is unchanged", path.display());
            return Ok(SnapshotOutcome::Unchanged);
        }
    }

    // Pretty-printed UTF-8; serde_json keeps non-ASCII characters literal.
    let mut json =
        serde_json::to_string_pretty(entries).context("Failed to serialize snapshot")?;
    json.push('\n');
    fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;

    info!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(SnapshotOutcome::Written(entries.len()))
}

/// Parse the previous snapshot. A missing, unreadable or unparseable file
/// counts as no previous snapshot.
fn read_previous(path: &Path) -> Option<Vec<ProjectEntry>> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(entries) => Some(entries),
        Err(err) => {
            warn!(
                "Ignoring unparseable snapshot at {}: {}",
                path.display(),
                err
            );
            None
        }
    }
}
