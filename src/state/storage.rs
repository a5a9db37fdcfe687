//! Persistence for the previous run's snapshot.

use super::{PersistedState, STATE_VERSION};
use crate::error::{Error, Result};
use crate::types::RunSnapshot;
use chrono::Utc;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Load the snapshot stored at `path`.
///
/// Returns an empty snapshot if the file doesn't exist.
pub fn load_snapshot(path: &Path) -> Result<RunSnapshot> {
    if !path.exists() {
        return Ok(RunSnapshot::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::RunState(format!("failed to read {}: {e}", path.display())))?;

    let state: PersistedState = toml::from_str(&content)
        .map_err(|e| Error::RunState(format!("failed to parse {}: {e}", path.display())))?;

    if state.version > STATE_VERSION {
        return Err(Error::RunState(format!(
            "{} was written by a newer version (state version {})",
            path.display(),
            state.version
        )));
    }

    Ok(state.repositories)
}

/// Save `snapshot` to `path`.
///
/// The content is written to a temporary file next to `path` and renamed over
/// it only once fully written, so an interrupted save leaves the previous
/// file intact.
pub fn save_snapshot(path: &Path, snapshot: &RunSnapshot) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !dir.exists() {
        fs::create_dir_all(dir)
            .map_err(|e| Error::RunState(format!("failed to create {}: {e}", dir.display())))?;
    }

    let state = PersistedState {
        version: STATE_VERSION,
        saved_at: Some(Utc::now()),
        repositories: snapshot.clone(),
    };

    let content = toml::to_string_pretty(&state)
        .map_err(|e| Error::RunState(format!("failed to serialize run state: {e}")))?;

    let content_with_header = format!(
        "# bleeding-edge-bot run state\n# Auto-generated - manual edits may be overwritten\n\n{content}"
    );

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::RunState(format!("failed to create temp file in {}: {e}", dir.display())))?;
    tmp.write_all(content_with_header.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::RunState(format!("failed to write run state: {e}")))?;
    tmp.persist(path)
        .map_err(|e| Error::RunState(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}
