//! Run-state store
//!
//! Remembers the snapshot of the last successful run so an unchanged set of
//! labeled PRs can be detected and skipped.

mod storage;

pub use storage::{load_snapshot, save_snapshot};

use crate::error::Result;
use crate::types::RunSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current on-disk format version
pub const STATE_VERSION: u32 = 1;

/// On-disk representation of the run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PersistedState {
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    repositories: RunSnapshot,
}

/// Durable store for the previous run's snapshot
#[derive(Debug, Clone)]
pub struct RunStateStore {
    path: PathBuf,
}

impl RunStateStore {
    /// Create a store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the previous snapshot (empty on cold start)
    pub fn load(&self) -> Result<RunSnapshot> {
        load_snapshot(&self.path)
    }

    /// Replace the stored snapshot
    pub fn save(&self, snapshot: &RunSnapshot) -> Result<()> {
        save_snapshot(&self.path, snapshot)
    }

    /// Whether two snapshots describe the same labeled PRs
    pub fn equals(a: &RunSnapshot, b: &RunSnapshot) -> bool {
        a == b
    }
}
