//! Rate-limit state persistence
//!
//! The on-disk format is two whitespace-separated integers,
//! `remaining reset_epoch`. Either may be missing, in which case it loads as
//! unknown. `limit` is never persisted.
//!
//! No locking is performed: processes sharing one state file overwrite each
//! other's snapshots.

use super::state::RateLimitState;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Load/save backend for the rate-limit snapshot
pub trait StateStore: Send + Sync {
    /// Load the persisted snapshot; `None` when nothing was persisted
    fn load(&self) -> Result<Option<RateLimitState>>;

    /// Persist the snapshot before the next request starts
    fn save(&self, state: &RateLimitState) -> Result<()>;
}

/// Parse the persisted text format
pub(crate) fn parse_snapshot(contents: &str) -> RateLimitState {
    let mut fields = contents.split_whitespace();
    let remaining = fields.next().and_then(|raw| match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid persisted remaining count: {raw:?}");
            None
        }
    });
    let reset_epoch = fields.next().and_then(|raw| match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid persisted reset time: {raw:?}");
            None
        }
    });

    RateLimitState {
        remaining,
        limit: None,
        reset_epoch,
    }
}

/// Render the persisted text format
pub(crate) fn format_snapshot(state: &RateLimitState) -> String {
    match (state.remaining, state.reset_epoch) {
        (Some(remaining), Some(reset)) => format!("{remaining} {reset}\n"),
        (Some(remaining), None) => format!("{remaining}\n"),
        (None, _) => String::new(),
    }
}

// ============================================================================
// File Store
// ============================================================================

/// File-backed state store with atomic replace-on-write
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store persisting to `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Sibling written before the rename, e.g. `limits.state.tmp`
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<RateLimitState>> {
        if !self.path.exists() {
            debug!("No state file at {}", self.path.display());
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::state(format!("Failed to read state file {}: {e}", self.path.display()))
        })?;

        let state = parse_snapshot(&contents);
        debug!("Loaded rate-limit state from {}: {state}", self.path.display());
        Ok(Some(state))
    }

    fn save(&self, state: &RateLimitState) -> Result<()> {
        // Write to temp file first, then rename for atomicity
        let temp_path = self.temp_path();
        std::fs::write(&temp_path, format_snapshot(state))
            .with_context(|| format!("Failed to write state file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace state file {}", self.path.display()))?;
        Ok(())
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// State store that keeps the snapshot in memory (persistence disabled)
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    latest: Mutex<Option<RateLimitState>>,
    saves: Mutex<usize>,
}

impl MemoryStateStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that loads `state`
    pub fn with_state(state: RateLimitState) -> Self {
        Self {
            latest: Mutex::new(Some(state)),
            saves: Mutex::new(0),
        }
    }

    /// The most recently saved (or initial) snapshot
    pub fn latest(&self) -> Option<RateLimitState> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of saves performed
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<RateLimitState>> {
        Ok(self.latest())
    }

    fn save(&self, state: &RateLimitState) -> Result<()> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(*state);
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}
