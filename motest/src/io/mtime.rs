//! Process-lifetime cache of file modification times.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::{trace, warn};

/// Memoizes modification times for the duration of one run.
///
/// Each path is read from storage at most once (modulo concurrent first
/// reads, which store the same value). A missing file is cached as `None`.
/// There is no invalidation: files rewritten during the run keep their first
/// observed timestamp, so artifacts are never looked up through this cache.
#[derive(Debug, Default)]
pub struct MtimeCache {
    entries: Mutex<HashMap<PathBuf, Option<SystemTime>>>,
}

impl MtimeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Modification time of `path`, or `None` if the file does not exist.
    pub fn modified(&self, path: &Path) -> Result<Option<SystemTime>> {
        if let Some(cached) = self.lock().get(path) {
            return Ok(*cached);
        }

        let observed = read_modified(path)?;
        trace!(path = %path.display(), ?observed, "cached modification time");
        self.lock().insert(path.to_path_buf(), observed);
        Ok(observed)
    }

    /// True iff `path` was modified after `reference`.
    ///
    /// A missing file counts as newer so that its importers get rebuilt.
    pub fn is_newer_than(&self, path: &Path, reference: SystemTime) -> Result<bool> {
        match self.modified(path)? {
            Some(modified) => Ok(modified > reference),
            None => {
                warn!(path = %path.display(), "module not found, treating as stale");
                Ok(true)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Option<SystemTime>>> {
        // Entries are plain values; a panic elsewhere cannot leave one half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read a file's modification time straight from storage.
pub fn read_modified(path: &Path) -> Result<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) => {
            let modified = meta
                .modified()
                .with_context(|| format!("read modification time {}", path.display()))?;
            Ok(Some(modified))
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("stat {}", path.display())),
    }
}
