#![forbid(unsafe_code)]

//! Persistence of the "tour already completed" flag.
//!
//! A [`CompletionStore`] keeps one boolean per tour key. The controller reads
//! it once in `start()` and writes it once in `finish()`.
//!
//! # Backends
//!
//! - [`MemoryCompletionStore`]: in-memory, for tests and ephemeral sessions.
//! - `FileCompletionStore`: JSON file (requires `state-persistence`).
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: store failures never panic and never stop a
//!    tour. The controller treats a failed read as "not completed" and logs a
//!    failed write.
//! 2. **Atomic writes**: the file backend writes `{path}.tmp`, syncs, then
//!    renames over the target.
//! 3. **Thread safety**: backends are `Send + Sync` so one store can be shared
//!    by several controllers behind an `Arc`.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StoreError::Io` | File I/O failure | Returned to caller |
//! | `StoreError::Serialization` | JSON encode/decode | Returned to caller |
//! | `StoreError::Corruption` | Poisoned lock | Returned to caller |
//! | Missing file | First run | Key reads as not completed |
//! | Unknown `format_version` | Newer writer | Logged, reads as empty |

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from completion store operations.
#[derive(Debug)]
pub enum StoreError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Store is corrupted or its lock was poisoned.
    Corruption(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "I/O error: {e}"),
            StoreError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StoreError::Corruption(msg) => write!(f, "store corruption: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialization(_) | StoreError::Corruption(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// ─────────────────────────────────────────────────────────────────────────────
// Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Pluggable storage for per-key completion flags.
pub trait CompletionStore: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Whether the tour under `key` has completed. Unknown keys are `false`.
    fn is_completed(&self, key: &str) -> StoreResult<bool>;

    /// Record the tour under `key` as completed.
    fn mark_completed(&self, key: &str) -> StoreResult<()>;

    /// Forget the flag for `key`, so the tour shows again.
    fn reset(&self, key: &str) -> StoreResult<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory completion store. Flags are lost when the process exits.
#[derive(Default)]
pub struct MemoryCompletionStore {
    data: RwLock<HashMap<String, bool>>,
}

impl MemoryCompletionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given keys already completed.
    #[must_use]
    pub fn with_completed<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            data: RwLock::new(keys.into_iter().map(|k| (k.into(), true)).collect()),
        }
    }
}

impl CompletionStore for MemoryCompletionStore {
    fn name(&self) -> &str {
        "MemoryCompletionStore"
    }

    fn is_completed(&self, key: &str) -> StoreResult<bool> {
        let guard = self
            .data
            .read()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).copied().unwrap_or(false))
    }

    fn mark_completed(&self, key: &str) -> StoreResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        guard.insert(key.to_owned(), true);
        Ok(())
    }

    fn reset(&self, key: &str) -> StoreResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryCompletionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryCompletionStore")
            .field("keys", &count)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_store {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk format.
    #[derive(Serialize, Deserialize)]
    struct CompletionFile {
        /// Format version for future migrations.
        format_version: u32,
        /// Map of tour key -> completed.
        completed: BTreeMap<String, bool>,
    }

    impl CompletionFile {
        const FORMAT_VERSION: u32 = 1;

        fn new(completed: BTreeMap<String, bool>) -> Self {
            Self {
                format_version: Self::FORMAT_VERSION,
                completed,
            }
        }
    }

    /// JSON-file completion store.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "completed": {
    ///     "onboarding": true
    ///   }
    /// }
    /// ```
    ///
    /// # Atomic Writes
    ///
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    ///
    /// Every call reads the file afresh, so several processes (or stores)
    /// pointing at the same path observe each other's writes.
    pub struct FileCompletionStore {
        path: PathBuf,
        lock: RwLock<()>,
    }

    impl FileCompletionStore {
        /// Create a store at `path`. The file is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
                lock: RwLock::new(()),
            }
        }

        /// Store at `$XDG_STATE_HOME/tiptour/{app_name}/completed.json`,
        /// falling back to `~/.local/state`.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let path = state_dir()
                .join("tiptour")
                .join(app_name)
                .join("completed.json");
            Self::new(path)
        }

        /// Path of the backing file.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn read(&self) -> StoreResult<BTreeMap<String, bool>> {
            if !self.path.exists() {
                return Ok(BTreeMap::new());
            }

            let reader = BufReader::new(File::open(&self.path)?);
            let file: CompletionFile = serde_json::from_reader(reader).map_err(|e| {
                StoreError::Serialization(format!("failed to parse completion file: {e}"))
            })?;

            if file.format_version != CompletionFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = file.format_version,
                    expected = CompletionFile::FORMAT_VERSION,
                    "completion file format version mismatch, ignoring stored flags"
                );
                return Ok(BTreeMap::new());
            }

            Ok(file.completed)
        }

        fn write(&self, completed: BTreeMap<String, bool>) -> StoreResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }

            let tmp_path = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp_path)?);
                serde_json::to_writer_pretty(&mut writer, &CompletionFile::new(completed))
                    .map_err(|e| {
                        StoreError::Serialization(format!("failed to serialize flags: {e}"))
                    })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }

            fs::rename(&tmp_path, &self.path)?;
            Ok(())
        }

        /// Read-modify-write under the write lock.
        fn update(&self, f: impl FnOnce(&mut BTreeMap<String, bool>)) -> StoreResult<()> {
            let _guard = self
                .lock
                .write()
                .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
            let mut completed = match self.read() {
                Ok(completed) => completed,
                Err(StoreError::Serialization(msg)) => {
                    tracing::warn!(path = %self.path.display(), error = %msg, "replacing unreadable completion file");
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            f(&mut completed);
            self.write(completed)
        }
    }

    /// State directory: `$XDG_STATE_HOME`, then `~/.local/state`, then `.`.
    fn state_dir() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl CompletionStore for FileCompletionStore {
        fn name(&self) -> &str {
            "FileCompletionStore"
        }

        fn is_completed(&self, key: &str) -> StoreResult<bool> {
            let _guard = self
                .lock
                .read()
                .map_err(|_| StoreError::Corruption("lock poisoned".into()))?;
            Ok(self.read()?.get(key).copied().unwrap_or(false))
        }

        fn mark_completed(&self, key: &str) -> StoreResult<()> {
            self.update(|completed| {
                completed.insert(key.to_owned(), true);
            })?;
            tracing::debug!(path = %self.path.display(), key, "saved completion flag");
            Ok(())
        }

        fn reset(&self, key: &str) -> StoreResult<()> {
            self.update(|completed| {
                completed.remove(key);
            })?;
            tracing::debug!(path = %self.path.display(), key, "cleared completion flag");
            Ok(())
        }
    }

    impl fmt::Debug for FileCompletionStore {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileCompletionStore")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_store::FileCompletionStore;
