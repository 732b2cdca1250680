//! Storage layer for studio
//!
//! Board state lives under the studio root:
//!
//! ```text
//! .studio.toml          # Configuration (optional)
//! .studio/              # Local state
//!   board.json          # BoardSnapshot: columns and tasks per project
//!   board.lock          # Advisory lock for read-modify-write cycles
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::board::BoardSnapshot;
use crate::error::{Error, Result};
use crate::lock::{self, FileLock};

/// Name of the local state directory
pub const LOCAL_DIR: &str = ".studio";

const BOARD_FILE: &str = "board.json";
const BOARD_LOCK: &str = "board.lock";

/// Storage manager for studio state
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the `.studio/` directory
    pub fn local_dir(&self) -> PathBuf {
        self.root.join(LOCAL_DIR)
    }

    pub fn board_file(&self) -> PathBuf {
        self.local_dir().join(BOARD_FILE)
    }

    pub fn board_lock_file(&self) -> PathBuf {
        self.local_dir().join(BOARD_LOCK)
    }

    pub fn is_initialized(&self) -> bool {
        self.board_file().exists()
    }

    /// Create `.studio/` and an empty board snapshot. Returns `false` when
    /// the studio was already initialized.
    pub fn init(&self) -> Result<bool> {
        fs::create_dir_all(self.local_dir())?;
        if self.is_initialized() {
            return Ok(false);
        }
        self.write_json(&self.board_file(), &BoardSnapshot::empty())?;
        tracing::debug!(root = %self.root.display(), "initialized studio storage");
        Ok(true)
    }

    /// Write JSON data atomically (write to temp, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Read the board snapshot; an empty one when nothing was saved yet.
    pub fn load_board(&self) -> Result<BoardSnapshot> {
        let path = self.board_file();
        if !path.exists() {
            return Ok(BoardSnapshot::empty());
        }
        let snapshot: BoardSnapshot = self.read_json(&path)?;
        tracing::debug!(path = %path.display(), projects = snapshot.tasks.len(), "loaded board");
        Ok(snapshot)
    }

    /// Lock, read, mutate, write. `f` returning an error leaves the file
    /// untouched.
    pub fn update_board<T, F>(&self, timeout_ms: u64, f: F) -> Result<T>
    where
        F: FnOnce(&mut BoardSnapshot) -> Result<T>,
    {
        if !self.is_initialized() {
            return Err(Error::NotInitialized(self.root.clone()));
        }

        let _lock = FileLock::acquire(self.board_lock_file(), timeout_ms)?;
        let mut snapshot = self.load_board()?;
        let result = f(&mut snapshot)?;
        self.write_json(&self.board_file(), &snapshot)?;
        tracing::debug!(path = %self.board_file().display(), "saved board");
        Ok(result)
    }
}
