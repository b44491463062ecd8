//! # Repository Layout
//!
//! The directory contract regcheck operates on. Layout resolution is the
//! first thing a run does: it returns a structured result before any
//! schema is loaded or any file is read.
//!
//! ```text
//! <repo root>/
//!   .git
//!   CODEOWNERS            (or .github/, .gitlab/, docs/)
//!   schema/<type>.json    flat, one schema per type
//!   data/...              <type>.json files, subdirectories, index.json
//! ```

use std::path::{Path, PathBuf};

use crate::error::LayoutError;

/// Directory holding schema definitions, relative to the repo root.
pub const SCHEMA_DIR: &str = "schema";

/// Directory holding the data tree, relative to the repo root.
pub const DATA_DIR: &str = "data";

/// Version-control marker whose presence identifies the repo root.
pub const VCS_MARKER: &str = ".git";

/// Per-directory index file consumed by other tooling; never validated.
pub const INDEX_FILE: &str = "index.json";

/// Leading character of hidden entries; never validated.
pub const HIDDEN_MARKER: char = '.';

/// How a directory entry is treated by the walker.
///
/// Classification never follows symlinks: a symlink is [`EntryKind::Other`]
/// even when it points at a file or directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symlink, socket, FIFO or device.
    Other,
}

impl EntryKind {
    /// Classify a `std::fs::FileType` obtained without following symlinks.
    pub fn from_file_type(file_type: std::fs::FileType) -> Self {
        if file_type.is_file() {
            Self::File
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::Other
        }
    }
}

/// Resolved locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    /// Verify that `root` is a repository root and build the layout.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NotRepoRoot`] if `root` has no `.git` entry.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let root = root.as_ref();
        if !root.join(VCS_MARKER).exists() {
            return Err(LayoutError::NotRepoRoot {
                root: root.to_path_buf(),
                marker: VCS_MARKER,
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Same as [`RepoLayout::discover`] on the process working directory.
    pub fn from_current_dir() -> Result<Self, LayoutError> {
        let cwd = std::env::current_dir()?;
        Self::discover(cwd)
    }

    /// Repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute schema directory.
    pub fn schema_dir(&self) -> PathBuf {
        self.root.join(SCHEMA_DIR)
    }

    /// Data directory relative to the root, as the walker addresses it.
    pub fn data_dir(&self) -> &'static Path {
        Path::new(DATA_DIR)
    }
}

/// True if an entry with this name is skipped by every check.
pub fn is_skipped_name(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER) || name == INDEX_FILE
}
