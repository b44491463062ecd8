//! # regcheck-owners — Ownership Resolution
//!
//! Answers "who owns this path?" from the repository's CODEOWNERS file.
//! Every data entry must resolve to at least one owner; an empty answer is
//! a validation failure reported by the tree walker, never an error here.
//!
//! - [`CodeOwners::discover`] finds the CODEOWNERS file under the repo root
//!   (`.github/`, `.gitlab/`, `docs/`, then the root itself).
//! - Patterns follow gitignore matching ([`OwnerPattern`]); the last
//!   matching rule wins, and a rule without owners un-owns its paths.

pub mod codeowners;
pub mod pattern;

use std::path::{Path, PathBuf};

use regcheck_core::EntryKind;
use thiserror::Error;

pub use codeowners::{CodeOwners, OwnerRule, CODEOWNERS_LOCATIONS};
pub use pattern::OwnerPattern;

/// Looks up the declared owners of a repository path.
pub trait OwnershipResolver {
    /// Owners of `path` (repository-relative, or absolute under the root).
    ///
    /// An empty list means no owner is declared.
    fn owners_of(&self, path: &Path, kind: EntryKind) -> Vec<String>;
}

/// Error while loading ownership rules. Every variant is fatal for a run.
#[derive(Error, Debug)]
pub enum OwnershipError {
    /// No CODEOWNERS file exists in any of the probed locations.
    #[error("could not find a CODEOWNERS file in \"{}\"", root.display())]
    NotFound {
        /// Repository root that was searched.
        root: PathBuf,
    },

    /// The CODEOWNERS file exists but could not be read.
    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        /// CODEOWNERS file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A rule's pattern could not be compiled.
    #[error("invalid pattern {pattern:?} at {}:{line}: {source}", path.display())]
    InvalidPattern {
        /// CODEOWNERS file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Pattern text as written.
        pattern: String,
        /// Compilation error.
        #[source]
        source: globset::Error,
    },
}
