//! # Error Types
//!
//! Startup and address errors shared across the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Per-entry validation problems are not errors: they are reported as
//! diagnostics by the tree walker and folded into the run verdict.

use std::path::PathBuf;

use thiserror::Error;

/// The working directory does not satisfy the startup preconditions.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// No version-control marker was found in the working directory.
    #[error("script should be run in the root of the repo. (no {marker} in \"{}\")", root.display())]
    NotRepoRoot {
        /// Directory that was inspected.
        root: PathBuf,
        /// Marker that was expected to exist.
        marker: &'static str,
    },

    /// The working directory itself could not be determined.
    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
}

/// A string could not be parsed as an address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The `0x` prefix is missing.
    #[error("missing 0x prefix")]
    MissingPrefix,

    /// The hex body has the wrong number of digits.
    #[error("expected 40 hex digits, found {0}")]
    InvalidLength(usize),

    /// The hex body contains a non-hex character.
    #[error("invalid hex character {ch:?} at position {position}")]
    InvalidCharacter {
        /// Offending character.
        ch: char,
        /// Zero-based position within the hex body.
        position: usize,
    },
}
