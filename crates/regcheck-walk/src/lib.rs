//! # regcheck-walk — Tree Validator
//!
//! Walks the data directory depth-first and applies every check to every
//! entry, reporting all problems in a single pass:
//!
//! 1. Hidden entries and `index.json` are skipped outright.
//! 2. Files whose stem names a loaded schema are parsed and validated.
//! 3. Directories named `0x…` must be canonical EIP-55 addresses.
//! 4. Every remaining entry must have at least one CODEOWNERS owner.
//!
//! Problems are delivered to a [`Reporter`] as [`Diagnostic`]s while the
//! walk continues. Each directory returns its own verdict, which the
//! parent folds into its own with logical AND.

pub mod diagnostic;
pub mod walker;

pub use diagnostic::{Diagnostic, Reporter, WriteReporter};
pub use walker::{TreeValidator, WalkError, WalkStats};
