//! # regcheck-cli — Repository Data Verifier
//!
//! Provides the `regcheck` binary. It takes no arguments: the directory
//! layout is fixed, and the tool must be run from the repository root.
//!
//! ```bash
//! cd my-registry && regcheck
//! ```
//!
//! ## Exit Status
//!
//! - `0` — every check passed; `Ok: all files match schema definitions!`
//!   is printed to stdout.
//! - `1` — not run from a repository root, a schema or the CODEOWNERS file
//!   could not be loaded, the data tree could not be read, or any entry
//!   failed validation. Every diagnostic is printed to stderr first.
//!
//! ## Crate Policy
//!
//! - Argument parsing and logging setup live in `main.rs`; the run itself
//!   lives in [`verify`] so it can be driven from tests.

pub mod verify;

pub use verify::{run_verify, SUCCESS_MESSAGE};
