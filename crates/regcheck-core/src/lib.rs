//! # regcheck-core — Foundational Types for regcheck
//!
//! This crate is the leaf of the workspace DAG. It defines the pieces every
//! other `regcheck-*` crate needs:
//!
//! 1. **Repository layout.** [`RepoLayout`] is the explicit startup
//!    configuration step: it verifies the working directory is a repository
//!    root and resolves the fixed `schema/` and `data/` locations.
//!
//! 2. **Address checksums.** [`AddressChecker`] decides whether a directory
//!    name such as `0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed` is a valid,
//!    canonically cased EIP-55 address. [`Eip55Checker`] is the default
//!    implementation, backed by Keccak-256.
//!
//! 3. **Error taxonomy.** `thiserror` enums for startup failures.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `regcheck-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod error;
pub mod layout;

pub use address::{AddressChecker, AddressVerdict, ChecksumAddress, Eip55Checker, ADDRESS_PREFIX};
pub use error::{AddressError, LayoutError};
pub use layout::{
    is_skipped_name, EntryKind, RepoLayout, DATA_DIR, HIDDEN_MARKER, INDEX_FILE, SCHEMA_DIR, VCS_MARKER,
};
