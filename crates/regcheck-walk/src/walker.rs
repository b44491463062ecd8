//! # Tree Walker
//!
//! Depth-first validation of a data directory. Entries are visited in
//! directory-listing order. Every check runs for every entry; a failure
//! only flips the verdict of the directory it was found in, which in turn
//! flips every ancestor's verdict. Nothing short-circuits.

use std::path::{Path, PathBuf};

use regcheck_core::{is_skipped_name, AddressChecker, AddressVerdict, EntryKind, ADDRESS_PREFIX};
use regcheck_owners::OwnershipResolver;
use regcheck_schema::SchemaRegistry;
use serde_json::Value;
use thiserror::Error;

use crate::diagnostic::{Diagnostic, Reporter};

/// The walk could not proceed. Fatal for a run.
#[derive(Error, Debug)]
pub enum WalkError {
    /// A directory could not be listed, or one of its entries inspected.
    #[error("cannot read directory \"{}\": {source}", path.display())]
    ReadDir {
        /// Repository-relative directory path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Counters gathered during one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories listed, including the starting directory.
    pub directories: usize,
    /// Files validated against a schema.
    pub schema_checked: usize,
    /// Files with no schema of their type.
    pub unbound_files: usize,
    /// Hidden entries and index files.
    pub skipped: usize,
    /// Entries handed to the ownership resolver.
    pub ownership_checked: usize,
}

/// Validates a data tree against a schema registry, an address checker and
/// an ownership resolver.
pub struct TreeValidator<'a> {
    root: &'a Path,
    schemas: &'a SchemaRegistry,
    addresses: &'a dyn AddressChecker,
    owners: &'a dyn OwnershipResolver,
}

impl<'a> TreeValidator<'a> {
    /// Create a validator. `root` is the repository root; walked paths are
    /// relative to it.
    pub fn new(
        root: &'a Path,
        schemas: &'a SchemaRegistry,
        addresses: &'a dyn AddressChecker,
        owners: &'a dyn OwnershipResolver,
    ) -> Self {
        Self {
            root,
            schemas,
            addresses,
            owners,
        }
    }

    /// Validate every entry below `rel_dir`.
    ///
    /// Returns `Ok(true)` if the whole subtree is valid. Problems are sent
    /// to `reporter` as they are found.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError`] if a directory cannot be listed.
    pub fn validate(&self, rel_dir: &Path, reporter: &mut dyn Reporter) -> Result<bool, WalkError> {
        self.validate_with_stats(rel_dir, reporter)
            .map(|(valid, _)| valid)
    }

    /// Same as [`TreeValidator::validate`], also returning walk counters.
    pub fn validate_with_stats(
        &self,
        rel_dir: &Path,
        reporter: &mut dyn Reporter,
    ) -> Result<(bool, WalkStats), WalkError> {
        let mut stats = WalkStats::default();
        let valid = self.validate_dir(rel_dir, reporter, &mut stats)?;
        tracing::debug!(
            dir = %rel_dir.display(),
            valid,
            directories = stats.directories,
            schema_checked = stats.schema_checked,
            unbound_files = stats.unbound_files,
            skipped = stats.skipped,
            "walk finished"
        );
        Ok((valid, stats))
    }

    fn validate_dir(
        &self,
        rel_dir: &Path,
        reporter: &mut dyn Reporter,
        stats: &mut WalkStats,
    ) -> Result<bool, WalkError> {
        let read_err = |source| WalkError::ReadDir {
            path: rel_dir.to_path_buf(),
            source,
        };
        stats.directories += 1;

        let mut valid = true;
        for entry in std::fs::read_dir(self.root.join(rel_dir)).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if is_skipped_name(&name) {
                stats.skipped += 1;
                continue;
            }

            let rel = rel_dir.join(&file_name);
            let kind = EntryKind::from_file_type(entry.file_type().map_err(read_err)?);
            tracing::trace!(path = %rel.display(), ?kind, "visiting");

            let content_ok = match kind {
                EntryKind::File => self.validate_file(&rel, reporter, stats),
                EntryKind::Directory => {
                    let address_ok = self.check_address(&name, &rel, reporter);
                    let subtree_ok = self.validate_dir(&rel, reporter, stats)?;
                    address_ok && subtree_ok
                }
                EntryKind::Other => true,
            };
            let owned = self.check_owners(&rel, kind, reporter, stats);

            valid = valid && content_ok && owned;
        }
        Ok(valid)
    }

    /// Schema check for one file. Files without a schema of their type
    /// pass untouched.
    fn validate_file(&self, rel: &Path, reporter: &mut dyn Reporter, stats: &mut WalkStats) -> bool {
        let type_name = rel
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(validator) = self.schemas.get(&type_name) else {
            stats.unbound_files += 1;
            return true;
        };
        stats.schema_checked += 1;

        let document = match self.read_json(rel) {
            Ok(document) => document,
            Err(reason) => {
                tracing::debug!(path = %rel.display(), %reason, "unparseable data file");
                // Reported without failing the run.
                reporter.report(Diagnostic::InvalidJson {
                    path: rel.to_path_buf(),
                    reason,
                });
                return true;
            }
        };

        match validator.validate(&document) {
            Ok(()) => true,
            Err(violations) => {
                reporter.report(Diagnostic::SchemaMismatch {
                    path: rel.to_path_buf(),
                    schema: type_name,
                    violations,
                });
                false
            }
        }
    }

    fn read_json(&self, rel: &Path) -> Result<Value, String> {
        let content = std::fs::read_to_string(self.root.join(rel))
            .map_err(|e| format!("cannot read file: {e}"))?;
        serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}"))
    }

    /// Checksum rule for directories named like an address.
    fn check_address(&self, name: &str, rel: &Path, reporter: &mut dyn Reporter) -> bool {
        if !name.starts_with(ADDRESS_PREFIX) {
            return true;
        }
        match self.addresses.check(name) {
            AddressVerdict::Ok => true,
            AddressVerdict::InvalidSyntax { reason } => {
                reporter.report(Diagnostic::InvalidAddress {
                    name: name.to_string(),
                    path: rel.to_path_buf(),
                    reason,
                });
                false
            }
            AddressVerdict::WrongCasing { expected } => {
                reporter.report(Diagnostic::NotChecksummed {
                    name: name.to_string(),
                    path: rel.to_path_buf(),
                    expected,
                });
                false
            }
        }
    }

    fn check_owners(
        &self,
        rel: &Path,
        kind: EntryKind,
        reporter: &mut dyn Reporter,
        stats: &mut WalkStats,
    ) -> bool {
        stats.ownership_checked += 1;
        if self.owners.owners_of(rel, kind).is_empty() {
            reporter.report(Diagnostic::NoOwners {
                path: rel.to_path_buf(),
            });
            false
        } else {
            true
        }
    }
}
