//! # Diagnostics
//!
//! One record per problem found during a walk, rendered in the same
//! `Error: "<path>" ...` form for every kind.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use regcheck_core::{AddressError, ChecksumAddress};
use regcheck_schema::ValidationViolations;

/// A problem found at one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A schema-bound file could not be read or parsed as JSON.
    ///
    /// Reported, but does not fail the run: see [`Diagnostic::fails_verdict`].
    InvalidJson {
        /// Repository-relative file path.
        path: PathBuf,
        /// Parser or IO error.
        reason: String,
    },

    /// A file does not satisfy the schema of its type.
    ///
    /// Rendered with the file's own name in the header, as in
    /// `"data/widget.json" does not follow "widget.json" schema:`.
    SchemaMismatch {
        /// Repository-relative file path.
        path: PathBuf,
        /// Type name of the schema.
        schema: String,
        /// Every violation reported by the validator.
        violations: ValidationViolations,
    },

    /// An `0x…` directory name is not an address at all.
    InvalidAddress {
        /// Directory name.
        name: String,
        /// Repository-relative directory path.
        path: PathBuf,
        /// Why it does not parse.
        reason: AddressError,
    },

    /// An `0x…` directory name is an address in the wrong casing.
    NotChecksummed {
        /// Directory name.
        name: String,
        /// Repository-relative directory path.
        path: PathBuf,
        /// Canonical spelling.
        expected: ChecksumAddress,
    },

    /// No CODEOWNERS rule assigns an owner to the entry.
    NoOwners {
        /// Repository-relative path.
        path: PathBuf,
    },
}

impl Diagnostic {
    /// The entry the diagnostic refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::InvalidJson { path, .. }
            | Self::SchemaMismatch { path, .. }
            | Self::InvalidAddress { path, .. }
            | Self::NotChecksummed { path, .. }
            | Self::NoOwners { path } => path,
        }
    }

    /// Whether this diagnostic makes the run fail.
    ///
    /// Malformed JSON in a schema-bound file is reported but accepted: the
    /// file is treated as skipped from schema validation.
    pub fn fails_verdict(&self) -> bool {
        !matches!(self, Self::InvalidJson { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson { path, .. } => {
                write!(f, "Error: \"{}\" is not a valid JSON file.", path.display())
            }
            Self::SchemaMismatch {
                path,
                schema,
                violations,
            } => {
                let entry = path
                    .file_name()
                    .map_or_else(|| schema.clone(), |n| n.to_string_lossy().into_owned());
                write!(
                    f,
                    "Error: \"{}\" does not follow \"{entry}\" schema:",
                    path.display()
                )?;
                for v in violations.violations() {
                    write!(f, "\n - {v}")?;
                }
                Ok(())
            }
            Self::InvalidAddress { name, path, .. } => write!(
                f,
                "Error: \"{name}\" is not a valid address. (\"{}\")",
                path.display()
            ),
            Self::NotChecksummed { name, path, .. } => write!(
                f,
                "Error: \"{name}\" is not checksummed. (\"{}\")",
                path.display()
            ),
            Self::NoOwners { path } => {
                write!(f, "Error: \"{}\" has no codeowners.", path.display())
            }
        }
    }
}

/// Receives diagnostics as the walk finds them.
pub trait Reporter {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl Reporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// [`Reporter`] that writes each diagnostic as text, one per line.
#[derive(Debug)]
pub struct WriteReporter<W> {
    out: W,
    reported: usize,
    failures: usize,
}

impl<W: Write> WriteReporter<W> {
    /// Write diagnostics to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            reported: 0,
            failures: 0,
        }
    }

    /// Diagnostics written so far.
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Diagnostics written so far that fail the run.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for WriteReporter<W> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.reported += 1;
        if diagnostic.fails_verdict() {
            self.failures += 1;
        }
        if let Err(e) = writeln!(self.out, "{diagnostic}") {
            tracing::warn!(error = %e, "failed to write diagnostic");
        }
    }
}
