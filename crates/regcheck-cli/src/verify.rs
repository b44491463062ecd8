//! # Verify
//!
//! Wires the schema registry, the CODEOWNERS resolver and the EIP-55
//! checker into a tree walk over `data/`, and maps the verdict to an exit
//! status.

use std::io::Write;

use anyhow::{Context, Result};

use regcheck_core::{Eip55Checker, RepoLayout};
use regcheck_owners::CodeOwners;
use regcheck_schema::SchemaRegistry;
use regcheck_walk::{TreeValidator, WriteReporter};

/// Printed to stdout when the whole tree is valid.
pub const SUCCESS_MESSAGE: &str = "Ok: all files match schema definitions!";

/// Run every check for the repository described by `layout`.
///
/// Diagnostics are written to `diagnostics` as they are found; the success
/// message goes to `stdout`. Returns the process exit status.
///
/// # Errors
///
/// Returns an error if the schemas or the CODEOWNERS file cannot be loaded,
/// or if the data tree cannot be listed. No success message is printed in
/// that case.
pub fn run_verify<O, E>(layout: &RepoLayout, stdout: &mut O, diagnostics: E) -> Result<u8>
where
    O: Write,
    E: Write,
{
    let schema_dir = layout.schema_dir();
    let schemas = SchemaRegistry::load(&schema_dir)
        .map_err(|e| {
            tracing::debug!(file = %e.path().display(), "schema rejected");
            e
        })
        .with_context(|| format!("cannot load schemas from \"{}\"", schema_dir.display()))?;

    let owners = CodeOwners::discover(layout.root()).context("cannot load ownership rules")?;
    tracing::debug!(source = %owners.source().display(), "using CODEOWNERS");

    let validator = TreeValidator::new(layout.root(), &schemas, &Eip55Checker, &owners);
    let mut reporter = WriteReporter::new(diagnostics);
    let (valid, stats) = validator
        .validate_with_stats(layout.data_dir(), &mut reporter)
        .context("cannot walk the data directory")?;

    tracing::info!(
        valid,
        schemas = schemas.len(),
        directories = stats.directories,
        schema_checked = stats.schema_checked,
        unbound_files = stats.unbound_files,
        skipped = stats.skipped,
        ownership_checked = stats.ownership_checked,
        diagnostics = reporter.reported(),
        failures = reporter.failures(),
        "verification finished"
    );

    if valid {
        writeln!(stdout, "{SUCCESS_MESSAGE}")?;
        Ok(0)
    } else {
        Ok(1)
    }
}
