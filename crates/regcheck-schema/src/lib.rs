//! # regcheck-schema — Schema Registry
//!
//! Loads every schema definition from the flat `schema/` directory and
//! compiles it into a reusable validator keyed by its *type*: the file name
//! with the last extension stripped (`schema/widget.json` → `widget`).
//!
//! ## Loading (`registry`)
//!
//! - [`SchemaRegistry::load`] scans the top level of the directory, parses
//!   every regular file (`.yaml`/`.yml` as YAML, everything else as JSON)
//!   and compiles it with [`JsonSchemaCompiler`].
//! - A malformed or uncompilable schema is fatal: the error names the file.
//! - `$ref`s between schema files resolve against the loaded set, never
//!   over the network.
//!
//! ## Validation (`violation`)
//!
//! Compiled schemas implement [`DocumentValidator`] and report failures as
//! [`ValidationViolations`], one [`Violation`] per underlying error.
//!
//! ## Crate Policy
//!
//! - The `jsonschema` crate is only touched by [`JsonSchemaCompiler`]; the
//!   rest of the workspace sees the [`SchemaCompiler`] and
//!   [`DocumentValidator`] traits.

pub mod registry;
pub mod violation;

pub use registry::{
    DocumentValidator, JsonSchemaCompiler, SchemaCompiler, SchemaError, SchemaRegistry, SchemaSet,
};
pub use violation::{ValidationViolations, Violation};
