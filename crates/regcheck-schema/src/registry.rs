//! # Schema Registry
//!
//! Loads and compiles every schema in the schema directory once at startup.
//! The registry is immutable afterwards and maps a type name to its
//! compiled validator for the duration of one run.
//!
//! ## Schema Resolution
//!
//! All documents are parsed before any is compiled, so a schema may `$ref`
//! a sibling by file name (`"$ref": "address.json"`) or by the sibling's
//! `$id`. Resolution is local: a `$ref` that matches no loaded document
//! fails compilation, and no network request is ever made.
//!
//! ## Duplicate Types
//!
//! `widget.json` and `widget.yaml` both declare type `widget`. The file
//! listed later replaces the earlier one.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonschema::{Retrieve, Uri, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::violation::{ValidationViolations, Violation};

/// Error while building the registry. Every variant is fatal for a run.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema directory could not be listed.
    #[error("cannot read schema directory \"{}\": {source}", path.display())]
    ReadDir {
        /// Schema directory.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A schema file could not be read or parsed.
    #[error("\"{}\" is not a valid schema: {reason}", path.display())]
    Malformed {
        /// Offending schema file.
        path: PathBuf,
        /// Why the document could not be parsed.
        reason: String,
    },

    /// A schema document parsed but could not be compiled.
    #[error("\"{}\" is not a valid schema: {reason}", path.display())]
    Compile {
        /// Offending schema file.
        path: PathBuf,
        /// Compiler error.
        reason: String,
    },
}

impl SchemaError {
    /// The schema file (or directory) the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::ReadDir { path, .. } | Self::Malformed { path, .. } | Self::Compile { path, .. } => {
                path
            }
        }
    }
}

/// A compiled schema that can check documents.
pub trait DocumentValidator: Send + Sync {
    /// Validate one parsed document.
    ///
    /// # Errors
    ///
    /// Returns every violation found, never an empty list.
    fn validate(&self, document: &Value) -> Result<(), ValidationViolations>;
}

/// Compiles a parsed schema document into a [`DocumentValidator`].
pub trait SchemaCompiler {
    /// Compile `schema`. `siblings` holds every schema loaded in the same
    /// pass, for `$ref` resolution.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if the schema is not usable.
    fn compile(
        &self,
        schema: &Value,
        siblings: &Arc<SchemaSet>,
    ) -> Result<Box<dyn DocumentValidator>, String>;
}

/// Every schema document of one load pass, indexed by file name and `$id`.
#[derive(Debug, Default, Clone)]
pub struct SchemaSet {
    by_key: HashMap<String, Value>,
}

impl SchemaSet {
    /// Register a document under its file name and, if present, its `$id`.
    pub fn insert(&mut self, file_name: &str, document: &Value) {
        if let Some(id) = document.get("$id").and_then(Value::as_str) {
            self.by_key.insert(id.to_string(), document.clone());
        }
        self.by_key.insert(file_name.to_string(), document.clone());
    }

    /// Look up a `$ref` target by full URI, then by its last path segment.
    pub fn resolve(&self, uri: &str) -> Option<&Value> {
        let without_fragment = uri.split('#').next().unwrap_or(uri);
        if let Some(value) = self.by_key.get(without_fragment) {
            return Some(value);
        }
        let file_name = without_fragment.rsplit('/').next().unwrap_or(without_fragment);
        self.by_key.get(file_name)
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

/// Resolves `$ref` URIs against a [`SchemaSet`] without touching the network.
struct LocalSchemaRetriever {
    schemas: Arc<SchemaSet>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.schemas
            .resolve(uri_str)
            .cloned()
            .ok_or_else(|| format!("unresolvable $ref \"{uri_str}\"").into())
    }
}

/// [`SchemaCompiler`] backed by the `jsonschema` crate.
///
/// The draft is taken from the schema's `$schema` keyword; schemas without
/// one are compiled as Draft 7. Schemas are checked against their
/// meta-schema, so structurally invalid schemas are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaCompiler;

impl SchemaCompiler for JsonSchemaCompiler {
    fn compile(
        &self,
        schema: &Value,
        siblings: &Arc<SchemaSet>,
    ) -> Result<Box<dyn DocumentValidator>, String> {
        let mut opts = jsonschema::options();
        if schema.get("$schema").is_none() {
            opts.with_draft(jsonschema::Draft::Draft7);
        }
        opts.with_retriever(LocalSchemaRetriever {
            schemas: Arc::clone(siblings),
        });

        let validator = opts.build(schema).map_err(|e| e.to_string())?;
        Ok(Box::new(JsonSchemaValidator { validator }))
    }
}

struct JsonSchemaValidator {
    validator: Validator,
}

impl DocumentValidator for JsonSchemaValidator {
    fn validate(&self, document: &Value) -> Result<(), ValidationViolations> {
        let errors: Vec<Violation> = self
            .validator
            .iter_errors(document)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationViolations::new(errors))
        }
    }
}

/// Compiled schemas keyed by type name.
pub struct SchemaRegistry {
    validators: HashMap<String, Box<dyn DocumentValidator>>,
}

impl SchemaRegistry {
    /// Load every schema in `schema_dir` with [`JsonSchemaCompiler`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the directory cannot be listed, or if any
    /// schema file cannot be read, parsed or compiled.
    pub fn load(schema_dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        Self::load_with(schema_dir, &JsonSchemaCompiler)
    }

    /// Load every schema in `schema_dir` with the given compiler.
    ///
    /// Only regular files at the top level are considered; directories and
    /// symlinks are ignored.
    pub fn load_with(
        schema_dir: impl AsRef<Path>,
        compiler: &dyn SchemaCompiler,
    ) -> Result<Self, SchemaError> {
        let schema_dir = schema_dir.as_ref();
        let read_dir_err = |source| SchemaError::ReadDir {
            path: schema_dir.to_path_buf(),
            source,
        };

        let mut documents: Vec<(String, PathBuf, Value)> = Vec::new();
        let mut siblings = SchemaSet::default();

        for entry in std::fs::read_dir(schema_dir).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(read_dir_err)?;
            if !file_type.is_file() {
                tracing::debug!(path = %path.display(), "skipping non-file schema entry");
                continue;
            }

            let Some(type_name) = path.file_stem().map(|s| s.to_string_lossy().into_owned())
            else {
                continue;
            };
            let document = read_schema_document(&path)?;
            siblings.insert(&entry.file_name().to_string_lossy(), &document);
            documents.push((type_name, path, document));
        }

        let siblings = Arc::new(siblings);
        let mut validators: HashMap<String, Box<dyn DocumentValidator>> = HashMap::new();
        for (type_name, path, document) in documents {
            let validator = compiler
                .compile(&document, &siblings)
                .map_err(|reason| SchemaError::Compile {
                    path: path.clone(),
                    reason,
                })?;
            tracing::debug!(schema = %type_name, path = %path.display(), "compiled schema");
            if validators.insert(type_name.clone(), validator).is_some() {
                tracing::debug!(schema = %type_name, path = %path.display(), "schema type redefined; later file wins");
            }
        }

        tracing::info!(count = validators.len(), dir = %schema_dir.display(), "loaded schemas");
        Ok(Self { validators })
    }

    /// Build a registry from already-compiled validators.
    pub fn from_validators<I>(validators: I) -> Self
    where
        I: IntoIterator<Item = (String, Box<dyn DocumentValidator>)>,
    {
        Self {
            validators: validators.into_iter().collect(),
        }
    }

    /// Validator for `type_name`, if a schema of that type was loaded.
    pub fn get(&self, type_name: &str) -> Option<&dyn DocumentValidator> {
        self.validators.get(type_name).map(|v| v.as_ref())
    }

    /// Returns true if a schema of that type was loaded.
    pub fn contains(&self, type_name: &str) -> bool {
        self.validators.contains_key(type_name)
    }

    /// Number of loaded schema types.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns true if no schemas were loaded.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Loaded type names, sorted alphabetically.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

/// Read one schema file, choosing the parser by extension.
fn read_schema_document(path: &Path) -> Result<Value, SchemaError> {
    let malformed = |reason: String| SchemaError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| malformed(format!("cannot read file: {e}")))?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => {
            serde_yaml::from_str(&content).map_err(|e| malformed(format!("invalid YAML: {e}")))
        }
        _ => serde_json::from_str(&content).map_err(|e| malformed(format!("invalid JSON: {e}"))),
    }
}
