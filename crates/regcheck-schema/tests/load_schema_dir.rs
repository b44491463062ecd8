//! Integration tests: load schema directories from disk.

use std::path::Path;

use regcheck_schema::{SchemaError, SchemaRegistry};
use serde_json::json;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

const WIDGET_SCHEMA: &str = r#"{
  "type": "object",
  "required": ["name"],
  "properties": { "name": { "type": "string" } }
}"#;

#[test]
fn loads_every_top_level_schema_by_stem() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "widget.json", WIDGET_SCHEMA);
    write(dir.path(), "gadget.json", r#"{ "type": "array" }"#);

    let registry = SchemaRegistry::load(dir.path()).unwrap();
    assert_eq!(registry.type_names(), vec!["gadget", "widget"]);

    let widget = registry.get("widget").unwrap();
    widget.validate(&json!({ "name": "x" })).unwrap();
    assert!(widget.validate(&json!({})).is_err());
}

#[test]
fn empty_directory_yields_empty_registry() {
    let dir = tempfile::tempdir().unwrap();
    let registry = SchemaRegistry::load(dir.path()).unwrap();
    assert!(registry.is_empty());
}

#[test]
fn subdirectories_are_not_scanned() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "widget.json", WIDGET_SCHEMA);
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    write(&dir.path().join("nested"), "gadget.json", "{ not json");

    let registry = SchemaRegistry::load(dir.path()).unwrap();
    assert_eq!(registry.type_names(), vec!["widget"]);
}

#[test]
fn stem_strips_only_the_last_extension() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "token.schema.json", r#"{ "type": "object" }"#);

    let registry = SchemaRegistry::load(dir.path()).unwrap();
    assert_eq!(registry.type_names(), vec!["token.schema"]);
}

#[test]
fn yaml_schema_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "widget.yaml",
        "type: object\nrequired: [name]\nproperties:\n  name:\n    type: string\n",
    );

    let registry = SchemaRegistry::load(dir.path()).unwrap();
    let widget = registry.get("widget").unwrap();
    assert!(widget.validate(&json!({ "name": 1 })).is_err());
    widget.validate(&json!({ "name": "x" })).unwrap();
}

#[test]
fn malformed_schema_is_fatal_and_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "widget.json", WIDGET_SCHEMA);
    write(dir.path(), "broken.json", "{ \"type\": ");

    let err = SchemaRegistry::load(dir.path()).unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { .. }), "{err}");
    assert!(err.path().ends_with("broken.json"));
    assert!(err.to_string().contains("is not a valid schema"));
}

#[test]
fn uncompilable_schema_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "widget.json", r#"{ "type": "no-such-type" }"#);

    let err = SchemaRegistry::load(dir.path()).unwrap_err();
    assert!(matches!(err, SchemaError::Compile { .. }), "{err}");
    assert!(err.path().ends_with("widget.json"));
}

#[test]
fn missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchemaRegistry::load(dir.path().join("schema")).unwrap_err();
    assert!(matches!(err, SchemaError::ReadDir { .. }));
}

#[test]
fn sibling_ref_resolves_locally() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "address.json",
        r#"{ "type": "string", "pattern": "^0x[0-9a-fA-F]{40}$" }"#,
    );
    write(
        dir.path(),
        "token.json",
        r#"{
          "type": "object",
          "required": ["address"],
          "properties": { "address": { "$ref": "address.json" } }
        }"#,
    );

    let registry = SchemaRegistry::load(dir.path()).unwrap();
    let token = registry.get("token").unwrap();
    token
        .validate(&json!({ "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed" }))
        .unwrap();
    let violations = token.validate(&json!({ "address": "nope" })).unwrap_err();
    assert_eq!(violations.violations()[0].instance_path, "/address");
}

#[test]
fn duplicate_type_keeps_a_single_validator() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "widget.json", WIDGET_SCHEMA);
    write(dir.path(), "widget.yaml", "type: array\n");

    let registry = SchemaRegistry::load(dir.path()).unwrap();
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("widget"));
}
