use landreg_core::{CatalogError, catalog_json_schema, validate_catalog_json};
use serde_json::json;

#[test]
fn json_schema_describes_catalog_document() {
    let generated = catalog_json_schema();
    let generated_json = serde_json::to_value(&generated).expect("serialize generated schema");

    let properties = generated_json
        .get("properties")
        .and_then(|value| value.as_object())
        .expect("top-level properties");
    for key in ["catalog_version", "base_schema", "types"] {
        assert!(properties.contains_key(key), "missing property {key}");
    }
    assert!(
        generated_json
            .pointer("/definitions/ApplicationTypeDefinition")
            .is_some()
    );
}

#[test]
fn embedded_catalog_passes_json_schema() {
    let raw: serde_json::Value =
        serde_json::from_str(include_str!("../catalog/land_registry.json")).expect("parse json");
    validate_catalog_json(&raw).expect("embedded catalog is valid");
}

#[test]
fn json_schema_rejects_missing_forms() {
    let raw = json!({
        "catalog_version": "0.1",
        "base_schema": {},
        "types": [
            {"id": 1, "category": "core", "name": "Assents", "description": "x"}
        ]
    });
    let err = validate_catalog_json(&raw).expect_err("forms are required");
    assert!(matches!(err, CatalogError::InvalidCatalog(message) if message.contains("forms")));
}

#[test]
fn json_schema_rejects_unknown_category() {
    let raw = json!({
        "catalog_version": "0.1",
        "base_schema": {},
        "types": [
            {"id": 1, "category": "misc", "name": "Assents", "description": "x", "forms": ["AS1"]}
        ]
    });
    assert!(matches!(
        validate_catalog_json(&raw),
        Err(CatalogError::InvalidCatalog(_))
    ));
}
