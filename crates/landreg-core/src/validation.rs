use std::collections::{BTreeMap, BTreeSet};

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::model::{ApplicationField, ApplicationTypeDefinition, CatalogDocument, FieldSpec};
use crate::schema::catalog_json_schema;

/// Validate a raw catalog document against the catalog JSON Schema.
pub fn validate_catalog_json(document: &Value) -> Result<()> {
    let schema = serde_json::to_value(catalog_json_schema())?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| CatalogError::InvalidCatalog(err.to_string()))?;

    if let Err(errors) = compiled.validate(document) {
        let messages: Vec<String> = errors
            .map(|error| {
                let path = error.instance_path.to_string();
                let path = if path.is_empty() { "/".to_string() } else { path };
                format!("{path}: {error}")
            })
            .collect();
        return Err(CatalogError::InvalidCatalog(messages.join("; ")));
    }

    Ok(())
}

/// Validate internal consistency of a catalog document.
///
/// This checks:
/// - unique type ids and names, non-empty names
/// - every type has at least one non-empty form
/// - field names are known to the application model
/// - base fields are declared, required, and never type-specific
pub fn validate_catalog(document: &CatalogDocument) -> Result<()> {
    if document.catalog_version.trim().is_empty() {
        return Err(CatalogError::InvalidCatalog(
            "catalog_version must not be empty".to_string(),
        ));
    }
    if document.types.is_empty() {
        return Err(CatalogError::InvalidCatalog(
            "catalog defines no application types".to_string(),
        ));
    }

    for name in document.base_schema.keys() {
        let field: ApplicationField = name.parse()?;
        if !field.is_base() {
            return Err(CatalogError::SchemaViolation(format!(
                "base_schema declares type-specific field '{field}'"
            )));
        }
    }

    let mut ids = BTreeSet::new();
    let mut names = BTreeSet::new();
    for definition in &document.types {
        if definition.name.trim().is_empty() {
            return Err(CatalogError::InvalidCatalog(format!(
                "application type {} has an empty name",
                definition.id
            )));
        }
        if !ids.insert(definition.id) {
            return Err(CatalogError::InvalidCatalog(format!(
                "duplicate application type id: {}",
                definition.id
            )));
        }
        if !names.insert(definition.name.as_str()) {
            return Err(CatalogError::InvalidCatalog(format!(
                "duplicate application type name: {}",
                definition.name
            )));
        }
        if definition.forms.is_empty() {
            return Err(CatalogError::InvalidCatalog(format!(
                "application type '{}' has no forms",
                definition.name
            )));
        }
        if definition.forms.iter().any(|form| form.trim().is_empty()) {
            return Err(CatalogError::InvalidCatalog(format!(
                "application type '{}' has an empty form code",
                definition.name
            )));
        }

        let schema = resolve_field_schema(&document.base_schema, definition)?;
        for field in ApplicationField::ALL.into_iter().filter(|f| f.is_base()) {
            match schema.get(&field) {
                None => {
                    return Err(CatalogError::SchemaViolation(format!(
                        "application type '{}' does not declare required field '{field}'",
                        definition.name
                    )));
                }
                Some(spec) if !spec.required => {
                    return Err(CatalogError::SchemaViolation(format!(
                        "application type '{}' marks base field '{field}' as optional",
                        definition.name
                    )));
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}

/// Overlay a type's field schema on the shared base schema.
pub fn resolve_field_schema(
    base: &BTreeMap<String, FieldSpec>,
    definition: &ApplicationTypeDefinition,
) -> Result<BTreeMap<ApplicationField, FieldSpec>> {
    let mut resolved = BTreeMap::new();
    for (name, spec) in base.iter().chain(definition.field_schema.iter()) {
        let field: ApplicationField = name.parse().map_err(|_| {
            CatalogError::SchemaViolation(format!(
                "application type '{}' declares unknown field '{name}'",
                definition.name
            ))
        })?;
        resolved.insert(field, spec.clone());
    }
    Ok(resolved)
}
