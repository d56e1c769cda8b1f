use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::CatalogDocument;

/// Emit the JSON Schema for catalog documents.
pub fn catalog_json_schema() -> RootSchema {
    schema_for!(CatalogDocument)
}
