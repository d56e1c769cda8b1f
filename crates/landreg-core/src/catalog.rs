use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde_json::Value;

use crate::error::{CatalogError, Result};
use crate::model::{
    ApplicationCategory, ApplicationField, ApplicationTypeDefinition, CatalogDocument, FieldSpec,
};
use crate::validation::{resolve_field_schema, validate_catalog, validate_catalog_json};

const EMBEDDED_CATALOG: &str = include_str!("../catalog/land_registry.json");

/// Read-only registry of application type definitions.
///
/// Built once from a validated catalog document and passed by reference to
/// the generation engine; it is never mutated after construction.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    version: String,
    base_schema: BTreeMap<String, FieldSpec>,
    types: Vec<ApplicationTypeDefinition>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl TypeCatalog {
    /// HM Land Registry application types bundled with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> Result<Self> {
        let raw: Value = serde_json::from_str(contents)?;
        validate_catalog_json(&raw)?;
        let document: CatalogDocument = serde_json::from_value(raw)?;
        Self::from_document(document)
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self> {
        validate_catalog(&document)?;

        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        for (idx, definition) in document.types.iter().enumerate() {
            by_id.insert(definition.id, idx);
            by_name.insert(definition.name.clone(), idx);
        }

        Ok(Self {
            version: document.catalog_version,
            base_schema: document.base_schema,
            types: document.types,
            by_id,
            by_name,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn lookup_by_name(&self, name: &str) -> Result<&ApplicationTypeDefinition> {
        self.by_name
            .get(name)
            .map(|idx| &self.types[*idx])
            .ok_or_else(|| CatalogError::UnknownType(name.to_string()))
    }

    pub fn lookup_by_id(&self, id: u32) -> Result<&ApplicationTypeDefinition> {
        self.by_id
            .get(&id)
            .map(|idx| &self.types[*idx])
            .ok_or_else(|| CatalogError::UnknownType(format!("id {id}")))
    }

    /// Resolve either an exact type name or its command-line slug
    /// (`chargesmortgages` for "Charges/Mortgages").
    pub fn lookup_by_slug(&self, value: &str) -> Result<&ApplicationTypeDefinition> {
        if let Ok(definition) = self.lookup_by_name(value) {
            return Ok(definition);
        }
        let wanted = type_slug(value);
        self.types
            .iter()
            .find(|definition| type_slug(&definition.name) == wanted)
            .ok_or_else(|| CatalogError::UnknownType(value.to_string()))
    }

    pub fn list_by_category(&self, category: ApplicationCategory) -> Vec<&ApplicationTypeDefinition> {
        self.types
            .iter()
            .filter(|definition| definition.category == category)
            .collect()
    }

    pub fn all(&self) -> &[ApplicationTypeDefinition] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Base schema overlaid with the type's own field schema.
    pub fn effective_schema(
        &self,
        definition: &ApplicationTypeDefinition,
    ) -> Result<BTreeMap<ApplicationField, FieldSpec>> {
        resolve_field_schema(&self.base_schema, definition)
    }

    /// Snapshot the catalog back into its document form.
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            catalog_version: self.version.clone(),
            base_schema: self.base_schema.clone(),
            types: self.types.clone(),
        }
    }
}

/// Command-line form of a type name: `/` dropped, spaces to `-`, lowercase.
pub fn type_slug(name: &str) -> String {
    name.trim().replace('/', "").replace(' ', "-").to_lowercase()
}
