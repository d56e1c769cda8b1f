//! Core contracts for the land registry sample generator.
//!
//! This crate defines the application data model, the catalog of
//! application types with their field schemas, and catalog validation.

pub mod application;
pub mod catalog;
pub mod error;
pub mod model;
pub mod schema;
pub mod validation;

pub use application::{Application, ApplicationStatus};
pub use catalog::{TypeCatalog, type_slug};
pub use error::{CatalogError, Result};
pub use model::{
    ApplicationCategory, ApplicationField, ApplicationTypeDefinition, CatalogDocument, FieldSpec,
};
pub use schema::catalog_json_schema;
pub use validation::{resolve_field_schema, validate_catalog, validate_catalog_json};

/// Current contract version for catalog documents.
pub const CATALOG_VERSION: &str = "0.1";
