use thiserror::Error;

/// Catalog error type shared across the land registry crates.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A requested application type name or id is absent from the catalog.
    #[error("unknown application type: {0}")]
    UnknownType(String),
    /// A field schema cannot be satisfied by the model or the synthesizers.
    #[error("schema violation: {0}")]
    SchemaViolation(String),
    /// The catalog document is malformed or breaks catalog invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results returned by catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
