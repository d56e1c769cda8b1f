use thiserror::Error;

use landreg_core::CatalogError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Unknown application type or catalog integrity failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("reference generation exhausted after {attempts} attempts")]
    ReferenceCollisionExhausted { attempts: u32 },
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("sink error: {0}")]
    Sink(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl GenerationError {
    /// True when the failure is a requested type missing from the catalog.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self, GenerationError::Catalog(CatalogError::UnknownType(_)))
    }
}
