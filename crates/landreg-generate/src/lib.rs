//! Synthetic HM Land Registry application generator.
//!
//! Builds `Application` records from a `TypeCatalog`: field synthesizers
//! fill each field of a type's schema, the reference generator issues
//! session-unique references, and `GenerationEngine` drives whole batches.

pub mod builder;
pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod params;
pub mod reference;
pub mod sink;
pub mod synthesizers;

pub use builder::ApplicationBuilder;
pub use engine::GenerationEngine;
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport, GenerationResult, TypeReport, TypeWeighting};
pub use output::{format_application, read_batch_json, write_batch_csv, write_batch_json};
pub use reference::{DEFAULT_MAX_ATTEMPTS, ReferenceGenerator, is_valid_reference};
pub use sink::{ApplicationSink, MemorySink};
pub use synthesizers::{FieldValue, SynthesisContext, Synthesizer, SynthesizerRegistry, ValueKind};
