//! Field synthesizers: one per semantic field kind, looked up by id.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::RngCore;
use serde_json::Value;

use landreg_core::{ApplicationField, ApplicationStatus};

use crate::errors::GenerationError;

pub mod pools;
pub mod primitives;
pub mod semantic;

/// Value produced by a synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    TextList(Vec<String>),
    Date(NaiveDate),
    Int(i64),
    Money(u64),
    Status(ApplicationStatus),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::TextList(_) => ValueKind::TextList,
            FieldValue::Date(_) => ValueKind::Date,
            FieldValue::Int(_) => ValueKind::Int,
            FieldValue::Money(_) => ValueKind::Money,
            FieldValue::Status(_) => ValueKind::Status,
        }
    }
}

/// Shape of a synthesizer's output, used to bind synthesizers to fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    TextList,
    Date,
    Int,
    Money,
    Status,
}

/// Inputs a synthesizer may depend on besides its params.
#[derive(Debug, Clone)]
pub struct SynthesisContext<'a> {
    pub type_name: &'a str,
    pub field: ApplicationField,
    /// Upper bound for submission dates.
    pub today: NaiveDate,
    /// Set once the submission date has been synthesized.
    pub submission_date: Option<NaiveDate>,
}

pub trait Synthesizer: Send + Sync {
    fn id(&self) -> &'static str;
    fn value_kind(&self) -> ValueKind;
    fn validate_params(&self, params: Option<&Value>) -> Result<(), GenerationError>;
    fn synthesize(
        &self,
        ctx: &SynthesisContext<'_>,
        params: Option<&Value>,
        rng: &mut dyn RngCore,
    ) -> Result<FieldValue, GenerationError>;
}

/// Registry of synthesizers keyed by id.
pub struct SynthesizerRegistry {
    synthesizers: BTreeMap<&'static str, Box<dyn Synthesizer>>,
}

impl SynthesizerRegistry {
    /// Registry with every built-in synthesizer.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        primitives::register(&mut registry);
        semantic::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            synthesizers: BTreeMap::new(),
        }
    }

    pub fn register_synthesizer(&mut self, synthesizer: Box<dyn Synthesizer>) {
        self.synthesizers.insert(synthesizer.id(), synthesizer);
    }

    pub fn synthesizer(&self, id: &str) -> Option<&dyn Synthesizer> {
        self.synthesizers.get(id).map(|synthesizer| synthesizer.as_ref())
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.synthesizers.keys().copied().collect()
    }
}

impl Default for SynthesizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SynthesizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthesizerRegistry")
            .field("synthesizers", &self.ids())
            .finish()
    }
}
