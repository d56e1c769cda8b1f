use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use landreg_core::{Application, ApplicationCategory};

use crate::reference::DEFAULT_MAX_ATTEMPTS;

/// How `generate_random` picks an application type for each slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TypeWeighting {
    /// Every catalog type is equally likely.
    #[default]
    Uniform,
    /// Per-category weight, shared evenly by the types in that category.
    Category { core: f64, additional: f64 },
}

impl TypeWeighting {
    pub fn category_weight(&self, category: ApplicationCategory) -> f64 {
        match (self, category) {
            (TypeWeighting::Uniform, _) => 1.0,
            (TypeWeighting::Category { core, .. }, ApplicationCategory::Core) => *core,
            (TypeWeighting::Category { additional, .. }, ApplicationCategory::Additional) => {
                *additional
            }
        }
    }
}

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Seed for the run; a random seed is drawn (and reported) when absent.
    pub seed: Option<u64>,
    /// Upper bound for submission dates; defaults to the local date.
    pub today: Option<NaiveDate>,
    pub weighting: TypeWeighting,
    /// Maximum attempts to find an unused reference.
    pub max_reference_attempts: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            today: None,
            weighting: TypeWeighting::Uniform,
            max_reference_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Summary of the records generated for one application type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeReport {
    pub application_type_id: u32,
    pub name: String,
    pub requested: u64,
    pub generated: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub today: NaiveDate,
    pub mode: String,
    pub total_generated: u64,
    pub types: Vec<TypeReport>,
    pub status_counts: BTreeMap<String, u64>,
    pub references_issued: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, today: NaiveDate, mode: &str) -> Self {
        Self {
            run_id,
            seed,
            today,
            mode: mode.to_string(),
            total_generated: 0,
            types: Vec::new(),
            status_counts: BTreeMap::new(),
            references_issued: 0,
            duration_ms: 0,
        }
    }

    pub fn record_requested(&mut self, application_type_id: u32, name: &str, count: u64) {
        self.type_entry(application_type_id, name).requested += count;
    }

    pub fn record_application(&mut self, name: &str, application: &Application) {
        self.type_entry(application.application_type_id, name).generated += 1;
        *self
            .status_counts
            .entry(application.status.as_str().to_string())
            .or_insert(0) += 1;
        self.total_generated += 1;
    }

    fn type_entry(&mut self, application_type_id: u32, name: &str) -> &mut TypeReport {
        let idx = match self
            .types
            .iter()
            .position(|entry| entry.application_type_id == application_type_id)
        {
            Some(idx) => idx,
            None => {
                self.types.push(TypeReport {
                    application_type_id,
                    name: name.to_string(),
                    requested: 0,
                    generated: 0,
                });
                self.types.len() - 1
            }
        };
        &mut self.types[idx]
    }
}

/// Output of one orchestrator invocation.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Records in generation order.
    pub applications: Vec<Application>,
    pub report: GenerationReport,
}
