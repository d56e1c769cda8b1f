use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::Value;

use crate::errors::GenerationError;
use crate::params::{ParamKind, ParamSpec, validate_params};
use crate::synthesizers::pools::{
    ADDRESSES, COMPANY_NAMES, CORRECTION_REASONS, LENDERS, PERSON_NAMES,
};
use crate::synthesizers::{
    FieldValue, SynthesisContext, Synthesizer, SynthesizerRegistry, ValueKind,
};

const DEFAULT_MIN_APPLICANTS: i64 = 1;
const DEFAULT_MAX_APPLICANTS: i64 = 2;
const DEFAULT_COMPANY_RATE: f64 = 0.3;

const APPLICANT_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Int, false),
    ParamSpec::new("max", ParamKind::Int, false),
    ParamSpec::new("company_rate", ParamKind::Float, false),
];

pub fn register(registry: &mut SynthesizerRegistry) {
    registry.register_synthesizer(Box::new(PoolSynthesizer {
        id: "uk.address",
        pool: ADDRESSES,
    }));
    registry.register_synthesizer(Box::new(PoolSynthesizer {
        id: "lender.pool",
        pool: LENDERS,
    }));
    registry.register_synthesizer(Box::new(PoolSynthesizer {
        id: "reason.template",
        pool: CORRECTION_REASONS,
    }));
    registry.register_synthesizer(Box::new(ApplicantNamesSynthesizer));
}

/// Uniform pick from a fixed pool of strings.
struct PoolSynthesizer {
    id: &'static str,
    pool: &'static [&'static str],
}

impl Synthesizer for PoolSynthesizer {
    fn id(&self) -> &'static str {
        self.id
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Text
    }

    fn validate_params(&self, params: Option<&Value>) -> Result<(), GenerationError> {
        validate_params(params, &[], self.id).map(|_| ())
    }

    fn synthesize(
        &self,
        _ctx: &SynthesisContext<'_>,
        _params: Option<&Value>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let value = self
            .pool
            .choose(rng)
            .ok_or_else(|| GenerationError::Synthesis(format!("{}: empty pool", self.id)))?;
        Ok(FieldValue::Text(value.to_string()))
    }
}

/// Distinct applicant names, either all people or all companies.
struct ApplicantNamesSynthesizer;

struct ApplicantParams {
    min: usize,
    max: usize,
    company_rate: f64,
}

impl ApplicantNamesSynthesizer {
    fn params(params: Option<&Value>) -> Result<ApplicantParams, GenerationError> {
        let map = validate_params(params, APPLICANT_PARAMS, "applicant.names")?;
        let min = map.get_i64("min").unwrap_or(DEFAULT_MIN_APPLICANTS);
        let max = map.get_i64("max").unwrap_or(DEFAULT_MAX_APPLICANTS);
        let company_rate = map.get_f64("company_rate").unwrap_or(DEFAULT_COMPANY_RATE);

        if min < 1 {
            return Err(GenerationError::InvalidParams(
                "applicant.names: min must be >= 1".to_string(),
            ));
        }
        if min > max {
            return Err(GenerationError::InvalidParams(
                "applicant.names: min must be <= max".to_string(),
            ));
        }
        let pool_limit = PERSON_NAMES.len().min(COMPANY_NAMES.len());
        if max as usize > pool_limit {
            return Err(GenerationError::InvalidParams(format!(
                "applicant.names: max must be <= {pool_limit}"
            )));
        }
        if !(0.0..=1.0).contains(&company_rate) {
            return Err(GenerationError::InvalidParams(
                "applicant.names: company_rate must be within 0..=1".to_string(),
            ));
        }

        Ok(ApplicantParams {
            min: min as usize,
            max: max as usize,
            company_rate,
        })
    }
}

impl Synthesizer for ApplicantNamesSynthesizer {
    fn id(&self) -> &'static str {
        "applicant.names"
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::TextList
    }

    fn validate_params(&self, params: Option<&Value>) -> Result<(), GenerationError> {
        Self::params(params).map(|_| ())
    }

    fn synthesize(
        &self,
        _ctx: &SynthesisContext<'_>,
        params: Option<&Value>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let params = Self::params(params)?;
        let count = rng.random_range(params.min..=params.max);
        let pool = if rng.random_bool(params.company_rate) {
            COMPANY_NAMES
        } else {
            PERSON_NAMES
        };
        let names: Vec<String> = pool
            .choose_multiple(rng, count)
            .map(|name| name.to_string())
            .collect();
        Ok(FieldValue::TextList(names))
    }
}
