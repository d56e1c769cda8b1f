use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::Value;

use landreg_core::ApplicationStatus;

use crate::errors::GenerationError;
use crate::params::{ParamKind, ParamSpec, ParamMap, int_bounds, validate_params};
use crate::synthesizers::{
    FieldValue, SynthesisContext, Synthesizer, SynthesizerRegistry, ValueKind,
};

const DEFAULT_INT_MIN: i64 = 0;
const DEFAULT_INT_MAX: i64 = 10000;
const DEFAULT_MONEY_MIN: i64 = 50_000;
const DEFAULT_MONEY_MAX: i64 = 500_000;
const DEFAULT_STATUS_WEIGHTS: [(ApplicationStatus, f64); 5] = [
    (ApplicationStatus::Pending, 0.3),
    (ApplicationStatus::Processing, 0.3),
    (ApplicationStatus::Completed, 0.2),
    (ApplicationStatus::Rejected, 0.1),
    (ApplicationStatus::OnHold, 0.1),
];

const DATE_WINDOW_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("anchor", ParamKind::String, true),
    ParamSpec::new("min_days", ParamKind::Int, true),
    ParamSpec::new("max_days", ParamKind::Int, true),
];
const INT_RANGE_PARAMS: &[ParamSpec] = &[
    ParamSpec::new("min", ParamKind::Int, false),
    ParamSpec::new("max", ParamKind::Int, false),
];
const STATUS_PARAMS: &[ParamSpec] = &[ParamSpec::new("weights", ParamKind::Object, false)];

pub fn register(registry: &mut SynthesizerRegistry) {
    registry.register_synthesizer(Box::new(DateWindowSynthesizer));
    registry.register_synthesizer(Box::new(IntRangeSynthesizer));
    registry.register_synthesizer(Box::new(MoneyRangeSynthesizer));
    registry.register_synthesizer(Box::new(StatusWeightedSynthesizer));
}

/// Reference point a date window is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAnchor {
    Today,
    SubmissionDate,
}

impl DateAnchor {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "today" => Some(DateAnchor::Today),
            "submission_date" => Some(DateAnchor::SubmissionDate),
            _ => None,
        }
    }
}

/// Anchor declared by `date.window` params, if any.
pub fn date_anchor(params: Option<&Value>) -> Option<DateAnchor> {
    params
        .and_then(|params| params.get("anchor"))
        .and_then(|value| value.as_str())
        .and_then(DateAnchor::parse)
}

/// Inclusive bounds declared by `int.range` params.
pub fn int_range_bounds(params: Option<&Value>) -> Result<(i64, i64), GenerationError> {
    let map = validate_params(params, INT_RANGE_PARAMS, "int.range")?;
    int_bounds(&map, "int.range", DEFAULT_INT_MIN, DEFAULT_INT_MAX)
}

struct DateWindowSynthesizer;

impl DateWindowSynthesizer {
    fn window(params: Option<&Value>) -> Result<(DateAnchor, i64, i64), GenerationError> {
        let map = validate_params(params, DATE_WINDOW_PARAMS, "date.window")?;
        let anchor = map
            .get_str("anchor")
            .and_then(DateAnchor::parse)
            .ok_or_else(|| {
                GenerationError::InvalidParams(
                    "date.window: anchor must be 'today' or 'submission_date'".to_string(),
                )
            })?;
        let min = map.get_i64("min_days").unwrap_or_default();
        let max = map.get_i64("max_days").unwrap_or_default();
        if min > max {
            return Err(GenerationError::InvalidParams(
                "date.window: min_days must be <= max_days".to_string(),
            ));
        }
        match anchor {
            DateAnchor::Today if max > 0 => Err(GenerationError::InvalidParams(
                "date.window: windows anchored on today cannot reach into the future".to_string(),
            )),
            DateAnchor::SubmissionDate if min < 1 => Err(GenerationError::InvalidParams(
                "date.window: windows anchored on submission_date must start at least 1 day later"
                    .to_string(),
            )),
            _ => Ok((anchor, min, max)),
        }
    }
}

impl Synthesizer for DateWindowSynthesizer {
    fn id(&self) -> &'static str {
        "date.window"
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Date
    }

    fn validate_params(&self, params: Option<&Value>) -> Result<(), GenerationError> {
        Self::window(params).map(|_| ())
    }

    fn synthesize(
        &self,
        ctx: &SynthesisContext<'_>,
        params: Option<&Value>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let (anchor, min, max) = Self::window(params)?;
        let base = match anchor {
            DateAnchor::Today => ctx.today,
            DateAnchor::SubmissionDate => ctx.submission_date.ok_or_else(|| {
                GenerationError::Synthesis(format!(
                    "{}.{}: submission date not yet synthesized",
                    ctx.type_name, ctx.field
                ))
            })?,
        };
        let offset = rng.random_range(min..=max);
        Ok(FieldValue::Date(shift_date(base, offset)?))
    }
}

fn shift_date(base: NaiveDate, days: i64) -> Result<NaiveDate, GenerationError> {
    Duration::try_days(days)
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or_else(|| {
            GenerationError::Synthesis(format!("date {base} shifted by {days} days is out of range"))
        })
}

struct IntRangeSynthesizer;

impl Synthesizer for IntRangeSynthesizer {
    fn id(&self) -> &'static str {
        "int.range"
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Int
    }

    fn validate_params(&self, params: Option<&Value>) -> Result<(), GenerationError> {
        int_range_bounds(params).map(|_| ())
    }

    fn synthesize(
        &self,
        _ctx: &SynthesisContext<'_>,
        params: Option<&Value>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let (min, max) = int_range_bounds(params)?;
        Ok(FieldValue::Int(rng.random_range(min..=max)))
    }
}

struct MoneyRangeSynthesizer;

impl MoneyRangeSynthesizer {
    fn bounds(params: Option<&Value>) -> Result<(u64, u64), GenerationError> {
        let map = validate_params(params, INT_RANGE_PARAMS, "money.range")?;
        let (min, max) = int_bounds(&map, "money.range", DEFAULT_MONEY_MIN, DEFAULT_MONEY_MAX)?;
        if min < 0 {
            return Err(GenerationError::InvalidParams(
                "money.range: min must be >= 0".to_string(),
            ));
        }
        Ok((min as u64, max as u64))
    }
}

impl Synthesizer for MoneyRangeSynthesizer {
    fn id(&self) -> &'static str {
        "money.range"
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Money
    }

    fn validate_params(&self, params: Option<&Value>) -> Result<(), GenerationError> {
        Self::bounds(params).map(|_| ())
    }

    fn synthesize(
        &self,
        _ctx: &SynthesisContext<'_>,
        params: Option<&Value>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let (min, max) = Self::bounds(params)?;
        Ok(FieldValue::Money(rng.random_range(min..=max)))
    }
}

struct StatusWeightedSynthesizer;

impl StatusWeightedSynthesizer {
    fn weights(params: Option<&Value>) -> Result<Vec<(ApplicationStatus, f64)>, GenerationError> {
        let map: ParamMap<'_> = validate_params(params, STATUS_PARAMS, "status.weighted")?;
        let Some(custom) = map.get_object("weights") else {
            return Ok(DEFAULT_STATUS_WEIGHTS.to_vec());
        };

        let mut weights = Vec::with_capacity(custom.len());
        for (name, value) in custom {
            let status = ApplicationStatus::from_name(name).ok_or_else(|| {
                GenerationError::InvalidParams(format!("status.weighted: unknown status '{name}'"))
            })?;
            let weight = value
                .as_f64()
                .filter(|weight| weight.is_finite() && *weight >= 0.0)
                .ok_or_else(|| {
                    GenerationError::InvalidParams(format!(
                        "status.weighted: weight for '{name}' must be a non-negative number"
                    ))
                })?;
            weights.push((status, weight));
        }
        if weights.iter().all(|(_, weight)| *weight == 0.0) {
            return Err(GenerationError::InvalidParams(
                "status.weighted: at least one weight must be positive".to_string(),
            ));
        }
        if !weights.iter().map(|(_, weight)| weight).sum::<f64>().is_finite() {
            return Err(GenerationError::InvalidParams(
                "status.weighted: combined weight is too large".to_string(),
            ));
        }
        Ok(weights)
    }
}

impl Synthesizer for StatusWeightedSynthesizer {
    fn id(&self) -> &'static str {
        "status.weighted"
    }

    fn value_kind(&self) -> ValueKind {
        ValueKind::Status
    }

    fn validate_params(&self, params: Option<&Value>) -> Result<(), GenerationError> {
        Self::weights(params).map(|_| ())
    }

    fn synthesize(
        &self,
        _ctx: &SynthesisContext<'_>,
        params: Option<&Value>,
        rng: &mut dyn rand::RngCore,
    ) -> Result<FieldValue, GenerationError> {
        let weights = Self::weights(params)?;
        let (status, _) = weights
            .choose_weighted(rng, |(_, weight)| *weight)
            .map_err(|err| GenerationError::Synthesis(format!("status.weighted: {err}")))?;
        Ok(FieldValue::Status(*status))
    }
}
