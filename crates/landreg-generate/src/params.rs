use serde_json::{Map, Value};

use crate::errors::GenerationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Float,
    String,
    Object,
}

#[derive(Clone, Copy, Debug)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

impl ParamSpec {
    pub const fn new(key: &'static str, kind: ParamKind, required: bool) -> Self {
        Self {
            key,
            kind,
            required,
        }
    }
}

pub struct ParamMap<'a> {
    map: Option<&'a Map<String, Value>>,
}

/// Check `params` against the declared specs: no unknown keys, correct
/// value kinds, and every required key present.
pub fn validate_params<'a>(
    params: Option<&'a Value>,
    specs: &[ParamSpec],
    ctx: &'static str,
) -> Result<ParamMap<'a>, GenerationError> {
    let map = match params {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            return Err(GenerationError::InvalidParams(format!(
                "{ctx}: params must be a JSON object"
            )));
        }
    };

    if let Some(map) = map {
        for (key, value) in map {
            let Some(spec) = specs.iter().find(|spec| spec.key == key.as_str()) else {
                return Err(GenerationError::InvalidParams(format!(
                    "{ctx}: unknown param '{key}'"
                )));
            };
            validate_kind(ctx, key, spec.kind, value)?;
        }
    }

    for spec in specs {
        if spec.required && !map.is_some_and(|map| map.contains_key(spec.key)) {
            return Err(GenerationError::InvalidParams(format!(
                "{ctx}: missing required param '{}'",
                spec.key
            )));
        }
    }

    Ok(ParamMap { map })
}

impl<'a> ParamMap<'a> {
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.map
            .and_then(|map| map.get(key))
            .and_then(|value| value.as_i64())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.map
            .and_then(|map| map.get(key))
            .and_then(|value| value.as_f64())
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.map
            .and_then(|map| map.get(key))
            .and_then(|value| value.as_str())
    }

    pub fn get_object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.map
            .and_then(|map| map.get(key))
            .and_then(|value| value.as_object())
    }
}

fn validate_kind(
    ctx: &'static str,
    key: &str,
    kind: ParamKind,
    value: &Value,
) -> Result<(), GenerationError> {
    let valid = match kind {
        ParamKind::Int => value.as_i64().is_some(),
        ParamKind::Float => value.as_f64().is_some(),
        ParamKind::String => value.is_string(),
        ParamKind::Object => value.is_object(),
    };

    if valid {
        Ok(())
    } else {
        Err(GenerationError::InvalidParams(format!(
            "{ctx}: invalid value for param '{key}'"
        )))
    }
}

/// Read an inclusive `min`/`max` pair, falling back to defaults.
pub fn int_bounds(
    params: &ParamMap<'_>,
    ctx: &'static str,
    default_min: i64,
    default_max: i64,
) -> Result<(i64, i64), GenerationError> {
    let min = params.get_i64("min").unwrap_or(default_min);
    let max = params.get_i64("max").unwrap_or(default_max);
    if min > max {
        return Err(GenerationError::InvalidParams(format!(
            "{ctx}: min must be <= max"
        )));
    }
    Ok((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SPECS: &[ParamSpec] = &[
        ParamSpec::new("min", ParamKind::Int, true),
        ParamSpec::new("max", ParamKind::Int, false),
    ];

    #[test]
    fn rejects_unknown_keys() {
        let params = json!({"min": 1, "step": 2});
        let result = validate_params(Some(&params), SPECS, "test");
        assert!(matches!(result, Err(GenerationError::InvalidParams(msg)) if msg.contains("step")));
    }

    #[test]
    fn rejects_missing_required() {
        let params = json!({"max": 2});
        assert!(validate_params(Some(&params), SPECS, "test").is_err());
    }

    #[test]
    fn rejects_wrong_kind() {
        let params = json!({"min": "one"});
        assert!(validate_params(Some(&params), SPECS, "test").is_err());
    }

    #[test]
    fn bounds_use_defaults_and_check_order() {
        let params = json!({"min": 3});
        let map = validate_params(Some(&params), SPECS, "test").expect("valid");
        assert_eq!(int_bounds(&map, "test", 0, 10).expect("bounds"), (3, 10));

        let params = json!({"min": 9, "max": 2});
        let map = validate_params(Some(&params), SPECS, "test").expect("valid");
        assert!(int_bounds(&map, "test", 0, 10).is_err());
    }
}
