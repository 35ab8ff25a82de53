// Turning the model's free text into a `GenerationResult`.
// The model is asked for bare JSON but regularly wraps it in prose or
// code fences, so extraction takes the widest `{ ... }` span it can find
// and lets the JSON parser decide whether that span is usable.

use serde_json::{Map, Value};

use crate::error::GatewayError;
use crate::models::GenerationResult;

pub const REQUIRED_KEYS: [&str; 5] = [
    "script",
    "recommendations",
    "viralityScore",
    "qualityScore",
    "reasons",
];

// Leftmost `{` through rightmost `}`, inclusive.
pub fn json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

pub fn extract_json(raw: &str) -> Result<Map<String, Value>, GatewayError> {
    let candidate = json_span(raw).ok_or(GatewayError::NoJsonFound)?;
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(GatewayError::MalformedJson(format!(
            "expected an object, found {}",
            other
        ))),
        Err(e) => Err(GatewayError::MalformedJson(e.to_string())),
    }
}

// Loose truthiness: null, false, 0, NaN and "" count as missing.
// Arrays and objects are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Presence check on the five top-level keys. Values pass through as-is.
pub fn validate_result(mut obj: Map<String, Value>) -> Result<GenerationResult, GatewayError> {
    if !REQUIRED_KEYS
        .iter()
        .all(|key| obj.get(*key).is_some_and(is_truthy))
    {
        return Err(GatewayError::IncompleteResult);
    }

    let mut take = |key: &str| obj.remove(key).unwrap_or(Value::Null);
    Ok(GenerationResult {
        script: take("script"),
        recommendations: take("recommendations"),
        virality_score: take("viralityScore"),
        quality_score: take("qualityScore"),
        reasons: take("reasons"),
    })
}

pub fn parse_model_output(raw: &str) -> Result<GenerationResult, GatewayError> {
    validate_result(extract_json(raw)?)
}
