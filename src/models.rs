use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Incoming /generate body. Everything is optional at this layer,
// the normalizer decides what is mandatory.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target_age: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub target_audience: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content_goal: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub script_length: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub char_length: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub topic: Option<String>,
}

// Form clients sometimes send numbers (`"charLength": 500`) or lists
// (`"tone": ["divertido", "cercano"]`), any JSON value is turned into text.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(value) => Some(as_text(&value)),
    })
}

// Lists join their items with commas, objects keep their JSON text
fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items.iter().map(as_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

// Request with every field populated. Field order here is the
// canonical order used for fingerprinting, don't reorder.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRequest {
    pub platform: String,
    pub content_type: String,
    pub tone: String,
    pub target_age: String,
    pub target_audience: String,
    pub content_goal: String,
    pub region: String,
    pub script_length: String,
    pub char_length: String,
    pub topic: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Script {
    pub gancho: String,
    pub problema: String,
    pub solucion: String,
    pub cta: String,
}

// Body returned by `/generate`, for successes and failures alike.
// Successful results come straight from the model, so the field types
// are left as raw JSON values: nothing is coerced or clamped on the way
// through. Error payloads are built with `placeholder`.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub script: Value,
    pub recommendations: Value,
    pub virality_score: Value,
    pub quality_score: Value,
    pub reasons: Value,
}

impl GenerationResult {
    pub fn placeholder(script: Script, recommendation: &str, reason: &str) -> Self {
        Self {
            script: serde_json::to_value(script).unwrap_or(Value::Null),
            recommendations: Value::from(vec![recommendation]),
            virality_score: Value::from(0),
            quality_score: Value::from(0),
            reasons: Value::from(vec![reason]),
        }
    }
}
