use crate::error::GatewayError;
use crate::models::{GenerationRequest, NormalizedRequest};

pub const DEFAULT_TONE: &str = "neutral";
pub const DEFAULT_TARGET_AGE: &str = "18-24";
pub const DEFAULT_TARGET_AUDIENCE: &str = "público general";
pub const DEFAULT_CONTENT_GOAL: &str = "entretener";
pub const DEFAULT_REGION: &str = "Global";
pub const DEFAULT_SCRIPT_LENGTH: &str = "1min";
pub const DEFAULT_CHAR_LENGTH: &str = "500";

// Some(non-blank) or None
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    present(value).unwrap_or_else(|| default.to_string())
}

// Apply defaults and reject requests missing a mandatory field.
// Runs before any cache lookup or model call. Blank optional fields fall
// back to their default, so an omitted field and an empty one fingerprint
// the same way.
pub fn normalize(raw: GenerationRequest) -> Result<NormalizedRequest, GatewayError> {
    let platform = present(raw.platform);
    let content_type = present(raw.content_type);
    let topic = present(raw.topic);

    let mut missing = Vec::new();
    if platform.is_none() {
        missing.push("platform");
    }
    if content_type.is_none() {
        missing.push("contentType");
    }
    if topic.is_none() {
        missing.push("topic");
    }

    match (platform, content_type, topic) {
        (Some(platform), Some(content_type), Some(topic)) => Ok(NormalizedRequest {
            platform,
            content_type,
            tone: or_default(raw.tone, DEFAULT_TONE),
            target_age: or_default(raw.target_age, DEFAULT_TARGET_AGE),
            target_audience: or_default(raw.target_audience, DEFAULT_TARGET_AUDIENCE),
            content_goal: or_default(raw.content_goal, DEFAULT_CONTENT_GOAL),
            region: or_default(raw.region, DEFAULT_REGION),
            script_length: or_default(raw.script_length, DEFAULT_SCRIPT_LENGTH),
            char_length: or_default(raw.char_length, DEFAULT_CHAR_LENGTH),
            topic,
        }),
        _ => Err(GatewayError::Validation(missing)),
    }
}

impl From<NormalizedRequest> for GenerationRequest {
    fn from(req: NormalizedRequest) -> Self {
        GenerationRequest {
            platform: Some(req.platform),
            content_type: Some(req.content_type),
            tone: Some(req.tone),
            target_age: Some(req.target_age),
            target_audience: Some(req.target_audience),
            content_goal: Some(req.content_goal),
            region: Some(req.region),
            script_length: Some(req.script_length),
            char_length: Some(req.char_length),
            topic: Some(req.topic),
        }
    }
}
