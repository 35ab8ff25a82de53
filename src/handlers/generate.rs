use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::GatewayError;
use crate::metrics::REQUEST_TOTAL;
use crate::models::GenerationRequest;
use crate::response::respond;
use crate::state::AppState;

// application/json, or any application/*+json
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match mime.split_once('/') {
        Some(("application", subtype)) => subtype == "json" || subtype.ends_with("+json"),
        _ => false,
    }
}

// A body that isn't declared as JSON, or is empty, reads as `{}` and so
// ends up as a validation failure. Only a declared JSON body that doesn't
// parse is an internal error.
pub fn read_request(headers: &HeaderMap, body: &[u8]) -> Result<GenerationRequest, GatewayError> {
    if !is_json_content_type(headers) || body.is_empty() {
        return Ok(GenerationRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        GatewayError::Internal(format!("Failed to parse the request body as JSON: {}", e))
    })
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    REQUEST_TOTAL.inc();

    // an unreadable body still gets a schema-shaped reply
    let payload = match body
        .map_err(|rejection| GatewayError::Internal(rejection.body_text()))
        .and_then(|bytes| read_request(&headers, &bytes))
    {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "unreadable request body");
            return respond(Err(e));
        }
    };

    info!(
        platform = payload.platform.as_deref().unwrap_or(""),
        content_type = payload.content_type.as_deref().unwrap_or(""),
        topic = payload.topic.as_deref().unwrap_or(""),
        "POST /generate"
    );

    respond(state.service.generate(payload).await)
}
