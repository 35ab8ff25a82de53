use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::GatewayError;
use crate::models::{GenerationResult, Script};

fn filled_script(text: &str) -> Script {
    Script {
        gancho: text.to_string(),
        problema: text.to_string(),
        solucion: text.to_string(),
        cta: text.to_string(),
    }
}

fn headline_script(gancho: &str) -> Script {
    Script {
        gancho: gancho.to_string(),
        problema: String::new(),
        solucion: String::new(),
        cta: String::new(),
    }
}

pub fn validation_failure() -> GenerationResult {
    GenerationResult::placeholder(
        filled_script("Error"),
        "Faltan datos requeridos: plataforma, tipo de contenido o tema.",
        "Completa todos los campos obligatorios.",
    )
}

pub fn processing_failure(message: &str) -> GenerationResult {
    GenerationResult::placeholder(
        headline_script("Error al procesar"),
        "Intenta de nuevo o revisa tu conexión.",
        &format!("Error: {}", message),
    )
}

// Used for anything that escapes the pipeline: bad bodies, panics, unknown routes
pub fn internal_failure(message: &str) -> GenerationResult {
    GenerationResult::placeholder(
        headline_script("Error interno"),
        "Contacta al soporte si persiste.",
        &format!("Error: {}", message),
    )
}

impl GatewayError {
    // Error-shaped body for this failure.
    pub fn to_result(&self) -> GenerationResult {
        match self {
            GatewayError::Validation(_) => validation_failure(),
            GatewayError::Internal(message) => internal_failure(message),
            other => processing_failure(&other.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_result())).into_response()
    }
}

pub fn respond(outcome: Result<GenerationResult, GatewayError>) -> Response {
    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_body_matches_contract() {
        let err = GatewayError::Validation(vec!["topic"]);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(err.to_result()).unwrap(),
            json!({
                "script": {"gancho": "Error", "problema": "Error", "solucion": "Error", "cta": "Error"},
                "recommendations": ["Faltan datos requeridos: plataforma, tipo de contenido o tema."],
                "viralityScore": 0,
                "qualityScore": 0,
                "reasons": ["Completa todos los campos obligatorios."]
            })
        );
    }

    #[test]
    fn processing_failure_embeds_error_message() {
        let err = GatewayError::IncompleteResult;
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::to_value(err.to_result()).unwrap(),
            json!({
                "script": {"gancho": "Error al procesar", "problema": "", "solucion": "", "cta": ""},
                "recommendations": ["Intenta de nuevo o revisa tu conexión."],
                "viralityScore": 0,
                "qualityScore": 0,
                "reasons": ["Error: Respuesta incompleta: faltan claves requeridas"]
            })
        );
    }

    #[test]
    fn transport_failure_uses_processing_shape() {
        let body = GatewayError::Transport("connection refused".into()).to_result();
        assert_eq!(body.script["gancho"], json!("Error al procesar"));
        assert_eq!(
            body.reasons,
            json!(["Error: Error de conexión con el modelo: connection refused"])
        );
    }

    #[test]
    fn internal_failure_shape() {
        let body = GatewayError::Internal("boom".into()).to_result();
        assert_eq!(body.script["gancho"], json!("Error interno"));
        assert_eq!(body.recommendations, json!(["Contacta al soporte si persiste."]));
        assert_eq!(body.reasons, json!(["Error: boom"]));
        assert_eq!(body.virality_score, json!(0));
    }
}
