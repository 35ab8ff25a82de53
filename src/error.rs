use axum::http::StatusCode;
use thiserror::Error;

// Every way a `/generate` call can fail.
// `Validation` is the caller's fault and maps to 400. Everything else is
// a 500, but the variants stay separate so logs and metrics can tell a
// provider outage apart from a model that answered with garbage.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Faltan campos requeridos: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("Error de conexión con el modelo: {0}")]
    Transport(String),

    #[error("No se encontró JSON válido en la respuesta")]
    NoJsonFound,

    #[error("JSON mal formado en la respuesta: {0}")]
    MalformedJson(String),

    #[error("Respuesta incompleta: faltan claves requeridas")]
    IncompleteResult,

    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Label used for logs and the failures counter
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Validation(_) => "validation",
            GatewayError::Transport(_) => "transport",
            GatewayError::NoJsonFound => "no_json",
            GatewayError::MalformedJson(_) => "malformed_json",
            GatewayError::IncompleteResult => "incomplete",
            GatewayError::Internal(_) => "internal",
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}
