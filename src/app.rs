use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::error::GatewayError;
use crate::handlers::{generate_handler, health_handler, metrics_handler, not_found_handler};
use crate::state::AppState;

// A panicking handler still answers with the result shape
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "pánico desconocido".to_string()
    };
    error!(%message, "handler panicked");
    GatewayError::Internal(message).into_response()
}

// Routes: `POST /generate`, plus `/health` and `/metrics` when enabled.
// Anything else falls through to a 404 in the result shape.
pub fn build_router(state: Arc<AppState>, metrics_enabled: bool) -> Router {
    let mut app = Router::new().route("/generate", post(generate_handler));

    if metrics_enabled {
        app = app
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler));
    }

    app.fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
