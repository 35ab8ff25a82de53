use axum::Json;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;

use crate::response::internal_failure;

pub async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(internal_failure(&format!("ruta no encontrada: {}", uri.path()))),
    )
}
