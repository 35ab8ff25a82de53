use std::sync::Arc;

use crate::service::ContentService;

// app's shared state
pub struct AppState {
    pub service: Arc<ContentService>,
}
