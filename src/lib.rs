pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod generation;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod response;
pub mod service;
pub mod state;

pub use app::build_router;
pub use error::GatewayError;
pub use models::{GenerationRequest, GenerationResult, NormalizedRequest};
