mod fallback;
mod generate;
mod health;
mod metrics;

pub use fallback::not_found_handler;
pub use generate::generate_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
