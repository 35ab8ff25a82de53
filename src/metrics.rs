use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, register_counter, register_counter_vec, register_gauge,
    register_histogram,
};

// Registration only fails on a duplicate name, which is a programming error
lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("script_gateway_requests_total", "Total number of /generate requests").unwrap();
    pub static ref VALIDATION_REJECTIONS: Counter = register_counter!(
        "script_gateway_validation_rejections_total",
        "Requests rejected for missing mandatory fields"
    )
    .unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("script_gateway_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("script_gateway_cache_misses_total", "Total cache misses").unwrap();
    pub static ref GENERATION_FAILURES: CounterVec = register_counter_vec!(
        "script_gateway_generation_failures_total",
        "Failed generations by kind",
        &["kind"]
    )
    .unwrap();
    pub static ref GENERATION_LATENCY: Histogram = register_histogram!(
        "script_gateway_generation_latency_seconds",
        "Model call latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("script_gateway_cache_size", "Current number of items in cache").unwrap();
}
