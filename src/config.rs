use clap::Parser;
use std::time::Duration;

use crate::generation::{AnthropicConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

// CLI argument structure, every option also readable from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "script-gateway")]
#[command(about = "Generates viral video scripts through Anthropic, with a result cache")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 10000)]
    pub port: u16,

    // Anthropic API key, the server refuses to start without one
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true, value_parser = non_empty)]
    pub api_key: String,

    // Anthropic API base url
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = "https://api.anthropic.com")]
    pub anthropic_url: String,

    // Model identifier sent with every request
    #[arg(short, long, env = "ANTHROPIC_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    // Output token budget per generation
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    // Cache TTL in seconds
    #[arg(short, long, default_value_t = 3600)]
    pub cache_ttl: u64,

    // Timeout for the model call in seconds, none by default
    #[arg(long)]
    pub request_timeout: Option<u64>,

    // Share one model call between concurrent identical requests
    #[arg(long, default_value_t = false)]
    pub single_flight: bool,

    // Expose /health and /metrics
    #[arg(long, default_value_t = false)]
    pub enable_metrics: bool,
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

impl Args {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn anthropic(&self) -> AnthropicConfig {
        AnthropicConfig {
            base_url: self.anthropic_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            timeout: self.request_timeout.map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let args = Args::try_parse_from(["script-gateway", "--api-key", "sk-test"]).unwrap();
        assert_eq!(args.cache_ttl(), Duration::from_secs(3600));
        assert_eq!(args.max_tokens, 1000);
        assert!(!args.single_flight);
        let anthropic = args.anthropic();
        assert_eq!(anthropic.api_key, "sk-test");
        assert_eq!(anthropic.timeout, None);
    }

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(Args::try_parse_from(["script-gateway", "--api-key", "  "]).is_err());
    }
}
