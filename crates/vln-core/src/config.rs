use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional. Provider credentials that are set but blank are
/// treated as absent, since presence is what enables a provider.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let credential = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("VLN_ENV", "development"));
    let bind_addr = parse("VLN_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VLN_LOG_LEVEL", "info");

    let openai_api_key = credential("OPENAI_API_KEY");
    let anthropic_api_key = credential("ANTHROPIC_API_KEY");
    let google_api_key = credential("GOOGLE_GENERATIVE_AI_API_KEY");
    let perplexity_api_key = credential("PERPLEXITY_API_KEY");

    let provider_timeout_secs = parse_u64("VLN_PROVIDER_TIMEOUT_SECS", "60")?;
    let max_output_tokens = parse_u32("VLN_MAX_OUTPUT_TOKENS", "1000")?;
    let prompts_per_provider = parse_usize("VLN_PROMPTS_PER_PROVIDER", "3")?;
    let rate_limit_max_requests = parse_usize("VLN_RATE_LIMIT_MAX_REQUESTS", "5")?;
    let rate_limit_window_secs = parse_u64("VLN_RATE_LIMIT_WINDOW_SECS", "3600")?;

    if rate_limit_window_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "VLN_RATE_LIMIT_WINDOW_SECS".to_string(),
            reason: "window must be at least one second".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        openai_api_key,
        anthropic_api_key,
        google_api_key,
        perplexity_api_key,
        provider_timeout_secs,
        max_output_tokens,
        prompts_per_provider,
        rate_limit_max_requests,
        rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
