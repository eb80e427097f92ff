use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
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

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("NOVASCAN_ENV", "development"))?;
    let log_level = or_default("NOVASCAN_LOG_LEVEL", "info");

    let min_quality = parse_f64("NOVASCAN_MIN_QUALITY", "40")?;
    if !(0.0..=100.0).contains(&min_quality) {
        return Err(ConfigError::InvalidEnvVar {
            var: "NOVASCAN_MIN_QUALITY".to_string(),
            reason: format!("{min_quality} is outside 0..=100"),
        });
    }

    let embed_url = optional("NOVASCAN_EMBED_URL").map(|u| u.trim_end_matches('/').to_string());
    let embed_batch_size = parse_usize("NOVASCAN_EMBED_BATCH_SIZE", "5")?;
    if embed_batch_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NOVASCAN_EMBED_BATCH_SIZE".to_string(),
            reason: "batch size must be at least 1".to_string(),
        });
    }
    let embed_batch_delay_ms = parse_u64("NOVASCAN_EMBED_BATCH_DELAY_MS", "2000")?;

    let qdrant_url = optional("NOVASCAN_QDRANT_URL").map(|u| u.trim_end_matches('/').to_string());
    let qdrant_collection = or_default("NOVASCAN_QDRANT_COLLECTION", "social_signals");
    let qdrant_api_key = optional("NOVASCAN_QDRANT_API_KEY");

    let queue_threshold = parse_usize("NOVASCAN_QUEUE_THRESHOLD", "10")?;
    let heuristics_path = optional("NOVASCAN_HEURISTICS_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        min_quality,
        embed_url,
        embed_batch_size,
        embed_batch_delay_ms,
        qdrant_url,
        qdrant_collection,
        qdrant_api_key,
        queue_threshold,
        heuristics_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NOVASCAN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
