use crate::app_config::AppConfig;
use crate::{AreaCode, AreaCodeRange, ConfigError};

pub(crate) const DEFAULT_DATABASE_URL: &str = "sqlite://area_codes.db?mode=rwc";
pub(crate) const DEFAULT_LOOKUP_URL_TEMPLATE: &str =
    "https://www.nationalnanpa.com/enas/displayNpaCityReport.do?npaId={code}";

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
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_code = |var: &str, default: &str| -> Result<AreaCode, ConfigError> {
        or_default(var, default)
            .parse::<AreaCode>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = or_default("DATABASE_URL", DEFAULT_DATABASE_URL);
    let log_level = or_default("ACDB_LOG_LEVEL", "info");

    let range_start = parse_code("ACDB_RANGE_START", "200")?;
    let range_end = parse_code("ACDB_RANGE_END", "999")?;
    let range = AreaCodeRange::new(range_start, range_end);

    let lookup_url_template = or_default("ACDB_LOOKUP_URL_TEMPLATE", DEFAULT_LOOKUP_URL_TEMPLATE);
    if !lookup_url_template.contains("{code}") {
        return Err(invalid(
            "ACDB_LOOKUP_URL_TEMPLATE",
            "template must contain a {code} placeholder".to_string(),
        ));
    }

    let request_timeout_secs = parse_u64("ACDB_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ACDB_USER_AGENT", "acdb/0.1 (area-code-lookup)");
    let max_retries = parse_u32("ACDB_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("ACDB_RETRY_BACKOFF_BASE_SECS", "5")?;

    let openai_api_key = lookup("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty());
    let extract_base_url = or_default("ACDB_EXTRACT_BASE_URL", "https://api.openai.com/v1");
    let extract_model = or_default("ACDB_EXTRACT_MODEL", "gpt-4o-mini");
    let extract_max_parse_attempts = parse_u32("ACDB_EXTRACT_MAX_PARSE_ATTEMPTS", "3")?;
    if extract_max_parse_attempts == 0 {
        return Err(invalid(
            "ACDB_EXTRACT_MAX_PARSE_ATTEMPTS",
            "must be at least 1".to_string(),
        ));
    }

    let backoff_secs = parse_u64("ACDB_BACKOFF_SECS", "60")?;
    let pacing_secs = parse_u64("ACDB_PACING_SECS", "10")?;

    let db_max_connections = parse_u32("ACDB_DB_MAX_CONNECTIONS", "5")?;
    let db_acquire_timeout_secs = parse_u64("ACDB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        log_level,
        range,
        lookup_url_template,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        openai_api_key,
        extract_base_url,
        extract_model,
        extract_max_parse_attempts,
        backoff_secs,
        pacing_secs,
        db_max_connections,
        db_acquire_timeout_secs,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
