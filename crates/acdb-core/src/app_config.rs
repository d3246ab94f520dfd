use crate::AreaCodeRange;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub range: AreaCodeRange,
    pub lookup_url_template: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub openai_api_key: Option<String>,
    pub extract_base_url: String,
    pub extract_model: String,
    pub extract_max_parse_attempts: u32,
    pub backoff_secs: u64,
    pub pacing_secs: u64,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("log_level", &self.log_level)
            .field("range", &self.range)
            .field("lookup_url_template", &self.lookup_url_template)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("extract_base_url", &self.extract_base_url)
            .field("extract_model", &self.extract_model)
            .field(
                "extract_max_parse_attempts",
                &self.extract_max_parse_attempts,
            )
            .field("backoff_secs", &self.backoff_secs)
            .field("pacing_secs", &self.pacing_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
