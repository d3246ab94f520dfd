//! Shared domain types and configuration for the area-code lookup pipeline.

mod app_config;
pub mod area_code;
mod config;
pub mod record;

use thiserror::Error;

pub use app_config::AppConfig;
pub use area_code::{AreaCode, AreaCodeRange, AreaCodes};
pub use config::{load_app_config, load_app_config_from_env};
pub use record::{CodeRecord, ExtractedFacts, NO_INFORMATION_REASON};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid area code \"{0}\": expected exactly three ASCII digits")]
    InvalidAreaCode(String),

    #[error("invalid first-digit range {first}..={last}: digits must be 0-9")]
    InvalidDigitRange { first: u8, last: u8 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
