//! Shared configuration and input validation for VLN.

pub mod app_config;
pub mod config;
pub mod domains;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use domains::{
    brand_label, normalize_domain, validate_analysis_request, validate_domain, AnalysisRequest,
    ValidatedRequest, MAX_COMPETITORS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejected analysis input. Each entry in `details` is a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", details.join("; "))]
pub struct ValidationError {
    pub details: Vec<String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(details: Vec<String>) -> Self {
        Self { details }
    }
}
