//! Shared types and configuration for NovaScan.
//!
//! [`Post`] is the unit every source adapter produces and every pipeline
//! stage consumes. Annotation fields start empty and are filled in by
//! `novascan-pipeline`.

pub mod app_config;
pub mod config;
pub mod filters;
pub mod post;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filters::{apply_filters, DateRange, SearchFilters};
pub use post::{Platform, Post, QualityMetrics, SentimentLabel, SentimentScore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
