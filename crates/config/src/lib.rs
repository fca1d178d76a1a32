//! Configuration management for the Voxta voice assistant
//!
//! Supports loading configuration from:
//! - YAML files (config/default.yaml, config/{env}.yaml)
//! - Environment variables (VOXTA_ prefix, `__` between nested keys)
//!
//! Intent definitions (patterns, keywords, priorities, boosts) are fixed at
//! startup: the built-in table or a YAML file named by
//! `classifier.intents_path`.

pub mod constants;
pub mod intents;
pub mod settings;

pub use intents::{IntentDefinition, IntentsConfig, KeywordFallback};
pub use settings::{
    load_settings, AuctionBackend, AuctionConfig, ClassifierConfig, ObservabilityConfig,
    RuntimeEnvironment, ServerConfig, SessionConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for voxta_core::Error {
    fn from(err: ConfigError) -> Self {
        voxta_core::Error::Configuration(err.to_string())
    }
}
