//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{endpoints, session};
use crate::{ConfigError, IntentsConfig};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation
    #[default]
    Development,
    /// Staging mode
    Staging,
    /// Production mode
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Classifier configuration
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Session store configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Auction service configuration
    #[serde(default)]
    pub auction: AuctionConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_session()?;
        self.validate_auction()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }
        if self.environment.is_production()
            && self.server.cors_enabled
            && self.server.cors_origins.is_empty()
        {
            return Err(ConfigError::InvalidValue {
                field: "server.cors_origins".to_string(),
                message: "Production requires explicit CORS origins".to_string(),
            });
        }
        Ok(())
    }

    fn validate_session(&self) -> Result<(), ConfigError> {
        if self.session.max_history == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_history".to_string(),
                message: "History bound must be at least 1".to_string(),
            });
        }
        if self.session.max_history > session::MAX_HISTORY {
            return Err(ConfigError::InvalidValue {
                field: "session.max_history".to_string(),
                message: format!("History bound must not exceed {}", session::MAX_HISTORY),
            });
        }
        Ok(())
    }

    fn validate_auction(&self) -> Result<(), ConfigError> {
        if self.auction.backend == AuctionBackend::Http && self.auction.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("auction.base_url".to_string()));
        }
        if self.auction.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "auction.timeout_seconds".to_string(),
                message: "Timeout must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    /// Intent definitions: the configured YAML file, or the built-in table
    pub fn load_intents(&self) -> Result<IntentsConfig, ConfigError> {
        match &self.classifier.intents_path {
            Some(path) => IntentsConfig::load(path),
            None => {
                let intents = IntentsConfig::default();
                intents.validate()?;
                Ok(intents)
            }
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (empty = any, development only)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassifierConfig {
    /// Optional YAML file overriding the built-in intent table
    #[serde(default)]
    pub intents_path: Option<String>,
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Turns kept per user
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_max_history() -> usize {
    session::MAX_HISTORY
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
        }
    }
}

/// Which auction backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuctionBackend {
    /// Seeded in-process inventory
    #[default]
    Memory,
    /// Remote REST service
    Http,
}

/// Auction service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionConfig {
    #[serde(default)]
    pub backend: AuctionBackend,

    /// Base URL of the REST service
    #[serde(default = "default_auction_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_auction_timeout")]
    pub timeout_seconds: u64,
}

fn default_auction_url() -> String {
    std::env::var("VOXTA_API_URL").unwrap_or_else(|_| endpoints::AUCTION_API_DEFAULT.to_string())
}
fn default_auction_timeout() -> u64 {
    endpoints::AUCTION_TIMEOUT_SECS
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            backend: AuctionBackend::default(),
            base_url: default_auction_url(),
            timeout_seconds: default_auction_timeout(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority: env vars (`VOXTA_SECTION__KEY`) > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("VOXTA")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
