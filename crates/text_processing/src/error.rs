//! Text processing errors

use thiserror::Error;
use voxta_config::ConfigError;
use voxta_core::IntentTag;

/// Errors raised while building the classifier
///
/// Classification itself never fails; every error here surfaces at startup.
#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Invalid pattern for intent '{intent}' ({pattern}): {message}")]
    InvalidPattern {
        intent: IntentTag,
        pattern: String,
        message: String,
    },

    #[error("Bidding pattern has no amount capture group: {0}")]
    MissingAmountGroup(String),

    #[error("Invalid keyword '{0}'")]
    InvalidKeyword(String),

    #[error("Intent configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;

impl From<TextProcessingError> for voxta_core::Error {
    fn from(err: TextProcessingError) -> Self {
        voxta_core::Error::Configuration(err.to_string())
    }
}
