//! Voice assistant agent
//!
//! Features:
//! - Per-user session context (bounded history, success rate, expertise)
//! - Command processing: classification, bid validation, reply phrasing
//! - Auction actions: bid placement, listings, market status and insights

pub mod actions;
pub mod assistant;
pub mod session;

pub use actions::{ActionData, ActionOutcome, CategoryStats, MarketInsights, MarketStatus};
pub use assistant::{AssistantReply, CommandProcessor};
pub use session::{Expertise, SessionContext, SessionSnapshot, SessionStore, TurnRecord};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Auction service error: {0}")]
    Auction(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<voxta_core::Error> for AgentError {
    fn from(err: voxta_core::Error) -> Self {
        match err {
            voxta_core::Error::Session(msg) => AgentError::Session(msg),
            voxta_core::Error::AuctionService(msg) | voxta_core::Error::ServiceUnavailable(msg) => {
                AgentError::Auction(msg)
            }
            voxta_core::Error::InvalidInput(msg) => AgentError::InvalidInput(msg),
            other => AgentError::Classifier(other.to_string()),
        }
    }
}
