//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use voxta_agent::{CommandProcessor, SessionStore};
use voxta_config::Settings;
use voxta_core::AuctionService;
use voxta_text_processing::IntentRegistry;
use voxta_tools::create_auction_service;

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub processor: Arc<CommandProcessor>,
    pub auctions: Arc<dyn AuctionService>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        registry: Arc<IntentRegistry>,
        auctions: Arc<dyn AuctionService>,
    ) -> Self {
        let sessions = Arc::new(SessionStore::from_config(&settings.session));
        let processor = CommandProcessor::rule_based(registry, sessions, auctions.clone());
        Self {
            settings: Arc::new(settings),
            processor: Arc::new(processor),
            auctions,
        }
    }

    /// Build the intent registry and auction backend named in `settings`
    pub fn from_settings(settings: Settings) -> Result<Self, ServerError> {
        let intents = settings
            .load_intents()
            .map_err(|e| ServerError::Configuration(e.to_string()))?;
        let registry = IntentRegistry::from_config(&intents)
            .map_err(|e| ServerError::Configuration(e.to_string()))?;
        let auctions = create_auction_service(&settings.auction)
            .map_err(|e| ServerError::Configuration(e.to_string()))?;

        tracing::info!(
            intents = registry.iter().count(),
            auction_backend = auctions.name(),
            "Application state ready"
        );

        Ok(Self::new(settings, Arc::new(registry), auctions))
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        self.processor.sessions()
    }
}
