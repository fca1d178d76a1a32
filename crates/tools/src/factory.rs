//! Auction backend factory
//!
//! Picks the [`AuctionService`] implementation named in settings.
//!
//! ```ignore
//! let auctions = create_auction_service(&settings.auction)?;
//! let items = auctions.active_items().await?;
//! ```

use std::sync::Arc;

use voxta_config::{AuctionBackend, AuctionConfig};
use voxta_core::AuctionService;

use crate::in_memory::InMemoryAuctionService;
use crate::integrations::{HttpAuctionService, IntegrationError};

/// Build the configured auction backend
pub fn create_auction_service(
    config: &AuctionConfig,
) -> Result<Arc<dyn AuctionService>, IntegrationError> {
    let service: Arc<dyn AuctionService> = match config.backend {
        AuctionBackend::Memory => Arc::new(InMemoryAuctionService::seeded()),
        AuctionBackend::Http => Arc::new(HttpAuctionService::from_config(config)?),
    };

    tracing::info!(
        backend = service.name(),
        base_url = %config.base_url,
        "Auction service ready"
    );
    Ok(service)
}
