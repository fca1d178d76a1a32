//! In-process auction backend
//!
//! Holds a small inventory behind a lock. Used as the default backend and
//! by tests; bids are checked the way a real service would check them.

use async_trait::async_trait;
use parking_lot::RwLock;

use voxta_core::{format_amount, AuctionItem, AuctionService, BidReceipt, BidRequest, Error};

/// Auction service over an in-memory item list
pub struct InMemoryAuctionService {
    items: RwLock<Vec<AuctionItem>>,
}

impl InMemoryAuctionService {
    pub fn new(items: Vec<AuctionItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// Demo inventory
    pub fn seeded() -> Self {
        Self::new(vec![
            AuctionItem::new("lot-001", "Vintage Rolex Submariner", 8_500.0, 23, "Jewelry")
                .with_description("1968 reference 5513, serviced"),
            AuctionItem::new("lot-002", "MacBook Pro 16", 1_450.0, 12, "Electronics")
                .with_description("M2 Max, 32GB RAM"),
            AuctionItem::new("lot-003", "Abstract Oil Painting", 2_200.0, 8, "Art")
                .with_description("Signed canvas, 90x120cm"),
            AuctionItem::new("lot-004", "Signed Baseball", 320.0, 15, "Collectibles")
                .with_description("1998 season, certificate included"),
            AuctionItem::new("lot-005", "Mid-Century Armchair", 640.0, 6, "Furniture")
                .with_description("Walnut frame, reupholstered"),
            AuctionItem::new("lot-006", "Mechanical Keyboard", 180.0, 9, "Electronics")
                .with_description("Hot-swappable, tactile switches"),
        ])
    }

    /// Current inventory
    pub fn items(&self) -> Vec<AuctionItem> {
        self.items.read().clone()
    }

    /// Close an auction so it no longer appears as active
    pub fn close(&self, item_id: &str) -> bool {
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|item| item.id != item_id);
        items.len() != before
    }
}

impl Default for InMemoryAuctionService {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl AuctionService for InMemoryAuctionService {
    async fn active_items(&self) -> voxta_core::Result<Vec<AuctionItem>> {
        Ok(self.items())
    }

    async fn place_bid(&self, request: BidRequest) -> voxta_core::Result<BidReceipt> {
        let mut items = self.items.write();
        let item = items
            .iter_mut()
            .find(|item| item.id == request.item_id)
            .ok_or_else(|| {
                Error::AuctionService(format!("Auction {} is not active", request.item_id))
            })?;

        if request.amount <= item.current_bid {
            return Err(Error::AuctionService(format!(
                "Bid must be higher than ${}",
                format_amount(item.current_bid)
            )));
        }

        let previous_bid = item.current_bid;
        item.current_bid = request.amount;
        item.bid_count += 1;

        tracing::debug!(
            item_id = %item.id,
            amount = request.amount,
            bidder = %request.bidder,
            "Bid accepted"
        );

        Ok(BidReceipt {
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            amount: request.amount,
            previous_bid,
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bid(item_id: &str, amount: f64) -> BidRequest {
        BidRequest {
            item_id: item_id.to_string(),
            amount,
            bidder: "Voice User test".to_string(),
            session_id: "test".to_string(),
            placed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_seeded_inventory() {
        let service = InMemoryAuctionService::seeded();
        let items = service.active_items().await.unwrap();
        assert_eq!(items.len(), 6);
        assert_eq!(service.name(), "memory");
    }

    #[tokio::test]
    async fn test_bid_updates_item() {
        let service = InMemoryAuctionService::seeded();
        let receipt = service.place_bid(bid("lot-004", 350.0)).await.unwrap();
        assert_eq!(receipt.previous_bid, 320.0);
        assert_eq!(receipt.item_name, "Signed Baseball");

        let item = service
            .items()
            .into_iter()
            .find(|i| i.id == "lot-004")
            .unwrap();
        assert_eq!(item.current_bid, 350.0);
        assert_eq!(item.bid_count, 16);
    }

    #[tokio::test]
    async fn test_low_bid_rejected() {
        let service = InMemoryAuctionService::seeded();
        let err = service.place_bid(bid("lot-004", 320.0)).await.unwrap_err();
        assert!(matches!(err, Error::AuctionService(_)));
    }

    #[tokio::test]
    async fn test_unknown_item_rejected() {
        let service = InMemoryAuctionService::new(Vec::new());
        assert!(service.place_bid(bid("nope", 10.0)).await.is_err());
    }

    #[tokio::test]
    async fn test_closed_item_disappears() {
        let service = InMemoryAuctionService::seeded();
        assert!(service.close("lot-001"));
        assert!(!service.close("lot-001"));
        assert_eq!(service.active_items().await.unwrap().len(), 5);
    }
}
