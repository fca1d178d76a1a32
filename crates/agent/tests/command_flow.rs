//! End-to-end command flow over the in-memory auction backend

use std::sync::Arc;

use voxta_agent::{ActionData, CommandProcessor, Expertise, SessionStore};
use voxta_core::{AuctionItem, AuctionService, IntentTag};
use voxta_text_processing::IntentRegistry;
use voxta_tools::InMemoryAuctionService;

fn setup(items: Vec<AuctionItem>) -> (CommandProcessor, Arc<InMemoryAuctionService>) {
    let auctions = Arc::new(InMemoryAuctionService::new(items));
    let registry = Arc::new(IntentRegistry::builtin().unwrap());
    let processor = CommandProcessor::rule_based(
        registry,
        Arc::new(SessionStore::default()),
        auctions.clone(),
    );
    (processor, auctions)
}

fn inventory() -> Vec<AuctionItem> {
    vec![
        AuctionItem::new("w1", "Vintage Watch", 120.0, 4, "Jewelry"),
        AuctionItem::new("l1", "Laptop", 300.0, 9, "Electronics"),
        AuctionItem::new("p1", "Painting", 450.0, 2, "Art"),
    ]
}

#[tokio::test]
async fn test_bid_is_placed_on_matching_item() {
    let (processor, auctions) = setup(inventory());

    let reply = processor
        .process("user-0042", "I want to bid 500 dollars")
        .await
        .unwrap()
        .with_auction_item(Some("laptop".to_string()));
    assert_eq!(reply.intent(), IntentTag::Bidding);
    assert_eq!(reply.bid_amount, Some(500.0));
    assert!(reply.validation.as_ref().unwrap().is_valid);

    let outcome = processor.execute(&reply, "user-0042").await;
    assert!(outcome.success, "{}", outcome.response);
    assert!(outcome.response.contains("Laptop"));
    match outcome.data {
        Some(ActionData::BidPlaced { receipt }) => {
            assert_eq!(receipt.item_id, "l1");
            assert_eq!(receipt.previous_bid, 300.0);
        }
        other => panic!("unexpected data: {:?}", other),
    }

    let laptop = auctions
        .active_items()
        .await
        .unwrap()
        .into_iter()
        .find(|i| i.id == "l1")
        .unwrap();
    assert_eq!(laptop.current_bid, 500.0);
    assert_eq!(laptop.bid_count, 10);
}

#[tokio::test]
async fn test_bid_below_target_item_is_refused() {
    let (processor, _) = setup(inventory());

    // execution checks the targeted item's own current bid
    let reply = processor
        .process("u", "bid 200 dollars")
        .await
        .unwrap()
        .with_auction_item(Some("painting".to_string()));
    let outcome = processor.execute(&reply, "u").await;

    assert!(!outcome.success);
    assert!(outcome.response.contains("too low"));
    assert_eq!(outcome.suggestions[0], "Try bidding $460");
    assert_eq!(outcome.suggestions[1], "Bid $475");
}

#[tokio::test]
async fn test_listing_sorted_by_activity() {
    let (processor, _) = setup(inventory());

    let reply = processor.process("u", "show active auctions").await.unwrap();
    assert_eq!(reply.intent(), IntentTag::Listing);

    let outcome = processor.execute(&reply, "u").await;
    assert!(outcome.success);
    assert!(outcome.response.starts_with("I found 3 active auctions: 1. Laptop"));
    assert_eq!(outcome.data, Some(ActionData::Listing { auction_count: 3 }));
}

#[tokio::test]
async fn test_listing_mentions_remaining_items() {
    let items: Vec<AuctionItem> = (0..8)
        .map(|i| AuctionItem::new(format!("i{i}"), format!("Item {i}"), 10.0 * i as f64, i, "Misc"))
        .collect();
    let (processor, _) = setup(items);

    let reply = processor.process("u", "list auctions").await.unwrap();
    let outcome = processor.execute(&reply, "u").await;
    assert!(outcome.response.ends_with("And 3 more auctions available."));
}

#[tokio::test]
async fn test_status_and_insights() {
    let (processor, _) = setup(inventory());

    let reply = processor.process("u", "what's the current bid").await.unwrap();
    assert_eq!(reply.intent(), IntentTag::Status);
    let outcome = processor.execute(&reply, "u").await;
    match outcome.data {
        Some(ActionData::Status(status)) => {
            assert_eq!(status.active_auctions, 3);
            assert_eq!(status.total_value, 870.0);
            assert_eq!(status.total_bids, 15);
            assert_eq!(status.top_auction.as_deref(), Some("Painting"));
        }
        other => panic!("unexpected data: {:?}", other),
    }

    let reply = processor.process("u", "give me market insights").await.unwrap();
    assert_eq!(reply.intent(), IntentTag::Insights);
    let outcome = processor.execute(&reply, "u").await;
    match outcome.data {
        Some(ActionData::Insights(insights)) => {
            assert_eq!(insights.top_category.as_deref(), Some("Art"));
            assert_eq!(insights.categories.len(), 3);
        }
        other => panic!("unexpected data: {:?}", other),
    }
}

#[tokio::test]
async fn test_no_active_auctions() {
    let (processor, _) = setup(Vec::new());

    let reply = processor.process("u", "bid 50 dollars").await.unwrap();
    let validation = reply.validation.as_ref().unwrap();
    assert!(!validation.is_valid);

    let outcome = processor.execute(&reply, "u").await;
    assert!(!outcome.success);
    assert!(outcome.response.contains("no active auctions"));
}

#[tokio::test]
async fn test_help_echoes_reply() {
    let (processor, _) = setup(inventory());

    let reply = processor.process("u", "help").await.unwrap();
    let outcome = processor.execute(&reply, "u").await;
    assert!(outcome.success);
    assert_eq!(outcome.response, reply.response);
    assert_eq!(outcome.suggestions, reply.suggestions);
}

#[tokio::test]
async fn test_session_becomes_experienced() {
    let (processor, _) = setup(inventory());

    for text in ["hello", "list auctions", "status", "help", "market insights"] {
        processor.process("regular", text).await.unwrap();
    }

    let snapshot = processor.sessions().snapshot("regular").unwrap();
    assert_eq!(snapshot.turn_count, 5);
    assert_eq!(snapshot.expertise, Expertise::Experienced);
    assert!(snapshot.success_rate > 0.4);
}
