//! Auction actions
//!
//! Turns an assistant reply into an effect on the auction service: placing
//! a bid or reading the market. Service failures become a failed
//! [`ActionOutcome`] with an apology; nothing here returns an error.

use chrono::Utc;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use voxta_core::{
    format_amount, AuctionItem, AuctionService, BidReceipt, BidRequest, BidValidation, IntentTag,
};

use crate::assistant::AssistantReply;

/// Listing replies describe at most this many items
const LISTING_LIMIT: usize = 5;

/// Markets with more active auctions than this count as busy
const BUSY_MARKET: usize = 5;

/// Result of executing a reply
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub response: String,
    pub success: bool,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ActionData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionOutcome {
    fn ok(response: impl Into<String>, suggestions: &[&str]) -> Self {
        Self {
            response: response.into(),
            success: true,
            suggestions: to_owned(suggestions),
            data: None,
            error: None,
        }
    }

    fn failed(response: impl Into<String>, suggestions: &[&str]) -> Self {
        Self {
            success: false,
            ..Self::ok(response, suggestions)
        }
    }

    fn with_data(mut self, data: ActionData) -> Self {
        self.data = Some(data);
        self
    }

    fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Structured payload of a successful action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionData {
    BidPlaced { receipt: BidReceipt },
    Listing { auction_count: usize },
    Status(MarketStatus),
    Insights(MarketInsights),
}

/// Snapshot of the active market
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStatus {
    pub active_auctions: usize,
    pub total_value: f64,
    pub average_bid: f64,
    pub total_bids: u64,
    pub top_auction: Option<String>,
}

/// Per-category aggregate
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryStats {
    pub count: usize,
    pub total_value: f64,
    pub total_bids: u64,
}

/// Market analysis across categories
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketInsights {
    pub market_value: f64,
    pub average_bid: f64,
    pub active_count: usize,
    pub top_category: Option<String>,
    pub categories: BTreeMap<String, CategoryStats>,
}

/// Check a proposed bid against the live market
///
/// When the service cannot be reached the bid is accepted unverified; the
/// auction service still has the final word when the bid is placed.
pub async fn validate_bid(service: &dyn AuctionService, amount: f64) -> BidValidation {
    match service.active_items().await {
        Ok(items) => BidValidation::evaluate(amount, &items),
        Err(e) => {
            tracing::warn!(
                service = service.name(),
                amount,
                error = %e,
                "Bid validation failed, accepting unverified"
            );
            BidValidation::unverified("Validation error - assuming valid")
        }
    }
}

/// Carry out what the reply asked for
pub async fn execute(
    service: &dyn AuctionService,
    reply: &AssistantReply,
    user_id: &str,
) -> ActionOutcome {
    match (reply.classification.intent, reply.bid_amount) {
        (IntentTag::Bidding, Some(amount)) => {
            place_bid(service, amount, reply.auction_item.as_deref(), user_id).await
        }
        (IntentTag::Listing, _) => list_auctions(service).await,
        (IntentTag::Status, _) => market_status(service).await,
        (IntentTag::Insights, _) => market_insights(service).await,
        _ => ActionOutcome {
            response: reply.response.clone(),
            success: true,
            suggestions: reply.suggestions.clone(),
            data: None,
            error: None,
        },
    }
}

async fn place_bid(
    service: &dyn AuctionService,
    amount: f64,
    auction_item: Option<&str>,
    user_id: &str,
) -> ActionOutcome {
    let items = match service.active_items().await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Could not load auctions for bid");
            return ActionOutcome::failed(
                "Sorry, I can't access auction data right now. Please try again later.",
                &["Try again in a moment", "Check auction status"],
            )
            .with_error(e);
        }
    };

    let Some(target) = select_item(&items, auction_item) else {
        return ActionOutcome::failed(
            "There are no active auctions to bid on at the moment.",
            &["Check back later", "Ask for 'upcoming auctions'"],
        );
    };

    if amount <= target.current_bid {
        let current = target.current_bid;
        return ActionOutcome {
            response: format!(
                "Your bid of ${} is too low. Current bid is ${}. Please bid at least ${}.",
                format_amount(amount),
                format_amount(current),
                format_amount(current + 1.0)
            ),
            success: false,
            suggestions: vec![
                format!("Try bidding ${}", format_amount(current + 10.0)),
                format!("Bid ${}", format_amount(current + 25.0)),
                "Check current status first".to_string(),
            ],
            data: None,
            error: None,
        };
    }

    let request = BidRequest {
        item_id: target.id.clone(),
        amount,
        bidder: bidder_name(user_id),
        session_id: user_id.to_string(),
        placed_at: Utc::now(),
    };

    match service.place_bid(request).await {
        Ok(receipt) => {
            tracing::info!(
                item_id = %receipt.item_id,
                amount = receipt.amount,
                user_id = %user_id,
                "Bid placed"
            );
            ActionOutcome::ok(
                format!(
                    "Your bid of ${} has been placed for {}. You're now the highest bidder!",
                    format_amount(receipt.amount),
                    target.name
                ),
                &["Check auction status", "Set up bid alerts", "View auction details"],
            )
            .with_data(ActionData::BidPlaced { receipt })
        }
        Err(e) => {
            tracing::warn!(item_id = %target.id, amount, error = %e, "Bid rejected");
            ActionOutcome::failed(
                format!("I couldn't place your bid: {}", e),
                &["Try a higher amount", "Check auction status", "Verify auction is still active"],
            )
            .with_error(e)
        }
    }
}

/// First item matching the query, else the first item
fn select_item<'a>(items: &'a [AuctionItem], query: Option<&str>) -> Option<&'a AuctionItem> {
    query
        .filter(|q| !q.trim().is_empty())
        .and_then(|q| items.iter().find(|item| item.matches(q)))
        .or_else(|| items.first())
}

fn bidder_name(user_id: &str) -> String {
    let chars: Vec<char> = user_id.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("Voice User {}", tail)
}

async fn list_auctions(service: &dyn AuctionService) -> ActionOutcome {
    let mut items = match service.active_items().await {
        Ok(items) => items,
        Err(e) => return unavailable("auction information", e),
    };

    if items.is_empty() {
        return ActionOutcome::ok(
            "There are no active auctions right now. Please check back later.",
            &["Check upcoming auctions", "Set up auction alerts", "Browse categories"],
        );
    }

    rank_by_activity(&mut items);

    let mut response = format!("I found {} active auctions: ", items.len());
    for (i, item) in items.iter().take(LISTING_LIMIT).enumerate() {
        response.push_str(&format!(
            "{}. {} in {} category - current bid ${} with {} bids. ",
            i + 1,
            item.name,
            item.category,
            format_amount(item.current_bid),
            item.bid_count
        ));
    }
    if items.len() > LISTING_LIMIT {
        response.push_str(&format!(
            "And {} more auctions available.",
            items.len() - LISTING_LIMIT
        ));
    }

    ActionOutcome::ok(
        response.trim_end(),
        &["Ask for auction details", "Place a bid", "Check ending soon auctions"],
    )
    .with_data(ActionData::Listing {
        auction_count: items.len(),
    })
}

/// Most bids first, then highest current bid
pub fn rank_by_activity(items: &mut [AuctionItem]) {
    items.sort_by(|a, b| {
        b.bid_count
            .cmp(&a.bid_count)
            .then_with(|| b.current_bid.total_cmp(&a.current_bid))
    });
}

async fn market_status(service: &dyn AuctionService) -> ActionOutcome {
    let items = match service.active_items().await {
        Ok(items) => items,
        Err(e) => return unavailable("auction status", e),
    };

    if items.is_empty() {
        return ActionOutcome::ok(
            "No active auctions to report status for.",
            &["Check upcoming auctions", "Browse categories", "Set up alerts"],
        );
    }

    let status = summarize(&items);
    let top = items
        .iter()
        .max_by(|a, b| a.current_bid.partial_cmp(&b.current_bid).unwrap_or(Ordering::Equal));

    let mut response = format!(
        "Market status: {} active auctions with total value ${}. ",
        status.active_auctions,
        thousands(status.total_value)
    );
    if let Some(top) = top {
        response.push_str(&format!(
            "Top auction is {} with highest bid of ${} and {} bids. ",
            top.name,
            format_amount(top.current_bid),
            top.bid_count
        ));
    }
    response.push_str(&format!(
        "Average bid across all auctions is ${:.2}. Total bids placed: {}.",
        status.average_bid, status.total_bids
    ));

    ActionOutcome::ok(
        response,
        &["Get auction details", "Place a bid", "Check market insights"],
    )
    .with_data(ActionData::Status(status))
}

/// Aggregate statistics over a non-empty item list
pub fn summarize(items: &[AuctionItem]) -> MarketStatus {
    let total_value: f64 = items.iter().map(|i| i.current_bid).sum();
    let total_bids: u64 = items.iter().map(|i| u64::from(i.bid_count)).sum();
    let top_auction = items
        .iter()
        .max_by(|a, b| a.current_bid.partial_cmp(&b.current_bid).unwrap_or(Ordering::Equal))
        .map(|i| i.name.clone());

    MarketStatus {
        active_auctions: items.len(),
        total_value,
        average_bid: if items.is_empty() {
            0.0
        } else {
            total_value / items.len() as f64
        },
        total_bids,
        top_auction,
    }
}

async fn market_insights(service: &dyn AuctionService) -> ActionOutcome {
    let items = match service.active_items().await {
        Ok(items) => items,
        Err(e) => return unavailable("market data", e),
    };

    if items.is_empty() {
        return ActionOutcome::ok(
            "No auction data available for market analysis.",
            &["Check back later", "Browse categories", "Set up alerts"],
        );
    }

    let insights = analyze(&items);

    let mut response = format!(
        "Market analysis: {} active auctions with total market value ${}. Average bid is ${:.2}. ",
        insights.active_count,
        thousands(insights.market_value),
        insights.average_bid
    );
    if let Some(name) = &insights.top_category {
        if let Some(stats) = insights.categories.get(name) {
            response.push_str(&format!(
                "Top performing category: {} with ${} total value across {} items. ",
                name,
                thousands(stats.total_value),
                stats.count
            ));
        }
    }
    response.push_str("Recommendations: ");
    if insights.active_count > BUSY_MARKET {
        response.push_str("High market activity detected - consider bidding on popular items. ");
    }
    response.push_str("Monitor bid patterns and time your bids carefully.");

    ActionOutcome::ok(
        response,
        &["Get category details", "Check trending auctions", "Set up bid alerts"],
    )
    .with_data(ActionData::Insights(insights))
}

/// Per-category aggregates; the top category has the highest total value
pub fn analyze(items: &[AuctionItem]) -> MarketInsights {
    let mut categories: BTreeMap<String, CategoryStats> = BTreeMap::new();
    for item in items {
        let category = if item.category.trim().is_empty() {
            "General".to_string()
        } else {
            item.category.clone()
        };
        let stats = categories.entry(category).or_default();
        stats.count += 1;
        stats.total_value += item.current_bid;
        stats.total_bids += u64::from(item.bid_count);
    }

    let mut top_category: Option<(&String, f64)> = None;
    for (name, stats) in &categories {
        if top_category.map_or(true, |(_, best)| stats.total_value > best) {
            top_category = Some((name, stats.total_value));
        }
    }
    let top_category = top_category.map(|(name, _)| name.clone());

    let status = summarize(items);
    MarketInsights {
        market_value: status.total_value,
        average_bid: status.average_bid,
        active_count: items.len(),
        top_category,
        categories,
    }
}

fn unavailable(what: &str, error: voxta_core::Error) -> ActionOutcome {
    tracing::warn!(error = %error, "Auction service unavailable for {}", what);
    ActionOutcome::failed(
        format!("Sorry, I'm having trouble getting {}.", what),
        &["Try again in a moment", "Check your connection"],
    )
    .with_error(error)
}

/// `1234567.5` → `"1,234,567.50"`
fn thousands(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<AuctionItem> {
        vec![
            AuctionItem::new("1", "Vintage Watch", 120.0, 4, "Jewelry"),
            AuctionItem::new("2", "Laptop", 300.0, 9, "Electronics"),
            AuctionItem::new("3", "Painting", 450.0, 4, "Art"),
            AuctionItem::new("4", "Phone", 200.0, 9, "Electronics"),
        ]
    }

    #[test]
    fn test_rank_by_activity() {
        let mut items = items();
        rank_by_activity(&mut items);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Phone", "Painting", "Vintage Watch"]);
    }

    #[test]
    fn test_summarize() {
        let status = summarize(&items());
        assert_eq!(status.active_auctions, 4);
        assert_eq!(status.total_value, 1070.0);
        assert_eq!(status.average_bid, 267.5);
        assert_eq!(status.total_bids, 26);
        assert_eq!(status.top_auction.as_deref(), Some("Painting"));
    }

    #[test]
    fn test_analyze_categories() {
        let insights = analyze(&items());
        assert_eq!(insights.categories.len(), 3);
        assert_eq!(insights.top_category.as_deref(), Some("Electronics"));
        let electronics = &insights.categories["Electronics"];
        assert_eq!(electronics.count, 2);
        assert_eq!(electronics.total_value, 500.0);
        assert_eq!(electronics.total_bids, 18);
    }

    #[test]
    fn test_select_item_by_query() {
        let items = items();
        assert_eq!(select_item(&items, Some("laptop")).unwrap().id, "2");
        assert_eq!(select_item(&items, Some("art")).unwrap().id, "3");
        // unmatched query falls back to the first item
        assert_eq!(select_item(&items, Some("boat")).unwrap().id, "1");
        assert_eq!(select_item(&items, None).unwrap().id, "1");
        assert!(select_item(&[], None).is_none());
    }

    #[test]
    fn test_bidder_name_uses_id_tail() {
        assert_eq!(bidder_name("user-12345"), "Voice User 2345");
        assert_eq!(bidder_name("ab"), "Voice User ab");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0.00");
        assert_eq!(thousands(999.5), "999.50");
        assert_eq!(thousands(1234567.891), "1,234,567.89");
        assert_eq!(thousands(-1000.0), "-1,000.00");
    }
}
