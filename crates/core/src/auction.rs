//! Auction domain types
//!
//! These describe what the external auction service exposes to the
//! assistant: active items and bid placement. The wire format of that
//! service is owned by its client (see `voxta-tools`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest bid the assistant will ever accept
pub const MAX_BID_AMOUNT: f64 = 10_000_000.0;

/// Smallest bid the assistant will ever accept
pub const MIN_BID_AMOUNT: f64 = 1.0;

/// An active auction item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionItem {
    /// Item identifier in the auction service
    pub id: String,
    /// Display name
    pub name: String,
    /// Current highest bid
    pub current_bid: f64,
    /// Number of bids placed so far
    pub bid_count: u32,
    /// Category used for grouping ("Electronics", "Art", ...)
    pub category: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
}

impl AuctionItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        current_bid: f64,
        bid_count: u32,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current_bid,
            bid_count,
            category: category.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive match against name, description or category
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
    }
}

/// A bid to submit to the auction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidRequest {
    pub item_id: String,
    pub amount: f64,
    pub bidder: String,
    pub session_id: String,
    pub placed_at: DateTime<Utc>,
}

/// Confirmation returned by the auction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidReceipt {
    pub item_id: String,
    pub item_name: String,
    pub amount: f64,
    pub previous_bid: f64,
}

/// Why a proposed bid was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Nothing to bid on
    NoActiveAuctions,
    /// Not higher than the current highest bid
    BelowCurrentBid,
    /// Above `MAX_BID_AMOUNT`
    AboveMaximum,
    /// Below `MIN_BID_AMOUNT`
    BelowMinimum,
}

/// Outcome of validating a proposed bid amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidValidation {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionReason>,
    /// Human readable reason
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_bid: Option<f64>,
    /// False when the auction service could not be consulted
    #[serde(default = "default_verified")]
    pub verified: bool,
}

fn default_verified() -> bool {
    true
}

impl BidValidation {
    /// Validate `amount` against the active items
    ///
    /// Checks run in order: no items, not above the highest current bid,
    /// above the maximum, below the minimum.
    pub fn evaluate(amount: f64, active_items: &[AuctionItem]) -> Self {
        if active_items.is_empty() {
            return Self::rejected(
                RejectionReason::NoActiveAuctions,
                "No active auctions available".to_string(),
                None,
            );
        }

        let highest = active_items
            .iter()
            .map(|item| item.current_bid)
            .fold(0.0_f64, f64::max);

        if amount <= highest {
            let mut rejected = Self::rejected(
                RejectionReason::BelowCurrentBid,
                format!(
                    "Bid must be higher than current highest bid of ${}",
                    format_amount(highest)
                ),
                Some(highest),
            );
            rejected.minimum_bid = Some(highest + 1.0);
            return rejected;
        }

        if amount > MAX_BID_AMOUNT {
            return Self::rejected(
                RejectionReason::AboveMaximum,
                "Bid amount too high (maximum $10,000,000)".to_string(),
                Some(highest),
            );
        }

        if amount < MIN_BID_AMOUNT {
            return Self::rejected(
                RejectionReason::BelowMinimum,
                "Bid amount too low (minimum $1)".to_string(),
                Some(highest),
            );
        }

        Self {
            is_valid: true,
            rejection: None,
            reason: "Valid bid amount".to_string(),
            current_bid: Some(highest),
            minimum_bid: None,
            verified: true,
        }
    }

    /// Accepted without consulting the auction service
    pub fn unverified(reason: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            rejection: None,
            reason: reason.into(),
            current_bid: None,
            minimum_bid: None,
            verified: false,
        }
    }

    fn rejected(rejection: RejectionReason, reason: String, current_bid: Option<f64>) -> Self {
        Self {
            is_valid: false,
            rejection: Some(rejection),
            reason,
            current_bid,
            minimum_bid: None,
            verified: true,
        }
    }
}

/// Render an amount the way the assistant speaks it: no trailing ".00"
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}
