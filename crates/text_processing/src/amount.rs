//! Bid amount extraction
//!
//! Runs on the original utterance (not the normalized one) so that "$" and
//! decimal points survive exactly as spoken. Three tiers, first hit wins:
//!
//! 1. The bidding patterns of the intent registry, in order
//! 2. Currency phrases ("50 dollars", "$50", "50 buck")
//! 3. Any bare number, but only when the utterance talks about bidding
//!
//! Every candidate must parse and lie within [0.01, 10,000,000]; anything
//! else is skipped, never reported as an error.

use once_cell::sync::Lazy;
use regex::Regex;
use voxta_config::constants::amounts::{MAX_EXTRACTED, MIN_EXTRACTED};

static CURRENCY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(\d+(?:\.\d{2})?)\s*(?:dollars?|bucks?|usd|\$)",
        r"(?i)\$\s*(\d+(?:\.\d{2})?)",
        r"(?i)(\d+(?:\.\d{2})?)\s*(?:dollar|buck)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static BARE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d{2})?").unwrap());

/// Words that make a bare number count as a bid
const BIDDING_CONTEXT: &[&str] = &["bid", "offer", "dollars", "bucks", "place", "put"];

/// Extracts a bid amount from an utterance
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    /// Registry bidding patterns, case-insensitive, in registry order
    bidding_patterns: Vec<Regex>,
}

impl AmountExtractor {
    /// Build from the compiled bidding patterns (first capture group = amount)
    pub fn new(bidding_patterns: Vec<Regex>) -> Self {
        Self { bidding_patterns }
    }

    /// Extract the amount, or `None` when nothing usable was said
    pub fn extract(&self, text: &str) -> Option<f64> {
        self.from_bidding_patterns(text)
            .or_else(|| from_currency_phrases(text))
            .or_else(|| from_bare_numbers(text))
    }

    fn from_bidding_patterns(&self, text: &str) -> Option<f64> {
        self.bidding_patterns.iter().find_map(|pattern| {
            pattern
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| parse_in_range(m.as_str()))
        })
    }
}

fn from_currency_phrases(text: &str) -> Option<f64> {
    CURRENCY_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|m| parse_in_range(m.as_str()))
    })
}

fn from_bare_numbers(text: &str) -> Option<f64> {
    let lower = text.to_lowercase();
    if !BIDDING_CONTEXT.iter().any(|word| lower.contains(word)) {
        return None;
    }
    BARE_NUMBER
        .find_iter(text)
        .find_map(|m| parse_in_range(m.as_str()))
}

/// Parse a captured amount, keeping it only when within the accepted range
fn parse_in_range(raw: &str) -> Option<f64> {
    let amount: f64 = raw.parse().ok()?;
    (MIN_EXTRACTED..=MAX_EXTRACTED)
        .contains(&amount)
        .then_some(amount)
}
