//! Structural pattern matching
//!
//! Bidding is tried first with its own amount-driven confidence. The other
//! intents are tried in ascending priority and the most confident one wins.

use voxta_core::IntentTag;

use super::registry::{CompiledIntent, IntentRegistry};

/// Bidding amounts in this range sound like a real bid
const PLAUSIBLE_BID: std::ops::RangeInclusive<f64> = 10.0..=10_000.0;

/// A structural match on normalized text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMatch {
    pub intent: IntentTag,
    pub confidence: f32,
    /// Amount captured by the bidding pattern
    pub amount: Option<f64>,
}

/// Match normalized text against the registry patterns
pub fn match_patterns(registry: &IntentRegistry, text: &str) -> Option<PatternMatch> {
    match_bidding(registry.bidding(), text).or_else(|| match_ranked(registry.ranked(), text))
}

/// First bidding pattern whose captured amount is a positive number
fn match_bidding(bidding: &CompiledIntent, text: &str) -> Option<PatternMatch> {
    bidding.patterns.iter().find_map(|pattern| {
        let amount: f64 = pattern.captures(text)?.get(1)?.as_str().parse().ok()?;
        (amount > 0.0).then(|| PatternMatch {
            intent: IntentTag::Bidding,
            confidence: bidding_confidence(amount),
            amount: Some(amount),
        })
    })
}

/// Confidence of a bidding match, driven by the amount alone
pub fn bidding_confidence(amount: f64) -> f32 {
    let mut confidence: f32 = if amount > 10.0 { 0.95 } else { 0.90 };
    if PLAUSIBLE_BID.contains(&amount) {
        confidence = (confidence + 0.05).min(0.99);
    }
    confidence
}

fn match_ranked(ranked: &[CompiledIntent], text: &str) -> Option<PatternMatch> {
    let mut best: Option<PatternMatch> = None;

    for intent in ranked {
        if intent.first_match(text).is_none() {
            continue;
        }
        let confidence = structural_confidence(intent, text);
        if best.map_or(true, |b| confidence > b.confidence) {
            best = Some(PatternMatch {
                intent: intent.tag,
                confidence,
                amount: None,
            });
        }
    }

    best
}

/// Fixed confidence for canonical phrasings, otherwise 0.90 plus the boost
fn structural_confidence(intent: &CompiledIntent, text: &str) -> f32 {
    match intent.tag {
        IntentTag::Listing if text.contains("active") => 0.96,
        IntentTag::Status if text.contains("current") => 0.96,
        IntentTag::Help if text == "help" => 0.98,
        IntentTag::Greeting if matches!(text, "hello" | "hi" | "hey") => 0.97,
        _ => (0.90 + intent.confidence_boost).min(0.99),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> IntentRegistry {
        IntentRegistry::builtin().unwrap()
    }

    #[test]
    fn test_bidding_confidence_by_amount() {
        assert_eq!(bidding_confidence(5.0), 0.90);
        assert_eq!(bidding_confidence(10.0), 0.95);
        assert_eq!(bidding_confidence(100.0), 0.99);
        assert_eq!(bidding_confidence(50_000.0), 0.95);
    }

    #[test]
    fn test_bid_with_amount() {
        let m = match_patterns(&registry(), "bid 100 dollars").unwrap();
        assert_eq!(m.intent, IntentTag::Bidding);
        assert_eq!(m.amount, Some(100.0));
        assert_eq!(m.confidence, 0.99);
    }

    #[test]
    fn test_zero_amount_moves_on() {
        // every bidding pattern captures "0"; no other intent matches
        assert_eq!(match_patterns(&registry(), "bid 0"), None);
    }

    #[test]
    fn test_first_bidding_pattern_decides_amount() {
        let m = match_patterns(&registry(), "place a bid of 250.50").unwrap();
        assert_eq!(m.amount, Some(250.5));
    }

    #[test]
    fn test_help_override_is_exact() {
        let m = match_patterns(&registry(), "help").unwrap();
        assert_eq!(m.intent, IntentTag::Help);
        assert_eq!(m.confidence, 0.98);
    }

    #[test]
    fn test_greeting_override() {
        for greeting in ["hello", "hi", "hey"] {
            let m = match_patterns(&registry(), greeting).unwrap();
            assert_eq!(m.intent, IntentTag::Greeting);
            assert_eq!(m.confidence, 0.97);
        }
    }

    #[test]
    fn test_listing_active_override() {
        let m = match_patterns(&registry(), "show active auctions").unwrap();
        assert_eq!(m.intent, IntentTag::Listing);
        assert_eq!(m.confidence, 0.96);
    }

    #[test]
    fn test_boosted_match_beats_override() {
        // status (0.96 via "current") loses to plain listing (0.99 via boost)
        let m = match_patterns(&registry(), "current auctions status").unwrap();
        assert_eq!(m.intent, IntentTag::Listing);
        assert_eq!(m.confidence, 0.99);
    }

    #[test]
    fn test_tie_keeps_higher_priority() {
        // both listing and status match at 0.99; listing ranks first
        let m = match_patterns(&registry(), "show auctions status").unwrap();
        assert_eq!(m.intent, IntentTag::Listing);
    }

    #[test]
    fn test_no_structural_match() {
        assert_eq!(match_patterns(&registry(), "the weather is nice"), None);
    }
}
