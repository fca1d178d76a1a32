//! Rule-based intent classifier
//!
//! The full pipeline: normalize, structural patterns, fuzzy fallback,
//! keyword table, `unknown`. Bidding results then get an amount extracted
//! from the original utterance.

use async_trait::async_trait;
use std::sync::Arc;
use voxta_config::constants::classification::{FUZZY_MIN_CONFIDENCE, KEYWORD_CONFIDENCE};
use voxta_config::IntentsConfig;
use voxta_core::{
    ClassificationContext, ClassificationResult, IntentClassifier, IntentTag, MatchMethod,
};

use super::fuzzy::fuzzy_match;
use super::keyword::keyword_lookup;
use super::matcher::match_patterns;
use super::registry::IntentRegistry;
use crate::amount::AmountExtractor;
use crate::normalizer::normalize;
use crate::Result;

/// Deterministic classifier over a compiled [`IntentRegistry`]
///
/// Classification is synchronous and never fails; anything that cannot be
/// classified resolves to `unknown` with confidence 0.1.
#[derive(Debug, Clone)]
pub struct RuleBasedClassifier {
    registry: Arc<IntentRegistry>,
    amounts: AmountExtractor,
}

impl RuleBasedClassifier {
    pub fn new(registry: Arc<IntentRegistry>) -> Self {
        let amounts = AmountExtractor::new(registry.bidding().patterns.clone());
        Self { registry, amounts }
    }

    /// Classifier over the built-in intent table
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(IntentRegistry::builtin()?)))
    }

    pub fn from_config(config: &IntentsConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(IntentRegistry::from_config(config)?)))
    }

    pub fn registry(&self) -> &Arc<IntentRegistry> {
        &self.registry
    }

    /// Classify without any conversation context
    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        self.classify_with_context(text, &ClassificationContext::default())
    }

    /// Classify one utterance
    pub fn classify_with_context(
        &self,
        text: &str,
        context: &ClassificationContext,
    ) -> ClassificationResult {
        let normalized = normalize(text);
        let result = self.classify_normalized(&normalized, context);

        let result = if result.intent == IntentTag::Bidding {
            result.with_amount(self.amounts.extract(text))
        } else {
            result
        };

        tracing::debug!(
            normalized = %normalized,
            intent = %result.intent,
            confidence = result.confidence,
            method = %result.method,
            amount = ?result.extracted_amount,
            "Classified utterance"
        );

        result
    }

    fn classify_normalized(
        &self,
        normalized: &str,
        context: &ClassificationContext,
    ) -> ClassificationResult {
        if let Some(hit) = match_patterns(&self.registry, normalized) {
            return ClassificationResult::new(hit.intent, hit.confidence, MatchMethod::PatternMatch);
        }

        let fuzzy = fuzzy_match(&self.registry, normalized, context.last_intent);
        if fuzzy.confidence > FUZZY_MIN_CONFIDENCE {
            return ClassificationResult::new(fuzzy.intent, fuzzy.confidence, MatchMethod::FuzzyMatch);
        }

        match keyword_lookup(&self.registry, normalized) {
            Some(intent) => {
                ClassificationResult::new(intent, KEYWORD_CONFIDENCE, MatchMethod::KeywordMatch)
            }
            None => ClassificationResult::unknown(),
        }
    }
}

#[async_trait]
impl IntentClassifier for RuleBasedClassifier {
    async fn classify(
        &self,
        text: &str,
        context: &ClassificationContext,
    ) -> voxta_core::Result<ClassificationResult> {
        Ok(self.classify_with_context(text, context))
    }

    fn name(&self) -> &str {
        "rule_based"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn classifier() -> RuleBasedClassifier {
        RuleBasedClassifier::builtin().unwrap()
    }

    #[test]
    fn test_greetings() {
        let c = classifier();
        for text in ["hello", "Hi", "hey!"] {
            let result = c.classify_text(text);
            assert_eq!(result.intent, IntentTag::Greeting, "{text}");
            assert!(result.confidence >= 0.97);
            assert_eq!(result.method, MatchMethod::PatternMatch);
        }
    }

    #[test]
    fn test_help_is_exact() {
        let result = classifier().classify_text("help");
        assert_eq!(result.intent, IntentTag::Help);
        assert_eq!(result.confidence, 0.98);
    }

    #[test]
    fn test_bid_with_dollars() {
        let result = classifier().classify_text("bid 100 dollars");
        assert_eq!(result.intent, IntentTag::Bidding);
        assert_eq!(result.extracted_amount, Some(100.0));
        assert!(result.confidence >= 0.95);
    }

    #[test]
    fn test_bid_with_cents() {
        let result = classifier().classify_text("place a bid of 250.50");
        assert_eq!(result.intent, IntentTag::Bidding);
        assert_eq!(result.extracted_amount, Some(250.5));
    }

    #[test]
    fn test_misheard_bid() {
        let result = classifier().classify_text("Um, place a bit of 75 dollars");
        assert_eq!(result.intent, IntentTag::Bidding);
        assert_eq!(result.extracted_amount, Some(75.0));
    }

    #[test]
    fn test_bid_without_number() {
        let result = classifier().classify_text("bid fifty");
        assert_eq!(result.intent, IntentTag::Bidding);
        assert_eq!(result.extracted_amount, None);
        assert_eq!(result.method, MatchMethod::KeywordMatch);
    }

    #[test]
    fn test_bid_out_of_range() {
        let result = classifier().classify_text("bid 20000000 dollars");
        assert_eq!(result.intent, IntentTag::Bidding);
        assert_eq!(result.extracted_amount, None);
    }

    /// Lone keywords are too weak for the fuzzy stage (see fuzzy.rs
    /// `test_single_keyword_is_too_weak`); the keyword table resolves
    /// "bid" and "list", the `status` pattern resolves "status".
    #[test]
    fn test_lone_keywords() {
        let c = classifier();
        for (text, intent, method) in [
            ("bid", IntentTag::Bidding, MatchMethod::KeywordMatch),
            ("list", IntentTag::Listing, MatchMethod::KeywordMatch),
            ("status", IntentTag::Status, MatchMethod::PatternMatch),
        ] {
            let result = c.classify_text(text);
            assert_eq!(result.intent, intent, "{text}");
            assert_eq!(result.method, method, "{text}");
            assert!(result.confidence > 0.5);
        }
    }

    #[test]
    fn test_listing_and_status_phrases() {
        let c = classifier();
        assert_eq!(c.classify_text("show me the auctions").intent, IntentTag::Listing);
        assert_eq!(c.classify_text("what's the current price?").intent, IntentTag::Status);
        assert_eq!(c.classify_text("market insights").intent, IntentTag::Insights);
    }

    #[test]
    fn test_nonsense_is_unknown() {
        let result = classifier().classify_text("purple elephant dance");
        assert_eq!(result.intent, IntentTag::Unknown);
        assert!(result.confidence <= 0.2);
        assert_eq!(result.method, MatchMethod::NoMatch);
    }

    #[test]
    fn test_empty_input_is_unknown() {
        let result = classifier().classify_text("");
        assert!(result.is_unknown());
    }

    #[test]
    fn test_amount_only_for_bidding() {
        let result = classifier().classify_text("status of 50 dollars");
        // "50 dollars" is a bidding pattern, so this is a bid
        assert_eq!(result.intent, IntentTag::Bidding);

        let result = classifier().classify_text("show auctions from 2023 onwards");
        assert_eq!(result.intent, IntentTag::Listing);
        assert_eq!(result.extracted_amount, None);
    }

    #[tokio::test]
    async fn test_trait_object() {
        let classifier: Arc<dyn IntentClassifier> = Arc::new(classifier());
        let result = classifier
            .classify("list auctions", &ClassificationContext::default())
            .await
            .unwrap();
        assert_eq!(result.intent, IntentTag::Listing);
        assert_eq!(classifier.name(), "rule_based");
    }

    proptest! {
        #[test]
        fn prop_confidence_within_bounds(text in "\\PC{0,60}") {
            let result = classifier().classify_text(&text);
            prop_assert!((0.0..=0.99).contains(&result.confidence));
            if result.intent != IntentTag::Bidding {
                prop_assert!(result.extracted_amount.is_none());
            }
        }

        #[test]
        fn prop_confidence_within_bounds_for_commands(
            verb in prop::sample::select(vec!["bid", "offer", "show", "list", "status", "help", "hi", "insights"]),
            amount in 0u32..50_000_000,
            suffix in prop::sample::select(vec!["", " dollars", " bucks", " please", "!"]),
        ) {
            let text = format!("{verb} {amount}{suffix}");
            let result = classifier().classify_text(&text);
            prop_assert!((0.0..=0.99).contains(&result.confidence));
            if let Some(amount) = result.extracted_amount {
                prop_assert!((0.01..=10_000_000.0).contains(&amount));
            }
        }
    }
}
