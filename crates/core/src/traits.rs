//! Core traits for pluggable collaborators
//!
//! ```text
//! Classification:
//!   - IntentClassifier: utterance → ClassificationResult
//!
//! Auction backend:
//!   - AuctionService: active items + bid placement
//! ```

use async_trait::async_trait;

use crate::{AuctionItem, BidReceipt, BidRequest, ClassificationContext, ClassificationResult, Result};

/// Intent classification interface
///
/// Implementations:
/// - `RuleBasedClassifier` - deterministic pattern/fuzzy/keyword pipeline
///
/// Any substitute (e.g. an LLM-backed classifier placed ahead of the rule
/// pipeline) must produce the same `ClassificationResult` shape so the rest
/// of the system does not care which classifier ran.
///
/// # Example
///
/// ```ignore
/// let classifier: Arc<dyn IntentClassifier> = Arc::new(RuleBasedClassifier::new(registry));
/// let result = classifier.classify("bid 100 dollars", &ClassificationContext::default()).await?;
/// assert_eq!(result.intent, IntentTag::Bidding);
/// ```
#[async_trait]
pub trait IntentClassifier: Send + Sync + 'static {
    /// Classify one utterance
    async fn classify(
        &self,
        text: &str,
        context: &ClassificationContext,
    ) -> Result<ClassificationResult>;

    /// Classifier name, for logs
    fn name(&self) -> &str;
}

/// Auction inventory and bidding backend
///
/// Calls may fail (network, remote errors); callers decide how to degrade.
#[async_trait]
pub trait AuctionService: Send + Sync + 'static {
    /// Items currently open for bidding
    async fn active_items(&self) -> Result<Vec<AuctionItem>>;

    /// Submit a bid
    async fn place_bid(&self, request: BidRequest) -> Result<BidReceipt>;

    /// Backend name, for logs
    fn name(&self) -> &str;
}
