//! Command processing
//!
//! [`CommandProcessor`] ties the pieces together for one utterance:
//! classify with the user's context, validate bids against the auction
//! service, phrase a reply with suggestions, and record the turn.

use serde::Serialize;
use std::sync::Arc;

use voxta_core::{
    format_amount, AuctionService, BidValidation, ClassificationContext, ClassificationResult,
    IntentClassifier, IntentTag, MAX_CONFIDENCE,
};
use voxta_text_processing::{IntentRegistry, RuleBasedClassifier};

use crate::actions::{self, ActionOutcome};
use crate::session::SessionStore;
use crate::AgentError;

/// Reply confidence for anything the assistant did not understand
const UNKNOWN_REPLY_CONFIDENCE: f32 = 0.2;

/// What the assistant says back for one utterance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantReply {
    pub user_id: String,
    pub input: String,
    /// Raw classifier output, as recorded in the session
    pub classification: ClassificationResult,
    pub response: String,
    /// Confidence adjusted for validation outcome
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_amount: Option<f64>,
    /// Item the user wants to bid on, matched against name/description/category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auction_item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<BidValidation>,
    pub suggestions: Vec<String>,
}

impl AssistantReply {
    pub fn intent(&self) -> IntentTag {
        self.classification.intent
    }

    pub fn with_auction_item(mut self, item: Option<String>) -> Self {
        self.auction_item = item.filter(|i| !i.trim().is_empty());
        self
    }
}

/// Processes utterances for all users
pub struct CommandProcessor {
    classifier: Arc<dyn IntentClassifier>,
    sessions: Arc<SessionStore>,
    auctions: Arc<dyn AuctionService>,
}

impl CommandProcessor {
    pub fn new(
        classifier: Arc<dyn IntentClassifier>,
        sessions: Arc<SessionStore>,
        auctions: Arc<dyn AuctionService>,
    ) -> Self {
        Self {
            classifier,
            sessions,
            auctions,
        }
    }

    /// Processor using the rule-based classifier over `registry`
    pub fn rule_based(
        registry: Arc<IntentRegistry>,
        sessions: Arc<SessionStore>,
        auctions: Arc<dyn AuctionService>,
    ) -> Self {
        Self::new(
            Arc::new(RuleBasedClassifier::new(registry)),
            sessions,
            auctions,
        )
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Classify with the user's context and record the turn
    pub async fn classify(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<ClassificationResult, AgentError> {
        let context = ClassificationContext::with_last_intent(self.sessions.last_intent(user_id));
        let result = self.classifier.classify(text, &context).await?;
        self.sessions.record_turn(user_id, text, result.clone());
        Ok(result)
    }

    /// Classify, validate and phrase a reply; the turn is recorded
    pub async fn process(&self, user_id: &str, text: &str) -> Result<AssistantReply, AgentError> {
        let context = ClassificationContext::with_last_intent(self.sessions.last_intent(user_id));
        let classification = self.classifier.classify(text, &context).await?;

        let reply = self.compose(user_id, text, classification).await;
        self.sessions
            .record_turn(user_id, text, reply.classification.clone());

        tracing::info!(
            user_id = %user_id,
            classifier = self.classifier.name(),
            intent = %reply.intent(),
            confidence = reply.confidence,
            "Processed command"
        );

        Ok(reply)
    }

    /// Carry out a reply against the auction service
    pub async fn execute(&self, reply: &AssistantReply, user_id: &str) -> ActionOutcome {
        actions::execute(self.auctions.as_ref(), reply, user_id).await
    }

    async fn compose(
        &self,
        user_id: &str,
        text: &str,
        classification: ClassificationResult,
    ) -> AssistantReply {
        let mut reply = AssistantReply {
            user_id: user_id.to_string(),
            input: text.to_string(),
            confidence: classification.confidence,
            bid_amount: None,
            auction_item: None,
            validation: None,
            response: String::new(),
            suggestions: Vec::new(),
            classification,
        };

        match reply.classification.intent {
            IntentTag::Bidding => match reply.classification.extracted_amount {
                Some(amount) => {
                    let validation = actions::validate_bid(self.auctions.as_ref(), amount).await;
                    apply_validation(&mut reply, amount, validation);
                }
                None => {
                    reply.response = "I didn't catch the bid amount clearly. Please specify how \
                                      much you'd like to bid, for example: 'bid 100 dollars'."
                        .to_string();
                    reply.confidence *= 0.6;
                    reply.suggestions = suggestions(&[
                        "Say 'bid 100 dollars'",
                        "Try 'place a bid of 250'",
                        "Use 'offer 150 bucks'",
                    ]);
                }
            },
            IntentTag::Unknown => {
                reply.response = "I didn't understand that command. Try saying 'help' to see \
                                  what I can do."
                    .to_string();
                reply.confidence = UNKNOWN_REPLY_CONFIDENCE;
                reply.suggestions = suggestions(&[
                    "Say 'help' for commands",
                    "Try 'list auctions'",
                    "Use 'bid 100 dollars'",
                ]);
            }
            intent => {
                let (response, hints) = canned_reply(intent);
                reply.response = response.to_string();
                reply.suggestions = suggestions(hints);
            }
        }

        reply
    }
}

fn apply_validation(reply: &mut AssistantReply, amount: f64, validation: BidValidation) {
    reply.bid_amount = Some(amount);

    if validation.is_valid {
        reply.response = format!("Perfect! I'll place your bid of ${}.", format_amount(amount));
        reply.confidence = (reply.confidence + 0.1).min(MAX_CONFIDENCE);
    } else {
        reply.response = format!(
            "Your bid of ${} is invalid: {}",
            format_amount(amount),
            validation.reason
        );
        reply.confidence *= 0.7;
        reply.suggestions = vec![
            format!(
                "Try bidding higher than ${}",
                format_amount(validation.current_bid.unwrap_or(0.0))
            ),
            "Check auction status first".to_string(),
            "Ask for current bid information".to_string(),
        ];
    }

    reply.validation = Some(validation);
}

fn canned_reply(intent: IntentTag) -> (&'static str, &'static [&'static str]) {
    match intent {
        IntentTag::Listing => (
            "Let me get the current auctions for you.",
            &[
                "Ask for 'featured auctions'",
                "Try 'ending soon auctions'",
                "Say 'auctions by category'",
            ],
        ),
        IntentTag::Status => (
            "I'll check the current auction status.",
            &["Ask for 'highest bid'", "Try 'auction details'", "Say 'time remaining'"],
        ),
        IntentTag::Help => (
            "I'm your auction assistant. Here's what I can do: \
             'list auctions' to see available items, \
             'current bid' to check auction status, \
             'bid [amount] dollars' to place a bid, \
             'market insights' for market analysis. \
             Just speak naturally and I'll understand!",
            &["Try 'list active auctions'", "Say 'bid 100 dollars'", "Ask for 'market insights'"],
        ),
        IntentTag::Greeting => (
            "Hello! I'm your auction assistant. How can I help you with auctions today?",
            &["Say 'list auctions'", "Try 'current status'", "Ask for 'help'"],
        ),
        IntentTag::Insights => (
            "I'll provide market insights and analytics.",
            &[
                "Ask for 'trending categories'",
                "Try 'price predictions'",
                "Say 'bidding recommendations'",
            ],
        ),
        IntentTag::Bidding | IntentTag::Unknown => ("", &[]),
    }
}

fn suggestions(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
