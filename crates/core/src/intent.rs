//! Intent tags and classification results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound for any reported confidence. Absolute certainty is never reported.
pub const MAX_CONFIDENCE: f32 = 0.99;

/// Discrete action category an utterance is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTag {
    /// Place a bid (carries an amount when one could be extracted)
    Bidding,
    /// List active auctions
    Listing,
    /// Ask for the current bid / auction status
    Status,
    /// Ask what the assistant can do
    Help,
    /// Say hello
    Greeting,
    /// Ask for market insights and recommendations
    Insights,
    /// Nothing matched with enough confidence
    Unknown,
}

impl IntentTag {
    /// The six classifiable intents, in registry order
    pub const KNOWN: [IntentTag; 6] = [
        IntentTag::Bidding,
        IntentTag::Listing,
        IntentTag::Status,
        IntentTag::Help,
        IntentTag::Greeting,
        IntentTag::Insights,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentTag::Bidding => "bidding",
            IntentTag::Listing => "listing",
            IntentTag::Status => "status",
            IntentTag::Help => "help",
            IntentTag::Greeting => "greeting",
            IntentTag::Insights => "insights",
            IntentTag::Unknown => "unknown",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, IntentTag::Unknown)
    }
}

impl fmt::Display for IntentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentTag {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bidding" => Ok(IntentTag::Bidding),
            "listing" => Ok(IntentTag::Listing),
            "status" => Ok(IntentTag::Status),
            "help" => Ok(IntentTag::Help),
            "greeting" => Ok(IntentTag::Greeting),
            "insights" => Ok(IntentTag::Insights),
            "unknown" => Ok(IntentTag::Unknown),
            other => Err(crate::Error::InvalidInput(format!("unknown intent tag: {}", other))),
        }
    }
}

/// Which pipeline stage produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// A structural pattern matched the normalized text
    PatternMatch,
    /// Similarity-based fallback over keyword sets
    FuzzyMatch,
    /// Literal keyword table lookup
    KeywordMatch,
    /// Every stage failed
    NoMatch,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::PatternMatch => "pattern_match",
            MatchMethod::FuzzyMatch => "fuzzy_match",
            MatchMethod::KeywordMatch => "keyword_match",
            MatchMethod::NoMatch => "no_match",
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Classified intent
    pub intent: IntentTag,
    /// Confidence in [0.0, 0.99]
    pub confidence: f32,
    /// Bid amount, only present for bidding when extraction succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_amount: Option<f64>,
    /// Stage that produced this result
    pub method: MatchMethod,
}

impl ClassificationResult {
    /// Build a result, clamping confidence into the reportable range
    pub fn new(intent: IntentTag, confidence: f32, method: MatchMethod) -> Self {
        Self {
            intent,
            confidence: clamp_confidence(confidence),
            extracted_amount: None,
            method,
        }
    }

    /// The low-confidence result every failed classification resolves to
    pub fn unknown() -> Self {
        Self::new(IntentTag::Unknown, 0.1, MatchMethod::NoMatch)
    }

    /// Attach an extracted amount. Ignored for anything but bidding.
    pub fn with_amount(mut self, amount: Option<f64>) -> Self {
        if self.intent == IntentTag::Bidding {
            self.extracted_amount = amount;
        }
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.intent.is_unknown()
    }
}

/// Clamp a raw score into [0.0, MAX_CONFIDENCE]
pub fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, MAX_CONFIDENCE)
}

/// Per-user context a classifier may use
///
/// Only the previous intent matters today (context continuity bonus).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationContext {
    /// Intent of the immediately preceding turn for this user
    pub last_intent: Option<IntentTag>,
}

impl ClassificationContext {
    pub fn with_last_intent(last_intent: Option<IntentTag>) -> Self {
        Self { last_intent }
    }
}
