//! Intent classification
//!
//! Classifies an utterance into one of six intents (or `unknown`) with a
//! calibrated confidence in [0.0, 0.99].
//!
//! # Example
//!
//! ```
//! use voxta_text_processing::intent::RuleBasedClassifier;
//! use voxta_core::IntentTag;
//!
//! let classifier = RuleBasedClassifier::builtin().unwrap();
//! let result = classifier.classify_text("bid 100 dollars");
//!
//! assert_eq!(result.intent, IntentTag::Bidding);
//! assert_eq!(result.extracted_amount, Some(100.0));
//! ```

pub mod classifier;
pub mod fuzzy;
pub mod keyword;
pub mod matcher;
pub mod registry;
pub mod scoring;

pub use classifier::RuleBasedClassifier;
pub use fuzzy::{fuzzy_match, FuzzyMatch};
pub use keyword::keyword_lookup;
pub use matcher::{bidding_confidence, match_patterns, PatternMatch};
pub use registry::{CompiledIntent, FallbackKeyword, IntentRegistry, Keyword};
pub use scoring::{score, ConfidenceSignals};
