//! Text processing for the Voxta voice assistant
//!
//! This crate turns a noisy, speech-derived utterance into a classification:
//! - **Normalization**: lowercase, fix common mis-hearings, drop fillers
//! - **Intent classification**: structural patterns, multi-factor confidence,
//!   fuzzy and keyword fallbacks
//! - **Amount extraction**: bid amounts with range validation
//!
//! # Example
//!
//! ```
//! use voxta_text_processing::RuleBasedClassifier;
//! use voxta_core::IntentTag;
//!
//! let classifier = RuleBasedClassifier::builtin().unwrap();
//! let result = classifier.classify_text("um, what's the current price?");
//! assert_eq!(result.intent, IntentTag::Status);
//! ```

pub mod amount;
pub mod intent;
pub mod normalizer;
pub mod similarity;

mod error;

pub use amount::AmountExtractor;
pub use error::{Result, TextProcessingError};
pub use intent::{ConfidenceSignals, IntentRegistry, RuleBasedClassifier};
pub use normalizer::normalize;
