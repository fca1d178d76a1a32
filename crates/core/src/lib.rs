//! Core traits and types for the Voxta voice command assistant
//!
//! This crate provides the types shared by every other crate:
//! - Intent tags, match methods and the classification result
//! - Auction domain types (items, bids, validation outcomes)
//! - Traits for pluggable collaborators (classifier, auction service)
//! - Error types

pub mod auction;
pub mod error;
pub mod intent;
pub mod traits;

pub use auction::{
    format_amount, AuctionItem, BidReceipt, BidRequest, BidValidation, RejectionReason,
    MAX_BID_AMOUNT, MIN_BID_AMOUNT,
};
pub use error::{Error, Result};
pub use intent::{
    clamp_confidence, ClassificationContext, ClassificationResult, IntentTag, MatchMethod,
    MAX_CONFIDENCE,
};
pub use traits::{AuctionService, IntentClassifier};
