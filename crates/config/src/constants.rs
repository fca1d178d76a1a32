//! Centralized constants for the voice assistant
//!
//! Single source of truth for thresholds and default values shared by the
//! classifier, the session store and the server.

/// Classification thresholds
pub mod classification {
    /// Fuzzy weighted score must exceed this to produce an intent
    pub const FUZZY_ACCEPT_SCORE: f32 = 0.6;

    /// Per-keyword similarity must exceed this to count as a hit
    pub const FUZZY_KEYWORD_SIMILARITY: f32 = 0.6;

    /// Fuzzy results at or below this confidence fall through to keyword lookup
    pub const FUZZY_MIN_CONFIDENCE: f32 = 0.7;

    /// Flat confidence of a keyword-table hit
    pub const KEYWORD_CONFIDENCE: f32 = 0.75;

    /// Confidence of the `unknown` result
    pub const UNKNOWN_CONFIDENCE: f32 = 0.1;

    /// Allowed range for an intent's fixed confidence boost
    pub const MIN_CONFIDENCE_BOOST: f32 = 0.10;
    pub const MAX_CONFIDENCE_BOOST: f32 = 0.15;

    /// Allowed priority ranks (1 is highest)
    pub const MIN_PRIORITY: u8 = 1;
    pub const MAX_PRIORITY: u8 = 6;
}

/// Amount extraction bounds
pub mod amounts {
    /// Smallest amount the extractor accepts
    pub const MIN_EXTRACTED: f64 = 0.01;

    /// Largest amount the extractor accepts
    pub const MAX_EXTRACTED: f64 = 10_000_000.0;
}

/// Session defaults
pub mod session {
    /// Turns kept per user before the oldest is dropped
    pub const MAX_HISTORY: usize = 50;

    /// Below this many turns a user is considered a beginner
    pub const EXPERIENCED_AFTER_TURNS: usize = 5;

    /// Confidence above which a turn counts as successful
    pub const SUCCESS_CONFIDENCE: f32 = 0.8;

    /// User id used when the caller does not send one
    pub const ANONYMOUS_USER: &str = "anonymous";
}

/// External endpoints
pub mod endpoints {
    /// Default auction service base URL
    pub const AUCTION_API_DEFAULT: &str = "https://voxta-codeclash.onrender.com/api";

    /// Default auction service timeout
    pub const AUCTION_TIMEOUT_SECS: u64 = 10;
}
