//! Multi-factor confidence scoring
//!
//! A score is the clamped sum of independent signals. Each signal is computed
//! separately so callers (and tests) can see why a score came out the way it
//! did.

use serde::Serialize;
use voxta_core::{clamp_confidence, IntentTag};

use super::registry::CompiledIntent;

const BASE: f32 = 0.75;
const STRUCTURAL_BONUS: f32 = 0.20;
const KEYWORD_STEP: f32 = 0.08;
const KEYWORD_CAP: f32 = 0.20;
const CONTEXT_BONUS: f32 = 0.05;
const PRIORITY_STEP: f32 = 0.02;

/// Signals contributing to a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceSignals {
    pub base: f32,
    pub structural_bonus: f32,
    pub keyword_bonus: f32,
    pub clarity_bonus: f32,
    pub context_bonus: f32,
    pub priority_bonus: f32,
    pub intent_boost: f32,
}

impl ConfidenceSignals {
    /// Gather the signals for `text` against one intent
    pub fn gather(
        text: &str,
        intent: &CompiledIntent,
        structural_match: bool,
        last_intent: Option<IntentTag>,
    ) -> Self {
        Self {
            base: BASE,
            structural_bonus: if structural_match { STRUCTURAL_BONUS } else { 0.0 },
            keyword_bonus: keyword_bonus(text, intent),
            clarity_bonus: clarity_bonus(text.split_whitespace().count()),
            context_bonus: if last_intent == Some(intent.tag) {
                CONTEXT_BONUS
            } else {
                0.0
            },
            priority_bonus: priority_bonus(intent.priority),
            intent_boost: intent.confidence_boost,
        }
    }

    /// Clamped sum of all signals
    pub fn total(&self) -> f32 {
        clamp_confidence(
            self.base
                + self.structural_bonus
                + self.keyword_bonus
                + self.clarity_bonus
                + self.context_bonus
                + self.priority_bonus
                + self.intent_boost,
        )
    }
}

/// Confidence that `text` expresses `intent`
pub fn score(
    text: &str,
    intent: &CompiledIntent,
    structural_match: bool,
    last_intent: Option<IntentTag>,
) -> f32 {
    ConfidenceSignals::gather(text, intent, structural_match, last_intent).total()
}

/// 0.08 per distinct keyword contained in the text, at most 0.20
fn keyword_bonus(text: &str, intent: &CompiledIntent) -> f32 {
    let hits = intent.keyword_texts().filter(|k| text.contains(k)).count();
    (hits as f32 * KEYWORD_STEP).min(KEYWORD_CAP)
}

/// Short commands are the clearest; very long utterances lose the bonus
fn clarity_bonus(word_count: usize) -> f32 {
    match word_count {
        2..=8 => 0.15,
        9..=15 => 0.10,
        n if n > 15 => (0.10 - 0.02 * (n - 15) as f32).max(0.0),
        _ => 0.05,
    }
}

/// Higher-priority intents (lower rank) get a small edge
fn priority_bonus(priority: u8) -> f32 {
    (5.0 - priority as f32) * PRIORITY_STEP
}
