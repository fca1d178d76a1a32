//! Similarity-based fallback over the intent keyword sets
//!
//! Used when no structural pattern matched. Each intent is scored by how
//! many of its keywords resemble the utterance and how strongly.

use voxta_config::constants::classification::{FUZZY_ACCEPT_SCORE, FUZZY_KEYWORD_SIMILARITY};
use voxta_core::IntentTag;

use super::registry::{CompiledIntent, IntentRegistry};
use super::scoring;
use crate::similarity;

/// Similarity floor when the keyword appears anywhere in the text
const SUBSTRING_SIMILARITY: f32 = 0.8;
/// Similarity floor when the keyword appears as a whole word
const WHOLE_WORD_SIMILARITY: f32 = 0.9;

/// Outcome of fuzzy matching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch {
    pub intent: IntentTag,
    pub confidence: f32,
}

impl FuzzyMatch {
    fn unknown() -> Self {
        Self {
            intent: IntentTag::Unknown,
            confidence: voxta_config::constants::classification::UNKNOWN_CONFIDENCE,
        }
    }
}

/// Best fuzzy intent for normalized `text`
pub fn fuzzy_match(
    registry: &IntentRegistry,
    text: &str,
    last_intent: Option<IntentTag>,
) -> FuzzyMatch {
    let mut best: Option<(&CompiledIntent, f32)> = None;

    for intent in registry.iter() {
        let weighted = weighted_score(text, intent);
        if best.map_or(true, |(_, score)| weighted > score) {
            best = Some((intent, weighted));
        }
    }

    match best {
        Some((intent, weighted)) if weighted > FUZZY_ACCEPT_SCORE => FuzzyMatch {
            intent: intent.tag,
            confidence: scoring::score(text, intent, false, last_intent) * weighted,
        },
        _ => FuzzyMatch::unknown(),
    }
}

/// (mean similarity of hits) × (fraction of keywords hit), over all keywords
fn weighted_score(text: &str, intent: &CompiledIntent) -> f32 {
    if intent.keywords.is_empty() {
        return 0.0;
    }

    let mut total = 0.0_f32;
    let mut hits = 0usize;

    for keyword in &intent.keywords {
        let mut similarity = similarity::ratio(text, &keyword.text);
        if text.contains(keyword.text.as_str()) {
            similarity = similarity.max(SUBSTRING_SIMILARITY);
        }
        if keyword.whole_word.is_match(text) {
            similarity = similarity.max(WHOLE_WORD_SIMILARITY);
        }
        if similarity > FUZZY_KEYWORD_SIMILARITY {
            total += similarity;
            hits += 1;
        }
    }

    let n = intent.keywords.len() as f32;
    (total / n) * (hits as f32 / n)
}
