//! Utterance normalization
//!
//! Speech-to-text output is lowercased, common mis-hearings are rewritten
//! ("bit" → "bid"), filler words are dropped and punctuation is removed.
//!
//! ```
//! use voxta_text_processing::normalize;
//!
//! assert_eq!(normalize("Um, place a BIT of 50 dollar!"), "place a bid of 50 dollars");
//! ```
//!
//! The rewrite steps run until the text stops changing, so the result is a
//! fixed point: `normalize(normalize(x)) == normalize(x)`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on rewrite passes. Two passes settle every input seen in
/// practice; the third confirms the fixed point.
const MAX_PASSES: usize = 8;

/// Literal substring rewrites, applied in order
const PHRASE_REWRITES: &[(&str, &str)] = &[
    ("place a bit", "place a bid"),
    ("bit", "bid"),
    ("show me options", "show me auctions"),
    ("current price", "current bid"),
    ("highest price", "highest bid"),
    ("what is the price", "what is the current bid"),
    ("how much does it cost", "what is the current bid"),
    ("i want to buy", "i want to bid"),
    // Known limitation: these fire regardless of sense ("take a look")
    ("purchase", "bid"),
    ("buy", "bid"),
    ("get", "bid"),
    ("take", "bid"),
];

/// Whole-word rewrites, applied after the literal ones
static WORD_REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"\bdollar\b").unwrap(), "dollars"),
        (Regex::new(r"\bbuck\b").unwrap(), "bucks"),
    ]
});

/// Filler token sequences, longest first
const FILLERS: &[&[&str]] = &[
    &["you", "know"],
    &["um"],
    &["uh"],
    &["like"],
    &["actually"],
    &["basically"],
    &["well"],
    &["so"],
    &["okay"],
];

/// Everything that is not a word character, whitespace, `$` or `.`
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s$.]").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a raw utterance
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_lowercase().trim().to_string();

    for _ in 0..MAX_PASSES {
        let next = rewrite_pass(&text);
        if next == text {
            return next;
        }
        text = next;
    }

    tracing::debug!(text = %text, "Normalization did not settle");
    text
}

/// One pass of substitutions, filler removal, stripping and collapsing
fn rewrite_pass(text: &str) -> String {
    let substituted = apply_substitutions(text);
    let without_fillers = remove_fillers(&substituted);
    let stripped = DISALLOWED.replace_all(&without_fillers, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

fn apply_substitutions(text: &str) -> String {
    let mut out = text.to_string();
    for (from, to) in PHRASE_REWRITES {
        if out.contains(from) {
            out = out.replace(from, to);
        }
    }
    for (pattern, to) in WORD_REWRITES.iter() {
        out = pattern.replace_all(&out, *to).into_owned();
    }
    out
}

fn remove_fillers(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut kept = Vec::with_capacity(tokens.len());

    let mut i = 0;
    while i < tokens.len() {
        match FILLERS
            .iter()
            .find(|filler| tokens[i..].starts_with(filler))
        {
            Some(filler) => i += filler.len(),
            None => {
                kept.push(tokens[i]);
                i += 1;
            }
        }
    }

    kept.join(" ")
}
