//! Compiled intent registry
//!
//! Built once at startup from [`IntentsConfig`] and shared read-only. All
//! patterns are compiled case-insensitive; every keyword also gets a
//! whole-word regex for the fuzzy matcher.

use regex::{Regex, RegexBuilder};
use voxta_config::{IntentDefinition, IntentsConfig};
use voxta_core::IntentTag;

use crate::{Result, TextProcessingError};

/// A keyword with its pre-compiled whole-word matcher
#[derive(Debug, Clone)]
pub struct Keyword {
    pub text: String,
    pub whole_word: Regex,
}

/// One intent, ready to match
#[derive(Debug, Clone)]
pub struct CompiledIntent {
    pub tag: IntentTag,
    /// Structural patterns, in definition order
    pub patterns: Vec<Regex>,
    /// Distinct keywords, in definition order
    pub keywords: Vec<Keyword>,
    pub priority: u8,
    pub confidence_boost: f32,
}

impl CompiledIntent {
    fn compile(definition: &IntentDefinition) -> Result<Self> {
        let patterns = definition
            .patterns
            .iter()
            .map(|source| compile_pattern(definition.tag, source))
            .collect::<Result<Vec<_>>>()?;

        let mut keywords: Vec<Keyword> = Vec::with_capacity(definition.keywords.len());
        for raw in &definition.keywords {
            let text = raw.trim().to_lowercase();
            if text.is_empty() {
                return Err(TextProcessingError::InvalidKeyword(raw.clone()));
            }
            if keywords.iter().any(|k| k.text == text) {
                continue;
            }
            let whole_word = Regex::new(&format!(r"\b{}\b", regex::escape(&text)))
                .map_err(|_| TextProcessingError::InvalidKeyword(raw.clone()))?;
            keywords.push(Keyword { text, whole_word });
        }

        Ok(Self {
            tag: definition.tag,
            patterns,
            keywords,
            priority: definition.priority,
            confidence_boost: definition.confidence_boost,
        })
    }

    /// First pattern matching `text`, if any
    pub fn first_match<'t>(&self, text: &'t str) -> Option<regex::Captures<'t>> {
        self.patterns.iter().find_map(|p| p.captures(text))
    }

    pub fn keyword_texts(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.text.as_str())
    }
}

fn compile_pattern(intent: IntentTag, source: &str) -> Result<Regex> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| TextProcessingError::InvalidPattern {
            intent,
            pattern: source.to_string(),
            message: e.to_string(),
        })
}

/// One row of the keyword fallback table
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackKeyword {
    pub keyword: String,
    pub intent: IntentTag,
}

/// The full, compiled set of intents
#[derive(Debug, Clone)]
pub struct IntentRegistry {
    bidding: CompiledIntent,
    /// Every other intent, ascending priority
    ranked: Vec<CompiledIntent>,
    keyword_fallback: Vec<FallbackKeyword>,
}

impl IntentRegistry {
    /// Validate and compile a configuration
    pub fn from_config(config: &IntentsConfig) -> Result<Self> {
        config.validate()?;

        let mut bidding = None;
        let mut ranked = Vec::with_capacity(config.intents.len().saturating_sub(1));

        for definition in &config.intents {
            let compiled = CompiledIntent::compile(definition)?;
            if compiled.tag == IntentTag::Bidding {
                for pattern in &compiled.patterns {
                    if pattern.captures_len() < 2 {
                        return Err(TextProcessingError::MissingAmountGroup(
                            pattern.as_str().to_string(),
                        ));
                    }
                }
                bidding = Some(compiled);
            } else {
                ranked.push(compiled);
            }
        }

        let bidding = bidding.ok_or_else(|| {
            TextProcessingError::Config(voxta_config::ConfigError::MissingField(
                "intents.bidding".to_string(),
            ))
        })?;
        ranked.sort_by_key(|intent| intent.priority);

        let keyword_fallback = config
            .keyword_fallback
            .iter()
            .map(|rule| FallbackKeyword {
                keyword: rule.keyword.trim().to_lowercase(),
                intent: rule.intent,
            })
            .collect();

        tracing::debug!(
            intents = ranked.len() + 1,
            bidding_patterns = bidding.patterns.len(),
            "Compiled intent registry"
        );

        Ok(Self {
            bidding,
            ranked,
            keyword_fallback,
        })
    }

    /// Registry compiled from the built-in table
    pub fn builtin() -> Result<Self> {
        Self::from_config(&IntentsConfig::default())
    }

    pub fn bidding(&self) -> &CompiledIntent {
        &self.bidding
    }

    /// Non-bidding intents in ascending priority
    pub fn ranked(&self) -> &[CompiledIntent] {
        &self.ranked
    }

    /// Bidding first, then the rest by priority
    pub fn iter(&self) -> impl Iterator<Item = &CompiledIntent> {
        std::iter::once(&self.bidding).chain(self.ranked.iter())
    }

    pub fn get(&self, tag: IntentTag) -> Option<&CompiledIntent> {
        self.iter().find(|intent| intent.tag == tag)
    }

    pub fn keyword_fallback(&self) -> &[FallbackKeyword] {
        &self.keyword_fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_order() {
        let registry = IntentRegistry::builtin().unwrap();
        let order: Vec<IntentTag> = registry.iter().map(|i| i.tag).collect();
        assert_eq!(
            order,
            vec![
                IntentTag::Bidding,
                IntentTag::Listing,
                IntentTag::Status,
                IntentTag::Help,
                IntentTag::Greeting,
                IntentTag::Insights,
            ]
        );
        assert_eq!(registry.keyword_fallback().len(), 14);
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let registry = IntentRegistry::builtin().unwrap();
        let caps = registry.bidding().first_match("BID 42 Dollars").unwrap();
        assert_eq!(&caps[1], "42");
    }

    #[test]
    fn test_keyword_whole_word_regex() {
        let registry = IntentRegistry::builtin().unwrap();
        let status = registry.get(IntentTag::Status).unwrap();
        let price = status.keywords.iter().find(|k| k.text == "price").unwrap();
        assert!(price.whole_word.is_match("the price now"));
        assert!(!price.whole_word.is_match("priceless"));
    }

    #[test]
    fn test_ranked_sorted_even_when_config_is_not() {
        let mut config = IntentsConfig::default();
        config.intents.reverse();
        let registry = IntentRegistry::from_config(&config).unwrap();
        let priorities: Vec<u8> = registry.ranked().iter().map(|i| i.priority).collect();
        assert_eq!(priorities, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let mut config = IntentsConfig::default();
        config.intents[3].patterns.push("help(".to_string());
        assert!(matches!(
            IntentRegistry::from_config(&config),
            Err(TextProcessingError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_bidding_pattern_without_group_rejected() {
        let mut config = IntentsConfig::default();
        config.intents[0].patterns.push(r"bid\s+now".to_string());
        assert!(matches!(
            IntentRegistry::from_config(&config),
            Err(TextProcessingError::MissingAmountGroup(_))
        ));
    }

    #[test]
    fn test_config_invariants_surface() {
        let mut config = IntentsConfig::default();
        config.intents[1].priority = 3;
        assert!(matches!(
            IntentRegistry::from_config(&config),
            Err(TextProcessingError::Config(_))
        ));
    }

    #[test]
    fn test_duplicate_keywords_collapsed() {
        let mut config = IntentsConfig::default();
        config.intents[3].keywords.push("HELP".to_string());
        let registry = IntentRegistry::from_config(&config).unwrap();
        let help = registry.get(IntentTag::Help).unwrap();
        assert_eq!(help.keyword_texts().filter(|k| *k == "help").count(), 1);
    }
}
