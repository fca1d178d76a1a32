//! Intent Configuration
//!
//! Defines the intent registry: for each intent an ordered pattern list, a
//! keyword set, a priority rank and a fixed confidence boost, plus the
//! last-resort keyword table. The built-in table is used unless a YAML file
//! overrides it.
//!
//! Pattern order matters. For bidding the first pattern that matches an
//! utterance decides the amount, so earlier, more specific patterns shadow
//! later, looser ones. Do not reorder without re-running the classifier tests.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use voxta_core::IntentTag;

use crate::constants::classification::{
    MAX_CONFIDENCE_BOOST, MAX_PRIORITY, MIN_CONFIDENCE_BOOST, MIN_PRIORITY,
};
use crate::ConfigError;

/// Intents configuration, loaded from intents.yaml or built in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentsConfig {
    /// Intent definitions
    #[serde(default = "default_intents")]
    pub intents: Vec<IntentDefinition>,
    /// Literal keyword → intent table, checked in order
    #[serde(default = "default_keyword_fallback")]
    pub keyword_fallback: Vec<KeywordFallback>,
}

impl Default for IntentsConfig {
    fn default() -> Self {
        Self {
            intents: default_intents(),
            keyword_fallback: default_keyword_fallback(),
        }
    }
}

impl IntentsConfig {
    /// Load from a YAML file and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        tracing::info!(
            path = %path.display(),
            intents = config.intents.len(),
            "Loaded intent definitions"
        );
        Ok(config)
    }

    /// Get an intent definition by tag
    pub fn get(&self, tag: IntentTag) -> Option<&IntentDefinition> {
        self.intents.iter().find(|i| i.tag == tag)
    }

    /// Check the registry invariants
    ///
    /// - bidding is defined
    /// - no duplicate tags, `unknown` is not definable
    /// - priorities are unique and within 1..=6
    /// - keyword sets and pattern lists are non-empty
    /// - confidence boosts are within 0.10..=0.15
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut tags = HashSet::new();
        let mut priorities = HashSet::new();

        for intent in &self.intents {
            let field = |name: &str| format!("intents.{}.{}", intent.tag, name);

            if intent.tag.is_unknown() {
                return Err(ConfigError::InvalidValue {
                    field: "intents.tag".to_string(),
                    message: "'unknown' is the fallback and cannot be defined".to_string(),
                });
            }
            if !tags.insert(intent.tag) {
                return Err(ConfigError::InvalidValue {
                    field: field("tag"),
                    message: "Duplicate intent definition".to_string(),
                });
            }
            if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&intent.priority) {
                return Err(ConfigError::InvalidValue {
                    field: field("priority"),
                    message: format!(
                        "Must be between {} and {}, got {}",
                        MIN_PRIORITY, MAX_PRIORITY, intent.priority
                    ),
                });
            }
            if !priorities.insert(intent.priority) {
                return Err(ConfigError::InvalidValue {
                    field: field("priority"),
                    message: format!("Priority {} is already used", intent.priority),
                });
            }
            if intent.keywords.is_empty() {
                return Err(ConfigError::MissingField(field("keywords")));
            }
            if intent.patterns.is_empty() {
                return Err(ConfigError::MissingField(field("patterns")));
            }
            let boost_range = (MIN_CONFIDENCE_BOOST - f32::EPSILON)..=(MAX_CONFIDENCE_BOOST + f32::EPSILON);
            if !boost_range.contains(&intent.confidence_boost) {
                return Err(ConfigError::InvalidValue {
                    field: field("confidence_boost"),
                    message: format!(
                        "Must be between {} and {}, got {}",
                        MIN_CONFIDENCE_BOOST, MAX_CONFIDENCE_BOOST, intent.confidence_boost
                    ),
                });
            }
        }

        if !tags.contains(&IntentTag::Bidding) {
            return Err(ConfigError::MissingField("intents.bidding".to_string()));
        }

        for rule in &self.keyword_fallback {
            if rule.keyword.trim().is_empty() {
                return Err(ConfigError::MissingField("keyword_fallback.keyword".to_string()));
            }
            if !tags.contains(&rule.intent) {
                return Err(ConfigError::InvalidValue {
                    field: format!("keyword_fallback.{}", rule.keyword),
                    message: format!("Intent '{}' is not defined", rule.intent),
                });
            }
        }

        Ok(())
    }
}

/// Single intent definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDefinition {
    /// Intent tag
    pub tag: IntentTag,
    /// Structural match rules (regex source), tried in order
    pub patterns: Vec<String>,
    /// Keywords used for confidence scoring and fuzzy fallback
    pub keywords: Vec<String>,
    /// 1 (highest) to 6 (lowest)
    pub priority: u8,
    /// Fixed additive constant applied to any match of this intent
    pub confidence_boost: f32,
}

impl IntentDefinition {
    fn new(tag: IntentTag, patterns: &[&str], keywords: &[&str], priority: u8, boost: f32) -> Self {
        Self {
            tag,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            priority,
            confidence_boost: boost,
        }
    }
}

/// One row of the last-resort keyword table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordFallback {
    pub keyword: String,
    pub intent: IntentTag,
}

/// Amount group shared by the bidding patterns: integer with optional cents
const AMOUNT: &str = r"(?:[$]?)(\d+(?:\.\d{2})?)";

fn default_intents() -> Vec<IntentDefinition> {
    let bidding: Vec<String> = [
        // Direct commands
        r"(?:bid|place\s+(?:a\s+)?bid(?:\s+of)?)\s+{amount}",
        r"(?:offer|put\s+(?:in|up))\s+{amount}",
        r"{amount}\s+(?:dollars?|bucks?|usd)",
        r"go\s+{amount}",
        r"raise\s+(?:to\s+)?{amount}",
        r"increase\s+(?:to\s+)?{amount}",
        // Natural phrasing
        r"i\s+(?:want\s+to\s+|will\s+)?bid\s+{amount}",
        r"let\s+me\s+bid\s+{amount}",
        r"my\s+bid\s+is\s+{amount}",
        // Bare amounts and conversational forms
        r"{amount}(?:\s+(?:please|now|dollars?))?$",
        r"make\s+it\s+{amount}",
        r"(?:i\s+)?(?:ll\s+)?take\s+it\s+for\s+{amount}",
    ]
    .iter()
    .map(|p| p.replace("{amount}", AMOUNT))
    .collect();

    vec![
        IntentDefinition {
            tag: IntentTag::Bidding,
            patterns: bidding,
            keywords: ["bid", "offer", "place", "put", "raise", "increase", "dollars", "bucks", "take"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            priority: 1,
            confidence_boost: 0.15,
        },
        IntentDefinition::new(
            IntentTag::Listing,
            &[
                r"(?:list|show|display)\s+(?:all\s+)?(?:active\s+)?auctions?",
                r"what\s+auctions?\s+(?:are\s+)?(?:available|active)",
                r"show\s+me\s+(?:the\s+)?auctions?",
                r"available\s+auctions?",
                r"current\s+auctions?",
                r"auctions?\s+(?:list|available)",
                r"^auctions?$",
                r"what\s+(?:is|are)\s+(?:available|for\s+sale)",
                r"browse\s+(?:items|auctions?)",
            ],
            &["list", "show", "display", "auctions", "available", "current", "browse"],
            2,
            0.10,
        ),
        IntentDefinition::new(
            IntentTag::Status,
            &[
                r"(?:current|highest|latest)\s+bid",
                r"what\s+(?:is\s+)?(?:the\s+)?(?:current|highest)\s+bid",
                r"bid\s+status",
                r"how\s+much\s+(?:is\s+)?(?:the\s+)?(?:current\s+)?bid",
                r"price\s+(?:now|current)",
                r"status",
                r"what\s+(?:is\s+)?(?:the\s+)?price",
                r"how\s+much\s+(?:does\s+it\s+cost|is\s+it)",
            ],
            &["current", "highest", "bid", "status", "price", "much", "cost"],
            3,
            0.10,
        ),
        IntentDefinition::new(
            IntentTag::Help,
            &[
                r"help",
                r"what\s+can\s+(?:you\s+)?do",
                r"commands?",
                r"how\s+(?:do\s+i|to)",
                r"instructions?",
                r"guide",
                r"tutorial",
                r"explain",
            ],
            &["help", "commands", "instructions", "how", "guide", "explain"],
            4,
            0.15,
        ),
        IntentDefinition::new(
            IntentTag::Greeting,
            &[
                r"^(?:hello|hi|hey|start)$",
                r"good\s+(?:morning|afternoon|evening)",
                r"greetings?",
                r"howdy",
                r"what\s+up",
            ],
            &["hello", "hi", "hey", "start", "good", "greetings"],
            5,
            0.10,
        ),
        IntentDefinition::new(
            IntentTag::Insights,
            &[
                r"(?:analyze|analysis)\s+(?:market\s+)?trends?",
                r"market\s+insights?",
                r"recommend(?:ations?)?",
                r"suggest(?:ions?)?",
                r"insights?",
                r"analytics?",
                r"statistics?",
                r"data\s+analysis",
            ],
            &["analyze", "market", "insights", "recommend", "suggest", "analytics", "data"],
            6,
            0.10,
        ),
    ]
}

fn default_keyword_fallback() -> Vec<KeywordFallback> {
    [
        ("bid", IntentTag::Bidding),
        ("list", IntentTag::Listing),
        ("show", IntentTag::Listing),
        ("status", IntentTag::Status),
        ("help", IntentTag::Help),
        ("price", IntentTag::Status),
        ("current", IntentTag::Status),
        ("available", IntentTag::Listing),
        ("auctions", IntentTag::Listing),
        ("offer", IntentTag::Bidding),
        ("display", IntentTag::Listing),
        ("highest", IntentTag::Status),
        ("insights", IntentTag::Insights),
        ("hello", IntentTag::Greeting),
    ]
    .into_iter()
    .map(|(keyword, intent)| KeywordFallback {
        keyword: keyword.to_string(),
        intent,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_table_is_valid() {
        let config = IntentsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.intents.len(), 6);
        assert_eq!(config.keyword_fallback.len(), 14);
    }

    #[test]
    fn test_default_priorities_follow_registry_order() {
        let config = IntentsConfig::default();
        let priorities: Vec<u8> = config.intents.iter().map(|i| i.priority).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(config.get(IntentTag::Help).unwrap().confidence_boost, 0.15);
    }

    #[test]
    fn test_bidding_patterns_share_amount_group() {
        let config = IntentsConfig::default();
        let bidding = config.get(IntentTag::Bidding).unwrap();
        assert_eq!(bidding.patterns.len(), 12);
        assert!(bidding.patterns.iter().all(|p| p.contains(r"(\d+(?:\.\d{2})?)")));
    }

    #[test]
    fn test_duplicate_priority_rejected() {
        let mut config = IntentsConfig::default();
        config.intents[2].priority = 2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let mut config = IntentsConfig::default();
        config.intents[4].keywords.clear();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_missing_bidding_rejected() {
        let mut config = IntentsConfig::default();
        config.intents.retain(|i| i.tag != IntentTag::Bidding);
        config.keyword_fallback.retain(|k| k.intent != IntentTag::Bidding);
        assert!(matches!(config.validate(), Err(ConfigError::MissingField(_))));
    }

    #[test]
    fn test_boost_out_of_range_rejected() {
        let mut config = IntentsConfig::default();
        config.intents[1].confidence_boost = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = r#"
intents:
  - tag: bidding
    patterns: ['bid\s+(\d+)']
    keywords: [bid]
    priority: 1
    confidence_boost: 0.15
  - tag: help
    patterns: ['help']
    keywords: [help]
    priority: 2
    confidence_boost: 0.1
keyword_fallback:
  - keyword: bid
    intent: bidding
"#;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = IntentsConfig::load(file.path()).unwrap();
        assert_eq!(config.intents.len(), 2);
        assert_eq!(config.keyword_fallback.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let result = IntentsConfig::load("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
