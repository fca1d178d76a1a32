//! Last-resort keyword table

use voxta_core::IntentTag;

use super::registry::IntentRegistry;

/// First table keyword contained in normalized `text`
pub fn keyword_lookup(registry: &IntentRegistry, text: &str) -> Option<IntentTag> {
    registry
        .keyword_fallback()
        .iter()
        .find(|rule| text.contains(rule.keyword.as_str()))
        .map(|rule| rule.intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_decides() {
        let registry = IntentRegistry::builtin().unwrap();
        assert_eq!(keyword_lookup(&registry, "bid"), Some(IntentTag::Bidding));
        // substring, not whole word
        assert_eq!(keyword_lookup(&registry, "showcase"), Some(IntentTag::Listing));
        // "price" (status) is checked before "offer" (bidding)
        assert_eq!(
            keyword_lookup(&registry, "offer a price"),
            Some(IntentTag::Status)
        );
        assert_eq!(keyword_lookup(&registry, "insights please"), Some(IntentTag::Insights));
    }

    #[test]
    fn test_no_keyword() {
        let registry = IntentRegistry::builtin().unwrap();
        assert_eq!(keyword_lookup(&registry, "purple elephant"), None);
    }
}
