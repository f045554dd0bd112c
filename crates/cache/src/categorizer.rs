//! Key-name categorization
//!
//! Keys are matched against case-insensitive glob rules. Configured rules are
//! tried before the built-in table and the first match wins.

use regex::Regex;
use tabstore_core::{Category, CategoryRule, Error, Priority, Result};

const DEFAULT_RULES: &[(&str, Category)] = &[
    ("*api-key*", Category::ApiKeys),
    ("*api_key*", Category::ApiKeys),
    ("*apikey*", Category::ApiKeys),
    ("*settings*", Category::UserSettings),
    ("*preferences*", Category::UserSettings),
    ("*image-cache*", Category::ImageCache),
    ("*image_cache*", Category::ImageCache),
    ("*img-cache*", Category::ImageCache),
    ("*generated-image*", Category::ImageCache),
    ("*search-cache*", Category::SearchCache),
    ("*search_cache*", Category::SearchCache),
    ("*search-results*", Category::SearchCache),
    ("*vocabulary*", Category::Vocabulary),
    ("*vocab*", Category::Vocabulary),
    ("*session*", Category::Session),
];

/// Maps key names to a category and its default priority
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<(Regex, Category)>,
}

impl Categorizer {
    /// Compile `extra` rules ahead of the built-in ones
    pub fn new(extra: &[CategoryRule]) -> Result<Self> {
        let mut rules = Vec::with_capacity(extra.len() + DEFAULT_RULES.len());
        for rule in extra {
            rules.push((compile_glob(&rule.pattern)?, rule.category));
        }
        for (pattern, category) in DEFAULT_RULES {
            rules.push((compile_glob(pattern)?, *category));
        }
        Ok(Self { rules })
    }

    pub fn category(&self, key: &str) -> Category {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(key))
            .map_or(Category::Uncategorized, |(_, category)| *category)
    }

    pub fn categorize(&self, key: &str) -> (Category, Priority) {
        let category = self.category(key);
        (category, category.default_priority())
    }
}

/// Convert a glob (`*` and `?` wildcards) to an anchored, case-insensitive regex
pub fn compile_glob(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    Regex::new(&format!("(?i)^{escaped}$"))
        .map_err(|e| Error::configuration(format!("invalid key pattern '{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Categorizer {
        Categorizer::new(&[]).unwrap()
    }

    #[test]
    fn test_default_table() {
        let categorizer = defaults();
        let cases = [
            ("openai-api-key", Category::ApiKeys, Priority::Critical),
            ("USER_SETTINGS", Category::UserSettings, Priority::Critical),
            ("app-preferences", Category::UserSettings, Priority::Critical),
            ("generated-image-17", Category::ImageCache, Priority::Low),
            ("image-cache-3", Category::ImageCache, Priority::Low),
            ("search-results:cats", Category::SearchCache, Priority::Low),
            ("vocab-deck", Category::Vocabulary, Priority::Normal),
            ("session-token", Category::Session, Priority::Normal),
            ("random", Category::Uncategorized, Priority::Normal),
        ];

        for (key, category, priority) in cases {
            assert_eq!(categorizer.categorize(key), (category, priority), "{key}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        // Matches both the settings and the session globs
        assert_eq!(defaults().category("session-settings"), Category::UserSettings);
    }

    #[test]
    fn test_configured_rules_take_precedence() {
        let categorizer =
            Categorizer::new(&[CategoryRule::new("thumb-?", Category::ImageCache)]).unwrap();

        assert_eq!(categorizer.category("thumb-1"), Category::ImageCache);
        assert_eq!(categorizer.category("thumb-10"), Category::Uncategorized);
    }

    #[test]
    fn test_glob_escapes_regex_syntax() {
        let regex = compile_glob("cache.(v1)*").unwrap();
        assert!(regex.is_match("CACHE.(V1)-entries"));
        assert!(!regex.is_match("cacheX(v1)"));
    }
}
