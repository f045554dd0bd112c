//! Entry categories and eviction priorities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic category of a stored entry, derived from its key name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ApiKeys,
    UserSettings,
    ImageCache,
    SearchCache,
    Vocabulary,
    Session,
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::ApiKeys,
        Category::UserSettings,
        Category::ImageCache,
        Category::SearchCache,
        Category::Vocabulary,
        Category::Session,
        Category::Uncategorized,
    ];

    /// Wire name of the category
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::ApiKeys => "api-keys",
            Category::UserSettings => "user-settings",
            Category::ImageCache => "image-cache",
            Category::SearchCache => "search-cache",
            Category::Vocabulary => "vocabulary",
            Category::Session => "session",
            Category::Uncategorized => "uncategorized",
        }
    }

    /// Priority assigned to entries of this category unless overridden
    #[must_use]
    pub const fn default_priority(&self) -> Priority {
        match self {
            Category::ApiKeys | Category::UserSettings => Priority::Critical,
            Category::ImageCache | Category::SearchCache => Priority::Low,
            Category::Vocabulary | Category::Session | Category::Uncategorized => {
                Priority::Normal
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Eviction priority; critical entries are the last to go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Normal,
    Low,
}

impl Priority {
    /// Eviction order: lower ranks are evicted first
    #[must_use]
    pub const fn eviction_rank(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Normal => 1,
            Priority::Critical => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Critical => "critical",
            Priority::Normal => "normal",
            Priority::Low => "low",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Priority::Critical),
            "normal" => Ok(Priority::Normal),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// A key-name glob mapped to a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Glob pattern (`*` and `?` wildcards), matched case-insensitively
    pub pattern: String,
    pub category: Category,
}

impl CategoryRule {
    pub fn new(pattern: impl Into<String>, category: Category) -> Self {
        Self {
            pattern: pattern.into(),
            category,
        }
    }
}
