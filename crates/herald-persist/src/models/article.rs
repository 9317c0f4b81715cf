use serde::{Deserialize, Serialize};
use std::fmt;

/// Topic bucket every article belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Finance,
    #[serde(rename = "Global Affairs")]
    GlobalAffairs,
    Science,
    Health,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Technology,
        Category::Finance,
        Category::GlobalAffairs,
        Category::Science,
        Category::Health,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Finance => "Finance",
            Category::GlobalAffairs => "Global Affairs",
            Category::Science => "Science",
            Category::Health => "Health",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored news article. Never mutated; the collection is replaced wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub url: String,
    /// ISO-8601 date or timestamp, kept as provided
    pub published_at: String,
    pub source: String,
    pub category: Category,
}
