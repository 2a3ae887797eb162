//! Request and result types for article analysis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejection of a request before any remote call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("content must not be empty")]
    EmptyContent,
}

/// An article submitted for analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub title: String,
    pub content: String,
    pub source: String,
    pub author: String,
}

impl AnalyzeRequest {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: source.into(),
            author: author.into(),
        }
    }

    /// Reject requests whose content is empty or whitespace-only
    pub fn validate(&self) -> Result<(), InputError> {
        if self.content.trim().is_empty() {
            return Err(InputError::EmptyContent);
        }
        Ok(())
    }
}

/// Detected article language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    /// Parse an exact language code; anything else is `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "zh" => Some(Language::Zh),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated analysis of one article.
///
/// Values of this type are only produced by the sanitizer, so every field
/// already satisfies its bounds: `category` is a catalog slug, `confidence`
/// lies in `[0.0, 1.0]`, and `tags` and `key_points` hold 1 to 5 entries.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AnalyzeResult {
    /// Catalog slug
    pub category: String,
    /// Catalog display name for `category`
    pub category_name: String,
    /// Classification confidence in `[0.0, 1.0]`
    pub confidence: f64,
    /// Topic keywords, 1 to 5 entries
    pub tags: Vec<String>,
    /// Short summary, may be empty
    pub summary: String,
    /// Key takeaways, 1 to 5 entries
    pub key_points: Vec<String>,
    /// Primary article language
    pub language: Language,
}
