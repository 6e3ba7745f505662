//! Parser configuration and header types

use herald_core::config::{ChangelogConfig, DEFAULT_NOTE_KEYWORDS};

/// Configuration for the commit parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Note markers, longest first so `BREAKING CHANGES` wins over
    /// `BREAKING CHANGE`
    note_keywords: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::with_note_keywords(DEFAULT_NOTE_KEYWORDS)
    }
}

impl ParserConfig {
    /// Create a config recognizing the given note markers
    pub fn with_note_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut note_keywords: Vec<String> = keywords
            .into_iter()
            .map(Into::into)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        note_keywords.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        note_keywords.dedup();

        Self { note_keywords }
    }

    /// Build the parser configuration from changelog settings
    pub fn from_changelog(config: &ChangelogConfig) -> Self {
        Self::with_note_keywords(config.note_keywords.iter().cloned())
    }

    /// Recognized note markers
    pub fn note_keywords(&self) -> &[String] {
        &self.note_keywords
    }
}

/// Outcome of matching a header line against the commit grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderMatch {
    /// `type(scope): subject`
    Matched(Header),
    /// git's `Revert "<header>"`
    Revert(String),
    /// Anything else
    Unmatched,
}

/// Fields captured from a conventional header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Lowercased type
    pub commit_type: String,
    /// Scope between parentheses, if any
    pub scope: Option<String>,
    /// Text after `: `
    pub subject: String,
}
