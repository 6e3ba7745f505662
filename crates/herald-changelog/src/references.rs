//! Issue and mention token grammar
//!
//! Tokens must stand alone: a `#` or `@` glued to a word, a URL path, an
//! HTML entity or another sigil is left alone, so `npm@5`, `a@b.com`,
//! `https://x/#1` and `&#38;` never become references.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::ReferenceKind;

/// `#<digits>` preceded by start of text or a non-token character
static ISSUE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w/&#@`])#(?P<id>\d+)\b").expect("Invalid regex")
});

/// `@<name>` preceded by start of text or a non-token character
static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w/&#@`])@(?P<user>[A-Za-z0-9](?:-?[A-Za-z0-9]){0,38})")
        .expect("Invalid regex")
});

/// A token located in a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch {
    /// Token kind
    pub kind: ReferenceKind,
    /// Token without its sigil
    pub token: String,
    /// Byte offset of the sigil
    pub start: usize,
    /// Byte offset just past the token
    pub end: usize,
}

/// Whether `name` is a plausible username: the exact mention grammar, with
/// at least one letter so bare numbers like `@5` never qualify.
pub fn is_username(name: &str) -> bool {
    let bytes = name.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= 39
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-')
        && bytes[0] != b'-'
        && bytes[bytes.len() - 1] != b'-'
        && !name.contains("--")
        && bytes.iter().any(u8::is_ascii_alphabetic)
}

/// Find every standalone issue and mention token, ordered by position
pub fn scan(text: &str) -> Vec<TokenMatch> {
    let mut matches: Vec<TokenMatch> = ISSUE_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.name("id"))
        .map(|id| TokenMatch {
            kind: ReferenceKind::Issue,
            token: id.as_str().to_string(),
            start: id.start() - 1,
            end: id.end(),
        })
        .collect();

    matches.extend(
        MENTION_REGEX
            .captures_iter(text)
            .filter_map(|caps| caps.name("user"))
            .filter(|user| mention_ends_cleanly(text, user.end()))
            .filter(|user| is_username(user.as_str()))
            .map(|user| TokenMatch {
                kind: ReferenceKind::Mention,
                token: user.as_str().to_string(),
                start: user.start() - 1,
                end: user.end(),
            }),
    );

    matches.sort_by_key(|m| m.start);
    matches
}

/// A mention is cut short if more name characters follow (over-long or
/// underscored names) or if it continues as `@org/team`.
fn mention_ends_cleanly(text: &str, end: usize) -> bool {
    match text[end..].chars().next() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_' || c == '/'),
    }
}
