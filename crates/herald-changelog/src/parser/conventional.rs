//! Conventional Commits parser
//!
//! Parses commits following the Conventional Commits header grammar
//! (`type(scope): subject`) with breaking-change notes in the body.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use herald_core::config::BREAKING_CHANGE_TITLE;
use herald_core::RawCommit;
use tracing::trace;

use super::{CommitParser, Header, HeaderMatch, ParserConfig};
use crate::references::scan;
use crate::types::{Note, ParsedCommit, Reference, ReferenceSource, RevertInfo};

/// Regex for parsing conventional commit headers
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^()\r\n]*)\))?: (?P<subject>.+)$")
        .expect("Invalid regex")
});

/// Regex for git's default revert header
static REVERT_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^Revert "(?P<header>.+)"\s*$"#).expect("Invalid regex"));

/// Regex for the hash line git adds to revert bodies
static REVERT_BODY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^This reverts commit (?P<hash>[0-9a-fA-F]{4,64})\b").expect("Invalid regex")
});

/// Parser for Conventional Commits format
pub struct ConventionalParser {
    config: ParserConfig,
}

impl ConventionalParser {
    /// Create a new parser with default configuration
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Match one header line against the grammar
    pub fn parse_header(&self, line: &str) -> HeaderMatch {
        let line = line.trim_end();

        if let Some(caps) = REVERT_HEADER_REGEX.captures(line) {
            if let Some(header) = caps.name("header") {
                return HeaderMatch::Revert(header.as_str().to_string());
            }
        }

        let Some(caps) = HEADER_REGEX.captures(line) else {
            return HeaderMatch::Unmatched;
        };

        let (Some(commit_type), Some(subject)) = (caps.name("type"), caps.name("subject")) else {
            return HeaderMatch::Unmatched;
        };

        let subject = subject.as_str().trim();
        if subject.is_empty() {
            return HeaderMatch::Unmatched;
        }

        HeaderMatch::Matched(Header {
            commit_type: commit_type.as_str().to_ascii_lowercase(),
            scope: caps
                .name("scope")
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
            subject: subject.to_string(),
        })
    }

    /// Parse a full commit message
    fn parse_message(&self, message: &str) -> ParsedMessage {
        let mut lines = message.lines();
        let first_line = lines.next().unwrap_or_default();
        let rest: Vec<&str> = lines.collect();

        let (commit_type, scope, subject, reverted_header) = match self.parse_header(first_line) {
            HeaderMatch::Matched(header) => {
                (Some(header.commit_type), header.scope, header.subject, None)
            }
            HeaderMatch::Revert(inner) => {
                (Some("revert".to_string()), None, inner.clone(), Some(inner))
            }
            HeaderMatch::Unmatched => (None, None, first_line.trim_end().to_string(), None),
        };

        let (body, notes) = self.parse_body(&rest);

        let revert = if commit_type.as_deref() == Some("revert") {
            let hash = body
                .as_deref()
                .and_then(|b| REVERT_BODY_REGEX.captures(b))
                .and_then(|caps| caps.name("hash"))
                .map(|m| m.as_str().to_string());
            Some(RevertInfo {
                header: reverted_header.unwrap_or_else(|| subject.clone()),
                hash,
            })
        } else {
            None
        };

        let references = collect_references(&subject, body.as_deref(), &notes);

        ParsedMessage {
            commit_type,
            scope,
            subject,
            body,
            notes,
            references,
            revert,
        }
    }

    /// Split the lines after the header into body text and notes.
    ///
    /// A line starting with a note marker opens a note that runs to the end
    /// of its paragraph. Everything else is body; the blank line left where a
    /// note paragraph was cut out is not doubled.
    fn parse_body(&self, lines: &[&str]) -> (Option<String>, Vec<Note>) {
        let mut body_lines: Vec<&str> = Vec::new();
        let mut notes: Vec<Note> = Vec::new();
        let mut current: Option<String> = None;

        for &line in lines {
            if let Some(text) = self.match_note(line) {
                if let Some(done) = current.take() {
                    notes.push(finish_note(done));
                }
                current = Some(text.to_string());
            } else if let Some(note) = current.as_mut() {
                if line.trim().is_empty() {
                    if let Some(done) = current.take() {
                        notes.push(finish_note(done));
                    }
                    if body_lines.last().is_some_and(|l| !l.trim().is_empty()) {
                        body_lines.push(line);
                    }
                } else {
                    note.push('\n');
                    note.push_str(line.trim());
                }
            } else {
                body_lines.push(line);
            }
        }

        if let Some(done) = current.take() {
            notes.push(finish_note(done));
        }

        let body = body_lines.join("\n").trim().to_string();
        let body = if body.is_empty() { None } else { Some(body) };

        (body, notes)
    }

    /// Return the note text if `line` opens a note.
    ///
    /// The marker may sit behind a bullet or quote (`*`, `|`) and must be
    /// followed by a colon or whitespace.
    fn match_note<'a>(&self, line: &'a str) -> Option<&'a str> {
        let line = line.trim_start_matches(|c: char| c.is_whitespace() || c == '*' || c == '|');
        self.config.note_keywords().iter().find_map(|keyword| {
            let rest = line.strip_prefix(keyword.as_str())?;
            let text = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
            (text.len() < rest.len()).then(|| text.trim_end())
        })
    }
}

impl Default for ConventionalParser {
    fn default() -> Self {
        Self::new()
    }
}

struct ParsedMessage {
    commit_type: Option<String>,
    scope: Option<String>,
    subject: String,
    body: Option<String>,
    notes: Vec<Note>,
    references: Vec<Reference>,
    revert: Option<RevertInfo>,
}

fn finish_note(text: String) -> Note {
    Note {
        title: BREAKING_CHANGE_TITLE.to_string(),
        text: text.trim().to_string(),
    }
}

/// Scan subject, body and notes in that order, keeping the first sighting
/// of every token
fn collect_references(subject: &str, body: Option<&str>, notes: &[Note]) -> Vec<Reference> {
    let mut seen = HashSet::new();
    let mut references = Vec::new();

    let sources = std::iter::once((ReferenceSource::Subject, subject))
        .chain(body.map(|b| (ReferenceSource::Body, b)))
        .chain(notes.iter().map(|n| (ReferenceSource::Note, n.text.as_str())));

    for (source, text) in sources {
        for found in scan(text) {
            if seen.insert((found.kind, found.token.clone())) {
                references.push(Reference {
                    kind: found.kind,
                    token: found.token,
                    source,
                    offset: found.start,
                });
            }
        }
    }

    references
}

impl CommitParser for ConventionalParser {
    fn parse(&self, commit: &RawCommit) -> ParsedCommit {
        let parsed = self.parse_message(&commit.message);

        if parsed.commit_type.is_none() {
            trace!(hash = %commit.short_hash, "header outside commit grammar, keeping as untyped");
        }

        ParsedCommit {
            hash: commit.hash.clone(),
            short_hash: commit.short_hash.clone(),
            commit_type: parsed.commit_type,
            scope: parsed.scope,
            subject: parsed.subject,
            body: parsed.body,
            notes: parsed.notes,
            references: parsed.references,
            revert: parsed.revert,
            date: commit.date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReferenceKind;
    use chrono::{TimeZone, Utc};

    fn make_commit(message: &str) -> RawCommit {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        RawCommit::new("abc1234567890", message, date)
    }

    fn parse(message: &str) -> ParsedCommit {
        ConventionalParser::new().parse(&make_commit(message))
    }

    #[test]
    fn test_parse_simple_feat() {
        let parsed = parse("feat: add new feature");

        assert_eq!(parsed.commit_type.as_deref(), Some("feat"));
        assert_eq!(parsed.subject, "add new feature");
        assert!(parsed.scope.is_none());
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_parse_with_scope() {
        let parsed = parse("fix(compile): avoid a bug");

        assert_eq!(parsed.commit_type.as_deref(), Some("fix"));
        assert_eq!(parsed.scope.as_deref(), Some("compile"));
        assert_eq!(parsed.subject, "avoid a bug");
    }

    #[test]
    fn test_type_is_lowercased() {
        let parsed = parse("Feat(UI): shout");
        assert_eq!(parsed.commit_type.as_deref(), Some("feat"));
        assert_eq!(parsed.scope.as_deref(), Some("UI"));
    }

    #[test]
    fn test_star_scope_is_kept_but_not_displayed() {
        let parsed = parse("fix(*): oops");
        assert_eq!(parsed.scope.as_deref(), Some("*"));
        assert_eq!(parsed.display_scope(), None);
    }

    #[test]
    fn test_parse_non_conventional() {
        let parsed = parse("Just a regular commit message\n\nwith body");

        assert!(parsed.commit_type.is_none());
        assert_eq!(parsed.subject, "Just a regular commit message");
        assert_eq!(parsed.body.as_deref(), Some("with body"));
    }

    #[test]
    fn test_missing_space_after_colon_is_untyped() {
        let parsed = parse("feat:no space");
        assert!(parsed.commit_type.is_none());
        assert_eq!(parsed.subject, "feat:no space");
    }

    #[test]
    fn test_empty_subject_is_untyped() {
        assert!(parse("feat:   ").commit_type.is_none());
    }

    #[test]
    fn test_breaking_change_note() {
        let parsed = parse("feat: amazing new module\n\nBREAKING CHANGE: Not backward compatible.");

        assert_eq!(parsed.notes.len(), 1);
        assert_eq!(parsed.notes[0].title, "BREAKING CHANGE");
        assert_eq!(parsed.notes[0].text, "Not backward compatible.");
        assert!(parsed.body.is_none());
        assert!(parsed.is_major());
    }

    #[test]
    fn test_breaking_changes_synonym() {
        let parsed = parse("feat(deps): bump\n\nBREAKING CHANGES: Also works :)");

        assert_eq!(parsed.notes.len(), 1);
        assert_eq!(parsed.notes[0].title, "BREAKING CHANGE");
        assert_eq!(parsed.notes[0].text, "Also works :)");
    }

    #[test]
    fn test_note_spans_its_paragraph() {
        let parsed = parse(
            "refactor(api): rename\n\nSome context.\n\nBREAKING CHANGE: old names\nare gone.\n\nTrailing body.",
        );

        assert_eq!(parsed.notes[0].text, "old names\nare gone.");
        assert_eq!(
            parsed.body.as_deref(),
            Some("Some context.\n\nTrailing body.")
        );
    }

    #[test]
    fn test_note_text_on_following_line() {
        let parsed = parse("fix: x\n\nBREAKING CHANGE:\nexplained here");
        assert_eq!(parsed.notes[0].text, "explained here");
    }

    #[test]
    fn test_custom_note_keywords() {
        let parser =
            ConventionalParser::with_config(ParserConfig::with_note_keywords(["DEPRECATED"]));
        let parsed = parser.parse(&make_commit(
            "feat: x\n\nDEPRECATED: use y\n\nBREAKING CHANGE: not a marker here",
        ));

        assert_eq!(parsed.notes.len(), 1);
        assert_eq!(parsed.notes[0].title, "BREAKING CHANGE");
        assert_eq!(parsed.notes[0].text, "use y");
        assert_eq!(
            parsed.body.as_deref(),
            Some("BREAKING CHANGE: not a marker here")
        );
    }

    #[test]
    fn test_leading_note_paragraph_leaves_no_gap() {
        let parsed = parse("fix: x\n\nBREAKING CHANGE: gone\n\nMore detail.");

        assert_eq!(parsed.notes[0].text, "gone");
        assert_eq!(parsed.body.as_deref(), Some("More detail."));
    }

    #[test]
    fn test_note_marker_followed_by_whitespace() {
        let parsed = parse("feat: x\n\nBREAKING CHANGE The API changed");

        assert_eq!(parsed.notes.len(), 1);
        assert_eq!(parsed.notes[0].text, "The API changed");
        assert!(parsed.body.is_none());
    }

    #[test]
    fn test_bulleted_note_marker() {
        let parsed = parse("fix: x\n\n* BREAKING CHANGE: bulleted");

        assert_eq!(parsed.notes.len(), 1);
        assert_eq!(parsed.notes[0].text, "bulleted");
    }

    #[test]
    fn test_marker_glued_to_a_word_is_body() {
        let parsed = parse("fix: x\n\nBREAKING CHANGEs were avoided");

        assert!(parsed.notes.is_empty());
        assert_eq!(parsed.body.as_deref(), Some("BREAKING CHANGEs were avoided"));
    }

    #[test]
    fn test_bang_header_is_untyped() {
        let parsed = parse("feat!: drop api");

        assert!(parsed.commit_type.is_none());
        assert_eq!(parsed.subject, "feat!: drop api");
        assert!(parsed.notes.is_empty());
        assert!(!parsed.is_major());
    }

    #[test]
    fn test_untyped_commit_keeps_notes() {
        let parsed = parse("Rework storage\n\nBREAKING CHANGE: data dir moved");
        assert!(parsed.commit_type.is_none());
        assert_eq!(parsed.notes.len(), 1);
    }

    #[test]
    fn test_revert_type() {
        let parsed = parse("revert(ngOptions): bad commit");
        assert_eq!(parsed.commit_type.as_deref(), Some("revert"));
        assert_eq!(parsed.scope.as_deref(), Some("ngOptions"));
        let revert = parsed.revert.unwrap();
        assert_eq!(revert.header, "bad commit");
        assert!(revert.hash.is_none());
    }

    #[test]
    fn test_git_revert_header() {
        let parsed = parse(
            "Revert \"feat(auth): add login\"\n\nThis reverts commit 1234567890abcdef1234567890abcdef12345678.",
        );

        assert_eq!(parsed.commit_type.as_deref(), Some("revert"));
        assert_eq!(parsed.subject, "feat(auth): add login");
        let revert = parsed.revert.unwrap();
        assert_eq!(revert.header, "feat(auth): add login");
        assert_eq!(
            revert.hash.as_deref(),
            Some("1234567890abcdef1234567890abcdef12345678")
        );
    }

    #[test]
    fn test_references_from_body() {
        let parsed = parse("perf(ngOptions): make it faster\n\n closes #1, #2");

        assert_eq!(parsed.body.as_deref(), Some("closes #1, #2"));
        let tokens: Vec<_> = parsed.references.iter().map(|r| r.to_string()).collect();
        assert_eq!(tokens, vec!["#1", "#2"]);
        assert!(parsed
            .references
            .iter()
            .all(|r| r.source == ReferenceSource::Body));
    }

    #[test]
    fn test_references_deduplicated_with_subject_first() {
        let parsed = parse("feat(awesome): fix #88\n\nAlso see #88 and #89.");

        assert_eq!(parsed.references.len(), 2);
        assert_eq!(parsed.references[0].token, "88");
        assert_eq!(parsed.references[0].source, ReferenceSource::Subject);
        assert_eq!(parsed.references[0].offset, 4);
        let closed: Vec<_> = parsed.closed_references().map(|r| r.token.as_str()).collect();
        assert_eq!(closed, vec!["89"]);
    }

    #[test]
    fn test_mentions_and_notes_scanned() {
        let parsed = parse(
            "feat(*): implementing #5 by @dlmr\n\n closes #10\n\nBREAKING CHANGE: ask @bcoe about #10",
        );

        let kinds: Vec<_> = parsed
            .references
            .iter()
            .map(|r| (r.kind, r.token.as_str(), r.source))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ReferenceKind::Issue, "5", ReferenceSource::Subject),
                (ReferenceKind::Mention, "dlmr", ReferenceSource::Subject),
                (ReferenceKind::Issue, "10", ReferenceSource::Body),
                (ReferenceKind::Mention, "bcoe", ReferenceSource::Note),
            ]
        );
    }

    #[test]
    fn test_numeric_mention_is_not_a_reference() {
        let parsed = parse("fix: use npm@5 (@username)");
        let tokens: Vec<_> = parsed.references.iter().map(|r| r.to_string()).collect();
        assert_eq!(tokens, vec!["@username"]);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let message = "feat(a)!: b #1\n\nbody @c\n\nBREAKING CHANGE: d";
        assert_eq!(parse(message), parse(message));
    }

    #[test]
    fn test_crlf_header() {
        let parsed = parse("fix(io): windows\r\n\r\nbody");
        assert_eq!(parsed.subject, "windows");
        assert_eq!(parsed.body.as_deref(), Some("body"));
    }
}
