//! Changelog types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parsed commit
///
/// Commits whose header does not follow `type(scope): subject` are still
/// represented, with `commit_type` set to `None` and the raw first line as
/// subject. They never populate a section but their notes still count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommit {
    /// Original commit hash
    pub hash: String,
    /// Abbreviated hash
    pub short_hash: String,
    /// Commit type (feat, fix, etc.), lowercased
    pub commit_type: Option<String>,
    /// Scope (optional, in parentheses)
    pub scope: Option<String>,
    /// Header text after type and scope
    pub subject: String,
    /// Free text after the header that is not a note
    pub body: Option<String>,
    /// Breaking-change notes, in message order
    pub notes: Vec<Note>,
    /// Issue and mention tokens, deduplicated, in encounter order
    pub references: Vec<Reference>,
    /// Set when this commit reverts another one
    pub revert: Option<RevertInfo>,
    /// Author date
    pub date: DateTime<Utc>,
}

impl ParsedCommit {
    /// Whether the header matched the commit grammar
    pub fn is_typed(&self) -> bool {
        self.commit_type.is_some()
    }

    /// Scope as shown in the changelog; `*` and blank scopes show nothing
    pub fn display_scope(&self) -> Option<&str> {
        self.scope
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && *s != "*")
    }

    /// Check if this commit triggers a major version bump
    pub fn is_major(&self) -> bool {
        !self.notes.is_empty()
    }

    /// Check if this commit triggers a minor version bump
    pub fn is_minor(&self) -> bool {
        self.commit_type.as_deref() == Some("feat")
    }

    /// Check if this commit triggers a patch version bump
    pub fn is_patch(&self) -> bool {
        matches!(self.commit_type.as_deref(), Some("fix" | "perf"))
    }

    /// References first seen outside the subject, for the `closes` list.
    ///
    /// Tokens named in the subject are already linked inline, so they are
    /// left out here to avoid linking the same token twice on one line.
    pub fn closed_references(&self) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(|r| r.source != ReferenceSource::Subject)
    }
}

/// A breaking-change note from a commit body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Canonical marker, always `BREAKING CHANGE`
    pub title: String,
    /// Note text, without the marker
    pub text: String,
}

/// What kind of token a reference is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `#123`
    Issue,
    /// `@user`
    Mention,
}

/// Which part of the message a reference was first seen in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceSource {
    /// Header subject
    Subject,
    /// Body text
    Body,
    /// Breaking-change note text
    Note,
}

/// An issue or mention token found in a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Token kind
    pub kind: ReferenceKind,
    /// Token without its sigil (`123`, `bcoe`)
    pub token: String,
    /// Where the token was first seen
    pub source: ReferenceSource,
    /// Byte offset of the sigil within that source
    pub offset: usize,
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ReferenceKind::Issue => write!(f, "#{}", self.token),
            ReferenceKind::Mention => write!(f, "@{}", self.token),
        }
    }
}

/// The commit a revert undoes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertInfo {
    /// Header of the reverted commit
    pub header: String,
    /// Hash of the reverted commit, when the body names it
    pub hash: Option<String>,
}

/// A section in a changelog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section title
    pub title: String,
    /// Display position
    pub order: u32,
    /// Commits in this section
    pub commits: Vec<ParsedCommit>,
}

impl Section {
    /// Create a new section
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        Self {
            title: title.into(),
            order,
            commits: Vec::new(),
        }
    }

    /// Add a commit to the section
    pub fn add_commit(&mut self, commit: ParsedCommit) {
        self.commits.push(commit);
    }

    /// Check if section is empty
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// One entry of the breaking-changes block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakingChange {
    /// Display scope of the owning commit
    pub scope: Option<String>,
    /// Note text
    pub text: String,
    /// Hash of the owning commit
    pub hash: String,
}

/// A changelog entry for one release block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Version string
    pub version: String,
    /// Release date
    pub date: Option<DateTime<Utc>>,
    /// Tag of the previous release, used for the compare link
    pub previous_tag: Option<String>,
    /// Tag of this release (`HEAD` when unreleased)
    pub current_tag: String,
    /// Sections in display order
    pub sections: Vec<Section>,
    /// Breaking changes (highlighted separately)
    pub breaking_changes: Vec<BreakingChange>,
}

impl ChangelogEntry {
    /// Create a new changelog entry
    pub fn new(version: impl Into<String>, current_tag: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: None,
            previous_tag: None,
            current_tag: current_tag.into(),
            sections: Vec::new(),
            breaking_changes: Vec::new(),
        }
    }

    /// Set the date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the previous release tag
    pub fn with_previous_tag(mut self, tag: impl Into<String>) -> Self {
        self.previous_tag = Some(tag.into());
        self
    }

    /// Add a section
    pub fn add_section(&mut self, section: Section) {
        if !section.is_empty() {
            self.sections.push(section);
        }
    }

    /// Add a breaking change
    pub fn add_breaking_change(&mut self, change: BreakingChange) {
        self.breaking_changes.push(change);
    }

    /// Check if entry has any content
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.breaking_changes.is_empty()
    }
}
