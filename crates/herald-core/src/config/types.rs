//! Configuration types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::RepositoryContext;

/// Default note markers; all of them normalize to [`BREAKING_CHANGE_TITLE`]
pub const DEFAULT_NOTE_KEYWORDS: [&str; 2] = ["BREAKING CHANGE", "BREAKING CHANGES"];

/// Canonical title of every breaking-change note
pub const BREAKING_CHANGE_TITLE: &str = "BREAKING CHANGE";

/// Main configuration for Herald
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Changelog configuration
    pub changelog: ChangelogConfig,

    /// Where rendered links point to
    pub repository: RepositoryContext,
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Commit type to section mapping
    pub types: HashMap<String, CommitTypeConfig>,

    /// Paragraph markers that turn body text into a breaking-change note
    pub note_keywords: Vec<String>,

    /// Stop rendering at the last release boundary
    pub output_unreleased: bool,

    /// Whether to link commit hashes
    pub include_hashes: bool,

    /// Whether to render commit bodies under their bullet
    pub include_body: bool,

    /// Group commits of one section by scope, in order of first appearance
    pub group_by_scope: bool,

    /// Prefix prepended to a version to form its tag name
    pub tag_prefix: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        let types = [
            ("feat", "Features", 0, false),
            ("fix", "Bug Fixes", 1, false),
            ("perf", "Performance Improvements", 2, false),
            ("revert", "Reverts", 3, false),
            ("docs", "Documentation", 4, true),
            ("style", "Styles", 5, true),
            ("refactor", "Code Refactoring", 6, true),
            ("test", "Tests", 7, true),
            ("chore", "Chores", 8, true),
        ]
        .into_iter()
        .map(|(commit_type, section, order, hidden)| {
            (
                commit_type.to_string(),
                CommitTypeConfig {
                    section: section.to_string(),
                    order,
                    hidden,
                },
            )
        })
        .collect();

        Self {
            types,
            note_keywords: DEFAULT_NOTE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            output_unreleased: false,
            include_hashes: true,
            include_body: false,
            group_by_scope: false,
            tag_prefix: "v".to_string(),
        }
    }
}

impl ChangelogConfig {
    /// Look up the section mapping for a commit type
    pub fn type_config(&self, commit_type: &str) -> Option<&CommitTypeConfig> {
        self.types.get(commit_type)
    }

    /// Map a commit type to a section
    pub fn with_type(
        mut self,
        commit_type: impl Into<String>,
        section: impl Into<String>,
        order: u32,
    ) -> Self {
        self.types.insert(
            commit_type.into(),
            CommitTypeConfig {
                section: section.into(),
                order,
                hidden: false,
            },
        );
        self
    }

    /// Remove a commit type from the mapping entirely
    pub fn without_type(mut self, commit_type: &str) -> Self {
        self.types.remove(commit_type);
        self
    }
}

/// Configuration for a commit type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitTypeConfig {
    /// Section header in changelog
    pub section: String,
    /// Position of the section in the document
    pub order: u32,
    /// Hide this type unless a commit carries a breaking-change note
    #[serde(default)]
    pub hidden: bool,
}
