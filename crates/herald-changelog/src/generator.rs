//! Changelog generation

use std::collections::HashMap;
use std::io::Write;

use chrono::{DateTime, Utc};
use herald_core::config::{validate_changelog, validate_repository};
use herald_core::{ChangelogConfig, Config, RawCommit, ReleaseBoundary, RepositoryContext, Result};
use tracing::{debug, info, instrument, trace, warn};

use crate::bump::{BumpRecommender, Recommendation};
use crate::formatter::{ChangelogFormatter, MarkdownFormatter};
use crate::parser::{CommitParser, ConventionalParser, ParserConfig};
use crate::types::{BreakingChange, ChangelogEntry, ParsedCommit, Section};

/// Version shown when no version is supplied
pub const UNRELEASED: &str = "Unreleased";

/// Tag used for the current end of a compare link while unreleased
const HEAD_TAG: &str = "HEAD";

/// Per-run rendering options
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Version of the block; `Unreleased` when absent
    pub version: Option<String>,
    /// Release date; defaults to the newest rendered commit
    pub date: Option<DateTime<Utc>>,
    /// Tag of the previous release, overriding the boundary tag
    pub previous_tag: Option<String>,
    /// Last release boundary
    pub release_boundary: Option<ReleaseBoundary>,
}

impl RenderOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the release date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the previous release tag
    pub fn with_previous_tag(mut self, tag: impl Into<String>) -> Self {
        self.previous_tag = Some(tag.into());
        self
    }

    /// Set the last release boundary
    pub fn with_release_boundary(mut self, boundary: ReleaseBoundary) -> Self {
        self.release_boundary = Some(boundary);
        self
    }

    fn previous_tag(&self) -> Option<&str> {
        self.previous_tag
            .as_deref()
            .or_else(|| self.release_boundary.as_ref().map(|b| b.tag.as_str()))
    }
}

/// Changelog generator
///
/// Holds validated configuration; every method after construction is a
/// pure function of its input.
pub struct ChangelogGenerator {
    parser: Box<dyn CommitParser>,
    formatter: Box<dyn ChangelogFormatter>,
    recommender: BumpRecommender,
    config: ChangelogConfig,
    repository: RepositoryContext,
}

impl ChangelogGenerator {
    /// Create a generator, validating the configuration first
    pub fn new(config: ChangelogConfig, repository: RepositoryContext) -> Result<Self> {
        validate_changelog(&config)?;
        validate_repository(&repository)?;

        Ok(Self {
            parser: Box::new(ConventionalParser::with_config(ParserConfig::from_changelog(
                &config,
            ))),
            formatter: Box::new(MarkdownFormatter::with_repository(&repository)),
            recommender: BumpRecommender::new(),
            config,
            repository,
        })
    }

    /// Create a generator from a loaded configuration file
    pub fn from_config(config: Config) -> Result<Self> {
        Self::new(config.changelog, config.repository)
    }

    /// Use a custom parser
    pub fn with_parser<P: CommitParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Use a custom formatter
    pub fn with_formatter<F: ChangelogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Changelog configuration in use
    pub fn config(&self) -> &ChangelogConfig {
        &self.config
    }

    /// Repository context links are resolved against
    pub fn repository(&self) -> &RepositoryContext {
        &self.repository
    }

    /// File extension of the configured formatter
    pub fn extension(&self) -> &'static str {
        self.formatter.extension()
    }

    /// Parse every commit, keeping input order
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn parse_all(&self, commits: &[RawCommit]) -> Vec<ParsedCommit> {
        let parsed: Vec<ParsedCommit> = commits.iter().map(|c| self.parser.parse(c)).collect();
        debug!(
            typed = parsed.iter().filter(|c| c.is_typed()).count(),
            "commits parsed"
        );
        parsed
    }

    /// Commits that belong in the rendered block.
    ///
    /// With `output_unreleased` and a boundary, the window ends just before
    /// the first commit matching the boundary hash.
    fn unreleased_window<'a>(
        &self,
        commits: &'a [ParsedCommit],
        options: &RenderOptions,
    ) -> &'a [ParsedCommit] {
        if !self.config.output_unreleased {
            return commits;
        }
        let Some(boundary) = &options.release_boundary else {
            return commits;
        };

        match commits.iter().position(|c| boundary.matches(&c.hash)) {
            Some(end) => {
                debug!(tag = %boundary.tag, kept = end, "stopping at release boundary");
                &commits[..end]
            }
            None => {
                warn!(
                    tag = %boundary.tag,
                    hash = %boundary.commit_hash,
                    "release boundary not found in commits, rendering all of them"
                );
                commits
            }
        }
    }

    /// Group parsed commits into a changelog entry
    #[instrument(skip(self, commits, options), fields(commit_count = commits.len()))]
    pub fn classify(&self, commits: &[ParsedCommit], options: &RenderOptions) -> ChangelogEntry {
        let window = self.unreleased_window(commits, options);

        let version = options.version.as_deref().unwrap_or(UNRELEASED);
        let current_tag = if version == UNRELEASED {
            HEAD_TAG.to_string()
        } else {
            format!("{}{}", self.config.tag_prefix, version)
        };
        info!(version, commit_count = window.len(), "generating changelog entry");

        let mut entry = ChangelogEntry::new(version, current_tag);
        if let Some(date) = options.date.or_else(|| window.iter().map(|c| c.date).max()) {
            entry = entry.with_date(date);
        }
        if let Some(previous) = options.previous_tag() {
            entry = entry.with_previous_tag(previous);
        }

        let mut sections: Vec<Section> = Vec::new();
        let mut section_index: HashMap<String, usize> = HashMap::new();

        for commit in window {
            for note in &commit.notes {
                entry.add_breaking_change(BreakingChange {
                    scope: commit.display_scope().map(str::to_string),
                    text: note.text.clone(),
                    hash: commit.hash.clone(),
                });
            }

            let Some(commit_type) = commit.commit_type.as_deref() else {
                trace!(hash = %commit.short_hash, "untyped commit left out of sections");
                continue;
            };
            let Some(type_config) = self.config.type_config(commit_type) else {
                trace!(
                    hash = %commit.short_hash,
                    commit_type,
                    "unmapped type left out of sections"
                );
                continue;
            };
            if type_config.hidden && commit.notes.is_empty() {
                continue;
            }

            let index = *section_index
                .entry(type_config.section.clone())
                .or_insert_with(|| {
                    sections.push(Section::new(&type_config.section, type_config.order));
                    sections.len() - 1
                });
            sections[index].add_commit(commit.clone());
        }

        sections.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));

        for mut section in sections {
            if self.config.group_by_scope {
                section.commits = group_by_scope(section.commits);
            }
            entry.add_section(section);
        }

        debug!(
            section_count = entry.sections.len(),
            breaking_count = entry.breaking_changes.len(),
            "changelog sections built"
        );

        entry
    }

    /// Parse and classify raw commits
    pub fn generate(&self, commits: &[RawCommit], options: &RenderOptions) -> ChangelogEntry {
        let parsed = self.parse_all(commits);
        self.classify(&parsed, options)
    }

    /// Format a changelog entry to string
    pub fn format(&self, entry: &ChangelogEntry) -> String {
        self.formatter.format(entry, &self.config)
    }

    /// Generate and format in one step
    #[instrument(skip(self, commits, options), fields(commit_count = commits.len()))]
    pub fn render(&self, commits: &[RawCommit], options: &RenderOptions) -> String {
        let output = self.format(&self.generate(commits, options));
        debug!(output_len = output.len(), "changelog rendered");
        output
    }

    /// Classify and format commits that were parsed already
    pub fn render_parsed(&self, commits: &[ParsedCommit], options: &RenderOptions) -> String {
        self.format(&self.classify(commits, options))
    }

    /// Render into a writer
    pub fn render_to<W: Write>(
        &self,
        writer: &mut W,
        commits: &[RawCommit],
        options: &RenderOptions,
    ) -> Result<()> {
        let output = self.render(commits, options);
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Recommend a version bump for every supplied commit
    pub fn recommend(&self, commits: &[RawCommit]) -> Recommendation {
        self.recommender.recommend(&self.parse_all(commits))
    }
}

/// Stable grouping by scope, groups ordered by first appearance
fn group_by_scope(commits: Vec<ParsedCommit>) -> Vec<ParsedCommit> {
    let mut groups: Vec<(Option<String>, Vec<ParsedCommit>)> = Vec::new();

    for commit in commits {
        let scope = commit.display_scope().map(str::to_string);
        match groups.iter_mut().find(|(s, _)| *s == scope) {
            Some((_, group)) => group.push(commit),
            None => groups.push((scope, vec![commit])),
        }
    }

    groups.into_iter().flat_map(|(_, group)| group).collect()
}
