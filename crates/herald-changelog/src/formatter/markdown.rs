//! Markdown changelog formatter

use herald_core::{ChangelogConfig, RepositoryContext};
use tracing::{debug, instrument};

use super::ChangelogFormatter;
use crate::links::LinkResolver;
use crate::types::{BreakingChange, ChangelogEntry, ParsedCommit, ReferenceKind, Section};

/// Markdown changelog formatter
///
/// Produces one release block: an anchor and version header, one `###`
/// section per non-empty section, and a trailing `### BREAKING CHANGES`
/// block. Blocks are separated by a blank line.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    resolver: LinkResolver,
}

impl MarkdownFormatter {
    /// Create a formatter whose links point at the unknown host
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter linking against a repository
    pub fn with_repository(context: &RepositoryContext) -> Self {
        Self {
            resolver: LinkResolver::new(context),
        }
    }

    fn format_header(&self, entry: &ChangelogEntry) -> String {
        let mut header = format!("<a name=\"{}\"></a>\n## ", entry.version);

        match &entry.previous_tag {
            Some(previous) => header.push_str(&format!(
                "[{}]({})",
                entry.version,
                self.resolver.compare_url(previous, &entry.current_tag)
            )),
            None => header.push_str(&entry.version),
        }

        if let Some(date) = entry.date {
            header.push_str(&format!(" ({})", date.format("%Y-%m-%d")));
        }

        header
    }

    fn format_section(&self, section: &Section, config: &ChangelogConfig) -> String {
        let lines: Vec<String> = section
            .commits
            .iter()
            .map(|commit| self.format_commit(commit, config))
            .collect();

        format!("### {}\n\n{}", section.title, lines.join("\n"))
    }

    fn format_commit(&self, commit: &ParsedCommit, config: &ChangelogConfig) -> String {
        let mut line = String::from("* ");

        if let Some(scope) = commit.display_scope() {
            line.push_str(&format!("**{}:** ", scope));
        }
        line.push_str(&self.resolver.linkify(&commit.subject));

        if config.include_hashes {
            line.push_str(&format!(
                " ({})",
                self.resolver.commit_link(&commit.hash, &commit.short_hash)
            ));
        }

        let closes: Vec<String> = commit
            .closed_references()
            .map(|reference| match reference.kind {
                ReferenceKind::Issue => self.resolver.resolve_issue(&reference.token),
                ReferenceKind::Mention => self.resolver.resolve_mention(&reference.token),
            })
            .collect();
        if !closes.is_empty() {
            line.push_str(", closes ");
            line.push_str(&closes.join(" "));
        }

        if config.include_body {
            if let Some(body) = &commit.body {
                for body_line in self.resolver.linkify(body).lines() {
                    line.push('\n');
                    if !body_line.trim().is_empty() {
                        line.push_str("  ");
                        line.push_str(body_line);
                    }
                }
            }
        }

        line
    }

    fn format_breaking(&self, change: &BreakingChange) -> String {
        let text = self.resolver.linkify(&change.text).replace('\n', "\n  ");
        match &change.scope {
            Some(scope) => format!("* **{}:** {}", scope, text),
            None => format!("* {}", text),
        }
    }
}

impl ChangelogFormatter for MarkdownFormatter {
    #[instrument(
        skip(self, entry, config),
        fields(version = %entry.version, section_count = entry.sections.len())
    )]
    fn format(&self, entry: &ChangelogEntry, config: &ChangelogConfig) -> String {
        let mut blocks = vec![self.format_header(entry)];

        for section in entry.sections.iter().filter(|s| !s.is_empty()) {
            blocks.push(self.format_section(section, config));
        }

        if !entry.breaking_changes.is_empty() {
            let lines: Vec<String> = entry
                .breaking_changes
                .iter()
                .map(|change| self.format_breaking(change))
                .collect();
            blocks.push(format!("### BREAKING CHANGES\n\n{}", lines.join("\n")));
        }

        let mut output = blocks.join("\n\n");
        output.push('\n');

        debug!(output_len = output.len(), "markdown changelog formatted");
        output
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}
