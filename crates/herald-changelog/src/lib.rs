//! Herald Changelog - changelog generation and bump recommendation
//!
//! This crate parses conventional commit messages, groups them into
//! sections, renders a linked markdown release block and recommends the
//! next semantic version bump from the same commits.

pub mod bump;
pub mod formatter;
pub mod generator;
pub mod links;
pub mod parser;
pub mod references;
pub mod types;

pub use bump::{BumpRecommender, Recommendation};
pub use formatter::{ChangelogFormatter, MarkdownFormatter};
pub use generator::{ChangelogGenerator, RenderOptions};
pub use links::LinkResolver;
pub use parser::{CommitParser, ConventionalParser, ParserConfig};
pub use types::{BreakingChange, ChangelogEntry, ParsedCommit, Section};
pub use types::{Note, Reference, ReferenceKind, ReferenceSource, RevertInfo};
