//! Commit parsing

mod conventional;
mod types;

pub use conventional::ConventionalParser;
pub use types::*;

use crate::types::ParsedCommit;
use herald_core::RawCommit;

/// Trait for commit parsers
///
/// Parsing never fails: a message outside the grammar yields a type-less
/// commit rather than an error.
pub trait CommitParser: Send + Sync {
    /// Parse a commit into a structured format
    fn parse(&self, commit: &RawCommit) -> ParsedCommit;
}
