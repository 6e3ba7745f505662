//! Herald Core - shared types, errors and configuration
//!
//! This crate holds everything the changelog pipeline needs from its host:
//! the raw commit and repository context inputs, the validated configuration
//! surface, and the error taxonomy.

pub mod config;
pub mod error;
pub mod types;

pub use config::{ChangelogConfig, CommitTypeConfig, Config};
pub use error::{ConfigError, HeraldError, Result};
pub use types::{BumpLevel, RawCommit, ReleaseBoundary, RepositoryContext};
