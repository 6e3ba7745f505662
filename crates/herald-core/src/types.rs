//! Core types shared between the host and the changelog pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Link root used whenever the repository host cannot be resolved
pub const UNKNOWN_HOST: &str = "http://unknown";

/// Default host for [`RepositoryContext::github`]
pub const GITHUB_HOST: &str = "https://github.com";

/// Shortest abbreviated hash accepted when matching release boundaries
const MIN_ABBREV_LEN: usize = 4;

/// A commit as supplied by the host, before any parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCommit {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash (first 7 characters)
    pub short_hash: String,
    /// Full commit message: subject line, optional body and notes
    pub message: String,
    /// Author date
    pub date: DateTime<Utc>,
}

impl RawCommit {
    /// Create a new RawCommit
    pub fn new(hash: impl Into<String>, message: impl Into<String>, date: DateTime<Utc>) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();

        Self {
            hash,
            short_hash,
            message: message.into(),
            date,
        }
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// The last release: the tag name and the commit it points to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseBoundary {
    /// Tag name (e.g. `v1.0.0`)
    pub tag: String,
    /// Commit hash the tag points to, full or abbreviated
    pub commit_hash: String,
    /// Version extracted from the tag name
    pub version: Option<String>,
}

impl ReleaseBoundary {
    /// Create a new boundary
    pub fn new(tag: impl Into<String>, commit_hash: impl Into<String>) -> Self {
        let tag = tag.into();
        let version = extract_version(&tag);

        Self {
            tag,
            commit_hash: commit_hash.into(),
            version,
        }
    }

    /// Whether `hash` identifies the boundary commit.
    ///
    /// Either side may be abbreviated; the shorter one must be at least
    /// four characters and a prefix of the other.
    pub fn matches(&self, hash: &str) -> bool {
        let boundary = self.commit_hash.trim();
        let hash = hash.trim();
        let (short, long) = if boundary.len() <= hash.len() {
            (boundary, hash)
        } else {
            (hash, boundary)
        };

        if short.len() < MIN_ABBREV_LEN {
            return !short.is_empty() && short.eq_ignore_ascii_case(long);
        }

        long.get(..short.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(short))
    }
}

/// Extract version from a tag name
fn extract_version(tag: &str) -> Option<String> {
    // Handle common tag formats: v1.0.0, 1.0.0, package@1.0.0, package-v1.0.0
    let tag = tag.strip_prefix('v').unwrap_or(tag);

    if let Some(pos) = tag.rfind('@') {
        let version_part = &tag[pos + 1..];
        let version = version_part.strip_prefix('v').unwrap_or(version_part);
        if semver::Version::parse(version).is_ok() {
            return Some(version.to_string());
        }
    }

    if let Some(pos) = tag.rfind("-v") {
        let version = &tag[pos + 2..];
        if semver::Version::parse(version).is_ok() {
            return Some(version.to_string());
        }
    }

    semver::Version::parse(tag).ok().map(|_| tag.to_string())
}

/// Where links in the rendered document point to.
///
/// All fields are optional so the context can be deserialized from a partial
/// `[repository]` table. A context without a host is the "unknown host" and
/// renders links rooted at [`UNKNOWN_HOST`]. Link path segments fall back to
/// the GitHub layout (`commit`, `issues`, `compare`) on a known host and to
/// `commits`, `issues`, `compare` on the unknown host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryContext {
    /// Host base URL (`https://github.com`, `github.internal.example.com`)
    pub host: Option<String>,
    /// Repository owner or organization
    pub owner: Option<String>,
    /// Repository name
    pub repository: Option<String>,
    /// Path segment for commit links
    pub commit_path: Option<String>,
    /// Path segment for issue links
    pub issue_path: Option<String>,
    /// Path segment for compare links
    pub compare_path: Option<String>,
    /// Path segment between the host and a username; users sit at the host
    /// root when absent
    pub user_path: Option<String>,
}

impl RepositoryContext {
    /// Context for a repository whose host could not be resolved
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Context for a repository on github.com
    pub fn github(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self::hosted(GITHUB_HOST, owner, repository)
    }

    /// Context for a repository on any GitHub-style host, including
    /// enterprise installations
    pub fn hosted(
        host: impl Into<String>,
        owner: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        Self {
            host: Some(host.into()),
            owner: Some(owner.into()),
            repository: Some(repository.into()),
            ..Self::default()
        }
    }

    /// Override the commit link segment
    pub fn with_commit_path(mut self, path: impl Into<String>) -> Self {
        self.commit_path = Some(path.into());
        self
    }

    /// Override the issue link segment
    pub fn with_issue_path(mut self, path: impl Into<String>) -> Self {
        self.issue_path = Some(path.into());
        self
    }

    /// Override the compare link segment
    pub fn with_compare_path(mut self, path: impl Into<String>) -> Self {
        self.compare_path = Some(path.into());
        self
    }

    /// Put user links under a path segment
    pub fn with_user_path(mut self, path: impl Into<String>) -> Self {
        self.user_path = Some(path.into());
        self
    }

    /// Whether this context uses the unknown-host fallback
    pub fn is_unknown(&self) -> bool {
        match self.host.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(host) => {
                host.eq_ignore_ascii_case("unknown") || host.eq_ignore_ascii_case(UNKNOWN_HOST)
            }
        }
    }

    /// Base URL of the host, without a trailing slash
    pub fn host_url(&self) -> String {
        match self.host.as_deref() {
            Some(host) if !self.is_unknown() => normalize_host(host),
            _ => UNKNOWN_HOST.to_string(),
        }
    }

    /// Base URL of the repository, without a trailing slash
    pub fn repo_url(&self) -> String {
        if self.is_unknown() {
            return UNKNOWN_HOST.to_string();
        }

        match (self.owner.as_deref(), self.repository.as_deref()) {
            (Some(owner), Some(repository)) => format!(
                "{}/{}/{}",
                self.host_url(),
                owner.trim_matches('/'),
                repository.trim_matches('/')
            ),
            _ => self.host_url(),
        }
    }

    /// Path segment for commit links
    pub fn commit_path(&self) -> &str {
        let fallback = if self.is_unknown() { "commits" } else { "commit" };
        segment(self.commit_path.as_deref(), fallback)
    }

    /// Path segment for issue links
    pub fn issue_path(&self) -> &str {
        segment(self.issue_path.as_deref(), "issues")
    }

    /// Path segment for compare links
    pub fn compare_path(&self) -> &str {
        segment(self.compare_path.as_deref(), "compare")
    }

    /// Base URL that usernames are appended to
    pub fn user_url(&self) -> String {
        match self.user_path.as_deref().map(|p| p.trim_matches('/')) {
            Some(path) if !path.is_empty() => format!("{}/{}", self.host_url(), path),
            _ => self.host_url(),
        }
    }
}

fn segment<'a>(configured: Option<&'a str>, fallback: &'a str) -> &'a str {
    configured.map(|s| s.trim_matches('/')).unwrap_or(fallback)
}

/// Add a scheme to a bare host name and drop trailing slashes
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

/// Recommended semantic version increment
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    /// No release-worthy change
    #[default]
    None,
    /// Bug fixes and performance work
    Patch,
    /// New features
    Minor,
    /// Breaking changes
    Major,
}

impl BumpLevel {
    /// Returns the string representation of the bump level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::None => "none",
        }
    }

    /// Compute the next version after applying this bump.
    ///
    /// Pre-release and build metadata are always dropped for a real bump.
    pub fn apply(&self, current: &semver::Version) -> semver::Version {
        let mut next = current.clone();
        match self {
            Self::None => return next,
            Self::Major => {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
            }
            Self::Minor => {
                next.minor += 1;
                next.patch = 0;
            }
            Self::Patch => next.patch += 1,
        }
        next.pre = semver::Prerelease::EMPTY;
        next.build = semver::BuildMetadata::EMPTY;
        next
    }
}

impl std::fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BumpLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            "none" => Ok(Self::None),
            _ => Err(format!("Unknown bump level: {}", s)),
        }
    }
}
