//! Version bump recommendation

use herald_core::BumpLevel;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::types::ParsedCommit;

/// Recommended bump and the counts that led to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommended level
    pub level: BumpLevel,
    /// Number of breaking-change notes
    pub breaking: usize,
    /// Number of `feat` commits
    pub features: usize,
    /// Number of `fix` and `perf` commits
    pub fixes: usize,
    /// Human readable summary
    pub reason: String,
}

/// Derives one bump level from a run of parsed commits.
///
/// Every commit is inspected regardless of whether its type renders, so
/// notes on hidden or unmapped commits still force a major bump and the
/// result does not depend on commit order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BumpRecommender;

impl BumpRecommender {
    /// Create a new recommender
    pub fn new() -> Self {
        Self
    }

    /// Recommend a bump level for `commits`
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn recommend(&self, commits: &[ParsedCommit]) -> Recommendation {
        let mut breaking = 0;
        let mut features = 0;
        let mut fixes = 0;
        let mut level = BumpLevel::None;

        for commit in commits {
            let commit_level = if commit.is_major() {
                BumpLevel::Major
            } else if commit.is_minor() {
                BumpLevel::Minor
            } else if commit.is_patch() {
                BumpLevel::Patch
            } else {
                BumpLevel::None
            };
            level = level.max(commit_level);

            breaking += commit.notes.len();
            if commit.is_minor() {
                features += 1;
            }
            if commit.is_patch() {
                fixes += 1;
            }
        }

        let reason = format!(
            "There {} {} BREAKING CHANGE{} and {} features",
            if breaking == 1 { "is" } else { "are" },
            breaking,
            if breaking == 1 { "" } else { "S" },
            features
        );

        debug!(bump = %level, breaking, features, fixes, "bump recommended");

        Recommendation {
            level,
            breaking,
            features,
            fixes,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CommitParser, ConventionalParser};
    use chrono::Utc;
    use herald_core::RawCommit;

    fn parse_all(messages: &[&str]) -> Vec<ParsedCommit> {
        let parser = ConventionalParser::new();
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| parser.parse(&RawCommit::new(format!("{:040x}", i), *m, Utc::now())))
            .collect()
    }

    fn recommend(messages: &[&str]) -> Recommendation {
        BumpRecommender::new().recommend(&parse_all(messages))
    }

    #[test]
    fn test_empty_input_is_none() {
        let rec = recommend(&[]);
        assert_eq!(rec.level, BumpLevel::None);
        assert_eq!(rec.reason, "There are 0 BREAKING CHANGES and 0 features");
    }

    #[test]
    fn test_fix_is_patch() {
        assert_eq!(recommend(&["fix: bug"]).level, BumpLevel::Patch);
        assert_eq!(recommend(&["perf: faster"]).level, BumpLevel::Patch);
    }

    #[test]
    fn test_feat_is_minor() {
        let rec = recommend(&["fix: bug", "feat: thing"]);
        assert_eq!(rec.level, BumpLevel::Minor);
        assert_eq!(rec.features, 1);
        assert_eq!(rec.fixes, 1);
    }

    #[test]
    fn test_note_on_fix_plus_feat_is_major() {
        let rec = recommend(&["fix: plain", "feat: x\n\nBREAKING CHANGE: gone"]);
        assert_eq!(rec.level, BumpLevel::Major);
        assert_eq!(rec.reason, "There is 1 BREAKING CHANGE and 1 features");
    }

    #[test]
    fn test_note_on_hidden_or_untyped_commit_is_major() {
        assert_eq!(
            recommend(&["chore(deps): bump\n\nBREAKING CHANGE: The Change is huge."]).level,
            BumpLevel::Major
        );
        assert_eq!(
            recommend(&["Initial import\n\nBREAKING CHANGE: everything"]).level,
            BumpLevel::Major
        );
    }

    #[test]
    fn test_bang_header_is_not_a_bump() {
        let rec = recommend(&["feat!: drop api"]);
        assert_eq!(rec.level, BumpLevel::None);
        assert_eq!(rec.features, 0);
    }

    #[test]
    fn test_loose_note_markers_are_major() {
        assert_eq!(
            recommend(&["feat: x\n\nBREAKING CHANGE The API changed"]).level,
            BumpLevel::Major
        );
        assert_eq!(
            recommend(&["fix: x\n\n* BREAKING CHANGE: bulleted"]).level,
            BumpLevel::Major
        );
    }

    #[test]
    fn test_chore_only_is_none() {
        let rec = recommend(&["chore: tidy", "docs: readme", "not conventional"]);
        assert_eq!(rec.level, BumpLevel::None);
    }

    #[test]
    fn test_order_independent() {
        let mut commits = parse_all(&[
            "feat: a",
            "fix: b",
            "chore: c\n\nBREAKING CHANGE: d",
            "perf: e",
        ]);
        let forward = BumpRecommender::new().recommend(&commits);
        commits.reverse();
        let backward = BumpRecommender::new().recommend(&commits);

        assert_eq!(forward, backward);
        assert_eq!(forward.level, BumpLevel::Major);
        assert_eq!(forward.reason, "There is 1 BREAKING CHANGE and 1 features");
    }

    #[test]
    fn test_recommendation_applies_to_version() {
        let rec = recommend(&["feat: thing"]);
        let next = rec.level.apply(&semver::Version::new(1, 4, 2));
        assert_eq!(next.to_string(), "1.5.0");
    }
}
