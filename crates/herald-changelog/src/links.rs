//! Reference resolution: turning `#N`, `@user` and hashes into links

use herald_core::RepositoryContext;

use crate::references::{is_username, scan};
use crate::types::ReferenceKind;

/// Resolves references against one repository context.
///
/// Every method is a pure function of the token and the context captured at
/// construction; an unknown host yields links rooted at `http://unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResolver {
    user_url: String,
    repo_url: String,
    commit_path: String,
    issue_path: String,
    compare_path: String,
}

impl LinkResolver {
    /// Create a resolver for a repository context
    pub fn new(context: &RepositoryContext) -> Self {
        Self {
            user_url: context.user_url(),
            repo_url: context.repo_url(),
            commit_path: context.commit_path().to_string(),
            issue_path: context.issue_path().to_string(),
            compare_path: context.compare_path().to_string(),
        }
    }

    /// Link an issue number; a leading `#` on the token is accepted
    pub fn resolve_issue(&self, token: &str) -> String {
        let id = token.trim_start_matches('#');
        format!("[#{}]({}/{}/{})", id, self.repo_url, self.issue_path, id)
    }

    /// Link a mention; tokens that are not usernames come back unlinked
    pub fn resolve_mention(&self, token: &str) -> String {
        let user = token.trim_start_matches('@');
        if is_username(user) {
            format!("[@{}]({}/{})", user, self.user_url, user)
        } else {
            format!("@{}", user)
        }
    }

    /// Link a commit by its abbreviated hash
    pub fn commit_link(&self, hash: &str, short_hash: &str) -> String {
        format!("[{}]({}/{}/{})", short_hash, self.repo_url, self.commit_path, hash)
    }

    /// URL comparing two tags
    pub fn compare_url(&self, previous: &str, current: &str) -> String {
        format!("{}/{}/{}...{}", self.repo_url, self.compare_path, previous, current)
    }

    /// Rewrite every standalone issue and mention token in `text` into a link
    pub fn linkify(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut cursor = 0;

        for token in scan(text) {
            output.push_str(&text[cursor..token.start]);
            match token.kind {
                ReferenceKind::Issue => output.push_str(&self.resolve_issue(&token.token)),
                ReferenceKind::Mention => output.push_str(&self.resolve_mention(&token.token)),
            }
            cursor = token.end;
        }

        output.push_str(&text[cursor..]);
        output
    }
}

impl Default for LinkResolver {
    fn default() -> Self {
        Self::new(&RepositoryContext::unknown())
    }
}
