use chrono::{DateTime, Utc};

/// A commit on the tracked branch, as returned by the history query.
/// Note: Built from the decoded GraphQL response (see github/schema.rs);
/// only `pull_requests` is narrowed after construction, by the range filter.
#[derive(Debug, Clone)]
pub struct Commit {
    /// GraphQL node id
    #[allow(dead_code)] // Decoded for parity with PullRequest::id; commits are keyed by oid
    pub id: String,
    /// Commit hash
    pub oid: String,
    pub message: String,
    /// Files touched by this commit
    pub changed_files: u64,
    /// Git author name (not the GitHub user)
    pub author: Option<String>,
    /// Pull requests associated with this commit, in API order
    pub pull_requests: Vec<PullRequest>,
}

/// A pull request associated with one or more commits.
/// Two values describe the same PR when their `id` matches, whatever the
/// other fields say.
#[derive(Debug, Clone)]
pub struct PullRequest {
    /// GraphQL node id, used for deduplication
    pub id: String,
    /// PR number (e.g., 42)
    pub number: u64,
    pub url: String,
    /// None while the PR is still open
    pub merged_at: Option<DateTime<Utc>>,
    /// Branch the PR targets
    pub base_ref_name: String,
    /// Display name of the PR author
    pub author: Option<String>,
    /// Display name of the user who merged the PR
    pub merged_by: Option<String>,
    /// Total commits in the PR (may exceed `commits.len()`)
    pub total_commits: u64,
    pub commits: Vec<CommitRef>,
    /// Total files changed by the PR (may exceed `files.len()`)
    pub total_files: u64,
    pub files: Vec<FileChange>,
}

/// A commit listed inside a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    pub oid: String,
    #[allow(dead_code)] // Requested alongside oid; the report prints hashes only
    pub url: String,
}

/// A single file changed by a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// File path (e.g., "src/auth/config.rs")
    pub path: String,
    /// Lines added in this file
    pub additions: u64,
    /// Lines deleted in this file
    pub deletions: u64,
}

impl PullRequest {
    /// Author name for display; GitHub omits it for bots and deleted accounts.
    pub fn author_name(&self) -> &str {
        self.author.as_deref().unwrap_or(UNKNOWN_USER)
    }

    pub fn merged_by_name(&self) -> &str {
        self.merged_by.as_deref().unwrap_or(UNKNOWN_USER)
    }
}

pub const UNKNOWN_USER: &str = "unknown";
