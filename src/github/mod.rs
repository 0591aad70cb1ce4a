pub mod executor;
pub mod query;
pub mod schema;
pub mod transport;

pub use executor::Executor;
pub use transport::{HttpTransport, ReplayTransport, Transport, DEFAULT_ENDPOINT};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CacheError, CacheKey};
use crate::history::{filter_range, RangeSlice};

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API returned errors: {0}")]
    Query(Value),

    #[error("Unexpected GitHub API response shape: {0}")]
    Decode(serde_json::Error),

    #[error("GitHub API response has no data: {0}")]
    MissingData(String),

    #[error("Response cache failed: {0}")]
    Cache(#[from] CacheError),

    #[error("GitHub token not found in flags, config or environment")]
    MissingToken,
}

/// Where to look and which range to report on.
#[derive(Debug, Clone)]
pub struct HistoryRequest {
    pub owner: String,
    pub repo: String,
    /// Branch to track; also the base branch PRs must target
    pub branch: String,
    /// Oldest boundary, excluded from the result
    pub from_sha: String,
    /// Newest boundary, included in the result
    pub to_sha: String,
}

impl HistoryRequest {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::commit_history(&self.owner, &self.repo, &self.branch, &self.from_sha, &self.to_sha)
    }
}

/// Fetch the branch history for `request` and cut it down to the range.
///
/// Only the first page of history is fetched. When `from_sha` lies beyond
/// it the slice comes back with `completed == false` and is logged as a
/// warning; no further pages are requested.
#[instrument(skip_all, fields(owner = %request.owner, repo = %request.repo, branch = %request.branch))]
pub async fn fetch_commit_history(
    executor: &Executor<'_>,
    request: &HistoryRequest,
    force_refresh: bool,
) -> Result<RangeSlice, GithubError> {
    let query = query::commit_history(&request.owner, &request.repo, &request.branch);
    let raw = executor
        .execute(&query, &request.cache_key(), force_refresh)
        .await?;

    let commits = schema::decode_history(raw)?;
    info!(fetched = commits.len(), "decoded commit history");

    let slice = filter_range(commits, &request.from_sha, &request.to_sha, &request.branch);
    for commit in &slice.commits {
        debug!(
            oid = %commit.oid,
            author = commit.author.as_deref().unwrap_or("unknown"),
            changed_files = commit.changed_files,
            prs = commit.pull_requests.len(),
            message = commit.message.lines().next().unwrap_or_default(),
            "commit in range"
        );
    }
    if !slice.completed {
        warn!(
            from_sha = %request.from_sha,
            kept = slice.commits.len(),
            "start commit not found in fetched history; report covers a partial range"
        );
    }
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;

    const FIXTURE: &str = include_str!("../../tests/fixtures/commit_history.json");

    fn request(from_sha: &str, to_sha: &str) -> HistoryRequest {
        HistoryRequest {
            owner: "octo-org".to_string(),
            repo: "widgets".to_string(),
            branch: "main".to_string(),
            from_sha: from_sha.to_string(),
            to_sha: to_sha.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_full_range() {
        let transport = ReplayTransport::new(serde_json::from_str(FIXTURE).unwrap());
        let cache = MemoryCacheStore::new();
        let executor = Executor::new(&transport, &cache);

        let slice = fetch_commit_history(&executor, &request("3e6b1f4", "e7f1c2a"), false)
            .await
            .unwrap();

        assert!(slice.completed);
        let oids: Vec<&str> = slice.commits.iter().map(|c| c.oid.as_str()).collect();
        assert_eq!(oids, vec!["e7f1c2a", "b9d04e1", "a51f9c3", "7c2e8d0"]);
        // #13 targets release/1.x
        let numbers: Vec<u64> = slice.commits[1].pull_requests.iter().map(|pr| pr.number).collect();
        assert_eq!(numbers, vec![12, 14]);
    }

    #[tokio::test]
    async fn test_fetch_partial_range() {
        let transport = ReplayTransport::new(serde_json::from_str(FIXTURE).unwrap());
        let cache = MemoryCacheStore::new();
        let executor = Executor::new(&transport, &cache);

        let slice = fetch_commit_history(&executor, &request("0000000", "a51f9c3"), false)
            .await
            .unwrap();

        assert!(!slice.completed);
        assert_eq!(slice.commits.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_caches_per_range() {
        let transport = ReplayTransport::new(serde_json::from_str(FIXTURE).unwrap());
        let cache = MemoryCacheStore::new();
        let executor = Executor::new(&transport, &cache);

        fetch_commit_history(&executor, &request("3e6b1f4", "e7f1c2a"), false).await.unwrap();
        fetch_commit_history(&executor, &request("3e6b1f4", "e7f1c2a"), false).await.unwrap();
        fetch_commit_history(&executor, &request("7c2e8d0", "e7f1c2a"), false).await.unwrap();

        assert_eq!(transport.calls(), 2);
        assert_eq!(cache.len(), 2);
    }
}
