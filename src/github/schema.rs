//! Typed shape of the commit-history query response.
//!
//! Mirrors the selection in `query.rs`. Decoding into these types is where a
//! shape mismatch surfaces, so the rest of the pipeline works on plain
//! domain structs (see history/types.rs).

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::GithubError;
use crate::history::{Commit, CommitRef, FileChange, PullRequest};

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub data: HistoryData,
}

#[derive(Debug, Deserialize)]
pub struct HistoryData {
    pub repository: Option<Repository>,
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub object: Option<GitObject>,
}

/// `object(expression:)` narrowed with `... on Commit`; any other object
/// kind decodes with `history: None`.
#[derive(Debug, Deserialize)]
pub struct GitObject {
    pub history: Option<Connection<CommitNode>>,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountedConnection<T> {
    pub total_count: u64,
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitNode {
    pub id: String,
    pub oid: String,
    pub message: String,
    pub changed_files: u64,
    pub author: Option<Named>,
    pub associated_pull_requests: Option<Connection<PullRequestNode>>,
}

/// Any actor selected with `{ name }` or `{ ... on User { name } }`.
#[derive(Debug, Deserialize)]
pub struct Named {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestNode {
    pub id: String,
    pub number: u64,
    pub url: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub base_ref_name: String,
    pub author: Option<Named>,
    pub merged_by: Option<Named>,
    pub commits: CountedConnection<PullRequestCommitNode>,
    pub files: Option<CountedConnection<FileNode>>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestCommitNode {
    pub commit: CommitRefNode,
}

#[derive(Debug, Deserialize)]
pub struct CommitRefNode {
    pub oid: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct FileNode {
    pub path: String,
    pub additions: u64,
    pub deletions: u64,
}

/// Decode a raw response into newest-first commits.
pub fn decode_history(raw: Value) -> Result<Vec<Commit>, GithubError> {
    let response: HistoryResponse = serde_json::from_value(raw).map_err(GithubError::Decode)?;
    let history = response
        .data
        .repository
        .ok_or_else(|| GithubError::MissingData("repository not found".to_string()))?
        .object
        .ok_or_else(|| GithubError::MissingData("branch not found".to_string()))?
        .history
        .ok_or_else(|| GithubError::MissingData("branch does not point at a commit".to_string()))?;

    Ok(history.nodes.into_iter().map(Commit::from).collect())
}

fn name_of(actor: Option<Named>) -> Option<String> {
    actor.and_then(|a| a.name)
}

impl From<CommitNode> for Commit {
    fn from(node: CommitNode) -> Self {
        Commit {
            id: node.id,
            oid: node.oid,
            message: node.message,
            changed_files: node.changed_files,
            author: name_of(node.author),
            pull_requests: node
                .associated_pull_requests
                .map(|c| c.nodes.into_iter().map(PullRequest::from).collect())
                .unwrap_or_default(),
        }
    }
}

impl From<PullRequestNode> for PullRequest {
    fn from(node: PullRequestNode) -> Self {
        let (total_files, files) = match node.files {
            Some(files) => (
                files.total_count,
                files
                    .nodes
                    .into_iter()
                    .map(|f| FileChange {
                        path: f.path,
                        additions: f.additions,
                        deletions: f.deletions,
                    })
                    .collect(),
            ),
            None => (0, Vec::new()),
        };

        PullRequest {
            id: node.id,
            number: node.number,
            url: node.url,
            merged_at: node.merged_at,
            base_ref_name: node.base_ref_name,
            author: name_of(node.author),
            merged_by: name_of(node.merged_by),
            total_commits: node.commits.total_count,
            commits: node
                .commits
                .nodes
                .into_iter()
                .map(|n| CommitRef {
                    oid: n.commit.oid,
                    url: n.commit.url,
                })
                .collect(),
            total_files,
            files,
        }
    }
}
