use serde::Serialize;

/// Commits fetched from the branch history in one request.
pub const HISTORY_PAGE_SIZE: u32 = 100;
/// Associated pull requests fetched per commit.
pub const PULL_REQUESTS_PER_COMMIT: u32 = 5;
/// Commits and files fetched per pull request.
pub const PR_DETAIL_PAGE_SIZE: u32 = 100;

/// A GraphQL request body: `{"query": ..., "variables": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: HistoryVariables,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryVariables {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

/// Build the commit-history query for `branch` of `owner/name`.
///
/// Selects only what the range filter and report read: commit ids and PR
/// linkage for the filter; PR authorship, commits and file stats for the
/// report. Repository coordinates travel as variables.
pub fn commit_history(owner: &str, name: &str, branch: &str) -> GraphQlRequest {
    let query = format!(
        r#"query CommitHistory($owner: String!, $name: String!, $branch: String!) {{
  repository(owner: $owner, name: $name) {{
    object(expression: $branch) {{
      ... on Commit {{
        history(first: {history}) {{
          nodes {{
            id
            oid
            message
            changedFiles
            author {{ name }}
            associatedPullRequests(first: {prs}) {{
              nodes {{
                id
                number
                url
                mergedAt
                baseRefName
                author {{ ... on User {{ name }} }}
                mergedBy {{ ... on User {{ name }} }}
                commits(first: {detail}) {{
                  totalCount
                  nodes {{ commit {{ oid url }} }}
                }}
                files(first: {detail}) {{
                  totalCount
                  nodes {{ path additions deletions }}
                }}
              }}
            }}
          }}
        }}
      }}
    }}
  }}
}}"#,
        history = HISTORY_PAGE_SIZE,
        prs = PULL_REQUESTS_PER_COMMIT,
        detail = PR_DETAIL_PAGE_SIZE,
    );

    GraphQlRequest {
        query,
        variables: HistoryVariables {
            owner: owner.to_string(),
            name: name.to_string(),
            branch: branch.to_string(),
        },
    }
}
