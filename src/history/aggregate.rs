use std::collections::{BTreeSet, HashSet};

use super::types::{Commit, PullRequest};

/// Pull requests and authors behind a range of commits.
#[derive(Debug, Default)]
pub struct Aggregate {
    /// One entry per PR id, in first-seen order
    pub unique_prs: Vec<PullRequest>,
    /// Distinct PR author display names
    pub authors: BTreeSet<String>,
}

/// Collect the distinct pull requests referenced by `commits` and their authors.
///
/// A PR associated with several commits appears once; the first reference wins.
/// Authors are PR authors, not commit authors.
pub fn aggregate(commits: &[Commit]) -> Aggregate {
    let mut seen = HashSet::new();
    let mut result = Aggregate::default();

    for pr in commits.iter().flat_map(|c| &c.pull_requests) {
        if !seen.insert(pr.id.as_str()) {
            continue;
        }
        result.authors.insert(pr.author_name().to_string());
        result.unique_prs.push(pr.clone());
    }

    result
}
