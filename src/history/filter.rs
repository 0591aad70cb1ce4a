use super::types::Commit;
use tracing::debug;

/// The commits found between two boundaries, newest first.
#[derive(Debug)]
pub struct RangeSlice {
    pub commits: Vec<Commit>,
    /// False when the input ran out before `from_sha` was reached, i.e. the
    /// range extends past the fetched page and the slice is partial.
    pub completed: bool,
}

/// Extract the commits between `to_sha` (newest, inclusive) and `from_sha`
/// (oldest, exclusive) from a newest-first history.
///
/// Commits before `to_sha` are skipped. Every commit kept has its PR list
/// narrowed to PRs targeting `branch`. Scanning stops at `from_sha`, which
/// is not part of the result.
pub fn filter_range(commits: Vec<Commit>, from_sha: &str, to_sha: &str, branch: &str) -> RangeSlice {
    let mut filtered = Vec::new();
    let mut tracking = false;

    for mut commit in commits {
        if commit.oid == to_sha {
            tracking = true;
        }
        if !tracking {
            continue;
        }
        if commit.oid == from_sha {
            debug!(kept = filtered.len(), "reached start of range");
            return RangeSlice {
                commits: filtered,
                completed: true,
            };
        }
        commit.pull_requests.retain(|pr| pr.base_ref_name == branch);
        filtered.push(commit);
    }

    debug!(kept = filtered.len(), tracking, "history exhausted before start of range");
    RangeSlice {
        commits: filtered,
        completed: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::test_support::{test_commit, test_pull_request};

    fn oids(slice: &RangeSlice) -> Vec<&str> {
        slice.commits.iter().map(|c| c.oid.as_str()).collect()
    }

    fn history() -> Vec<Commit> {
        vec![
            test_commit("e5", vec![]),
            test_commit("d4", vec![]),
            test_commit("c3", vec![]),
            test_commit("b2", vec![]),
            test_commit("a1", vec![]),
        ]
    }

    #[test]
    fn test_empty_input() {
        let slice = filter_range(vec![], "a1", "e5", "main");
        assert!(slice.commits.is_empty());
        assert!(!slice.completed);
    }

    #[test]
    fn test_neither_boundary_present() {
        let slice = filter_range(history(), "zz", "yy", "main");
        assert!(slice.commits.is_empty());
        assert!(!slice.completed);
    }

    #[test]
    fn test_to_sha_not_found() {
        let slice = filter_range(history(), "a1", "yy", "main");
        assert!(slice.commits.is_empty());
        assert!(!slice.completed);
    }

    #[test]
    fn test_slice_excludes_predecessors_and_from_commit() {
        let slice = filter_range(history(), "b2", "d4", "main");
        assert_eq!(oids(&slice), vec!["d4", "c3"]);
        assert!(slice.completed);
    }

    #[test]
    fn test_from_sha_is_newest_commit() {
        let slice = filter_range(history(), "e5", "e5", "main");
        assert!(slice.commits.is_empty());
        assert!(slice.completed);
    }

    #[test]
    fn test_identical_boundaries_mid_history() {
        let slice = filter_range(history(), "c3", "c3", "main");
        assert!(slice.commits.is_empty());
        assert!(slice.completed);
    }

    #[test]
    fn test_from_sha_before_to_sha_is_ignored() {
        // from_sha seen while not yet tracking does not end the scan
        let slice = filter_range(history(), "e5", "c3", "main");
        assert_eq!(oids(&slice), vec!["c3", "b2", "a1"]);
        assert!(!slice.completed);
    }

    #[test]
    fn test_partial_range_keeps_order_and_narrows_prs() {
        let commits = vec![
            test_commit(
                "a1",
                vec![
                    test_pull_request(5, "main", "alice"),
                    test_pull_request(7, "feature", "bob"),
                ],
            ),
            test_commit("b2", vec![]),
        ];
        let slice = filter_range(commits, "not-fetched", "a1", "main");
        assert!(!slice.completed);
        assert_eq!(oids(&slice), vec!["a1", "b2"]);

        let numbers: Vec<u64> = slice.commits[0].pull_requests.iter().map(|pr| pr.number).collect();
        assert_eq!(numbers, vec![5]);
        assert!(slice.commits[1].pull_requests.is_empty());
    }

    #[test]
    fn test_tracking_starts_at_oldest_commit() {
        let commits = vec![
            test_commit("a1", vec![test_pull_request(5, "main", "alice")]),
            test_commit("b2", vec![]),
        ];
        let slice = filter_range(commits, "not-fetched", "b2", "main");
        assert!(!slice.completed);
        assert_eq!(oids(&slice), vec!["b2"]);
    }

    #[test]
    fn test_prs_on_tracked_branch_are_kept() {
        let commits = vec![
            test_commit("a1", vec![test_pull_request(7, "feature", "bob")]),
            test_commit("b2", vec![test_pull_request(8, "feature", "bob")]),
        ];
        let slice = filter_range(commits, "zz", "b2", "feature");
        assert_eq!(slice.commits.len(), 1);
        assert_eq!(slice.commits[0].pull_requests.len(), 1);
    }
}
