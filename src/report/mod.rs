use colored::Colorize;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::history::{Aggregate, PullRequest};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Write(#[from] io::Error),
}

/// Print the report for `aggregate` to stdout.
#[instrument(skip(aggregate), fields(prs = aggregate.unique_prs.len(), authors = aggregate.authors.len()))]
pub fn print(aggregate: &Aggregate, show_details: bool) -> Result<(), ReportError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    present(aggregate, show_details, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write the summary, and optionally per-PR detail, to `out`.
///
/// Output format:
///
/// Diff made by 2 different authors
/// Diff contained 3 Pull Requests
/// PR#10 author: alice, merged by: dana
///      Commits: 2 - e7f1c2a, b9d04e1
///      Changing 2 files
///          src/cache.rs +3 -1
/// https://github.com/org/repo/pull/10
///
/// Merged PRs come first, oldest merge first. PRs that are still open have
/// no merge time to sort by and follow in the order they were found.
pub fn present(aggregate: &Aggregate, show_details: bool, out: &mut impl Write) -> Result<(), ReportError> {
    writeln!(out, "Diff made by {} different authors", aggregate.authors.len())?;
    writeln!(out, "Diff contained {} Pull Requests", aggregate.unique_prs.len())?;
    if !show_details {
        return Ok(());
    }

    let ordered = merge_order(&aggregate.unique_prs);
    debug!(count = ordered.len(), "writing pull request details");
    for pr in ordered {
        write_pull_request(pr, out)?;
    }
    Ok(())
}

fn merge_order(prs: &[PullRequest]) -> Vec<&PullRequest> {
    let (mut merged, open): (Vec<&PullRequest>, Vec<&PullRequest>) =
        prs.iter().partition(|pr| pr.merged_at.is_some());
    merged.sort_by_key(|pr| pr.merged_at);
    merged.extend(open);
    merged
}

fn write_pull_request(pr: &PullRequest, out: &mut impl Write) -> Result<(), ReportError> {
    let heading = format!("PR#{}", pr.number).as_str().bold();
    match pr.merged_at {
        Some(_) => writeln!(
            out,
            "{} author: {}, merged by: {}",
            heading,
            pr.author_name(),
            pr.merged_by_name()
        )?,
        None => writeln!(
            out,
            "{} author: {}, {}",
            heading,
            pr.author_name(),
            "not merged".yellow()
        )?,
    }

    let commits: Vec<&str> = pr.commits.iter().map(|c| c.oid.as_str()).collect();
    writeln!(out, "\t Commits: {} - {}", pr.total_commits, commits.join(", "))?;

    writeln!(out, "\t Changing {} files", pr.total_files)?;
    for file in &pr.files {
        writeln!(out, "\t\t{} +{} -{}", file.path, file.additions, file.deletions)?;
    }
    writeln!(out, "{}", pr.url)?;
    Ok(())
}
