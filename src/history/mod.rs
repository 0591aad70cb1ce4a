pub mod aggregate;
pub mod filter;
pub mod types;

pub use aggregate::{aggregate, Aggregate};
pub use filter::{filter_range, RangeSlice};
pub use types::{Commit, CommitRef, FileChange, PullRequest};
