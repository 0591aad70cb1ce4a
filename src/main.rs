mod cache;
mod config;
mod github;
mod history;
mod report;

use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use cache::{CacheStore, FileCacheStore, NoopCacheStore};
use github::{Executor, GithubError, HistoryRequest, HttpTransport, ReplayTransport, Transport};

/// Sample response used by --mock, plus the range it is reported over.
const MOCK_RESPONSE: &str = include_str!("../tests/fixtures/commit_history.json");
const MOCK_FROM_SHA: &str = "3e6b1f4";
const MOCK_TO_SHA: &str = "e7f1c2a";

/// PR History — summarizes the pull requests merged into a branch between
/// two commits: who wrote them, who merged them, and what they changed.
#[derive(Parser, Debug)]
#[command(name = "pr-history", version, about)]
struct Cli {
    /// Owner of the repo
    #[arg(short = 'o', long)]
    repo_owner: Option<String>,

    /// Repo name
    #[arg(short = 'r', long)]
    repo_name: Option<String>,

    /// Branch to track
    #[arg(short, long, default_value = "master")]
    branch: String,

    /// GitHub access token (falls back to .pr-history.toml, then GITHUB_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// Start analysis at this commit (oldest, excluded from the report)
    #[arg(short, long)]
    start_sha: Option<String>,

    /// End analysis at this commit (newest, included in the report)
    #[arg(short, long)]
    end_sha: Option<String>,

    /// Only print author and pull request counts
    #[arg(long)]
    summary_only: bool,

    /// Ignore any cached response and query the API again
    #[arg(long)]
    force_refresh: bool,

    /// Directory for cached API responses
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Use a built-in sample response for demo purposes (no GitHub token needed)
    #[arg(long)]
    r#mock: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (transport, cache, request): (Box<dyn Transport>, Box<dyn CacheStore>, HistoryRequest) =
        if cli.r#mock {
            info!("using sample response for demo");
            (
                Box::new(ReplayTransport::new(serde_json::from_str(MOCK_RESPONSE)?)),
                Box::new(NoopCacheStore),
                mock_request(),
            )
        } else {
            info!("loading configuration");
            let config = config::Config::load()?;
            let request = history_request(&cli)?;
            let token = config
                .github_token(cli.token.as_deref())
                .ok_or(GithubError::MissingToken)?;
            let store = FileCacheStore::new(config.cache_dir(cli.cache_dir.as_deref()));
            debug!(endpoint = config.endpoint(), cache_dir = %store.dir().display(), "resolved configuration");
            (
                Box::new(HttpTransport::new(config.endpoint(), token)),
                Box::new(store),
                request,
            )
        };

    let _main_span = info_span!(
        "pr_history",
        repo = %format!("{}/{}", request.owner, request.repo),
        branch = %request.branch
    )
    .entered();

    let executor = Executor::new(transport.as_ref(), cache.as_ref());
    info!(from = %request.from_sha, to = %request.to_sha, "fetching commit history");
    let slice = github::fetch_commit_history(&executor, &request, cli.force_refresh).await?;
    info!(commits = slice.commits.len(), completed = slice.completed, "filtered commit range");

    let aggregate = history::aggregate(&slice.commits);
    info!(prs = aggregate.unique_prs.len(), authors = aggregate.authors.len(), "aggregated pull requests");

    report::print(&aggregate, !cli.summary_only)?;
    Ok(())
}

/// Build the request from flags, rejecting missing coordinates up front.
fn history_request(cli: &Cli) -> Result<HistoryRequest, String> {
    let required = |value: &Option<String>, flag: &str| {
        value
            .clone()
            .ok_or_else(|| format!("{flag} is required unless --mock is used"))
    };

    Ok(HistoryRequest {
        owner: required(&cli.repo_owner, "--repo-owner")?,
        repo: required(&cli.repo_name, "--repo-name")?,
        branch: cli.branch.clone(),
        from_sha: required(&cli.start_sha, "--start-sha")?,
        to_sha: required(&cli.end_sha, "--end-sha")?,
    })
}

fn mock_request() -> HistoryRequest {
    HistoryRequest {
        owner: "octo-org".to_string(),
        repo: "widgets".to_string(),
        branch: "main".to_string(),
        from_sha: MOCK_FROM_SHA.to_string(),
        to_sha: MOCK_TO_SHA.to_string(),
    }
}
