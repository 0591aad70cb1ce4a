use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, instrument};

use super::query::GraphQlRequest;
use super::GithubError;

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

/// Sends a GraphQL request and returns the raw JSON body.
///
/// The body is returned whether or not it carries an `errors` envelope;
/// interpreting it is the executor's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: &GraphQlRequest) -> Result<Value, GithubError>;
}

/// Transport over HTTPS with a bearer token.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn post(&self, request: &GraphQlRequest) -> Result<Value, GithubError> {
        debug!("posting GraphQL query");
        let response = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", "pr-history")
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<Value>().await?;
        debug!("received GraphQL response");
        Ok(body)
    }
}

/// Transport that answers every request with the same body, without
/// touching the network. Backs `--mock` and the tests.
pub struct ReplayTransport {
    body: Value,
    calls: AtomicUsize,
}

impl ReplayTransport {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of requests answered so far.
    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ReplayTransport {
    async fn post(&self, _request: &GraphQlRequest) -> Result<Value, GithubError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("replaying canned response");
        Ok(self.body.clone())
    }
}
