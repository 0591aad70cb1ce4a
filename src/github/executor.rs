use serde_json::Value;
use tracing::{debug, info, instrument};

use super::query::GraphQlRequest;
use super::transport::Transport;
use super::GithubError;
use crate::cache::{CacheKey, CacheStore};

/// Runs queries through a read-through, write-through response cache.
pub struct Executor<'a> {
    transport: &'a dyn Transport,
    cache: &'a dyn CacheStore,
}

impl<'a> Executor<'a> {
    pub fn new(transport: &'a dyn Transport, cache: &'a dyn CacheStore) -> Self {
        Self { transport, cache }
    }

    /// Return the response cached under `key`, or fetch and cache it.
    ///
    /// A cached entry is returned as-is unless `force_refresh` is set. A
    /// response carrying an `errors` envelope fails with
    /// [`GithubError::Query`] and is not cached.
    #[instrument(skip(self, request), fields(key = %key))]
    pub async fn execute(
        &self,
        request: &GraphQlRequest,
        key: &CacheKey,
        force_refresh: bool,
    ) -> Result<Value, GithubError> {
        if !force_refresh {
            if let Some(cached) = self.cache.get(key)? {
                info!("loading response from cache");
                return Ok(cached);
            }
        }

        info!("getting response from API");
        debug!(query = %request.query, "GraphQL query");
        let response = self.transport.post(request).await?;

        if let Some(errors) = response.get("errors").filter(|e| !e.is_null()) {
            return Err(GithubError::Query(errors.clone()));
        }

        self.cache.put(key, &response)?;
        Ok(response)
    }
}
