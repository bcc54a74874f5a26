//! HTTP pool store backed by the sealeddeck.tech pools API.

use super::{
    config::PoolStoreConfig,
    errors::{StoreError, StoreResult},
    models::{CreatePoolRequest, CreatePoolResponse, PoolContents, RemotePoolId},
    repository::PoolStore,
};
use crate::pool::{CardEntry, CardList};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Pool store talking to the remote pools API over HTTP
#[derive(Clone)]
pub struct HttpPoolStore {
    client: reqwest::Client,
    config: PoolStoreConfig,
}

impl HttpPoolStore {
    /// Create a new HTTP pool store
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint, retry and timeout settings
    ///
    /// # Returns
    ///
    /// * `StoreResult<HttpPoolStore>` - Store or client construction error
    pub fn new(mut config: PoolStoreConfig) -> StoreResult<Self> {
        config.max_attempts = config.max_attempts.max(1);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn pools_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

#[async_trait]
impl PoolStore for HttpPoolStore {
    async fn fetch_pool(&self, id: &RemotePoolId) -> StoreResult<CardList> {
        let url = format!("{}/{}", self.pools_url(), id);
        let max_attempts = self.config.max_attempts;
        let mut last_failure = String::new();

        for attempt in 1..=max_attempts {
            match self.client.get(&url).send().await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    return Err(StoreError::NotFound(id.clone()));
                }
                Ok(response) if response.status().is_success() => {
                    match response.json::<PoolContents>().await {
                        Ok(contents) => return Ok(contents.into_cards()),
                        Err(e) => last_failure = format!("unreadable pool body: {e}"),
                    }
                }
                Ok(response) => last_failure = format!("status {}", response.status()),
                Err(e) => last_failure = e.to_string(),
            }
            log::warn!(
                "Fetching pool {id} failed (attempt {attempt}/{max_attempts}): {last_failure}"
            );
        }

        Err(StoreError::Unavailable {
            attempts: max_attempts,
            reason: last_failure,
        })
    }

    async fn create_or_extend_pool(
        &self,
        entries: &[CardEntry],
        base: Option<&RemotePoolId>,
    ) -> StoreResult<RemotePoolId> {
        let request = CreatePoolRequest {
            sideboard: entries,
            pool_id: base.map(RemotePoolId::as_str),
        };
        let max_attempts = self.config.max_attempts;
        let mut last_failure = String::new();

        for attempt in 1..=max_attempts {
            match self.client.post(self.pools_url()).json(&request).send().await {
                Ok(response) if response.status().is_success() => {
                    // The pool now exists remotely; a second POST would mint a duplicate.
                    return match response.json::<CreatePoolResponse>().await {
                        Ok(body) if !body.pool_id.trim().is_empty() => {
                            Ok(RemotePoolId::new(body.pool_id.trim()))
                        }
                        Ok(_) => Err(StoreError::Unavailable {
                            attempts: attempt,
                            reason: "response carried an empty poolId".to_string(),
                        }),
                        Err(e) => Err(StoreError::Unavailable {
                            attempts: attempt,
                            reason: format!("unreadable response body: {e}"),
                        }),
                    };
                }
                Ok(response) if response.status().is_client_error() => {
                    let status = response.status().as_u16();
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
                    return Err(StoreError::Rejected { status, body });
                }
                Ok(response) => last_failure = format!("status {}", response.status()),
                Err(e) => last_failure = e.to_string(),
            }
            log::warn!(
                "Publishing pool ({} entries, base {:?}) failed (attempt {attempt}/{max_attempts}): {last_failure}",
                entries.len(),
                base.map(RemotePoolId::as_str)
            );
        }

        Err(StoreError::Unavailable {
            attempts: max_attempts,
            reason: last_failure,
        })
    }

    fn pool_link(&self, id: &RemotePoolId) -> String {
        id.link(&self.config.link_base)
    }
}
