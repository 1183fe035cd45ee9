//! # Tidal Module
//!
//! Client for the target catalog and the playlist reconciliation built on
//! top of it. Authentication uses a bearer token from the environment;
//! session lifecycle is out of scope. Every catalog query carries the
//! configured country code because availability differs between markets.
//!
//! The module is split by concern:
//!
//! - `search` - catalog search and album tracklists ([`CatalogSearch`] impl)
//! - `playlist` - playlist CRUD behind the [`PlaylistStore`] trait
//! - `reconcile` - additive convergence of a playlist onto a desired track set
//!
//! [`CatalogSearch`]: crate::matching::resolver::CatalogSearch
//! [`PlaylistStore`]: playlist::PlaylistStore
//!
//! ## Transient Errors
//!
//! All requests go through a shared retry loop: 429 responses wait for the
//! `Retry-After` delay, 5xx responses and connection errors back off
//! exponentially per the configured [`RetryPolicy`], and anything else
//! propagates immediately.

pub mod playlist;
pub mod reconcile;
pub mod search;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{Res, config, retry::RetryPolicy};

/// Tidal API client. Cheap to construct; holds only the HTTP client and
/// the retry policy.
pub struct TidalClient {
    client: Client,
    retry: RetryPolicy,
}

impl TidalClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_retry(RetryPolicy::default())
    }

    pub fn with_retry(retry: RetryPolicy) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(crate::discogs::USER_AGENT)
            .build()?;
        Ok(Self { client, retry })
    }

    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", config::tidal_apiurl(), path))
            .query(&[("countryCode", config::tidal_country_code())])
    }

    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(format!("{}{}", config::tidal_apiurl(), path))
            .query(&[("countryCode", config::tidal_country_code())])
    }

    /// Sends a request built by `build`, retrying transient failures.
    ///
    /// The builder closure is re-invoked per attempt because a sent
    /// `RequestBuilder` is consumed. 429 waits for `Retry-After` when the
    /// server announces one, otherwise the exponential schedule applies.
    pub(crate) async fn execute<F>(&self, build: F) -> Res<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let result = build().bearer_auth(config::tidal_token()).send().await;

            let response = match result {
                Ok(response) => response,
                Err(err) => {
                    if self.retry.should_retry(attempt) {
                        sleep(self.retry.delay_for(attempt)).await;
                        continue;
                    }
                    return Err(err.into());
                }
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok());
                match self.retry.rate_limit_delay(attempt, retry_after) {
                    Some(delay) => {
                        sleep(delay).await;
                        continue;
                    }
                    None => return Err("Tidal rate limit persisted past retry budget".into()),
                }
            }

            if response.status().is_server_error() && self.retry.should_retry(attempt) {
                sleep(self.retry.delay_for(attempt)).await;
                continue;
            }

            return Ok(response.error_for_status()?);
        }
    }
}
