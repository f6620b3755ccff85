//! HTTP item store client with rate limiting and error mapping
//!
//! POSTs `{ predicate, page, limit }` as JSON to the configured endpoint and
//! decodes `{ items, pagination? }`.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, direct::NotKeyed},
};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use url::Url;

use crate::domain::{FetchError, PageFetcher, PageRequest, PageResponse};
use crate::infrastructure::config::FetcherConfig;

/// Item store client used by the catalog engine in production.
pub struct HttpPageFetcher {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    endpoint: Url,
}

impl HttpPageFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .with_context(|| format!("Invalid item store endpoint: {}", config.endpoint))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .default_headers(headers)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );

        Ok(Self {
            client,
            rate_limiter: RateLimiter::direct(quota),
            endpoint,
        })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResponse, FetchError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(
            "POST {} page={} limit={}",
            self.endpoint,
            request.page,
            request.limit
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, self.endpoint.as_str(), body));
        }

        let page: PageResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        tracing::debug!(
            "Received {} items for page {} from {}",
            page.items.len(),
            request.page,
            self.endpoint
        );
        Ok(page)
    }
}

/// Maps a non-success response to the engine's error kinds.
fn status_error(status: StatusCode, url: &str, body: String) -> FetchError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => FetchError::RateLimited,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY if !body.trim().is_empty() => {
            FetchError::Store(body)
        }
        _ => FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        },
    }
}
