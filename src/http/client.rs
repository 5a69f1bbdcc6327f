use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::FeedSettings;
use crate::errors::{fetch_context, parse_context};
use crate::rate_limiter::RateLimiter;

/// HTTP client with rate limiting and the host's API key attached to every call
pub struct RateLimitedClient {
    client: Client,
    rate_limiter: RateLimiter,
    api_key: Option<String>,
}

impl RateLimitedClient {
    pub fn new(settings: &FeedSettings) -> Result<Self> {
        let client = Self::build_client(settings.user_agent, settings.timeout_secs)?;
        let rate_limiter = RateLimiter::new(settings.rate_limit_ms);

        Ok(Self {
            client,
            rate_limiter,
            api_key: settings.api_key.clone(),
        })
    }

    /// GETs `url` and decodes the body as JSON; non-2xx statuses are errors
    pub async fn get_json(&mut self, url: &str) -> Result<Value> {
        self.rate_limiter.wait().await;

        let response = self.send_get_request(url).await.with_context(|| fetch_context(url))?;
        let status = response.status();
        if !status.is_success() {
            bail!("{}: host returned status {}", fetch_context(url), status);
        }

        response
            .json::<Value>()
            .await
            .with_context(|| parse_context(url))
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    async fn send_get_request(&self, url: &str) -> Result<reqwest::Response> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        request.send().await.context("Failed to send GET request")
    }
}
