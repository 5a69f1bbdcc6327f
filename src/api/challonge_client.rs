use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::Value;

use crate::api::parsers;
use crate::cache::Cache;
use crate::config::FeedSettings;
use crate::domain::BracketFeed;
use crate::http::RateLimitedClient;

/// Tournament host API client
pub struct ChallongeClient {
    client: RateLimitedClient,
    base_url: String,
}

impl ChallongeClient {
    pub fn new(settings: &FeedSettings) -> Result<Self> {
        if settings.api_key.is_none() {
            warn!("CHALLONGE_API_KEY is not set; the host will likely refuse requests");
        }

        let client = RateLimitedClient::new(settings)?;
        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Participants and matches of one bracket, read from cache when present
    /// unless `refresh` is set.
    ///
    /// Raw responses land in the raw tier; the parsed feed is always
    /// rewritten so a changed parser picks up old downloads.
    pub async fn fetch_and_cache_bracket(
        &mut self,
        bracket_url: &str,
        cache: &Cache,
        refresh: bool,
    ) -> Result<BracketFeed> {
        let key = parsers::tournament_key(bracket_url)?;
        info!("Fetching bracket {} ({})", key, bracket_url);

        let participants_url = self.participants_url(&key);
        let matches_url = self.matches_url(&key);

        let participants_raw = self
            .load_or_fetch(cache, &format!("{}-participants", key), &participants_url, refresh)
            .await?;
        let matches_raw = self
            .load_or_fetch(cache, &format!("{}-matches", key), &matches_url, refresh)
            .await?;

        let feed = BracketFeed {
            participants: parsers::parse_participants(&participants_raw)?,
            matches: parsers::parse_matches(&matches_raw)?,
        };
        cache.save_feed(&key, &feed)?;

        Ok(feed)
    }

    async fn load_or_fetch(&mut self, cache: &Cache, raw_id: &str, url: &str, refresh: bool) -> Result<Value> {
        if !refresh {
            if let Some(cached) = cache.load_raw(raw_id)? {
                return Ok(cached);
            }
        }

        let value = self
            .client
            .get_json(url)
            .await
            .with_context(|| format!("Failed to fetch {}", raw_id))?;

        if let Err(e) = cache.save_raw(raw_id, &value) {
            warn!("Failed to save {} to cache: {:?}", raw_id, e);
        }
        Ok(value)
    }

    // --- Helper Methods ---

    fn participants_url(&self, key: &str) -> String {
        format!("{}/tournaments/{}/participants.json", self.base_url, key)
    }

    fn matches_url(&self, key: &str) -> String {
        format!("{}/tournaments/{}/matches.json", self.base_url, key)
    }
}
