use anyhow::Result;
use log::info;

use crate::api::{tournament_key, ChallongeClient};
use crate::cache::Cache;
use crate::config::FeedSettings;
use crate::domain::FetchProgress;

/// Downloads bracket feeds from the tournament host into the cache
pub struct FetchService {
    cache: Cache,
    api_client: ChallongeClient,
}

impl FetchService {
    pub fn new(cache: Cache, settings: &FeedSettings) -> Result<Self> {
        Ok(Self {
            cache,
            api_client: ChallongeClient::new(settings)?,
        })
    }

    /// Fetches every bracket URL; any failure aborts the whole fetch.
    ///
    /// With `refresh` the host is asked again even for brackets already cached.
    pub async fn run(&mut self, bracket_urls: &[String], refresh: bool) -> Result<usize> {
        info!("=== Fetching {} bracket feeds ===\n", bracket_urls.len());

        let mut progress = FetchProgress::new(bracket_urls.len());
        for url in bracket_urls {
            let was_cached = !refresh && self.cache.has_feed(&tournament_key(url)?);
            self.api_client
                .fetch_and_cache_bracket(url, &self.cache, refresh)
                .await?;

            if was_cached {
                progress.increment_cached();
            } else {
                progress.increment_fetched();
            }
        }

        info!("=== Fetch Complete ===");
        Ok(progress.current_count())
    }
}
