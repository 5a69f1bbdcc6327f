use std::collections::HashMap;

use anyhow::{Context, Result};

use super::store::Cache;
use crate::api::tournament_key;
use crate::domain::BracketFeed;

/// Where the update pipeline reads bracket feeds from, keyed by bracket URL
pub trait BracketSource {
    fn bracket_feed(&self, url: &str) -> Result<BracketFeed>;
}

impl BracketSource for Cache {
    fn bracket_feed(&self, url: &str) -> Result<BracketFeed> {
        let key = tournament_key(url)?;
        self.load_feed(&key)?
            .with_context(|| format!("No cached feed for {} (run fetch first)", url))
    }
}

impl BracketSource for HashMap<String, BracketFeed> {
    fn bracket_feed(&self, url: &str) -> Result<BracketFeed> {
        self.get(url)
            .cloned()
            .with_context(|| format!("No feed for {}", url))
    }
}
