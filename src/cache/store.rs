use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::BracketFeed;

/// File cache for tournament-host data: raw host responses and parsed feeds
pub struct Cache {
    raw_dir: PathBuf,
    parsed_dir: PathBuf,
}

impl Cache {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref();
        let raw_dir = cache_dir.join("raw");
        let parsed_dir = cache_dir.join("parsed");

        fs::create_dir_all(&raw_dir).context("Failed to create raw cache directory")?;
        fs::create_dir_all(&parsed_dir).context("Failed to create parsed cache directory")?;

        Ok(Self {
            raw_dir,
            parsed_dir,
        })
    }

    // --- Raw tier ---

    pub fn save_raw(&self, id: &str, data: &Value) -> Result<()> {
        let file_path = self.build_raw_path(id);
        self.write_json(&file_path, data)?;
        info!("Saved raw data to cache: {}", file_path.display());
        Ok(())
    }

    pub fn load_raw(&self, id: &str) -> Result<Option<Value>> {
        self.read_json_opt(&self.build_raw_path(id))
    }

    // --- Parsed tier ---

    pub fn save_feed(&self, tournament_key: &str, feed: &BracketFeed) -> Result<()> {
        let file_path = self.build_parsed_path(&feed_key(tournament_key));
        self.write_json(&file_path, feed)?;
        info!(
            "Saved bracket feed to cache: {} ({} participants, {} matches)",
            file_path.display(),
            feed.participants.len(),
            feed.matches.len()
        );
        Ok(())
    }

    pub fn load_feed(&self, tournament_key: &str) -> Result<Option<BracketFeed>> {
        self.read_json_opt(&self.build_parsed_path(&feed_key(tournament_key)))
    }

    pub fn has_feed(&self, tournament_key: &str) -> bool {
        self.build_parsed_path(&feed_key(tournament_key)).exists()
    }

    // --- Helper Methods ---

    fn build_raw_path(&self, id: &str) -> PathBuf {
        self.raw_dir.join(format!("{}.json", id))
    }

    fn build_parsed_path(&self, key: &str) -> PathBuf {
        self.parsed_dir.join(format!("{}.json", key))
    }

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(path, json).context("Failed to write cache file")?;
        Ok(())
    }

    fn read_json_opt<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read cache file {:?}", path))?;
        let data = serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })?;
        Ok(Some(data))
    }
}

fn feed_key(tournament_key: &str) -> String {
    format!("bracket-{}", tournament_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedMatch, FeedParticipant};

    fn temp_cache(name: &str) -> (PathBuf, Cache) {
        let dir = std::env::temp_dir().join(format!("smashnight-cache-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let cache = Cache::new(&dir).unwrap();
        (dir, cache)
    }

    #[test]
    fn test_missing_feed_loads_as_none() {
        let (dir, cache) = temp_cache("missing");
        assert!(cache.load_feed("nothing-here").unwrap().is_none());
        assert!(!cache.has_feed("nothing-here"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_saved_feed_is_found_under_its_key() {
        let (dir, cache) = temp_cache("saved");
        let feed = BracketFeed {
            participants: vec![FeedParticipant {
                id: 7,
                name: "Marth Main".to_string(),
                seed: Some(1),
                final_rank: None,
            }],
            matches: vec![FeedMatch {
                id: 70,
                round: 1,
                player1_id: Some(7),
                player2_id: None,
                scores_csv: None,
            }],
        };

        cache.save_feed("sn42", &feed).unwrap();

        assert!(cache.has_feed("sn42"));
        assert!(dir.join("parsed").join("bracket-sn42.json").exists());
        let loaded = cache.load_feed("sn42").unwrap().unwrap();
        assert_eq!(loaded.participants[0].name, "Marth Main");
        assert_eq!(loaded.matches[0].player1_id, Some(7));
        fs::remove_dir_all(dir).unwrap();
    }
}
