#[derive(Debug, Clone)]
pub struct RatingSettings {
    /// Upper bound of a winner's gain
    pub winner_cap: f64,
    /// Base of the winner's logistic curve
    pub winner_base: f64,
    /// Upper bound of a loser's loss
    pub loser_cap: f64,
    /// Base of the loser's logistic curve
    pub loser_base: f64,
    /// Rating gap that moves the curve by one power of its base
    pub spread: f64,
    pub score_floor: f64,
    pub elite_bonus: f64,
    pub placement_scale: f64,
    pub placement_flat_bonus: f64,
    pub no_data_percent: f64,
    pub min_meetings: i64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            winner_cap: 5.0,
            winner_base: 5.0,
            loser_cap: 3.0,
            loser_base: 10.0,
            spread: 80.0,
            score_floor: 60.0,
            elite_bonus: 5.0,
            placement_scale: 30.0,
            placement_flat_bonus: 3.0,
            no_data_percent: -5.0,
            min_meetings: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub rate_limit_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub api_base_url: &'static str,
    pub api_key: Option<String>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            rate_limit_ms: 100, // 10 req/sec
            user_agent: "SmashNightRatings/1.0",
            timeout_secs: 30,
            api_base_url: "https://api.challonge.com/v1",
            api_key: std::env::var("CHALLONGE_API_KEY").ok(),
        }
    }
}

/// Parameters of the manual score reset
#[derive(Debug, Clone)]
pub struct ResetSettings {
    pub max_score: f64,
    pub min_score: f64,
    pub interval: f64,
    pub unranked_rank: i64,
}

impl Default for ResetSettings {
    fn default() -> Self {
        Self {
            max_score: 200.0,
            min_score: 60.0,
            interval: 10.0,
            unranked_rank: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub feed: FeedSettings,
    pub reset: ResetSettings,
    pub database_path: String,
    pub cache_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            feed: FeedSettings::default(),
            reset: ResetSettings::default(),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "smashnight.db".to_string()),
            cache_dir: std::env::var("CACHE_DIR").unwrap_or_else(|_| "cache".to_string()),
        }
    }
}
