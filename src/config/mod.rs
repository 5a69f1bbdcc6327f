pub mod matchup_types;
pub mod settings;

pub use matchup_types::{get_matchup_types, MatchupTypeConfig};
pub use settings::{AppConfig, FeedSettings, RatingSettings, ResetSettings};
