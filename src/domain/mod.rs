pub mod models;
pub mod names;
mod progress;
pub mod scores;
pub mod season;

pub use models::*;
pub use names::NameIndex;
pub use progress::FetchProgress;
pub use scores::{parse_scores_csv, SetScore};
