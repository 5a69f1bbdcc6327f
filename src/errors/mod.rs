use thiserror::Error;

use crate::rating::types::PlayerId;

/// Why a single feed item was left out of a batch; never fatal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("participant {0} is not linked to a known player")]
    UnknownParticipant(i64),
    #[error("match {0} is missing a player")]
    OpenSlot(i64),
    #[error("no player named {0:?}")]
    UnresolvedName(String),
    #[error("name {name:?} matches several players: {candidates:?}")]
    AmbiguousName {
        name: String,
        candidates: Vec<PlayerId>,
    },
    #[error("match {0} has no score")]
    MissingScore(i64),
    #[error("unreadable score string {0:?}")]
    MalformedScore(String),
    #[error("external id {0} is stored more than once")]
    DuplicateExternalId(i64),
    #[error("participant {0:?} has no place in the bracket")]
    Unplaced(String),
}

/// Add context to fetch errors
pub fn fetch_context(url: &str) -> String {
    format!("Failed to fetch from: {}", url)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}
