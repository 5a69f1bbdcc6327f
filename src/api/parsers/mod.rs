mod feed;

pub use feed::{parse_matches, parse_participants, tournament_key};
