pub mod challonge_client;
pub mod parsers;

pub use challonge_client::ChallongeClient;
pub use parsers::tournament_key;
