pub mod ranker;
pub mod rounds;

pub use ranker::{rank_bracket, RankedMatch, Standings};
pub use rounds::round_name;
