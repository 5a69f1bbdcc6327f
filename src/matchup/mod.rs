pub mod aggregate;
pub mod opponents;
pub mod scoring;

pub use aggregate::{aggregate_pairs, HeadToHead, PairTotals};
pub use opponents::{pick_demon, pick_rivals, rank_gap, OpponentView};
pub use scoring::{classify, demon_score, rival_score, win_percent, NEVER_MET};
