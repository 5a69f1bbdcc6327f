pub type PlayerId = i64;
pub type RatingValue = f64;

/// Win count recorded for a forfeited or unscored set
pub const NO_CONTEST: i32 = -1;

/// Placement score multiplier; a bracket's rank always dominates the place inside it
pub const BRACKET_RANK_WEIGHT: i64 = 100_000;

pub fn is_no_contest(p1_wins: i32, p2_wins: i32) -> bool {
    p1_wins == NO_CONTEST || p2_wins == NO_CONTEST
}

/// Single orderable key across all brackets of a night; lower is better
pub fn placement_score(bracket_rank: i64, place: i64) -> i64 {
    bracket_rank * BRACKET_RANK_WEIGHT + place
}
