use std::sync::LazyLock;

use regex::Regex;

use crate::errors::SkipReason;

// Win counts may be the no-contest sentinel (-1), so "3--1" and "-1-0" are valid.
static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+)-(-?\d+)(?:[,\s].*)?$").expect("score pattern is valid")
});

/// Win counts of one set as reported by the tournament host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScore {
    pub p1_wins: i32,
    pub p2_wins: i32,
}

/// Parses a host score string such as `3-1`, `0--1` or `2-1,1-2`.
///
/// Only the first pair is read; any further per-game fields are ignored.
pub fn parse_scores_csv(scores: &str) -> Result<SetScore, SkipReason> {
    let trimmed = scores.trim();
    let captures = SCORE_PATTERN
        .captures(trimmed)
        .ok_or_else(|| SkipReason::MalformedScore(trimmed.to_string()))?;

    let p1_wins = parse_field(&captures[1], trimmed)?;
    let p2_wins = parse_field(&captures[2], trimmed)?;
    Ok(SetScore { p1_wins, p2_wins })
}

fn parse_field(field: &str, whole: &str) -> Result<i32, SkipReason> {
    field
        .parse::<i32>()
        .map_err(|_| SkipReason::MalformedScore(whole.to_string()))
}
