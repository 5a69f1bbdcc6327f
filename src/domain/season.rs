/// Position of a night within its season, 1-based, by global night count
pub fn season_sequence(night_count: i64, season_night_counts: &[i64]) -> i64 {
    season_night_counts
        .iter()
        .filter(|&&count| count <= night_count)
        .count() as i64
}

/// Next globally unique night count
pub fn next_night_count(latest: Option<i64>) -> i64 {
    latest.unwrap_or(0) + 1
}

pub fn night_title(season: i64, sequence: i64) -> String {
    format!("Season {} Night {}", season, sequence)
}

/// Short form such as `5.2`
pub fn short_title(season: i64, sequence: i64) -> String {
    format!("{}.{}", season, sequence)
}
