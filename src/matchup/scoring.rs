use crate::config::settings::RatingSettings;
use crate::database::models::MatchupType;

/// Score of a pair that has never played a game
pub const NEVER_MET: f64 = -1000.0;

/// High for opponents met often with an even record
pub fn rival_score(px_total: i64, py_total: i64) -> f64 {
    if px_total == 0 && py_total == 0 {
        return NEVER_MET;
    }
    (5 * (px_total + py_total) - 6 * (px_total - py_total).abs()) as f64
}

/// High for opponents who beat `px` badly.
///
/// A favourable record barely moves the score; an unfavourable one weighs
/// the opponent's wins heavily.
pub fn demon_score(px_total: i64, py_total: i64) -> f64 {
    if px_total == 0 && py_total == 0 {
        return NEVER_MET;
    }
    if px_total >= py_total {
        py_total as f64 - px_total as f64 / 10.0
    } else {
        (py_total * 25 - px_total * 13) as f64
    }
}

/// Win percentage, or the no-data sentinel below the minimum number of meetings
pub fn win_percent(settings: &RatingSettings, wins: i64, losses: i64) -> f64 {
    let total = wins + losses;
    if total < settings.min_meetings {
        settings.no_data_percent
    } else {
        wins as f64 / total as f64 * 100.0
    }
}

/// The band whose `[lower, upper)` range holds `percent`
pub fn classify(percent: f64, types: &[MatchupType]) -> Option<i64> {
    types
        .iter()
        .find(|t| t.lower_bound <= percent && percent < t.upper_bound)
        .map(|t| t.id)
}
