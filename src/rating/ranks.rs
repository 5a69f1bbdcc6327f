use std::collections::HashMap;

use crate::config::settings::ResetSettings;

use super::types::{PlayerId, RatingValue};

/// Competition ranking by descending score: ties share a rank and the next
/// rank skips by the size of the tie (1, 1, 3).
pub fn assign_score_ranks(scores: &[(PlayerId, RatingValue)]) -> HashMap<PlayerId, i64> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut ranks = HashMap::with_capacity(sorted.len());
    let mut previous: Option<RatingValue> = None;
    let mut current_rank = 0;

    for (idx, &(player_id, score)) in sorted.iter().enumerate() {
        if previous != Some(score) {
            current_rank = idx as i64 + 1;
            previous = Some(score);
        }
        ranks.insert(player_id, current_rank);
    }
    ranks
}

/// Score a member is reset to from their rank
pub fn reset_score(rank: Option<i64>, settings: &ResetSettings) -> RatingValue {
    let rank = rank.unwrap_or(settings.unranked_rank);
    (settings.max_score - (rank - 1) as f64 * settings.interval).max(settings.min_score)
}
