use crate::config::settings::RatingSettings;

use super::types::{is_no_contest, RatingValue};

/// Rating change of one side of a set, using the default curve.
///
/// Positive for the winner, negative for the loser and zero when either
/// side carries the no-contest sentinel.
pub fn compute_score_delta(
    score_self: RatingValue,
    score_opponent: RatingValue,
    wins_self: i32,
    wins_opponent: i32,
) -> RatingValue {
    compute_score_delta_with(
        &RatingSettings::default(),
        score_self,
        score_opponent,
        wins_self,
        wins_opponent,
    )
}

pub fn compute_score_delta_with(
    settings: &RatingSettings,
    score_self: RatingValue,
    score_opponent: RatingValue,
    wins_self: i32,
    wins_opponent: i32,
) -> RatingValue {
    debug_assert!(score_self.is_finite() && score_opponent.is_finite());

    if is_no_contest(wins_self, wins_opponent) {
        return 0.0;
    }

    if wins_self > wins_opponent {
        winner_gain(settings, score_self, score_opponent)
    } else if wins_self < wins_opponent {
        loser_loss(settings, score_self, score_opponent)
    } else {
        0.0
    }
}

/// Deltas for both sides of a set, `(p1, p2)`
pub fn match_deltas(
    settings: &RatingSettings,
    p1_score: RatingValue,
    p2_score: RatingValue,
    p1_wins: i32,
    p2_wins: i32,
) -> (RatingValue, RatingValue) {
    (
        compute_score_delta_with(settings, p1_score, p2_score, p1_wins, p2_wins),
        compute_score_delta_with(settings, p2_score, p1_score, p2_wins, p1_wins),
    )
}

fn winner_gain(settings: &RatingSettings, winner: RatingValue, loser: RatingValue) -> RatingValue {
    let exponent = (loser - winner) / settings.spread;
    settings.winner_cap * (1.0 - 1.0 / (1.0 + settings.winner_base.powf(exponent)))
}

fn loser_loss(settings: &RatingSettings, loser: RatingValue, winner: RatingValue) -> RatingValue {
    let exponent = (loser - winner) / settings.spread;
    -settings.loser_cap * (1.0 / (1.0 + settings.loser_base.powf(exponent)))
}
