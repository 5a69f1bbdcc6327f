use std::cmp::Reverse;

use crate::rating::types::PlayerId;

use super::scoring::NEVER_MET;

/// How notable `opponent` is for one player
#[derive(Debug, Clone, Copy)]
pub struct OpponentView {
    pub opponent: PlayerId,
    pub rival_score: f64,
    pub demon_score: f64,
    /// Distance between the two players' ranks; closer breaks ties
    pub rank_gap: i64,
}

/// Opponent with the highest demon score among those ever played
pub fn pick_demon(candidates: &[OpponentView]) -> Option<PlayerId> {
    best_by(candidates, |view| view.demon_score).first().copied()
}

/// The two opponents with the highest rival scores
pub fn pick_rivals(candidates: &[OpponentView]) -> (Option<PlayerId>, Option<PlayerId>) {
    let ordered = best_by(candidates, |view| view.rival_score);
    (ordered.first().copied(), ordered.get(1).copied())
}

fn best_by(candidates: &[OpponentView], score: impl Fn(&OpponentView) -> f64) -> Vec<PlayerId> {
    let mut played: Vec<&OpponentView> = candidates
        .iter()
        .filter(|view| score(view) > NEVER_MET)
        .collect();
    played.sort_by(|a, b| {
        score(b)
            .total_cmp(&score(a))
            .then(a.rank_gap.cmp(&b.rank_gap))
            .then(a.opponent.cmp(&b.opponent))
    });
    played.into_iter().map(|view| view.opponent).collect()
}

/// Rank distance, treating unranked players as far away
pub fn rank_gap(a: Option<i64>, b: Option<i64>) -> i64 {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs(),
        _ => i64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(opponent: PlayerId, rival_score: f64, demon_score: f64, rank_gap: i64) -> OpponentView {
        OpponentView {
            opponent,
            rival_score,
            demon_score,
            rank_gap,
        }
    }

    #[test]
    fn test_demon_is_highest_demon_score() {
        let views = vec![view(2, 50.0, 10.0, 1), view(3, 20.0, 224.0, 5), view(4, 0.0, NEVER_MET, 0)];
        assert_eq!(pick_demon(&views), Some(3));
    }

    #[test]
    fn test_ties_go_to_closest_rank() {
        let views = vec![view(2, 40.0, 30.0, 6), view(3, 40.0, 30.0, 2)];
        assert_eq!(pick_demon(&views), Some(3));
        assert_eq!(pick_rivals(&views), (Some(3), Some(2)));
    }

    #[test]
    fn test_never_met_opponents_are_not_picked() {
        let views = vec![view(2, NEVER_MET, NEVER_MET, 1)];
        assert_eq!(pick_demon(&views), None);
        assert_eq!(pick_rivals(&views), (None, None));
    }

    #[test]
    fn test_rank_gap() {
        assert_eq!(rank_gap(Some(3), Some(7)), 4);
        assert_eq!(rank_gap(None, Some(1)), i64::MAX);
    }
}
