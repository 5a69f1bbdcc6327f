use std::cmp::Reverse;
use std::collections::HashMap;

use log::debug;

use crate::domain::BracketKind;
use crate::rating::types::PlayerId;

/// The parts of a stored set the ranker looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMatch {
    pub external_id: Option<i64>,
    pub round: i32,
    pub p1: PlayerId,
    pub p2: PlayerId,
    pub p1_wins: i32,
    pub p2_wins: i32,
}

impl RankedMatch {
    /// `(winner, loser)` when the set has a winner
    pub fn decisive(&self) -> Option<(PlayerId, PlayerId)> {
        if self.p1_wins > self.p2_wins {
            Some((self.p1, self.p2))
        } else if self.p2_wins > self.p1_wins {
            Some((self.p2, self.p1))
        } else {
            None
        }
    }

    fn sides(&self) -> [(PlayerId, bool); 2] {
        [
            (self.p1, self.p1_wins > self.p2_wins),
            (self.p2, self.p2_wins > self.p1_wins),
        ]
    }
}

pub type Standings = HashMap<PlayerId, i64>;

/// Final places (1 = best) of everyone who played in the bracket
pub fn rank_bracket(kind: BracketKind, matches: &[RankedMatch]) -> Standings {
    match kind {
        BracketKind::Standard => rank_elimination(matches),
        BracketKind::RoundRobin => rank_round_robin(matches),
    }
}

/// Rebuilds single/double elimination standings from round depth alone.
///
/// The deepest winners-side set is the final. The rest is walked from the
/// deepest round outwards, losers side first; within a round, new winners
/// are placed ahead of new losers.
fn rank_elimination(matches: &[RankedMatch]) -> Standings {
    let mut standings = Standings::new();
    let Some(final_match) = matches
        .iter()
        .max_by_key(|m| (m.round, m.external_id.unwrap_or(i64::MIN)))
    else {
        return standings;
    };

    let mut place = 1;
    if let Some((winner, loser)) = final_match.decisive() {
        for player in [winner, loser] {
            if !standings.contains_key(&player) {
                standings.insert(player, place);
                place += 1;
            }
        }
    }

    let mut ordered: Vec<&RankedMatch> = matches.iter().collect();
    ordered.sort_by_key(|m| (m.round > 0, Reverse(m.round.unsigned_abs()), m.external_id));

    let mut walk = RoundWalk::new(place);
    for m in ordered {
        walk.enter_round(m.round, &mut standings);
        for (player, won) in m.sides() {
            walk.see(player, won, &standings);
        }
    }
    walk.flush(&mut standings);

    debug!("Ranked elimination bracket: {} players", standings.len());
    standings
}

struct RoundWalk {
    place: i64,
    current_round: Option<i32>,
    winners: Vec<PlayerId>,
    losers: Vec<PlayerId>,
}

impl RoundWalk {
    fn new(place: i64) -> Self {
        Self {
            place,
            current_round: None,
            winners: Vec::new(),
            losers: Vec::new(),
        }
    }

    fn enter_round(&mut self, round: i32, standings: &mut Standings) {
        if self.current_round != Some(round) {
            self.flush(standings);
            self.current_round = Some(round);
        }
    }

    fn see(&mut self, player: PlayerId, won: bool, standings: &Standings) {
        if standings.contains_key(&player)
            || self.winners.contains(&player)
            || self.losers.contains(&player)
        {
            return;
        }
        if won {
            self.winners.push(player);
        } else {
            self.losers.push(player);
        }
    }

    fn flush(&mut self, standings: &mut Standings) {
        for bucket in [&mut self.winners, &mut self.losers] {
            let size = bucket.len() as i64;
            for player in bucket.drain(..) {
                standings.insert(player, self.place);
            }
            self.place += size;
        }
    }
}

const SET_WIN_POINTS: i64 = 1000;
const MARGIN_POINTS: i64 = 10;

/// Round robin points: set wins dominate, then margin, then raw game wins.
/// Equal points share a place and the next group takes the following place.
fn rank_round_robin(matches: &[RankedMatch]) -> Standings {
    let mut points: HashMap<PlayerId, i64> = HashMap::new();

    for m in matches {
        let p1_games = m.p1_wins.max(0) as i64;
        let p2_games = m.p2_wins.max(0) as i64;

        *points.entry(m.p1).or_insert(0) += p1_games;
        *points.entry(m.p2).or_insert(0) += p2_games;

        if let Some((winner, _)) = m.decisive() {
            let margin = (p1_games - p2_games).abs();
            *points.entry(winner).or_insert(0) += SET_WIN_POINTS + MARGIN_POINTS * margin;
        }
    }

    let mut table: Vec<(PlayerId, i64)> = points.into_iter().collect();
    table.sort_by_key(|&(player, score)| (Reverse(score), player));

    let mut standings = Standings::new();
    let mut place = 0;
    let mut previous = None;
    for (player, score) in table {
        if previous != Some(score) {
            place += 1;
            previous = Some(score);
        }
        standings.insert(player, place);
    }
    standings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(id: i64, round: i32, p1: PlayerId, p2: PlayerId, p1_wins: i32, p2_wins: i32) -> RankedMatch {
        RankedMatch {
            external_id: Some(id),
            round,
            p1,
            p2,
            p1_wins,
            p2_wins,
        }
    }

    #[test]
    fn test_four_player_single_elimination() {
        let matches = vec![
            set(1, 1, 1, 4, 2, 0),
            set(2, 1, 2, 3, 1, 2),
            set(3, 2, 1, 3, 1, 2),
        ];

        let standings = rank_bracket(BracketKind::Standard, &matches);

        assert_eq!(standings[&3], 1);
        assert_eq!(standings[&1], 2);
        assert_eq!(standings[&2], 3);
        assert_eq!(standings[&4], 3);
        assert_eq!(rank_bracket(BracketKind::Standard, &matches), standings);
    }

    #[test]
    fn test_eight_player_single_elimination_matches_host_places() {
        let matches = vec![
            set(1, 1, 1, 8, 2, 0),
            set(2, 1, 4, 5, 2, 1),
            set(3, 1, 2, 7, 2, 0),
            set(4, 1, 3, 6, 0, 2),
            set(5, 2, 1, 4, 2, 0),
            set(6, 2, 2, 6, 2, 1),
            set(7, 3, 1, 2, 3, 2),
        ];

        let standings = rank_bracket(BracketKind::Standard, &matches);

        assert_eq!(standings[&1], 1);
        assert_eq!(standings[&2], 2);
        assert_eq!((standings[&4], standings[&6]), (3, 3));
        for loser in [8, 5, 7, 3] {
            assert_eq!(standings[&loser], 5);
        }
    }

    #[test]
    fn test_double_elimination_walks_losers_side() {
        // Winners: R1 1>2, 3>4; R2 1>3. Losers: -1 2>4; -2 3>2. Grand final R3 1>3.
        let matches = vec![
            set(1, 1, 1, 2, 2, 0),
            set(2, 1, 3, 4, 2, 1),
            set(3, 2, 1, 3, 2, 1),
            set(4, -1, 2, 4, 2, 0),
            set(5, -2, 3, 2, 2, 1),
            set(6, 3, 1, 3, 3, 1),
        ];

        let standings = rank_bracket(BracketKind::Standard, &matches);

        assert_eq!(standings[&1], 1);
        assert_eq!(standings[&3], 2);
        assert_eq!(standings[&2], 3);
        assert_eq!(standings[&4], 4);
    }

    #[test]
    fn test_single_match_bracket() {
        let standings = rank_bracket(BracketKind::Standard, &[set(9, 1, 5, 6, 0, 3)]);
        assert_eq!(standings.len(), 2);
        assert_eq!(standings[&6], 1);
        assert_eq!(standings[&5], 2);
    }

    #[test]
    fn test_final_ties_broken_by_external_id() {
        // Two sets share the deepest round; the later id is the final.
        let matches = vec![set(10, 2, 1, 2, 2, 0), set(11, 2, 3, 1, 2, 1)];
        let standings = rank_bracket(BracketKind::Standard, &matches);
        assert_eq!(standings[&3], 1);
        assert_eq!(standings[&1], 2);
        assert_eq!(standings[&2], 3);
    }

    #[test]
    fn test_empty_bracket_has_no_standings() {
        assert!(rank_bracket(BracketKind::Standard, &[]).is_empty());
        assert!(rank_bracket(BracketKind::RoundRobin, &[]).is_empty());
    }

    #[test]
    fn test_round_robin_points_and_dense_places() {
        // 1 wins both of its sets. 2 and 3 take two sets each with equal margins, 3 on more games.
        let matches = vec![
            set(1, 1, 1, 2, 2, 0),
            set(2, 1, 1, 3, 2, 1),
            set(3, 2, 2, 4, 2, 1),
            set(4, 2, 3, 4, 2, 1),
            set(5, 3, 2, 3, 2, 1),
            set(6, 3, 4, 3, 1, 2),
        ];

        let standings = rank_bracket(BracketKind::RoundRobin, &matches);

        assert_eq!(standings[&1], 1);
        // 2: 2 sets, margins 1+1, games 0+2+2 = 2024; 3: 2 sets, margins 1+1, games 1+2+1+2 -> 2026
        assert_eq!(standings[&3], 2);
        assert_eq!(standings[&2], 3);
        assert_eq!(standings[&4], 4);
    }

    #[test]
    fn test_round_robin_ties_do_not_skip_places() {
        let matches = vec![
            set(1, 1, 1, 3, 2, 0),
            set(2, 1, 2, 3, 2, 0),
            set(3, 2, 1, 2, 1, 1),
        ];

        let standings = rank_bracket(BracketKind::RoundRobin, &matches);

        assert_eq!(standings[&1], 1);
        assert_eq!(standings[&2], 1);
        assert_eq!(standings[&3], 2);
    }

    #[test]
    fn test_round_robin_forfeit_games_count_as_zero() {
        let standings = rank_bracket(BracketKind::RoundRobin, &[set(1, 1, 1, 2, -1, 0)]);
        assert_eq!(standings[&2], 1);
        assert_eq!(standings[&1], 2);
    }
}
