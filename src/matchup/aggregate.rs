use std::collections::{BTreeMap, HashSet};

use crate::rating::types::PlayerId;

/// Who played whom and how many games each side took
#[derive(Debug, Clone, Copy)]
pub struct HeadToHead {
    pub p1: PlayerId,
    pub p2: PlayerId,
    pub p1_wins: i32,
    pub p2_wins: i32,
}

/// Computed record of `px` against `py`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairTotals {
    pub px_wins: i64,
    pub py_wins: i64,
    pub px_set_wins: i64,
    pub py_set_wins: i64,
}

impl PairTotals {
    /// The same record seen from `py`'s side
    pub fn mirrored(&self) -> Self {
        Self {
            px_wins: self.py_wins,
            py_wins: self.px_wins,
            px_set_wins: self.py_set_wins,
            py_set_wins: self.px_set_wins,
        }
    }

    fn add_set(&mut self, px_games: i32, py_games: i32) {
        self.px_wins += px_games.max(0) as i64;
        self.py_wins += py_games.max(0) as i64;
        if px_games > py_games {
            self.px_set_wins += 1;
        } else if py_games > px_games {
            self.py_set_wins += 1;
        }
    }
}

/// Totals for every unordered pair of `players`, keyed `(lower id, higher id)`.
///
/// Pairs that never met are present with zero totals. Sets involving
/// anyone outside `players` are ignored.
pub fn aggregate_pairs(
    players: &[PlayerId],
    history: &[HeadToHead],
) -> BTreeMap<(PlayerId, PlayerId), PairTotals> {
    let mut ids: Vec<PlayerId> = players.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let mut pairs = BTreeMap::new();
    for (idx, &px) in ids.iter().enumerate() {
        for &py in &ids[idx + 1..] {
            pairs.insert((px, py), PairTotals::default());
        }
    }

    let known: HashSet<PlayerId> = ids.iter().copied().collect();
    for set in history {
        if set.p1 == set.p2 || !known.contains(&set.p1) || !known.contains(&set.p2) {
            continue;
        }
        let (key, px_games, py_games) = if set.p1 < set.p2 {
            ((set.p1, set.p2), set.p1_wins, set.p2_wins)
        } else {
            ((set.p2, set.p1), set.p2_wins, set.p1_wins)
        };
        if let Some(totals) = pairs.get_mut(&key) {
            totals.add_set(px_games, py_games);
        }
    }

    pairs
}
