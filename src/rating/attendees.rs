use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::config::settings::RatingSettings;
use crate::domain::PlayerStatus;

use super::types::{placement_score, PlayerId, RatingValue};

/// One final place of a player in one of the night's brackets
#[derive(Debug, Clone, Copy)]
pub struct PlacementEntry {
    pub player_id: PlayerId,
    pub bracket_rank: i64,
    pub place: i64,
}

/// What the ranker needs to know about a player besides placements
#[derive(Debug, Clone, Copy)]
pub struct AttendeeProfile {
    pub start_score: Option<RatingValue>,
    pub status: PlayerStatus,
    /// Sum of this player's rating deltas over the night's matches
    pub match_delta: RatingValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttendeeStanding {
    pub player_id: PlayerId,
    pub start_seed: i64,
    pub end_seed: i64,
    pub start_score: RatingValue,
    pub end_score: RatingValue,
}

/// Seeds, scores and bonuses for everyone placed in any of the night's brackets
pub fn rank_attendees(
    placements: &[PlacementEntry],
    profiles: &HashMap<PlayerId, AttendeeProfile>,
    settings: &RatingSettings,
) -> Result<Vec<AttendeeStanding>> {
    let best = best_placement_scores(placements);
    let start_scores = collect_start_scores(&best, profiles)?;
    let start_seeds = start_seeds(&start_scores);
    let end_seeds = end_seeds(&best);
    let headcount = best.len();

    let mut standings: Vec<AttendeeStanding> = start_scores
        .iter()
        .map(|&(player_id, start_score)| {
            let profile = &profiles[&player_id];
            let start_seed = start_seeds[&player_id];
            let end_seed = end_seeds[&player_id];
            let bonus = placement_bonus(settings, start_seed, end_seed, headcount, profile.status);
            let computed = start_score + profile.match_delta + bonus;

            AttendeeStanding {
                player_id,
                start_seed,
                end_seed,
                start_score,
                end_score: computed.max(settings.score_floor),
            }
        })
        .collect();

    standings.sort_by_key(|s| (s.end_seed, s.start_seed));
    Ok(standings)
}

/// Bonus for finishing at or above seed, scaled by night size, plus the elite bonus
pub fn placement_bonus(
    settings: &RatingSettings,
    start_seed: i64,
    end_seed: i64,
    headcount: usize,
    status: PlayerStatus,
) -> RatingValue {
    let mut bonus = if status == PlayerStatus::Elite {
        settings.elite_bonus
    } else {
        0.0
    };

    if start_seed >= end_seed && headcount > 0 {
        let outperformance = (start_seed - end_seed) as f64 + 0.5;
        bonus += outperformance * settings.placement_scale / headcount as f64
            + settings.placement_flat_bonus;
    }
    bonus
}

/// Best (lowest) placement score of every placed player
fn best_placement_scores(placements: &[PlacementEntry]) -> HashMap<PlayerId, i64> {
    let mut best: HashMap<PlayerId, i64> = HashMap::new();
    for entry in placements {
        let score = placement_score(entry.bracket_rank, entry.place);
        best.entry(entry.player_id)
            .and_modify(|current| *current = (*current).min(score))
            .or_insert(score);
    }
    best
}

fn collect_start_scores(
    best: &HashMap<PlayerId, i64>,
    profiles: &HashMap<PlayerId, AttendeeProfile>,
) -> Result<Vec<(PlayerId, RatingValue)>> {
    let mut ids: Vec<PlayerId> = best.keys().copied().collect();
    ids.sort_unstable();

    let mut scores = Vec::with_capacity(ids.len());
    for player_id in ids {
        let Some(profile) = profiles.get(&player_id) else {
            bail!("No attendee profile for player {}", player_id);
        };
        let Some(score) = profile.start_score else {
            bail!("Player {} has no score to start the night from", player_id);
        };
        scores.push((player_id, score));
    }
    Ok(scores)
}

/// 1-based rank by descending start score; equal scores keep player-id order
fn start_seeds(start_scores: &[(PlayerId, RatingValue)]) -> HashMap<PlayerId, i64> {
    let mut sorted = start_scores.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    sorted
        .iter()
        .enumerate()
        .map(|(idx, &(player_id, _))| (player_id, idx as i64 + 1))
        .collect()
}

/// 1 + number of players with a strictly better best placement score
fn end_seeds(best: &HashMap<PlayerId, i64>) -> HashMap<PlayerId, i64> {
    let mut scores: Vec<i64> = best.values().copied().collect();
    scores.sort_unstable();

    best.iter()
        .map(|(&player_id, &score)| {
            let better = scores.partition_point(|&other| other < score);
            (player_id, better as i64 + 1)
        })
        .collect()
}
