use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

use crate::config::RatingSettings;
use crate::database::{self, Night};
use crate::rating::{rank_attendees, AttendeeProfile, AttendeeStanding, PlayerId};

use super::snapshots::StartScores;

/// Each player's summed rating deltas over the night's matches
pub fn night_deltas(conn: &Connection, night: &Night) -> Result<HashMap<PlayerId, f64>> {
    let mut deltas: HashMap<PlayerId, f64> = HashMap::new();
    for m in database::matches::list_by_night(conn, night.id)? {
        if let Some(p1) = m.p1_id {
            *deltas.entry(p1).or_default() += m.p1_score_change;
        }
        if let Some(p2) = m.p2_id {
            *deltas.entry(p2).or_default() += m.p2_score_change;
        }
    }
    Ok(deltas)
}

/// Ranks and stores every player placed in one of the night's brackets
pub fn rank_night_attendees(
    conn: &Connection,
    night: &Night,
    start_scores: &StartScores,
    deltas: &HashMap<PlayerId, f64>,
    settings: &RatingSettings,
) -> Result<Vec<AttendeeStanding>> {
    let placements = database::placements::list_entries_by_night(conn, night.id)?;

    let mut profiles = HashMap::new();
    for entry in &placements {
        if profiles.contains_key(&entry.player_id) {
            continue;
        }
        let player = database::players::find_by_id(conn, entry.player_id)?
            .with_context(|| format!("Placed player {} no longer exists", entry.player_id))?;
        let start_score = start_scores.get(&player.id).copied().flatten().or(player.score);

        profiles.insert(
            player.id,
            AttendeeProfile {
                start_score,
                status: player.status,
                match_delta: deltas.get(&player.id).copied().unwrap_or(0.0),
            },
        );
    }

    let standings = rank_attendees(&placements, &profiles, settings)?;
    for standing in &standings {
        database::attendees::upsert_attendee(conn, night.id, standing)?;
        debug!(
            "  Attendee {}: seed {} → {}, score {:.1} → {:.1}",
            standing.player_id, standing.start_seed, standing.end_seed, standing.start_score, standing.end_score
        );
    }

    info!("  → {} attendees ranked", standings.len());
    Ok(standings)
}

/// Moves every player who took part in the night onto their new score.
///
/// Attendees take their end score; players who only have matches (such as
/// challenge matches) take their start score plus their deltas, without a
/// bonus or floor.
pub fn apply_night_scores(
    conn: &Connection,
    standings: &[AttendeeStanding],
    start_scores: &StartScores,
    deltas: &HashMap<PlayerId, f64>,
) -> Result<usize> {
    for standing in standings {
        database::players::update_score(conn, standing.player_id, standing.end_score)?;
    }

    let mut scorers: Vec<(PlayerId, f64)> = deltas
        .iter()
        .map(|(&id, &delta)| (id, delta))
        .filter(|(id, _)| !standings.iter().any(|s| s.player_id == *id))
        .collect();
    scorers.sort_by_key(|(id, _)| *id);

    for &(player_id, delta) in &scorers {
        let start = start_scores
            .get(&player_id)
            .copied()
            .flatten()
            .with_context(|| format!("Player {} has no rating to update", player_id))?;
        database::players::update_score(conn, player_id, start + delta)?;
    }

    info!(
        "  → Scores updated for {} attendees and {} other match players",
        standings.len(),
        scorers.len()
    );
    Ok(standings.len() + scorers.len())
}
