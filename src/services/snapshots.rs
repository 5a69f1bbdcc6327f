use std::collections::HashMap;

use anyhow::Result;
use log::info;
use rusqlite::Connection;

use crate::database::{self, Night, Player};
use crate::domain::MembershipTag;
use crate::rating::{assign_score_ranks, PlayerId};

/// Score every player starts the night from; `None` for unrated players
pub type StartScores = HashMap<PlayerId, Option<f64>>;

/// Stores start snapshots and returns the night's start scores.
///
/// A player's start score is the end score of their latest earlier night in
/// the same season, or their live score when there is none. Snapshots that
/// already exist are left untouched, so repeated runs start from the same place.
pub fn record_start(conn: &Connection, night: &Night) -> Result<StartScores> {
    let players = database::players::list_all(conn)?;

    let mut starts = Vec::with_capacity(players.len());
    for player in &players {
        let carried = database::snapshots::carryover_score(conn, player.id, night)?;
        starts.push((player, carried.or(player.score)));
    }

    let member_scores: Vec<(PlayerId, f64)> = starts
        .iter()
        .filter(|(player, _)| player.tag == MembershipTag::Member)
        .filter_map(|(player, score)| score.map(|s| (player.id, s)))
        .collect();
    let ranks = assign_score_ranks(&member_scores);

    let mut created = 0;
    for (player, score) in &starts {
        let rank = ranks.get(&player.id).copied();
        if database::snapshots::insert_start_if_missing(conn, night.id, player.id, rank, *score)? {
            created += 1;
        }
    }
    info!("  → {} start snapshots ({} already stored)", created, players.len() - created);

    let scores = database::snapshots::list_by_night(conn, night.id)?
        .into_iter()
        .map(|snapshot| (snapshot.player_id, snapshot.start_score))
        .collect();
    Ok(scores)
}

/// Re-ranks members by live score and stores end snapshots for the night
pub fn record_end(conn: &Connection, night: &Night) -> Result<usize> {
    let players = database::players::list_all(conn)?;
    let ranks = update_member_ranks(conn, &players)?;

    for player in &players {
        let rank = ranks.get(&player.id).copied();
        database::snapshots::update_end(conn, night.id, player.id, rank, player.score)?;
    }

    info!("  → {} end snapshots", players.len());
    Ok(players.len())
}

/// Competition ranks over members with a score; everyone else is unranked
pub fn update_member_ranks(conn: &Connection, players: &[Player]) -> Result<HashMap<PlayerId, i64>> {
    let member_scores: Vec<(PlayerId, f64)> = players
        .iter()
        .filter(|p| p.tag == MembershipTag::Member)
        .filter_map(|p| p.score.map(|s| (p.id, s)))
        .collect();
    let ranks = assign_score_ranks(&member_scores);

    for player in players {
        database::players::update_rank(conn, player.id, ranks.get(&player.id).copied())?;
    }
    Ok(ranks)
}
