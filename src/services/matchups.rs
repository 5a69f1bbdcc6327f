use std::collections::HashSet;

use anyhow::Result;
use log::info;
use rusqlite::Connection;

use crate::config::RatingSettings;
use crate::database::{self, Player};
use crate::matchup::{
    aggregate_pairs, classify, demon_score, pick_demon, pick_rivals, rank_gap, rival_score,
    win_percent, HeadToHead, OpponentView,
};
use crate::rating::PlayerId;

/// Rebuilds the computed totals of every ordered pair of `players`.
///
/// Both directions are written as exact mirrors; the manual additional
/// counters are left as they are. Classification runs afterwards over
/// every stored row.
pub fn rebuild_matchup_table(conn: &Connection, players: &[Player], settings: &RatingSettings) -> Result<usize> {
    let ids: Vec<PlayerId> = players.iter().map(|p| p.id).collect();
    let history: Vec<HeadToHead> = database::matches::list_with_players(conn)?
        .iter()
        .filter_map(|m| {
            let (p1, p2) = m.players()?;
            Some(HeadToHead {
                p1,
                p2,
                p1_wins: m.p1_wins,
                p2_wins: m.p2_wins,
            })
        })
        .collect();

    let pairs = aggregate_pairs(&ids, &history);
    for (&(px, py), totals) in &pairs {
        database::matchups::upsert_totals(conn, px, py, totals)?;
        database::matchups::upsert_totals(conn, py, px, &totals.mirrored())?;
    }
    info!("  → {} matchup pairs from {} sets", pairs.len(), history.len());

    classify_matchups(conn, settings)
}

/// Recomputes rival/demon scores and win-percent bands for every stored row
pub fn classify_matchups(conn: &Connection, settings: &RatingSettings) -> Result<usize> {
    let types = database::matchup_types::list_all(conn)?;
    let rows = database::matchups::list_all(conn)?;

    for row in &rows {
        let (px, py) = (row.px_total_wins(), row.py_total_wins());
        let game_percent = win_percent(settings, px, py);
        let set_percent = win_percent(settings, row.px_total_set_wins(), row.py_total_set_wins());

        database::matchups::update_classification(
            conn,
            row.id,
            rival_score(px, py),
            demon_score(px, py),
            classify(game_percent, &types),
            classify(set_percent, &types),
        )?;
    }

    Ok(rows.len())
}

/// Picks each member's two rivals and demon among the other members
pub fn assign_opponents(conn: &Connection) -> Result<usize> {
    let members = database::players::list_members(conn)?;
    let member_ids: HashSet<PlayerId> = members.iter().map(|m| m.id).collect();

    for member in &members {
        let views: Vec<OpponentView> = database::matchups::list_for_player(conn, member.id)?
            .iter()
            .filter(|row| row.py_id != member.id && member_ids.contains(&row.py_id))
            .map(|row| OpponentView {
                opponent: row.py_id,
                rival_score: row.rival_score,
                demon_score: row.demon_score,
                rank_gap: rank_gap(member.rank, rank_of(&members, row.py_id)),
            })
            .collect();

        let (rival_1, rival_2) = pick_rivals(&views);
        let demon = pick_demon(&views);
        database::players::update_opponents(conn, member.id, rival_1, rival_2, demon)?;
    }

    info!("  → Rivals and demons set for {} members", members.len());
    Ok(members.len())
}

fn rank_of(players: &[Player], id: PlayerId) -> Option<i64> {
    players.iter().find(|p| p.id == id).and_then(|p| p.rank)
}
