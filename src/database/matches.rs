use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::{Match, NewMatch};
use crate::domain::MatchKind;

const MATCH_COLUMNS: &str = "id, night_id, bracket_id, p1_id, p2_id, p1_score, p2_score, p1_wins, p2_wins, p1_score_change, p2_score_change, external_id, round, kind";

pub fn insert_match(conn: &Connection, new_match: &NewMatch) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (night_id, bracket_id, p1_id, p2_id, p1_score, p2_score, p1_wins, p2_wins, p1_score_change, p2_score_change, external_id, round, kind) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) RETURNING {}",
        MATCH_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            new_match.night_id,
            new_match.bracket_id,
            new_match.p1_id,
            new_match.p2_id,
            new_match.p1_score,
            new_match.p2_score,
            new_match.p1_wins,
            new_match.p2_wins,
            new_match.p1_score_change,
            new_match.p2_score_change,
            new_match.external_id,
            new_match.round,
            new_match.kind
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        night_id: row.get(1)?,
        bracket_id: row.get(2)?,
        p1_id: row.get(3)?,
        p2_id: row.get(4)?,
        p1_score: row.get(5)?,
        p2_score: row.get(6)?,
        p1_wins: row.get(7)?,
        p2_wins: row.get(8)?,
        p1_score_change: row.get(9)?,
        p2_score_change: row.get(10)?,
        external_id: row.get(11)?,
        round: row.get(12)?,
        kind: row.get(13)?,
    })
}

fn query_matches(conn: &Connection, filter: &str, value: i64) -> Result<Vec<Match>> {
    let sql = format!("SELECT {} FROM matches WHERE {} ORDER BY id", MATCH_COLUMNS, filter);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![value], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Every stored match carrying this tournament-host id
pub fn find_by_external_id(conn: &Connection, external_id: i64) -> Result<Vec<Match>> {
    query_matches(conn, "external_id = ?1", external_id)
        .context("Failed to query matches by external id")
}

pub fn list_by_bracket(conn: &Connection, bracket_id: i64) -> Result<Vec<Match>> {
    query_matches(conn, "bracket_id = ?1", bracket_id).context("Failed to list bracket matches")
}

pub fn list_by_night(conn: &Connection, night_id: i64) -> Result<Vec<Match>> {
    query_matches(conn, "night_id = ?1", night_id).context("Failed to list night matches")
}

pub fn list_by_night_and_kind(conn: &Connection, night_id: i64, kind: MatchKind) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {} FROM matches WHERE night_id = ?1 AND kind = ?2 ORDER BY id",
        MATCH_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![night_id, kind], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// All matches where both players still exist
pub fn list_with_players(conn: &Connection) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {} FROM matches WHERE p1_id IS NOT NULL AND p2_id IS NOT NULL ORDER BY id",
        MATCH_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Stores a new result; the pinned pre-match scores are left alone
pub fn update_result(
    conn: &Connection,
    id: i64,
    p1_wins: i32,
    p2_wins: i32,
    round: Option<i32>,
    deltas: (f64, f64),
) -> Result<()> {
    conn.execute(
        "UPDATE matches SET p1_wins = ?1, p2_wins = ?2, round = ?3, p1_score_change = ?4, p2_score_change = ?5, kind = ?6 WHERE id = ?7",
        params![p1_wins, p2_wins, round, deltas.0, deltas.1, MatchKind::Bracket, id],
    )
    .context("Failed to update match result")?;
    Ok(())
}

/// Re-pins the pre-match scores and their deltas
pub fn update_pinned_scores(
    conn: &Connection,
    id: i64,
    scores: (f64, f64),
    deltas: (f64, f64),
) -> Result<()> {
    conn.execute(
        "UPDATE matches SET p1_score = ?1, p2_score = ?2, p1_score_change = ?3, p2_score_change = ?4 WHERE id = ?5",
        params![scores.0, scores.1, deltas.0, deltas.1, id],
    )
    .context("Failed to update pinned match scores")?;
    Ok(())
}
