use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Matchup;
use crate::matchup::PairTotals;
use crate::rating::types::PlayerId;

const MATCHUP_COLUMNS: &str = "id, px_id, py_id, px_wins, py_wins, px_additional_wins, py_additional_wins, px_set_wins, py_set_wins, px_additional_set_wins, py_additional_set_wins, rival_score, demon_score, matchup_type_id, set_matchup_type_id";

/// Writes computed totals; the manual additional counters are never touched
pub fn upsert_totals(
    conn: &Connection,
    px_id: PlayerId,
    py_id: PlayerId,
    totals: &PairTotals,
) -> Result<()> {
    conn.execute(
        "INSERT INTO matchups (px_id, py_id, px_wins, py_wins, px_set_wins, py_set_wins) VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT (px_id, py_id) DO UPDATE SET px_wins = excluded.px_wins, py_wins = excluded.py_wins, px_set_wins = excluded.px_set_wins, py_set_wins = excluded.py_set_wins",
        params![
            px_id,
            py_id,
            totals.px_wins,
            totals.py_wins,
            totals.px_set_wins,
            totals.py_set_wins
        ],
    )
    .context("Failed to upsert matchup totals")?;
    Ok(())
}

fn parse_matchup_row(row: &rusqlite::Row) -> rusqlite::Result<Matchup> {
    Ok(Matchup {
        id: row.get(0)?,
        px_id: row.get(1)?,
        py_id: row.get(2)?,
        px_wins: row.get(3)?,
        py_wins: row.get(4)?,
        px_additional_wins: row.get(5)?,
        py_additional_wins: row.get(6)?,
        px_set_wins: row.get(7)?,
        py_set_wins: row.get(8)?,
        px_additional_set_wins: row.get(9)?,
        py_additional_set_wins: row.get(10)?,
        rival_score: row.get(11)?,
        demon_score: row.get(12)?,
        matchup_type_id: row.get(13)?,
        set_matchup_type_id: row.get(14)?,
    })
}

pub fn find(conn: &Connection, px_id: PlayerId, py_id: PlayerId) -> Result<Option<Matchup>> {
    let sql = format!(
        "SELECT {} FROM matchups WHERE px_id = ?1 AND py_id = ?2",
        MATCHUP_COLUMNS
    );

    conn.query_row(&sql, params![px_id, py_id], parse_matchup_row)
        .optional()
        .context("Failed to query matchup")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Matchup>> {
    let sql = format!("SELECT {} FROM matchups ORDER BY px_id, py_id", MATCHUP_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_matchup_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_for_player(conn: &Connection, px_id: PlayerId) -> Result<Vec<Matchup>> {
    let sql = format!(
        "SELECT {} FROM matchups WHERE px_id = ?1 ORDER BY py_id",
        MATCHUP_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![px_id], parse_matchup_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_classification(
    conn: &Connection,
    id: i64,
    rival_score: f64,
    demon_score: f64,
    matchup_type_id: Option<i64>,
    set_matchup_type_id: Option<i64>,
) -> Result<()> {
    conn.execute(
        "UPDATE matchups SET rival_score = ?1, demon_score = ?2, matchup_type_id = ?3, set_matchup_type_id = ?4 WHERE id = ?5",
        params![rival_score, demon_score, matchup_type_id, set_matchup_type_id, id],
    )
    .context("Failed to update matchup classification")?;
    Ok(())
}

/// Sets the manual counters of one direction, creating the row if needed
pub fn set_additional(
    conn: &Connection,
    px_id: PlayerId,
    py_id: PlayerId,
    wins: (i64, i64),
    set_wins: (i64, i64),
) -> Result<()> {
    conn.execute(
        "INSERT INTO matchups (px_id, py_id, px_additional_wins, py_additional_wins, px_additional_set_wins, py_additional_set_wins) VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT (px_id, py_id) DO UPDATE SET px_additional_wins = excluded.px_additional_wins, py_additional_wins = excluded.py_additional_wins, px_additional_set_wins = excluded.px_additional_set_wins, py_additional_set_wins = excluded.py_additional_set_wins",
        params![px_id, py_id, wins.0, wins.1, set_wins.0, set_wins.1],
    )
    .context("Failed to set additional matchup wins")?;
    Ok(())
}
