use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Night, Snapshot};
use crate::rating::types::PlayerId;

const SNAPSHOT_COLUMNS: &str = "id, night_id, player_id, start_rank, end_rank, start_score, end_score";

fn parse_snapshot_row(row: &rusqlite::Row) -> rusqlite::Result<Snapshot> {
    Ok(Snapshot {
        id: row.get(0)?,
        night_id: row.get(1)?,
        player_id: row.get(2)?,
        start_rank: row.get(3)?,
        end_rank: row.get(4)?,
        start_score: row.get(5)?,
        end_score: row.get(6)?,
    })
}

/// Records the start values once; an existing snapshot keeps its start values
pub fn insert_start_if_missing(
    conn: &Connection,
    night_id: i64,
    player_id: PlayerId,
    start_rank: Option<i64>,
    start_score: Option<f64>,
) -> Result<bool> {
    let inserted = conn
        .execute(
            "INSERT INTO snapshots (night_id, player_id, start_rank, start_score) VALUES (?1, ?2, ?3, ?4) ON CONFLICT (night_id, player_id) DO NOTHING",
            params![night_id, player_id, start_rank, start_score],
        )
        .context("Failed to insert start snapshot")?;
    Ok(inserted > 0)
}

pub fn update_end(
    conn: &Connection,
    night_id: i64,
    player_id: PlayerId,
    end_rank: Option<i64>,
    end_score: Option<f64>,
) -> Result<()> {
    conn.execute(
        "UPDATE snapshots SET end_rank = ?1, end_score = ?2 WHERE night_id = ?3 AND player_id = ?4",
        params![end_rank, end_score, night_id, player_id],
    )
    .context("Failed to update end snapshot")?;
    Ok(())
}

pub fn find(conn: &Connection, night_id: i64, player_id: PlayerId) -> Result<Option<Snapshot>> {
    let sql = format!(
        "SELECT {} FROM snapshots WHERE night_id = ?1 AND player_id = ?2",
        SNAPSHOT_COLUMNS
    );

    conn.query_row(&sql, params![night_id, player_id], parse_snapshot_row)
        .optional()
        .context("Failed to query snapshot")
}

pub fn list_by_night(conn: &Connection, night_id: i64) -> Result<Vec<Snapshot>> {
    let sql = format!(
        "SELECT {} FROM snapshots WHERE night_id = ?1 ORDER BY player_id",
        SNAPSHOT_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![night_id], parse_snapshot_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// End score of the player's latest earlier night in the same season
pub fn carryover_score(conn: &Connection, player_id: PlayerId, night: &Night) -> Result<Option<f64>> {
    let sql = "
        SELECT s.end_score
        FROM snapshots s
        JOIN nights n ON s.night_id = n.id
        WHERE s.player_id = ?1
          AND n.season = ?2
          AND n.night_count < ?3
          AND s.end_score IS NOT NULL
        ORDER BY n.night_count DESC
        LIMIT 1
    ";

    conn.query_row(sql, params![player_id, night.season, night.night_count], |row| row.get(0))
        .optional()
        .context("Failed to query carryover score")
}
