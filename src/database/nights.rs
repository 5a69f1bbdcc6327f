use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Night;
use crate::domain::season;

const NIGHT_COLUMNS: &str = "id, season, date, title, night_count, completed";

/// Creates a night with the next global night count and its season title
pub fn insert_night(conn: &Connection, season_number: i64, date: NaiveDate) -> Result<Night> {
    let night_count = season::next_night_count(latest_night_count(conn)?);

    let mut counts = season_night_counts(conn, season_number)?;
    counts.push(night_count);
    let sequence = season::season_sequence(night_count, &counts);
    let title = season::night_title(season_number, sequence);

    let sql = format!(
        "INSERT INTO nights (season, date, title, night_count) VALUES (?1, ?2, ?3, ?4) RETURNING {}",
        NIGHT_COLUMNS
    );

    conn.query_row(
        &sql,
        params![season_number, date, title, night_count],
        parse_night_row,
    )
    .context("Failed to insert night")
}

fn parse_night_row(row: &rusqlite::Row) -> rusqlite::Result<Night> {
    Ok(Night {
        id: row.get(0)?,
        season: row.get(1)?,
        date: row.get(2)?,
        title: row.get(3)?,
        night_count: row.get(4)?,
        completed: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Night>> {
    let sql = format!("SELECT {} FROM nights WHERE id = ?1", NIGHT_COLUMNS);

    conn.query_row(&sql, params![id], parse_night_row)
        .optional()
        .context("Failed to query night by id")
}

pub fn latest_night_count(conn: &Connection) -> Result<Option<i64>> {
    conn.query_row("SELECT MAX(night_count) FROM nights", [], |row| row.get(0))
        .context("Failed to query latest night count")
}

pub fn season_night_counts(conn: &Connection, season_number: i64) -> Result<Vec<i64>> {
    let mut stmt =
        conn.prepare("SELECT night_count FROM nights WHERE season = ?1 ORDER BY night_count")?;
    let rows = stmt
        .query_map(params![season_number], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;

    Ok(rows)
}

/// 1-based position of the night within its season
pub fn sequence_in_season(conn: &Connection, night: &Night) -> Result<i64> {
    let counts = season_night_counts(conn, night.season)?;
    Ok(season::season_sequence(night.night_count, &counts))
}

pub fn mark_completed(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("UPDATE nights SET completed = 1 WHERE id = ?1", params![id])
        .context("Failed to mark night completed")?;
    Ok(())
}
