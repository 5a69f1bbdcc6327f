use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::Attendee;
use crate::rating::attendees::AttendeeStanding;

const ATTENDEE_COLUMNS: &str = "id, night_id, player_id, start_seed, end_seed, start_score, end_score";

pub fn upsert_attendee(conn: &Connection, night_id: i64, standing: &AttendeeStanding) -> Result<Attendee> {
    let sql = format!(
        "INSERT INTO attendees (night_id, player_id, start_seed, end_seed, start_score, end_score) VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT (night_id, player_id) DO UPDATE SET start_seed = excluded.start_seed, end_seed = excluded.end_seed, start_score = excluded.start_score, end_score = excluded.end_score \
         RETURNING {}",
        ATTENDEE_COLUMNS
    );

    conn.query_row(
        &sql,
        params![
            night_id,
            standing.player_id,
            standing.start_seed,
            standing.end_seed,
            standing.start_score,
            standing.end_score
        ],
        parse_attendee_row,
    )
    .context("Failed to upsert attendee")
}

fn parse_attendee_row(row: &rusqlite::Row) -> rusqlite::Result<Attendee> {
    Ok(Attendee {
        id: row.get(0)?,
        night_id: row.get(1)?,
        player_id: row.get(2)?,
        start_seed: row.get(3)?,
        end_seed: row.get(4)?,
        start_score: row.get(5)?,
        end_score: row.get(6)?,
    })
}

/// Attendees of a night in finishing order
pub fn list_by_night(conn: &Connection, night_id: i64) -> Result<Vec<Attendee>> {
    let sql = format!(
        "SELECT {} FROM attendees WHERE night_id = ?1 ORDER BY end_seed, start_seed",
        ATTENDEE_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![night_id], parse_attendee_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
