use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::{Placement, Seed};
use crate::rating::attendees::PlacementEntry;
use crate::rating::types::PlayerId;

pub fn upsert_seed(
    conn: &Connection,
    bracket_id: i64,
    player_id: PlayerId,
    seed: Option<i32>,
) -> Result<Seed> {
    let sql = "INSERT INTO seeds (bracket_id, player_id, seed) VALUES (?1, ?2, ?3) ON CONFLICT (bracket_id, player_id) DO UPDATE SET seed = excluded.seed RETURNING id, bracket_id, player_id, seed";

    conn.query_row(sql, params![bracket_id, player_id, seed], |row| {
        Ok(Seed {
            id: row.get(0)?,
            bracket_id: row.get(1)?,
            player_id: row.get(2)?,
            seed: row.get(3)?,
        })
    })
    .context("Failed to upsert seed")
}

pub fn upsert_placement(
    conn: &Connection,
    bracket_id: i64,
    player_id: PlayerId,
    place: i64,
) -> Result<Placement> {
    let sql = "INSERT INTO placements (bracket_id, player_id, place) VALUES (?1, ?2, ?3) ON CONFLICT (bracket_id, player_id) DO UPDATE SET place = excluded.place RETURNING id, bracket_id, player_id, place";

    conn.query_row(sql, params![bracket_id, player_id, place], parse_placement_row)
        .context("Failed to upsert placement")
}

fn parse_placement_row(row: &rusqlite::Row) -> rusqlite::Result<Placement> {
    Ok(Placement {
        id: row.get(0)?,
        bracket_id: row.get(1)?,
        player_id: row.get(2)?,
        place: row.get(3)?,
    })
}

pub fn list_by_bracket(conn: &Connection, bracket_id: i64) -> Result<Vec<Placement>> {
    let sql = "SELECT id, bracket_id, player_id, place FROM placements WHERE bracket_id = ?1 ORDER BY place, player_id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![bracket_id], parse_placement_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Every placement of the night together with its bracket's rank
pub fn list_entries_by_night(conn: &Connection, night_id: i64) -> Result<Vec<PlacementEntry>> {
    let sql = "
        SELECT p.player_id, b.rank, p.place
        FROM placements p
        JOIN brackets b ON p.bracket_id = b.id
        WHERE b.night_id = ?1
        ORDER BY b.rank, p.place, p.player_id
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![night_id], |row| {
            Ok(PlacementEntry {
                player_id: row.get(0)?,
                bracket_rank: row.get(1)?,
                place: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
