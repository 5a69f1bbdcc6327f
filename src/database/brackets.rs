use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Bracket;
use crate::domain::BracketKind;

const BRACKET_COLUMNS: &str = "id, night_id, title, rank, kind, url";

pub fn insert_bracket(
    conn: &Connection,
    night_id: i64,
    title: Option<&str>,
    rank: i64,
    kind: BracketKind,
    url: Option<&str>,
) -> Result<Bracket> {
    let sql = format!(
        "INSERT INTO brackets (night_id, title, rank, kind, url) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        BRACKET_COLUMNS
    );

    conn.query_row(
        &sql,
        params![night_id, title, rank, kind, url],
        parse_bracket_row,
    )
    .context("Failed to insert bracket")
}

fn parse_bracket_row(row: &rusqlite::Row) -> rusqlite::Result<Bracket> {
    Ok(Bracket {
        id: row.get(0)?,
        night_id: row.get(1)?,
        title: row.get(2)?,
        rank: row.get(3)?,
        kind: row.get(4)?,
        url: row.get(5)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Bracket>> {
    let sql = format!("SELECT {} FROM brackets WHERE id = ?1", BRACKET_COLUMNS);

    conn.query_row(&sql, params![id], parse_bracket_row)
        .optional()
        .context("Failed to query bracket by id")
}

/// Brackets of a night, most important first
pub fn list_by_night(conn: &Connection, night_id: i64) -> Result<Vec<Bracket>> {
    let sql = format!(
        "SELECT {} FROM brackets WHERE night_id = ?1 ORDER BY rank, id",
        BRACKET_COLUMNS
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![night_id], parse_bracket_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
