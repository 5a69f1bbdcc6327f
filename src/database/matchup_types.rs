use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::models::MatchupType;
use crate::config::MatchupTypeConfig;

pub fn insert_matchup_type(conn: &Connection, config: &MatchupTypeConfig) -> Result<MatchupType> {
    let sql = "INSERT INTO matchup_types (name, lower_bound, upper_bound, color) VALUES (?1, ?2, ?3, ?4) RETURNING id, name, lower_bound, upper_bound, color";

    conn.query_row(
        sql,
        params![config.name, config.lower_bound, config.upper_bound, config.color],
        parse_matchup_type_row,
    )
    .context("Failed to insert matchup type")
}

fn parse_matchup_type_row(row: &rusqlite::Row) -> rusqlite::Result<MatchupType> {
    Ok(MatchupType {
        id: row.get(0)?,
        name: row.get(1)?,
        lower_bound: row.get(2)?,
        upper_bound: row.get(3)?,
        color: row.get(4)?,
    })
}

pub fn list_all(conn: &Connection) -> Result<Vec<MatchupType>> {
    let sql = "SELECT id, name, lower_bound, upper_bound, color FROM matchup_types ORDER BY lower_bound";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_matchup_type_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
