use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Alias, Player};
use crate::domain::{MembershipTag, PlayerStatus};
use crate::rating::types::PlayerId;

const PLAYER_COLUMNS: &str =
    "id, display_name, team, score, rank, status, tag, rival_1_id, rival_2_id, demon_id, created_at";

pub fn insert_player(
    conn: &Connection,
    display_name: &str,
    team: Option<&str>,
    score: Option<f64>,
    status: PlayerStatus,
    tag: MembershipTag,
) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (display_name, team, score, status, tag) VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {}",
        PLAYER_COLUMNS
    );

    conn.query_row(
        &sql,
        params![display_name, team, score, status, tag],
        parse_player_row,
    )
    .context("Failed to insert player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        display_name: row.get(1)?,
        team: row.get(2)?,
        score: row.get(3)?,
        rank: row.get(4)?,
        status: row.get(5)?,
        tag: row.get(6)?,
        rival_1_id: row.get(7)?,
        rival_2_id: row.get(8)?,
        demon_id: row.get(9)?,
        created_at: row.get(10)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {} FROM players WHERE id = ?1", PLAYER_COLUMNS);

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {} FROM players ORDER BY id", PLAYER_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_members(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {} FROM players WHERE tag = ?1 ORDER BY id", PLAYER_COLUMNS);

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![MembershipTag::Member], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_score(conn: &Connection, id: PlayerId, score: f64) -> Result<()> {
    conn.execute("UPDATE players SET score = ?1 WHERE id = ?2", params![score, id])
        .context("Failed to update player score")?;
    Ok(())
}

pub fn update_rank(conn: &Connection, id: PlayerId, rank: Option<i64>) -> Result<()> {
    conn.execute("UPDATE players SET rank = ?1 WHERE id = ?2", params![rank, id])
        .context("Failed to update player rank")?;
    Ok(())
}

pub fn update_opponents(
    conn: &Connection,
    id: PlayerId,
    rival_1: Option<PlayerId>,
    rival_2: Option<PlayerId>,
    demon: Option<PlayerId>,
) -> Result<()> {
    conn.execute(
        "UPDATE players SET rival_1_id = ?1, rival_2_id = ?2, demon_id = ?3 WHERE id = ?4",
        params![rival_1, rival_2, demon, id],
    )
    .context("Failed to update player rivals and demon")?;
    Ok(())
}

pub fn insert_alias(conn: &Connection, player_id: PlayerId, name: &str) -> Result<Alias> {
    let sql = "INSERT INTO aliases (player_id, name) VALUES (?1, ?2) RETURNING id, player_id, name";

    conn.query_row(sql, params![player_id, name], |row| {
        Ok(Alias {
            id: row.get(0)?,
            player_id: row.get(1)?,
            name: row.get(2)?,
        })
    })
    .context("Failed to insert alias")
}

pub fn list_aliases(conn: &Connection) -> Result<Vec<Alias>> {
    let mut stmt = conn.prepare("SELECT id, player_id, name FROM aliases ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Alias {
                id: row.get(0)?,
                player_id: row.get(1)?,
                name: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
