use anyhow::{Context, Result};
use rusqlite::Connection;

use super::matchup_types::insert_matchup_type;
use crate::config::get_matchup_types;

pub fn reset_database(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    seed_matchup_types(conn)?;

    log::info!("Database schema reset successfully");
    Ok(())
}

fn seed_matchup_types(conn: &Connection) -> Result<()> {
    for config in get_matchup_types() {
        insert_matchup_type(conn, &config)
            .with_context(|| format!("Failed to seed matchup type {}", config.name))?;
    }
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}
