use std::collections::HashMap;
use std::fmt::Write;

use anyhow::{Context, Result};
use colored::Colorize;
use rusqlite::Connection;

use crate::bracket::round_name;
use crate::database::{self, Player};
use crate::matchup::NEVER_MET;
use crate::rating::PlayerId;

use super::bracket_places::computed_standings;
use super::league::{find_night, find_player};

fn player_names(conn: &Connection) -> Result<HashMap<PlayerId, String>> {
    Ok(database::players::list_all(conn)?
        .into_iter()
        .map(|p| (p.id, p.display_name))
        .collect())
}

fn name_of(names: &HashMap<PlayerId, String>, id: Option<PlayerId>) -> &str {
    id.and_then(|id| names.get(&id))
        .map(String::as_str)
        .unwrap_or("(removed)")
}

fn signed(value: f64) -> String {
    let text = format!("{:+.1}", value);
    if value > 0.0 {
        text.green().to_string()
    } else if value < 0.0 {
        text.red().to_string()
    } else {
        text
    }
}

/// Attendees of a night in finishing order with their seed and score movement
pub fn night_report(conn: &Connection, night_id: i64) -> Result<String> {
    let night = find_night(conn, night_id)?;
    let names = player_names(conn)?;
    let attendees = database::attendees::list_by_night(conn, night.id)?;

    let mut out = String::new();
    let status = if night.completed { "completed" } else { "pending" };
    writeln!(out, "{} ({}, {})", night.title.bold(), night.date, status)?;

    for attendee in &attendees {
        let moved = attendee.start_seed - attendee.end_seed;
        let movement = match moved {
            m if m > 0 => format!("▲{}", m).green().to_string(),
            m if m < 0 => format!("▼{}", -m).red().to_string(),
            _ => "=".to_string(),
        };
        writeln!(
            out,
            "{:>3}. {:<24} seed {:>3} {:<4} score {:>6.1} → {:>6.1} ({})",
            attendee.end_seed,
            name_of(&names, Some(attendee.player_id)),
            attendee.start_seed,
            movement,
            attendee.start_score,
            attendee.end_score,
            signed(attendee.end_score - attendee.start_score)
        )?;
    }

    if attendees.is_empty() {
        writeln!(out, "No attendees yet; run update for this night")?;
    }
    Ok(out)
}

/// Computed standings of a bracket followed by its sets with round names
pub fn bracket_report(conn: &Connection, bracket_id: i64) -> Result<String> {
    let bracket = database::brackets::find_by_id(conn, bracket_id)?
        .with_context(|| format!("Bracket {} does not exist", bracket_id))?;
    let names = player_names(conn)?;

    let mut standings: Vec<(PlayerId, i64)> = computed_standings(conn, &bracket)?.into_iter().collect();
    standings.sort_by_key(|&(player_id, place)| (place, player_id));

    let mut out = String::new();
    let title = bracket.title.clone().unwrap_or_else(|| format!("Bracket {}", bracket.id));
    writeln!(out, "{} ({}, rank {})", title.bold(), bracket.kind, bracket.rank)?;
    for (player_id, place) in &standings {
        writeln!(out, "{:>3}. {}", place, name_of(&names, Some(*player_id)))?;
    }

    let mut matches = database::matches::list_by_bracket(conn, bracket.id)?;
    matches.sort_by_key(|m| (m.round.unwrap_or(0) < 0, m.round.unwrap_or(0).abs(), m.id));
    for m in &matches {
        let round = match m.round {
            Some(round) => round_name(bracket.kind, round)?,
            None => "Unknown round".to_string(),
        };
        writeln!(
            out,
            "  {:<18} {} {}-{} {}",
            round,
            name_of(&names, m.p1_id),
            m.p1_wins,
            m.p2_wins,
            name_of(&names, m.p2_id)
        )?;
    }
    Ok(out)
}

/// Every opponent a player has a record against, with rival and demon marks
pub fn matchup_report(conn: &Connection, player_id: PlayerId) -> Result<String> {
    let player = find_player(conn, player_id)?;
    let names = player_names(conn)?;
    let bands: HashMap<i64, String> = database::matchup_types::list_all(conn)?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    let band = |id: Option<i64>| id.and_then(|id| bands.get(&id)).map(String::as_str).unwrap_or("-");

    let mut out = String::new();
    writeln!(out, "{}", header(&player).bold())?;

    for row in database::matchups::list_for_player(conn, player.id)? {
        if row.rival_score == NEVER_MET {
            continue;
        }
        let mut marks = Vec::new();
        if player.demon_id == Some(row.py_id) {
            marks.push("demon".red().to_string());
        }
        if player.rival_1_id == Some(row.py_id) || player.rival_2_id == Some(row.py_id) {
            marks.push("rival".yellow().to_string());
        }
        writeln!(
            out,
            "  {:<24} games {:>3}-{:<3} sets {:>3}-{:<3} {:<10} {:<10} rival {:>7.1} demon {:>7.1} {}",
            name_of(&names, Some(row.py_id)),
            row.px_total_wins(),
            row.py_total_wins(),
            row.px_total_set_wins(),
            row.py_total_set_wins(),
            band(row.matchup_type_id),
            band(row.set_matchup_type_id),
            row.rival_score,
            row.demon_score,
            marks.join(" ")
        )?;
    }
    Ok(out)
}

fn header(player: &Player) -> String {
    let score = player
        .score
        .map(|s| format!("{:.1}", s))
        .unwrap_or_else(|| "unrated".to_string());
    let rank = player
        .rank
        .map(|r| format!("#{}", r))
        .unwrap_or_else(|| "unranked".to_string());
    format!("{} ({}, {})", player.display_name, rank, score)
}
