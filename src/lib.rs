pub mod api;
pub mod bracket;
pub mod cache;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod http;
pub mod matchup;
pub mod rate_limiter;
pub mod rating;
pub mod services;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;
use log::{info, warn};

use crate::cache::Cache;
use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::{DbConn, DbPool};
use crate::domain::{BracketKind, MembershipTag, PlayerStatus, SetScore};
use crate::services::league::{self, NewPlayer};
use crate::services::{report, FetchService, UpdateService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

fn open_database(config: &AppConfig) -> Result<(DbPool, DbConn)> {
    let pool = database::create_pool(&config.database_path)?;
    let conn = database::get_connection(&pool)?;
    Ok((pool, conn))
}

pub fn handle_init(config: &AppConfig) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    database::setup::reset_database(&conn)?;
    info!("Initialised {}", config.database_path);
    Ok(())
}

pub fn handle_add_player(
    config: &AppConfig,
    name: &str,
    team: Option<&str>,
    score: Option<f64>,
    status: PlayerStatus,
    tag: MembershipTag,
) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    let player = league::create_player(
        &conn,
        &NewPlayer {
            display_name: name,
            team,
            score,
            status,
            tag,
        },
    )?;
    println!("{}", player.id);
    Ok(())
}

pub fn handle_add_alias(config: &AppConfig, player_id: i64, alias: &str) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    league::add_alias(&conn, player_id, alias)?;
    Ok(())
}

pub fn handle_create_night(config: &AppConfig, season: i64, date: NaiveDate) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    let night = league::create_night(&conn, season, date)?;
    println!("{}", night.id);
    Ok(())
}

pub fn handle_add_bracket(
    config: &AppConfig,
    night_id: i64,
    url: &str,
    title: Option<&str>,
    rank: i64,
    kind: BracketKind,
) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    let bracket = league::add_bracket(&conn, night_id, url, title, rank, kind)?;
    println!("{}", bracket.id);
    Ok(())
}

pub fn handle_add_challenge(config: &AppConfig, night_id: i64, p1: i64, p2: i64, score: SetScore) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    league::add_challenge(&conn, night_id, p1, p2, (score.p1_wins, score.p2_wins), &config.rating)?;
    Ok(())
}

pub fn handle_fetch(config: &AppConfig, night_id: i64, refresh: bool) -> Result<()> {
    let urls = {
        let (_pool, conn) = open_database(config)?;
        let night = league::find_night(&conn, night_id)?;
        let brackets = database::brackets::list_by_night(&conn, night.id)?;
        let mut urls = Vec::with_capacity(brackets.len());
        for bracket in brackets {
            match bracket.url {
                Some(url) => urls.push(url),
                None => warn!("Bracket {} has no URL; nothing to fetch", bracket.id),
            }
        }
        urls
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let cache = Cache::new(&config.cache_dir)?;
        let mut service = FetchService::new(cache, &config.feed)?;
        service.run(&urls, refresh).await
    })?;
    Ok(())
}

pub fn handle_update(config: &AppConfig, night_id: i64) -> Result<()> {
    let (_pool, mut conn) = open_database(config)?;
    let cache = Cache::new(&config.cache_dir)?;
    let service = UpdateService::new(config, &cache);

    let summary = service.full_update(&mut conn, night_id)?;
    info!(
        "{} matches processed, {} skipped, {} attendees, {} players scored",
        summary.ingest.processed(),
        summary.ingest.skipped.len(),
        summary.attendees,
        summary.scored
    );
    print!("{}", report::night_report(&conn, night_id)?);
    Ok(())
}

pub fn handle_rank_bracket(config: &AppConfig, bracket_id: i64) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    print!("{}", report::bracket_report(&conn, bracket_id)?);
    Ok(())
}

pub fn handle_matchups(config: &AppConfig, player_id: i64) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    print!("{}", report::matchup_report(&conn, player_id)?);
    Ok(())
}

pub fn handle_set_additional(config: &AppConfig, px: i64, py: i64, games: SetScore, sets: SetScore) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    league::set_additional(
        &conn,
        px,
        py,
        (games.p1_wins.into(), games.p2_wins.into()),
        (sets.p1_wins.into(), sets.p2_wins.into()),
        &config.rating,
    )
}

pub fn handle_reset_scores(config: &AppConfig) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    league::reset_scores(&conn, &config.reset)?;
    Ok(())
}

pub fn handle_report(config: &AppConfig, night_id: i64) -> Result<()> {
    let (_pool, conn) = open_database(config)?;
    print!("{}", report::night_report(&conn, night_id)?);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
