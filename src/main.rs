use anyhow::Result;

use smashnight_ratings::cli::Command;
use smashnight_ratings::config::settings::AppConfig;
use smashnight_ratings::{
    handle_add_alias, handle_add_bracket, handle_add_challenge, handle_add_player, handle_completions,
    handle_create_night, handle_fetch, handle_init, handle_matchups, handle_rank_bracket, handle_report,
    handle_reset_scores, handle_set_additional, handle_update, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    let config = AppConfig::new();
    execute_command(&command, &config)
}

fn execute_command(command: &Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Init => handle_init(config),
        Command::AddPlayer {
            name,
            team,
            score,
            status,
            tag,
        } => handle_add_player(config, name, team.as_deref(), *score, *status, *tag),
        Command::AddAlias { player, alias } => handle_add_alias(config, *player, alias),
        Command::CreateNight { season, date } => handle_create_night(config, *season, *date),
        Command::AddBracket {
            night,
            url,
            title,
            rank,
            kind,
        } => handle_add_bracket(config, *night, url, title.as_deref(), *rank, *kind),
        Command::AddChallenge { night, p1, p2, score } => handle_add_challenge(config, *night, *p1, *p2, *score),
        Command::Fetch { night, refresh } => handle_fetch(config, *night, *refresh),
        Command::Update { night } => handle_update(config, *night),
        Command::RankBracket { bracket } => handle_rank_bracket(config, *bracket),
        Command::Matchups { player } => handle_matchups(config, *player),
        Command::SetAdditional { px, py, games, sets } => handle_set_additional(config, *px, *py, *games, *sets),
        Command::ResetScores => handle_reset_scores(config),
        Command::Report { night } => handle_report(config, *night),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
