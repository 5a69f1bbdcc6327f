use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::{parse_scores_csv, BracketKind, MembershipTag, PlayerStatus, SetScore};

#[derive(Parser, Debug)]
#[command(author, version, about = "SmashNight league ratings")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Create the database schema, wiping any existing data
    Init,
    /// Register a player
    AddPlayer {
        #[arg(long)]
        name: String,
        #[arg(long)]
        team: Option<String>,
        /// Starting score; leave out for an unrated player
        #[arg(long)]
        score: Option<f64>,
        #[arg(long, default_value = "challenger")]
        status: PlayerStatus,
        #[arg(long, default_value = "member")]
        tag: MembershipTag,
    },
    /// Add another name a player appears under on the tournament host
    AddAlias {
        #[arg(long)]
        player: i64,
        #[arg(long)]
        alias: String,
    },
    /// Create the next night of a season
    CreateNight {
        #[arg(long)]
        season: i64,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },
    /// Attach a tournament-host bracket to a night
    AddBracket {
        #[arg(long)]
        night: i64,
        #[arg(long)]
        url: String,
        #[arg(long)]
        title: Option<String>,
        /// Importance among the night's brackets, 1 = main bracket
        #[arg(long, default_value_t = 1)]
        rank: i64,
        #[arg(long, default_value = "standard")]
        kind: BracketKind,
    },
    /// Record a challenge set outside any bracket
    AddChallenge {
        #[arg(long)]
        night: i64,
        #[arg(long)]
        p1: i64,
        #[arg(long)]
        p2: i64,
        /// Set score such as 3-1
        #[arg(long, value_parser = parse_set_score)]
        score: SetScore,
    },
    /// Download the bracket feeds of a night into the cache
    Fetch {
        #[arg(long)]
        night: i64,
        /// Ask the host again even for cached brackets
        #[arg(long)]
        refresh: bool,
    },
    /// Run the full rating update for a night from cached feeds
    Update {
        #[arg(long)]
        night: i64,
    },
    /// Show the computed standings and sets of a bracket
    RankBracket {
        #[arg(long)]
        bracket: i64,
    },
    /// Show a player's matchup table
    Matchups {
        #[arg(long)]
        player: i64,
    },
    /// Set the manual additional record between two players
    SetAdditional {
        #[arg(long)]
        px: i64,
        #[arg(long)]
        py: i64,
        /// Extra games as PX-PY
        #[arg(long, value_parser = parse_set_score)]
        games: SetScore,
        /// Extra sets as PX-PY
        #[arg(long, value_parser = parse_set_score, default_value = "0-0")]
        sets: SetScore,
    },
    /// Reset every member's score from their rank
    ResetScores,
    /// Show a night's attendees and score movement
    Report {
        #[arg(long)]
        night: i64,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_set_score(value: &str) -> Result<SetScore, String> {
    parse_scores_csv(value).map_err(|e| e.to_string())
}
