use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;

use crate::api::tournament_key;
use crate::config::{RatingSettings, ResetSettings};
use crate::database::{self, Alias, Bracket, Match, NewMatch, Night, Player};
use crate::domain::{season, BracketKind, MatchKind, MembershipTag, PlayerStatus};
use crate::rating::{match_deltas, reset_score, PlayerId};

use super::matchups::classify_matchups;

/// Fields an operator gives when registering a player
#[derive(Debug, Clone)]
pub struct NewPlayer<'a> {
    pub display_name: &'a str,
    pub team: Option<&'a str>,
    pub score: Option<f64>,
    pub status: PlayerStatus,
    pub tag: MembershipTag,
}

pub fn create_player(conn: &Connection, new_player: &NewPlayer) -> Result<Player> {
    let name = new_player.display_name.trim();
    if name.is_empty() {
        bail!("Player name must not be empty");
    }

    let player = database::players::insert_player(
        conn,
        name,
        new_player.team,
        new_player.score,
        new_player.status,
        new_player.tag,
    )?;
    info!("Created player {} ({})", player.display_name, player.id);
    Ok(player)
}

pub fn add_alias(conn: &Connection, player_id: PlayerId, alias: &str) -> Result<Alias> {
    let player = find_player(conn, player_id)?;
    let alias = alias.trim();
    if alias.is_empty() {
        bail!("Alias must not be empty");
    }

    let stored = database::players::insert_alias(conn, player.id, alias)?;
    info!("{} is now also known as {}", player.display_name, stored.name);
    Ok(stored)
}

/// Creates the next night of `season`; its count and title are derived
pub fn create_night(conn: &Connection, season_number: i64, date: NaiveDate) -> Result<Night> {
    let night = database::nights::insert_night(conn, season_number, date)?;
    let sequence = database::nights::sequence_in_season(conn, &night)?;
    info!(
        "Created {} ({}) as night #{}",
        night.title,
        season::short_title(night.season, sequence),
        night.night_count
    );
    Ok(night)
}

pub fn add_bracket(
    conn: &Connection,
    night_id: i64,
    url: &str,
    title: Option<&str>,
    rank: i64,
    kind: BracketKind,
) -> Result<Bracket> {
    find_night(conn, night_id)?;
    // Refuse URLs the feed fetcher could not use later
    tournament_key(url)?;

    let bracket = database::brackets::insert_bracket(conn, night_id, title, rank, kind, Some(url))?;
    info!("Added {} bracket {} (rank {}) to night {}", kind, url, rank, night_id);
    Ok(bracket)
}

/// Records a standalone challenge set, pinned to the players' live scores
pub fn add_challenge(
    conn: &Connection,
    night_id: i64,
    p1_id: PlayerId,
    p2_id: PlayerId,
    wins: (i32, i32),
    settings: &RatingSettings,
) -> Result<Match> {
    if p1_id == p2_id {
        bail!("A player cannot challenge themselves");
    }
    find_night(conn, night_id)?;
    let p1 = find_player(conn, p1_id)?;
    let p2 = find_player(conn, p2_id)?;
    let p1_score = p1
        .score
        .with_context(|| format!("{} has no rating", p1.display_name))?;
    let p2_score = p2
        .score
        .with_context(|| format!("{} has no rating", p2.display_name))?;

    let (p1_change, p2_change) = match_deltas(settings, p1_score, p2_score, wins.0, wins.1);
    let stored = database::matches::insert_match(
        conn,
        &NewMatch {
            night_id,
            bracket_id: None,
            p1_id,
            p2_id,
            p1_score,
            p2_score,
            p1_wins: wins.0,
            p2_wins: wins.1,
            p1_score_change: p1_change,
            p2_score_change: p2_change,
            external_id: None,
            round: None,
            kind: MatchKind::Challenge,
        },
    )?;
    info!(
        "Challenge {} {}-{} {} recorded",
        p1.display_name, wins.0, wins.1, p2.display_name
    );
    Ok(stored)
}

/// Resets every member's score from their current rank
pub fn reset_scores(conn: &Connection, settings: &ResetSettings) -> Result<usize> {
    let members = database::players::list_members(conn)?;
    for member in &members {
        let score = reset_score(member.rank, settings);
        database::players::update_score(conn, member.id, score)?;
    }

    info!("Reset scores of {} members", members.len());
    Ok(members.len())
}

/// Sets the manual game and set counters of a pair in both directions
pub fn set_additional(
    conn: &Connection,
    px_id: PlayerId,
    py_id: PlayerId,
    wins: (i64, i64),
    set_wins: (i64, i64),
    settings: &RatingSettings,
) -> Result<()> {
    if px_id == py_id {
        bail!("A matchup needs two different players");
    }
    let px = find_player(conn, px_id)?;
    let py = find_player(conn, py_id)?;

    database::matchups::set_additional(conn, px.id, py.id, wins, set_wins)?;
    database::matchups::set_additional(conn, py.id, px.id, (wins.1, wins.0), (set_wins.1, set_wins.0))?;
    classify_matchups(conn, settings)?;

    info!(
        "Additional record {} vs {}: games {}-{}, sets {}-{}",
        px.display_name, py.display_name, wins.0, wins.1, set_wins.0, set_wins.1
    );
    Ok(())
}

pub fn find_player(conn: &Connection, player_id: PlayerId) -> Result<Player> {
    database::players::find_by_id(conn, player_id)?
        .with_context(|| format!("Player {} does not exist", player_id))
}

pub fn find_night(conn: &Connection, night_id: i64) -> Result<Night> {
    database::nights::find_by_id(conn, night_id)?
        .with_context(|| format!("Night {} does not exist", night_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::open_in_memory;

    fn member(conn: &Connection, name: &str, score: f64) -> Player {
        create_player(
            conn,
            &NewPlayer {
                display_name: name,
                team: None,
                score: Some(score),
                status: PlayerStatus::Challenger,
                tag: MembershipTag::Member,
            },
        )
        .unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_night_titles_follow_season_position() {
        let conn = open_in_memory().unwrap();
        let first = create_night(&conn, 4, date(1)).unwrap();
        let other = create_night(&conn, 5, date(2)).unwrap();
        let second = create_night(&conn, 4, date(3)).unwrap();

        assert_eq!(first.title, "Season 4 Night 1");
        assert_eq!(other.title, "Season 5 Night 1");
        assert_eq!(second.title, "Season 4 Night 2");
        assert!(first.night_count < other.night_count && other.night_count < second.night_count);
    }

    #[test]
    fn test_bracket_needs_host_url() {
        let conn = open_in_memory().unwrap();
        let night = create_night(&conn, 1, date(1)).unwrap();

        assert!(add_bracket(&conn, night.id, "https://example.com/x", None, 1, BracketKind::Standard).is_err());
        let bracket =
            add_bracket(&conn, night.id, "https://challonge.com/sn1", Some("Top"), 1, BracketKind::Standard)
                .unwrap();
        assert_eq!(bracket.url.as_deref(), Some("https://challonge.com/sn1"));
        assert!(add_bracket(&conn, 999, "https://challonge.com/sn1", None, 1, BracketKind::Standard).is_err());
    }

    #[test]
    fn test_challenge_is_pinned_to_live_scores() {
        let conn = open_in_memory().unwrap();
        let a = member(&conn, "A", 100.0);
        let b = member(&conn, "B", 100.0);
        let night = create_night(&conn, 1, date(1)).unwrap();

        let challenge = add_challenge(&conn, night.id, a.id, b.id, (3, 1), &RatingSettings::default()).unwrap();

        assert_eq!(challenge.kind, MatchKind::Challenge);
        assert!((challenge.p1_score_change - 2.5).abs() < 1e-9);
        assert!(add_challenge(&conn, night.id, a.id, a.id, (3, 1), &RatingSettings::default()).is_err());
    }

    #[test]
    fn test_reset_scores_uses_rank() {
        let conn = open_in_memory().unwrap();
        let a = member(&conn, "A", 150.0);
        let b = member(&conn, "B", 120.0);
        database::players::update_rank(&conn, a.id, Some(1)).unwrap();
        database::players::update_rank(&conn, b.id, Some(3)).unwrap();

        assert_eq!(reset_scores(&conn, &ResetSettings::default()).unwrap(), 2);

        let score_of = |id| find_player(&conn, id).unwrap().score.unwrap();
        assert_eq!(score_of(a.id), 200.0);
        assert_eq!(score_of(b.id), 180.0);
    }

    #[test]
    fn test_additional_wins_are_mirrored() {
        let conn = open_in_memory().unwrap();
        let a = member(&conn, "A", 100.0);
        let b = member(&conn, "B", 100.0);

        set_additional(&conn, a.id, b.id, (4, 2), (2, 1), &RatingSettings::default()).unwrap();

        let ab = database::matchups::find(&conn, a.id, b.id).unwrap().unwrap();
        let ba = database::matchups::find(&conn, b.id, a.id).unwrap().unwrap();
        assert_eq!((ab.px_additional_wins, ab.py_additional_wins), (4, 2));
        assert_eq!((ba.px_additional_wins, ba.py_additional_wins), (2, 4));
        assert_eq!((ba.px_additional_set_wins, ba.py_additional_set_wins), (1, 2));
        assert_eq!(ab.rival_score, crate::matchup::rival_score(4, 2));
    }

    #[test]
    fn test_alias_requires_existing_player() {
        let conn = open_in_memory().unwrap();
        let a = member(&conn, "A", 100.0);

        assert!(add_alias(&conn, a.id, "Big A").is_ok());
        assert!(add_alias(&conn, 42, "Ghost").is_err());
        assert!(add_alias(&conn, a.id, "  ").is_err());
    }
}
