use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::Connection;

use smashnight_ratings::config::settings::AppConfig;
use smashnight_ratings::database::{self, open_in_memory};
use smashnight_ratings::domain::{
    BracketFeed, BracketKind, FeedMatch, FeedParticipant, MembershipTag, PlayerStatus,
};
use smashnight_ratings::errors::SkipReason;
use smashnight_ratings::services::league::{self, NewPlayer};
use smashnight_ratings::services::UpdateService;

const MAIN_URL: &str = "https://challonge.com/sn_main";

struct League {
    conn: Connection,
    night_id: i64,
    ids: HashMap<&'static str, i64>,
}

fn add_player(conn: &Connection, name: &str, score: f64, tag: MembershipTag) -> i64 {
    league::create_player(
        conn,
        &NewPlayer {
            display_name: name,
            team: None,
            score: Some(score),
            status: PlayerStatus::Challenger,
            tag,
        },
    )
    .unwrap()
    .id
}

fn setup() -> League {
    let conn = open_in_memory().unwrap();
    let mut ids = HashMap::new();
    ids.insert("Alpha", add_player(&conn, "Alpha", 120.0, MembershipTag::Member));
    ids.insert("Bravo", add_player(&conn, "Bravo", 100.0, MembershipTag::Member));
    ids.insert("Charlie", add_player(&conn, "Charlie", 100.0, MembershipTag::Member));
    ids.insert("Delta", add_player(&conn, "Delta", 30.0, MembershipTag::Member));
    ids.insert("Echo", add_player(&conn, "Echo", 90.0, MembershipTag::Guest));
    league::add_alias(&conn, ids["Delta"], "Dee").unwrap();

    let night = league::create_night(&conn, 1, NaiveDate::from_ymd_opt(2024, 9, 6).unwrap()).unwrap();
    league::add_bracket(&conn, night.id, MAIN_URL, Some("Main"), 1, BracketKind::Standard).unwrap();
    league::add_challenge(
        &conn,
        night.id,
        ids["Delta"],
        ids["Echo"],
        (2, 1),
        &AppConfig::default().rating,
    )
    .unwrap();

    League {
        conn,
        night_id: night.id,
        ids,
    }
}

fn participant(id: i64, name: &str) -> FeedParticipant {
    FeedParticipant {
        id,
        name: name.to_string(),
        seed: Some(id as i32),
        final_rank: None,
    }
}

fn set(id: i64, round: i32, p1: i64, p2: i64, scores: &str) -> FeedMatch {
    FeedMatch {
        id,
        round,
        player1_id: Some(p1),
        player2_id: Some(p2),
        scores_csv: Some(scores.to_string()),
    }
}

fn feeds() -> HashMap<String, BracketFeed> {
    let feed = BracketFeed {
        participants: vec![
            participant(1, "Alpha"),
            participant(2, "bravo"),
            participant(3, "CHARLIE"),
            participant(4, "Dee"),
            participant(5, "Unknown Person"),
        ],
        matches: vec![
            set(101, 1, 1, 4, "2-0"),
            set(102, 1, 2, 3, "1-2"),
            set(103, 2, 1, 3, "2-1"),
            set(104, 1, 5, 2, "0-2"),
            FeedMatch {
                scores_csv: None,
                ..set(105, 3, 1, 3, "")
            },
        ],
    };
    HashMap::from([(MAIN_URL.to_string(), feed)])
}

fn dump(conn: &Connection) -> Vec<(String, Vec<Vec<Value>>)> {
    let tables = [
        "players", "nights", "matches", "seeds", "placements", "attendees", "snapshots", "matchups",
    ];
    tables
        .iter()
        .map(|table| {
            let mut stmt = conn.prepare(&format!("SELECT * FROM {} ORDER BY id", table)).unwrap();
            let columns = stmt.column_count();
            let rows = stmt
                .query_map([], |row| {
                    (0..columns)
                        .map(|i| row.get::<_, Value>(i))
                        .collect::<rusqlite::Result<Vec<_>>>()
                })
                .unwrap()
                .collect::<rusqlite::Result<Vec<_>>>()
                .unwrap();
            (table.to_string(), rows)
        })
        .collect()
}

#[test]
fn test_full_update_is_idempotent() {
    let mut league = setup();
    let config = AppConfig::default();
    let source = feeds();
    let service = UpdateService::new(&config, &source);

    let first = service.full_update(&mut league.conn, league.night_id).unwrap();
    let after_first = dump(&league.conn);
    let second = service.full_update(&mut league.conn, league.night_id).unwrap();
    let after_second = dump(&league.conn);

    assert_eq!(first.ingest.created, 3);
    assert_eq!(second.ingest.created, 0);
    assert_eq!(second.ingest.updated, 3);
    assert!(first
        .ingest
        .skipped
        .contains(&SkipReason::UnresolvedName("Unknown Person".to_string())));
    assert!(first.ingest.skipped.contains(&SkipReason::MissingScore(105)));
    assert_eq!(after_first, after_second);

    let night = database::nights::find_by_id(&league.conn, league.night_id).unwrap().unwrap();
    assert!(night.completed);
}

#[test]
fn test_matchups_are_mirrored() {
    let mut league = setup();
    let config = AppConfig::default();
    let source = feeds();
    UpdateService::new(&config, &source)
        .full_update(&mut league.conn, league.night_id)
        .unwrap();

    let rows = database::matchups::list_all(&league.conn).unwrap();
    assert_eq!(rows.len(), 5 * 4);
    for row in &rows {
        let mirror = database::matchups::find(&league.conn, row.py_id, row.px_id)
            .unwrap()
            .unwrap();
        assert_eq!(row.px_wins, mirror.py_wins);
        assert_eq!(row.py_wins, mirror.px_wins);
        assert_eq!(row.px_set_wins, mirror.py_set_wins);
        assert_eq!(row.py_set_wins, mirror.px_set_wins);
    }

    let alpha_charlie = database::matchups::find(&league.conn, league.ids["Alpha"], league.ids["Charlie"])
        .unwrap()
        .unwrap();
    assert_eq!((alpha_charlie.px_wins, alpha_charlie.py_wins), (2, 1));
    assert_eq!((alpha_charlie.px_set_wins, alpha_charlie.py_set_wins), (1, 0));
}

#[test]
fn test_standings_scores_and_floor() {
    let mut league = setup();
    let config = AppConfig::default();
    let source = feeds();
    UpdateService::new(&config, &source)
        .full_update(&mut league.conn, league.night_id)
        .unwrap();

    let attendees = database::attendees::list_by_night(&league.conn, league.night_id).unwrap();
    let seeds: HashMap<i64, (i64, i64)> = attendees
        .iter()
        .map(|a| (a.player_id, (a.start_seed, a.end_seed)))
        .collect();
    assert_eq!(seeds[&league.ids["Alpha"]], (1, 1));
    assert_eq!(seeds[&league.ids["Charlie"]].1, 2);
    assert_eq!(seeds[&league.ids["Bravo"]].1, 3);
    assert_eq!(seeds[&league.ids["Delta"]], (4, 3));

    // Delta's computed score stays well below the floor
    let delta = attendees
        .iter()
        .find(|a| a.player_id == league.ids["Delta"])
        .unwrap();
    assert_eq!(delta.end_score, 60.0);

    // Echo only played a challenge set: start score plus its delta, no floor or bonus
    let echo = database::players::find_by_id(&league.conn, league.ids["Echo"]).unwrap().unwrap();
    let challenge = database::matches::list_by_night(&league.conn, league.night_id)
        .unwrap()
        .into_iter()
        .find(|m| m.p2_id == Some(league.ids["Echo"]))
        .unwrap();
    assert!(challenge.p2_score_change < 0.0);
    assert_eq!(echo.score, Some(90.0 + challenge.p2_score_change));
    assert!(!seeds.contains_key(&league.ids["Echo"]));

    let alpha = database::players::find_by_id(&league.conn, league.ids["Alpha"]).unwrap().unwrap();
    assert_eq!(alpha.rank, Some(1));
    let snapshot = database::snapshots::find(&league.conn, league.night_id, alpha.id)
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.start_score, Some(120.0));
    assert_eq!(snapshot.end_score, alpha.score);
}

#[test]
fn test_missing_feed_aborts_without_changes() {
    let mut league = setup();
    let config = AppConfig::default();
    let before = dump(&league.conn);

    let empty: HashMap<String, BracketFeed> = HashMap::new();
    let result = UpdateService::new(&config, &empty).full_update(&mut league.conn, league.night_id);

    assert!(result.is_err());
    assert_eq!(dump(&league.conn), before);
}

#[test]
fn test_next_night_starts_from_previous_end_score() {
    let mut league = setup();
    let config = AppConfig::default();
    let source = feeds();
    let service = UpdateService::new(&config, &source);
    service.full_update(&mut league.conn, league.night_id).unwrap();

    let alpha_end = database::players::find_by_id(&league.conn, league.ids["Alpha"])
        .unwrap()
        .unwrap()
        .score;
    database::players::update_score(&league.conn, league.ids["Alpha"], 500.0).unwrap();

    let next = league::create_night(&league.conn, 1, NaiveDate::from_ymd_opt(2024, 9, 13).unwrap()).unwrap();
    assert_eq!(next.title, "Season 1 Night 2");
    service.full_update(&mut league.conn, next.id).unwrap();

    let snapshot = database::snapshots::find(&league.conn, next.id, league.ids["Alpha"])
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.start_score, alpha_end);
}
