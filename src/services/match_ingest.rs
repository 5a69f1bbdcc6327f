use std::collections::HashMap;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rusqlite::Connection;

use crate::config::RatingSettings;
use crate::database::{self, Bracket, Match, NewMatch, Night};
use crate::domain::{parse_scores_csv, BracketFeed, FeedMatch, MatchKind, NameIndex};
use crate::errors::SkipReason;
use crate::rating::{match_deltas, PlayerId};

use super::snapshots::StartScores;

/// Outcome of reconciling one or more feeds against stored matches
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IngestReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: Vec<SkipReason>,
}

impl IngestReport {
    pub fn processed(&self) -> usize {
        self.created + self.updated
    }

    pub fn merge(&mut self, other: IngestReport) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped.extend(other.skipped);
    }

    fn skip(&mut self, reason: SkipReason) {
        warn!("  Skipped: {}", reason);
        self.skipped.push(reason);
    }
}

/// Display names and aliases of every known player
pub fn build_name_index(conn: &Connection) -> Result<NameIndex> {
    let mut index = NameIndex::new();
    for player in database::players::list_all(conn)? {
        index.insert(&player.display_name, player.id);
    }
    for alias in database::players::list_aliases(conn)? {
        index.insert(&alias.name, alias.player_id);
    }
    debug!("Name index holds {} names", index.len());
    Ok(index)
}

/// Host participant id to player, for every participant whose name resolves
pub fn resolve_participants(
    feed: &BracketFeed,
    index: &NameIndex,
) -> (HashMap<i64, PlayerId>, Vec<SkipReason>) {
    let mut resolved = HashMap::new();
    let mut unresolved = Vec::new();

    for participant in &feed.participants {
        match index.resolve(&participant.name) {
            Ok(player_id) => {
                resolved.insert(participant.id, player_id);
            }
            Err(reason) => unresolved.push(reason),
        }
    }

    (resolved, unresolved)
}

/// Creates or updates the stored match of every scored feed match in `bracket`.
///
/// New matches are pinned to the players' start scores for the night; known
/// matches keep their pinned scores and only get new win counts and deltas.
pub fn ingest_bracket(
    conn: &Connection,
    night: &Night,
    bracket: &Bracket,
    feed: &BracketFeed,
    index: &NameIndex,
    start_scores: &StartScores,
    settings: &RatingSettings,
) -> Result<IngestReport> {
    let mut report = IngestReport::default();

    let (participants, unresolved) = resolve_participants(feed, index);
    for reason in unresolved {
        report.skip(reason);
    }

    for feed_match in &feed.matches {
        let players = match match_players(feed_match, &participants) {
            Ok(players) => players,
            Err(reason) => {
                report.skip(reason);
                continue;
            }
        };

        let Some(scores) = feed_match.scores() else {
            report.skip(SkipReason::MissingScore(feed_match.id));
            continue;
        };
        let score = match parse_scores_csv(scores) {
            Ok(score) => score,
            Err(reason) => {
                report.skip(reason);
                continue;
            }
        };

        let existing = database::matches::find_by_external_id(conn, feed_match.id)?;
        match existing.as_slice() {
            [] => {
                let new_match = NewMatch {
                    night_id: night.id,
                    bracket_id: Some(bracket.id),
                    p1_id: players.0,
                    p2_id: players.1,
                    p1_score: start_score(start_scores, players.0)?,
                    p2_score: start_score(start_scores, players.1)?,
                    p1_wins: score.p1_wins,
                    p2_wins: score.p2_wins,
                    p1_score_change: 0.0,
                    p2_score_change: 0.0,
                    external_id: Some(feed_match.id),
                    round: Some(feed_match.round),
                    kind: MatchKind::Bracket,
                };
                let (p1_change, p2_change) = match_deltas(
                    settings,
                    new_match.p1_score,
                    new_match.p2_score,
                    new_match.p1_wins,
                    new_match.p2_wins,
                );
                database::matches::insert_match(
                    conn,
                    &NewMatch {
                        p1_score_change: p1_change,
                        p2_score_change: p2_change,
                        ..new_match
                    },
                )?;
                report.created += 1;
            }
            [stored] => {
                update_pinned(conn, stored, score.p1_wins, score.p2_wins, feed_match.round, settings)?;
                report.updated += 1;
            }
            _ => report.skip(SkipReason::DuplicateExternalId(feed_match.id)),
        }
    }

    Ok(report)
}

fn match_players(
    feed_match: &FeedMatch,
    participants: &HashMap<i64, PlayerId>,
) -> Result<(PlayerId, PlayerId), SkipReason> {
    let (Some(p1), Some(p2)) = (feed_match.player1_id, feed_match.player2_id) else {
        return Err(SkipReason::OpenSlot(feed_match.id));
    };
    let lookup = |participant: i64| {
        participants
            .get(&participant)
            .copied()
            .ok_or(SkipReason::UnknownParticipant(participant))
    };
    Ok((lookup(p1)?, lookup(p2)?))
}

fn start_score(start_scores: &StartScores, player_id: PlayerId) -> Result<f64> {
    start_scores
        .get(&player_id)
        .copied()
        .flatten()
        .with_context(|| format!("Player {} has no rating to start the night from", player_id))
}

fn update_pinned(
    conn: &Connection,
    stored: &Match,
    p1_wins: i32,
    p2_wins: i32,
    round: i32,
    settings: &RatingSettings,
) -> Result<()> {
    let (Some(p1_score), Some(p2_score)) = (stored.p1_score, stored.p2_score) else {
        anyhow::bail!("Match {} has no pinned pre-match ratings", stored.id);
    };

    let deltas = match_deltas(settings, p1_score, p2_score, p1_wins, p2_wins);
    debug!(
        "  Match {}: {}-{} from pinned {:.1}/{:.1} gives {:+.2}/{:+.2}",
        stored.id, p1_wins, p2_wins, p1_score, p2_score, deltas.0, deltas.1
    );
    database::matches::update_result(conn, stored.id, p1_wins, p2_wins, Some(round), deltas)
}

/// Re-pins every challenge match of the night to the players' start scores
pub fn repin_challenge_matches(
    conn: &Connection,
    night: &Night,
    start_scores: &StartScores,
    settings: &RatingSettings,
) -> Result<usize> {
    let challenges = database::matches::list_by_night_and_kind(conn, night.id, MatchKind::Challenge)?;
    let mut repinned = 0;

    for challenge in &challenges {
        let Some((p1, p2)) = challenge.players() else {
            continue;
        };
        let scores = (start_score(start_scores, p1)?, start_score(start_scores, p2)?);
        let deltas = match_deltas(settings, scores.0, scores.1, challenge.p1_wins, challenge.p2_wins);
        database::matches::update_pinned_scores(conn, challenge.id, scores, deltas)?;
        repinned += 1;
    }

    if repinned > 0 {
        info!("  → Re-pinned {} challenge matches", repinned);
    }
    Ok(repinned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::open_in_memory;
    use crate::domain::{BracketKind, FeedParticipant, MembershipTag, PlayerStatus};
    use chrono::NaiveDate;

    struct Fixture {
        conn: Connection,
        night: Night,
        bracket: Bracket,
        ids: Vec<PlayerId>,
    }

    fn fixture() -> Fixture {
        let conn = open_in_memory().unwrap();
        let ids = ["Ness", "Kirby", "Samus"]
            .iter()
            .map(|name| {
                database::players::insert_player(
                    &conn,
                    name,
                    None,
                    Some(100.0),
                    PlayerStatus::Challenger,
                    MembershipTag::Member,
                )
                .unwrap()
                .id
            })
            .collect();
        let night =
            database::nights::insert_night(&conn, 1, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()).unwrap();
        let bracket = database::brackets::insert_bracket(
            &conn,
            night.id,
            Some("Main"),
            1,
            BracketKind::Standard,
            Some("https://challonge.com/sn1"),
        )
        .unwrap();
        Fixture {
            conn,
            night,
            bracket,
            ids,
        }
    }

    fn participant(id: i64, name: &str) -> FeedParticipant {
        FeedParticipant {
            id,
            name: name.to_string(),
            seed: None,
            final_rank: None,
        }
    }

    fn feed_match(id: i64, p1: i64, p2: i64, scores: &str) -> FeedMatch {
        FeedMatch {
            id,
            round: 1,
            player1_id: Some(p1),
            player2_id: Some(p2),
            scores_csv: Some(scores.to_string()),
        }
    }

    fn start_scores(ids: &[PlayerId], score: f64) -> StartScores {
        ids.iter().map(|&id| (id, Some(score))).collect()
    }

    #[test]
    fn test_first_sight_creates_pinned_match() {
        let f = fixture();
        let feed = BracketFeed {
            participants: vec![participant(1, "ness"), participant(2, "KIRBY")],
            matches: vec![feed_match(500, 1, 2, "3-1")],
        };
        let index = build_name_index(&f.conn).unwrap();
        let scores = start_scores(&f.ids, 100.0);

        let report = ingest_bracket(&f.conn, &f.night, &f.bracket, &feed, &index, &scores, &RatingSettings::default())
            .unwrap();

        assert_eq!(report.created, 1);
        let stored = database::matches::find_by_external_id(&f.conn, 500).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].p1_score, Some(100.0));
        assert!((stored[0].p1_score_change - 2.5).abs() < 1e-9);
        assert!((stored[0].p2_score_change + 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_second_sight_keeps_pinned_scores() {
        let f = fixture();
        let index = build_name_index(&f.conn).unwrap();
        let settings = RatingSettings::default();
        let participants = vec![participant(1, "Ness"), participant(2, "Kirby")];

        let first = BracketFeed {
            participants: participants.clone(),
            matches: vec![feed_match(500, 1, 2, "3-1")],
        };
        ingest_bracket(&f.conn, &f.night, &f.bracket, &first, &index, &start_scores(&f.ids, 100.0), &settings)
            .unwrap();

        let corrected = BracketFeed {
            participants,
            matches: vec![feed_match(500, 1, 2, "1-3")],
        };
        let report = ingest_bracket(
            &f.conn,
            &f.night,
            &f.bracket,
            &corrected,
            &index,
            &start_scores(&f.ids, 180.0),
            &settings,
        )
        .unwrap();

        assert_eq!(report.updated, 1);
        let stored = &database::matches::find_by_external_id(&f.conn, 500).unwrap()[0];
        assert_eq!(stored.p1_score, Some(100.0));
        assert_eq!((stored.p1_wins, stored.p2_wins), (1, 3));
        assert!((stored.p1_score_change + 1.5).abs() < 1e-9);
        assert!((stored.p2_score_change - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_unusable_matches_are_skipped_with_reasons() {
        let f = fixture();
        let feed = BracketFeed {
            participants: vec![participant(1, "Ness"), participant(2, "Kirby"), participant(3, "Nobody")],
            matches: vec![
                feed_match(1, 1, 2, ""),
                feed_match(2, 1, 3, "2-0"),
                feed_match(3, 1, 2, "W-L"),
                FeedMatch {
                    player2_id: None,
                    ..feed_match(4, 1, 2, "2-0")
                },
                feed_match(5, 1, 2, "2--1"),
            ],
        };
        let index = build_name_index(&f.conn).unwrap();

        let report = ingest_bracket(
            &f.conn,
            &f.night,
            &f.bracket,
            &feed,
            &index,
            &start_scores(&f.ids, 100.0),
            &RatingSettings::default(),
        )
        .unwrap();

        assert_eq!(report.created, 1);
        assert!(report.skipped.contains(&SkipReason::UnresolvedName("Nobody".to_string())));
        assert!(report.skipped.contains(&SkipReason::MissingScore(1)));
        assert!(report.skipped.contains(&SkipReason::UnknownParticipant(3)));
        assert!(report.skipped.contains(&SkipReason::MalformedScore("W-L".to_string())));
        assert!(report.skipped.contains(&SkipReason::OpenSlot(4)));

        let forfeit = &database::matches::find_by_external_id(&f.conn, 5).unwrap()[0];
        assert_eq!(forfeit.p1_score_change, 0.0);
        assert_eq!(forfeit.p2_score_change, 0.0);
    }

    #[test]
    fn test_missing_rating_is_a_hard_failure() {
        let f = fixture();
        let feed = BracketFeed {
            participants: vec![participant(1, "Ness"), participant(2, "Kirby")],
            matches: vec![feed_match(9, 1, 2, "2-1")],
        };
        let index = build_name_index(&f.conn).unwrap();
        let mut scores = start_scores(&f.ids, 100.0);
        scores.insert(f.ids[1], None);

        let result = ingest_bracket(&f.conn, &f.night, &f.bracket, &feed, &index, &scores, &RatingSettings::default());

        assert!(result.is_err());
    }

    #[test]
    fn test_challenge_matches_follow_start_scores() {
        let f = fixture();
        let challenge = database::matches::insert_match(
            &f.conn,
            &NewMatch {
                night_id: f.night.id,
                bracket_id: None,
                p1_id: f.ids[0],
                p2_id: f.ids[2],
                p1_score: 50.0,
                p2_score: 50.0,
                p1_wins: 2,
                p2_wins: 0,
                p1_score_change: 0.0,
                p2_score_change: 0.0,
                external_id: None,
                round: None,
                kind: MatchKind::Challenge,
            },
        )
        .unwrap();

        let repinned =
            repin_challenge_matches(&f.conn, &f.night, &start_scores(&f.ids, 120.0), &RatingSettings::default())
                .unwrap();

        assert_eq!(repinned, 1);
        let stored = &database::matches::list_by_night(&f.conn, f.night.id).unwrap()[0];
        assert_eq!(stored.id, challenge.id);
        assert_eq!(stored.p1_score, Some(120.0));
        assert!((stored.p1_score_change - 2.5).abs() < 1e-9);
    }
}
