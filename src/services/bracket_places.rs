use anyhow::Result;
use log::{debug, warn};
use rusqlite::Connection;

use crate::bracket::{rank_bracket, RankedMatch, Standings};
use crate::database::{self, Bracket};
use crate::domain::{BracketFeed, NameIndex};
use crate::errors::SkipReason;

use super::match_ingest::resolve_participants;

/// Standings computed from the matches stored for `bracket`
pub fn computed_standings(conn: &Connection, bracket: &Bracket) -> Result<Standings> {
    let ranked: Vec<RankedMatch> = database::matches::list_by_bracket(conn, bracket.id)?
        .iter()
        .filter_map(|m| {
            let (p1, p2) = m.players()?;
            Some(RankedMatch {
                external_id: m.external_id,
                round: m.round.unwrap_or(0),
                p1,
                p2,
                p1_wins: m.p1_wins,
                p2_wins: m.p2_wins,
            })
        })
        .collect();

    Ok(rank_bracket(bracket.kind, &ranked))
}

/// Writes a seed and a final place for every resolvable participant.
///
/// The host's own final rank wins when it reports one; otherwise the place
/// comes from the stored matches.
pub fn place_bracket(
    conn: &Connection,
    bracket: &Bracket,
    feed: &BracketFeed,
    index: &NameIndex,
) -> Result<usize> {
    let computed = computed_standings(conn, bracket)?;
    let (participants, _) = resolve_participants(feed, index);

    let mut placed = 0;
    for participant in &feed.participants {
        let Some(&player_id) = participants.get(&participant.id) else {
            continue;
        };

        let place = participant
            .final_rank
            .map(i64::from)
            .or_else(|| computed.get(&player_id).copied());
        let Some(place) = place else {
            warn!("  Skipped: {}", SkipReason::Unplaced(participant.name.clone()));
            continue;
        };

        database::placements::upsert_seed(conn, bracket.id, player_id, participant.seed)?;
        database::placements::upsert_placement(conn, bracket.id, player_id, place)?;
        placed += 1;
    }

    debug!("  Bracket {}: {} players placed", bracket.id, placed);
    Ok(placed)
}
