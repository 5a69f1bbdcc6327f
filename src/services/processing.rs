use anyhow::{Context, Result};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

use crate::cache::BracketSource;
use crate::config::settings::AppConfig;
use crate::database::{self, Bracket, Night};
use crate::domain::BracketFeed;

use super::match_ingest::{self, IngestReport};
use super::{attendees, bracket_places, matchups, snapshots};

/// Counts from one full update of a night
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateSummary {
    pub ingest: IngestReport,
    pub challenges: usize,
    pub placements: usize,
    pub attendees: usize,
    pub scored: usize,
    pub matchups: usize,
}

/// Runs the whole rating pipeline for one night
pub struct UpdateService<'a, S: BracketSource> {
    config: &'a AppConfig,
    source: &'a S,
}

impl<'a, S: BracketSource> UpdateService<'a, S> {
    pub fn new(config: &'a AppConfig, source: &'a S) -> Self {
        Self { config, source }
    }

    /// Full update of `night_id` inside a single write transaction.
    ///
    /// Any failure rolls everything back; running it again on the same data
    /// leaves the database unchanged.
    pub fn full_update(&self, conn: &mut Connection, night_id: i64) -> Result<UpdateSummary> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to start update transaction")?;

        let night = database::nights::find_by_id(&tx, night_id)?
            .with_context(|| format!("Night {} does not exist", night_id))?;

        info!("=== Full update: {} ===\n", night.title);
        let summary = self.run_pipeline(&tx, &night)?;

        tx.commit().context("Failed to commit update")?;
        info!("=== Update Complete: {} ===", night.title);
        Ok(summary)
    }

    fn run_pipeline(&self, conn: &Connection, night: &Night) -> Result<UpdateSummary> {
        let settings = &self.config.rating;
        let mut summary = UpdateSummary::default();

        info!("Step 1: Recording start scores...");
        let start_scores = snapshots::record_start(conn, night)?;

        info!("Step 2: Ingesting bracket matches...");
        let brackets = self.load_feeds(conn, night)?;
        let index = match_ingest::build_name_index(conn)?;
        for (bracket, feed) in &brackets {
            let report =
                match_ingest::ingest_bracket(conn, night, bracket, feed, &index, &start_scores, settings)?;
            summary.ingest.merge(report);
        }
        summary.challenges = match_ingest::repin_challenge_matches(conn, night, &start_scores, settings)?;
        info!(
            "  → {} matches created, {} updated, {} skipped\n",
            summary.ingest.created,
            summary.ingest.updated,
            summary.ingest.skipped.len()
        );

        info!("Step 3: Ranking brackets...");
        for (bracket, feed) in &brackets {
            summary.placements += bracket_places::place_bracket(conn, bracket, feed, &index)?;
        }
        info!("  → {} placements stored\n", summary.placements);

        info!("Step 4: Ranking attendees...");
        let deltas = attendees::night_deltas(conn, night)?;
        let standings = attendees::rank_night_attendees(conn, night, &start_scores, &deltas, settings)?;
        summary.attendees = standings.len();

        info!("Step 5: Updating player scores...");
        summary.scored = attendees::apply_night_scores(conn, &standings, &start_scores, &deltas)?;

        info!("Step 6: Rebuilding matchup table...");
        let players = database::players::list_all(conn)?;
        summary.matchups = matchups::rebuild_matchup_table(conn, &players, settings)?;

        info!("Step 7: Recording end scores...");
        snapshots::record_end(conn, night)?;

        info!("Step 8: Choosing rivals and demons...");
        matchups::assign_opponents(conn)?;

        database::nights::mark_completed(conn, night.id)?;
        Ok(summary)
    }

    fn load_feeds(&self, conn: &Connection, night: &Night) -> Result<Vec<(Bracket, BracketFeed)>> {
        let brackets = database::brackets::list_by_night(conn, night.id)?;
        let mut feeds = Vec::with_capacity(brackets.len());

        for bracket in brackets {
            let url = bracket
                .url
                .as_deref()
                .with_context(|| format!("Bracket {} has no tournament URL", bracket.id))?;
            let feed = self.source.bracket_feed(url)?;
            feeds.push((bracket, feed));
        }

        info!("  → Loaded {} bracket feeds", feeds.len());
        Ok(feeds)
    }
}
