use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::domain::{BracketKind, MatchKind, MembershipTag, PlayerStatus};
use crate::rating::types::PlayerId;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub team: Option<String>,
    pub score: Option<f64>,
    pub rank: Option<i64>,
    pub status: PlayerStatus,
    pub tag: MembershipTag,
    pub rival_1_id: Option<PlayerId>,
    pub rival_2_id: Option<PlayerId>,
    pub demon_id: Option<PlayerId>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Alias {
    pub id: i64,
    pub player_id: PlayerId,
    pub name: String,
}

/// One league night
#[derive(Debug, Clone)]
pub struct Night {
    pub id: i64,
    pub season: i64,
    pub date: NaiveDate,
    pub title: String,
    pub night_count: i64,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct Bracket {
    pub id: i64,
    pub night_id: i64,
    pub title: Option<String>,
    pub rank: i64,
    pub kind: BracketKind,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub id: i64,
    pub night_id: Option<i64>,
    pub bracket_id: Option<i64>,
    pub p1_id: Option<PlayerId>,
    pub p2_id: Option<PlayerId>,
    pub p1_score: Option<f64>,
    pub p2_score: Option<f64>,
    pub p1_wins: i32,
    pub p2_wins: i32,
    pub p1_score_change: f64,
    pub p2_score_change: f64,
    pub external_id: Option<i64>,
    pub round: Option<i32>,
    pub kind: MatchKind,
}

impl Match {
    /// Both players, unless one of them has been removed
    pub fn players(&self) -> Option<(PlayerId, PlayerId)> {
        Some((self.p1_id?, self.p2_id?))
    }
}

/// Values for a match row that does not exist yet
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub night_id: i64,
    pub bracket_id: Option<i64>,
    pub p1_id: PlayerId,
    pub p2_id: PlayerId,
    pub p1_score: f64,
    pub p2_score: f64,
    pub p1_wins: i32,
    pub p2_wins: i32,
    pub p1_score_change: f64,
    pub p2_score_change: f64,
    pub external_id: Option<i64>,
    pub round: Option<i32>,
    pub kind: MatchKind,
}

#[derive(Debug, Clone)]
pub struct Seed {
    pub id: i64,
    pub bracket_id: i64,
    pub player_id: PlayerId,
    pub seed: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct Placement {
    pub id: i64,
    pub bracket_id: i64,
    pub player_id: PlayerId,
    pub place: i64,
}

#[derive(Debug, Clone)]
pub struct Attendee {
    pub id: i64,
    pub night_id: i64,
    pub player_id: PlayerId,
    pub start_seed: i64,
    pub end_seed: i64,
    pub start_score: f64,
    pub end_score: f64,
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: i64,
    pub night_id: i64,
    pub player_id: PlayerId,
    pub start_rank: Option<i64>,
    pub end_rank: Option<i64>,
    pub start_score: Option<f64>,
    pub end_score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MatchupType {
    pub id: i64,
    pub name: String,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub color: String,
}

#[derive(Debug, Clone)]
pub struct Matchup {
    pub id: i64,
    pub px_id: PlayerId,
    pub py_id: PlayerId,
    pub px_wins: i64,
    pub py_wins: i64,
    pub px_additional_wins: i64,
    pub py_additional_wins: i64,
    pub px_set_wins: i64,
    pub py_set_wins: i64,
    pub px_additional_set_wins: i64,
    pub py_additional_set_wins: i64,
    pub rival_score: f64,
    pub demon_score: f64,
    pub matchup_type_id: Option<i64>,
    pub set_matchup_type_id: Option<i64>,
}

impl Matchup {
    pub fn px_total_wins(&self) -> i64 {
        self.px_wins + self.px_additional_wins
    }

    pub fn py_total_wins(&self) -> i64 {
        self.py_wins + self.py_additional_wins
    }

    pub fn px_total_set_wins(&self) -> i64 {
        self.px_set_wins + self.px_additional_set_wins
    }

    pub fn py_total_set_wins(&self) -> i64 {
        self.py_set_wins + self.py_additional_set_wins
    }
}

// Enums are stored as their lowercase names.

fn parse_enum<T>(value: ValueRef<'_>) -> FromSqlResult<T>
where
    T: FromStr<Err = anyhow::Error>,
{
    value
        .as_str()?
        .parse::<T>()
        .map_err(|e| FromSqlError::Other(e.into()))
}

impl ToSql for PlayerStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PlayerStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_enum(value)
    }
}

impl ToSql for MembershipTag {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MembershipTag {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_enum(value)
    }
}

impl ToSql for BracketKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for BracketKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_enum(value)
    }
}

impl ToSql for MatchKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MatchKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        parse_enum(value)
    }
}
