use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Standing of a player within the league
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Elite,
    Challenger,
    Other,
}

/// Membership tag; only members are ranked and get rivals/demons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipTag {
    Member,
    Guest,
    Retired,
    Other,
}

/// Bracket topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketKind {
    Standard,
    RoundRobin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    Bracket,
    Challenge,
    Crew,
    Other,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Elite => "elite",
            PlayerStatus::Challenger => "challenger",
            PlayerStatus::Other => "other",
        }
    }
}

impl FromStr for PlayerStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "elite" => Ok(PlayerStatus::Elite),
            "challenger" => Ok(PlayerStatus::Challenger),
            "other" => Ok(PlayerStatus::Other),
            _ => bail!("Unknown player status: {}", s),
        }
    }
}

impl MembershipTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipTag::Member => "member",
            MembershipTag::Guest => "guest",
            MembershipTag::Retired => "retired",
            MembershipTag::Other => "other",
        }
    }
}

impl FromStr for MembershipTag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "member" => Ok(MembershipTag::Member),
            "guest" => Ok(MembershipTag::Guest),
            "retired" => Ok(MembershipTag::Retired),
            "other" => Ok(MembershipTag::Other),
            _ => bail!("Unknown membership tag: {}", s),
        }
    }
}

impl BracketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BracketKind::Standard => "standard",
            BracketKind::RoundRobin => "round_robin",
        }
    }
}

impl FromStr for BracketKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "standard" | "elimination" => Ok(BracketKind::Standard),
            "round_robin" | "roundrobin" => Ok(BracketKind::RoundRobin),
            _ => bail!("Unknown bracket kind: {}", s),
        }
    }
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Bracket => "bracket",
            MatchKind::Challenge => "challenge",
            MatchKind::Crew => "crew",
            MatchKind::Other => "other",
        }
    }
}

impl FromStr for MatchKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bracket" => Ok(MatchKind::Bracket),
            "challenge" => Ok(MatchKind::Challenge),
            "crew" => Ok(MatchKind::Crew),
            "other" => Ok(MatchKind::Other),
            _ => bail!("Unknown match kind: {}", s),
        }
    }
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Tournament feed contracts ---

/// Everything the engine needs from the tournament host for one bracket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BracketFeed {
    pub participants: Vec<FeedParticipant>,
    pub matches: Vec<FeedMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedParticipant {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub seed: Option<i32>,
    #[serde(default)]
    pub final_rank: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedMatch {
    pub id: i64,
    pub round: i32,
    #[serde(default)]
    pub player1_id: Option<i64>,
    #[serde(default)]
    pub player2_id: Option<i64>,
    #[serde(default)]
    pub scores_csv: Option<String>,
}

impl FeedMatch {
    /// Score string, if the host reported one
    pub fn scores(&self) -> Option<&str> {
        self.scores_csv
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
