use anyhow::{bail, Result};

use crate::domain::BracketKind;

/// Display name of a round; the sign must fit the bracket topology
pub fn round_name(kind: BracketKind, round: i32) -> Result<String> {
    match kind {
        BracketKind::Standard if round > 0 => Ok(format!("Winners Round {}", round)),
        BracketKind::Standard if round < 0 => Ok(format!("Losers Round {}", round.unsigned_abs())),
        BracketKind::RoundRobin if round > 0 => Ok(format!("Round {}", round)),
        _ => bail!("Round {} does not exist in a {} bracket", round, kind),
    }
}
