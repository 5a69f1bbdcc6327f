use std::collections::{BTreeSet, HashMap};

use crate::errors::SkipReason;
use crate::rating::types::PlayerId;

/// Case-insensitive lookup from free-text names (display names and aliases) to players
#[derive(Debug, Default)]
pub struct NameIndex {
    names: HashMap<String, BTreeSet<PlayerId>>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, player_id: PlayerId) {
        self.names
            .entry(normalize(name))
            .or_default()
            .insert(player_id);
    }

    /// Resolves a name to exactly one player
    pub fn resolve(&self, name: &str) -> Result<PlayerId, SkipReason> {
        let candidates = self
            .names
            .get(&normalize(name))
            .ok_or_else(|| SkipReason::UnresolvedName(name.to_string()))?;

        let mut iter = candidates.iter();
        match (iter.next(), iter.next()) {
            (Some(&id), None) => Ok(id),
            _ => Err(SkipReason::AmbiguousName {
                name: name.to_string(),
                candidates: candidates.iter().copied().collect(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_and_alias_resolve_case_insensitively() {
        let mut index = NameIndex::new();
        index.insert("Marth Main", 1);
        index.insert("mm", 1);
        index.insert("Falco", 2);

        assert_eq!(index.resolve("MARTH main"), Ok(1));
        assert_eq!(index.resolve(" MM "), Ok(1));
        assert_eq!(index.resolve("falco"), Ok(2));
    }

    #[test]
    fn test_same_player_under_alias_and_name_is_not_ambiguous() {
        let mut index = NameIndex::new();
        index.insert("Sheik", 3);
        index.insert("sheik", 3);
        assert_eq!(index.resolve("Sheik"), Ok(3));
    }

    #[test]
    fn test_collisions_and_unknown_names() {
        let mut index = NameIndex::new();
        index.insert("Fox", 1);
        index.insert("fox", 2);

        assert!(matches!(
            index.resolve("Fox"),
            Err(SkipReason::AmbiguousName { .. })
        ));
        assert!(matches!(
            index.resolve("Pikachu"),
            Err(SkipReason::UnresolvedName(_))
        ));
    }
}
