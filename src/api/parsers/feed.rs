use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{FeedMatch, FeedParticipant};
use crate::errors::parse_context;

/// Tournament key the host API expects for a bracket page URL.
///
/// `https://challonge.com/abc` gives `abc`; a community bracket at
/// `https://org.challonge.com/abc` gives `org-abc`.
pub fn tournament_key(url: &str) -> Result<String> {
    let without_scheme = url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let (host, path) = without_scheme
        .split_once('/')
        .with_context(|| format!("Bracket URL has no tournament path: {}", url))?;

    let Some(prefix) = host.strip_suffix("challonge.com") else {
        bail!("Not a tournament host URL: {}", url);
    };
    let subdomain = prefix.trim_end_matches('.');

    let Some(slug) = path.split(['/', '?', '#']).find(|s| !s.is_empty()) else {
        bail!("Bracket URL has no tournament path: {}", url);
    };

    let key = match subdomain {
        "" | "www" => slug.to_string(),
        org => format!("{}-{}", org, slug),
    };
    Ok(urlencoding::encode(&key).into_owned())
}

/// Participants from the host's `participants.json` response
pub fn parse_participants(data: &Value) -> Result<Vec<FeedParticipant>> {
    parse_list(data, "participant").context(parse_context("participants"))
}

/// Matches from the host's `matches.json` response
pub fn parse_matches(data: &Value) -> Result<Vec<FeedMatch>> {
    parse_list(data, "match").context(parse_context("matches"))
}

// The host wraps every element as {"<kind>": {...}}
fn parse_list<T: DeserializeOwned>(data: &Value, wrapper: &str) -> Result<Vec<T>> {
    let Some(items) = data.as_array() else {
        bail!("expected a JSON array");
    };

    items
        .iter()
        .map(|item| {
            let inner = item.get(wrapper).unwrap_or(item);
            serde_json::from_value(inner.clone()).map_err(anyhow::Error::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tournament_key_plain_host() {
        assert_eq!(tournament_key("https://challonge.com/sn42").unwrap(), "sn42");
        assert_eq!(tournament_key("http://www.challonge.com/sn42/").unwrap(), "sn42");
    }

    #[test]
    fn test_tournament_key_community_subdomain() {
        assert_eq!(
            tournament_key("https://smashnight.challonge.com/s3n7_top").unwrap(),
            "smashnight-s3n7_top"
        );
    }

    #[test]
    fn test_tournament_key_rejects_other_hosts() {
        assert!(tournament_key("https://example.com/sn42").is_err());
        assert!(tournament_key("https://challonge.com/").is_err());
    }

    #[test]
    fn test_parse_participants_unwraps_elements() {
        let data = json!([
            {"participant": {"id": 1, "name": "Ness", "seed": 1, "final_rank": 2, "misc": null}},
            {"participant": {"id": 2, "name": "Kirby", "seed": 2, "final_rank": null}}
        ]);

        let participants = parse_participants(&data).unwrap();

        assert_eq!(participants.len(), 2);
        assert_eq!(participants[0].final_rank, Some(2));
        assert_eq!(participants[1].name, "Kirby");
        assert_eq!(participants[1].final_rank, None);
    }

    #[test]
    fn test_parse_matches_keeps_missing_players_and_scores() {
        let data = json!([
            {"match": {"id": 10, "round": 1, "player1_id": 1, "player2_id": 2, "scores_csv": "3-1"}},
            {"match": {"id": 11, "round": -1, "player1_id": null, "player2_id": 2, "scores_csv": ""}}
        ]);

        let matches = parse_matches(&data).unwrap();

        assert_eq!(matches[0].scores(), Some("3-1"));
        assert_eq!(matches[1].player1_id, None);
        assert_eq!(matches[1].scores(), None);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_matches(&json!({"errors": ["not found"]})).is_err());
    }
}
