// Snapshot ingestion and normalization.
//
// Deserializes upstream-feed-shaped JSON (teams, players, fixtures,
// gameweeks) and converts it into typed `model` structs. This is the only
// place string-encoded decimals (form, ownership percentage) are parsed;
// downstream code works with plain floats.

use crate::model::{Fixture, Gameweek, Player, Position, Snapshot, Team};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to read snapshot file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Raw feed records (private)
// ---------------------------------------------------------------------------

/// Top-level snapshot document. Field names follow the upstream feed;
/// aliases cover both the raw feed spelling and the flattened export the
/// retrieval layer produces.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    teams: Vec<RawTeam>,
    #[serde(default, alias = "elements")]
    players: Vec<RawPlayer>,
    #[serde(default)]
    fixtures: Vec<RawFixture>,
    #[serde(default, alias = "events")]
    gameweeks: Vec<RawGameweek>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: u32,
    name: String,
    short_name: String,
}

/// Player row. `form` and `selected_by_percent` are string-encoded decimals
/// in the feed. `now_cost` is price in tenths. Extra columns are absorbed
/// via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RawPlayer {
    id: u32,
    #[serde(alias = "web_name")]
    name: String,
    #[serde(alias = "team")]
    team_id: u32,
    element_type: u8,
    now_cost: f64,
    #[serde(default)]
    total_points: i32,
    #[serde(default)]
    form: String,
    #[serde(default)]
    selected_by_percent: String,
    /// Absorb any extra columns the feed includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawFixture {
    id: u32,
    #[serde(default, alias = "event")]
    gameweek: Option<u32>,
    #[serde(alias = "team_h")]
    home_team: u32,
    #[serde(alias = "team_a")]
    away_team: u32,
    #[serde(default, alias = "team_h_score")]
    home_score: Option<u32>,
    #[serde(default, alias = "team_a_score")]
    away_score: Option<u32>,
    #[serde(default)]
    finished: bool,
    #[serde(default, alias = "kickoff_time")]
    kickoff: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawGameweek {
    id: u32,
    #[serde(default)]
    is_current: bool,
    #[serde(default)]
    is_next: bool,
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Parse a feed decimal such as `"7.5"` or `"24.3%"`. Returns `None` for
/// empty or non-numeric input.
fn parse_decimal(raw: &str) -> Option<f64> {
    let s = raw.trim().trim_end_matches('%');
    if s.is_empty() || s == "-" {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Coerce a string-encoded decimal, degrading to 0.0 with a warning rather
/// than failing the whole snapshot.
fn coerce_decimal(raw: &str, what: &str, player: &str) -> f64 {
    match parse_decimal(raw) {
        Some(v) => v,
        None => {
            if !raw.trim().is_empty() {
                warn!("player '{player}': unparsable {what} value '{raw}', using 0");
            }
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion into model types
// ---------------------------------------------------------------------------

fn convert(raw: RawSnapshot) -> Snapshot {
    let teams: Vec<Team> = raw
        .teams
        .into_iter()
        .map(|t| Team {
            id: t.id,
            name: t.name,
            short_name: t.short_name,
        })
        .collect();

    let mut players = Vec::new();
    for p in raw.players {
        let Some(position) = Position::from_element_type(p.element_type) else {
            warn!(
                "skipping player '{}': unknown element type {}",
                p.name, p.element_type
            );
            continue;
        };
        let form = coerce_decimal(&p.form, "form", &p.name);
        let ownership_pct = coerce_decimal(&p.selected_by_percent, "ownership", &p.name);
        players.push(Player {
            id: p.id,
            name: p.name,
            team_id: p.team_id,
            position,
            price: p.now_cost / 10.0,
            total_points: p.total_points,
            form,
            ownership_pct,
        });
    }

    let fixtures: Vec<Fixture> = raw
        .fixtures
        .into_iter()
        .map(|f| Fixture {
            id: f.id,
            gameweek: f.gameweek,
            home_team: f.home_team,
            away_team: f.away_team,
            home_score: f.home_score,
            away_score: f.away_score,
            finished: f.finished,
            kickoff: f.kickoff,
        })
        .collect();

    let gameweeks: Vec<Gameweek> = raw
        .gameweeks
        .into_iter()
        .map(|g| Gameweek {
            id: g.id,
            is_current: g.is_current,
            is_next: g.is_next,
        })
        .collect();

    Snapshot {
        teams,
        players,
        fixtures,
        gameweeks,
    }
}

// ---------------------------------------------------------------------------
// Public loaders
// ---------------------------------------------------------------------------

/// Parse a snapshot from a JSON string. Exposed for callers that already
/// hold the feed payload in memory.
pub fn parse_snapshot(json: &str) -> Result<Snapshot, serde_json::Error> {
    let raw: RawSnapshot = serde_json::from_str(json)?;
    Ok(convert(raw))
}

/// Load a snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, FeedError> {
    let text = std::fs::read_to_string(path).map_err(|e| FeedError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_snapshot(&text).map_err(|e| FeedError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_handles_feed_shapes() {
        assert_eq!(parse_decimal("7.5"), Some(7.5));
        assert_eq!(parse_decimal(" 3.2 "), Some(3.2));
        assert_eq!(parse_decimal("24.3%"), Some(24.3));
        assert_eq!(parse_decimal("0"), Some(0.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("-"), None);
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(parse_decimal("NaN"), None);
    }

    #[test]
    fn snapshot_round_trip() {
        let json = r#"{
            "teams": [
                {"id": 1, "name": "Arsenal", "short_name": "ARS"},
                {"id": 2, "name": "Brentford", "short_name": "BRE"}
            ],
            "elements": [
                {
                    "id": 100, "web_name": "Saka", "team": 1, "element_type": 3,
                    "now_cost": 87, "total_points": 112,
                    "form": "7.5", "selected_by_percent": "44.1",
                    "chance_of_playing_next_round": null
                }
            ],
            "fixtures": [
                {
                    "id": 9, "event": 20, "team_h": 1, "team_a": 2,
                    "team_h_score": null, "team_a_score": null,
                    "finished": false, "kickoff_time": "2026-01-17T15:00:00Z"
                }
            ],
            "events": [
                {"id": 19, "is_current": true, "is_next": false},
                {"id": 20, "is_current": false, "is_next": true}
            ]
        }"#;

        let snapshot = parse_snapshot(json).unwrap();
        assert_eq!(snapshot.teams.len(), 2);
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.fixtures.len(), 1);
        assert_eq!(snapshot.gameweeks.len(), 2);

        let saka = &snapshot.players[0];
        assert_eq!(saka.position, Position::Midfielder);
        assert!((saka.price - 8.7).abs() < 1e-9);
        assert!((saka.form - 7.5).abs() < 1e-9);
        assert!((saka.ownership_pct - 44.1).abs() < 1e-9);

        assert_eq!(snapshot.next_gameweek(), Some(20));
        assert!(snapshot.fixtures[0].kickoff.is_some());
    }

    #[test]
    fn bad_form_string_coerces_to_zero() {
        let json = r#"{
            "teams": [],
            "players": [
                {
                    "id": 1, "name": "Ghost", "team_id": 1, "element_type": 4,
                    "now_cost": 45, "form": "??", "selected_by_percent": ""
                }
            ],
            "fixtures": [],
            "gameweeks": []
        }"#;

        let snapshot = parse_snapshot(json).unwrap();
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.players[0].form, 0.0);
        assert_eq!(snapshot.players[0].ownership_pct, 0.0);
    }

    #[test]
    fn unknown_element_type_skips_player() {
        let json = r#"{
            "players": [
                {"id": 1, "name": "Coach", "team_id": 1, "element_type": 9,
                 "now_cost": 0, "form": "", "selected_by_percent": ""}
            ]
        }"#;

        let snapshot = parse_snapshot(json).unwrap();
        assert!(snapshot.players.is_empty());
    }
}
