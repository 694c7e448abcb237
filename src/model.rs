// Snapshot domain types.
//
// Everything in here is an immutable input to the engine, supplied fresh on
// every computation by the caller's data-retrieval layer. String-encoded
// numeric fields from the upstream feed are already parsed by the time these
// types exist (see `feed`), so the engine never touches raw strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// A club in the league.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub short_name: String,
}

// ---------------------------------------------------------------------------
// Player positions
// ---------------------------------------------------------------------------

/// Outfield/keeper position categories used for roster grouping and
/// recommendation filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Parse the feed's numeric element-type code (1 = GKP .. 4 = FWD).
    pub fn from_element_type(code: u8) -> Option<Self> {
        match code {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    /// Parse a position abbreviation ("GKP", "GK", "DEF", "MID", "FWD").
    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GKP" | "GK" => Some(Position::Goalkeeper),
            "DEF" => Some(Position::Defender),
            "MID" => Some(Position::Midfielder),
            "FWD" | "FW" => Some(Position::Forward),
            _ => None,
        }
    }

    /// Display abbreviation.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }

    /// Deterministic ordering index for grouped display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Goalkeeper => 0,
            Position::Defender => 1,
            Position::Midfielder => 2,
            Position::Forward => 3,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Players
// ---------------------------------------------------------------------------

/// A player record from the current snapshot.
///
/// `form` is the short-window scoring rate used as the current-performance
/// proxy; `ownership_pct` is the percentage of managers owning the player.
/// Both arrive string-encoded from the feed and are parsed exactly once at
/// the ingestion boundary (unparsable values degrade to 0.0 there).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub team_id: u32,
    pub position: Position,
    pub price: f64,
    pub total_points: i32,
    pub form: f64,
    pub ownership_pct: f64,
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A scheduled or completed match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    /// Gameweek the fixture is scheduled in; `None` for postponed fixtures
    /// not yet reassigned.
    pub gameweek: Option<u32>,
    pub home_team: u32,
    pub away_team: u32,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub finished: bool,
    pub kickoff: Option<DateTime<Utc>>,
}

impl Fixture {
    /// Whether this fixture counts as played. The upstream feed's `finished`
    /// flag and its score fields are not always consistent with each other;
    /// either signal is sufficient.
    pub fn is_played(&self) -> bool {
        self.finished || (self.home_score.is_some() && self.away_score.is_some())
    }
}

// ---------------------------------------------------------------------------
// Gameweeks
// ---------------------------------------------------------------------------

/// A scoring period (event) in the season calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gameweek {
    pub id: u32,
    pub is_current: bool,
    pub is_next: bool,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One consistent view of the league, as supplied by the caller.
///
/// Referential integrity between fixture team ids and team records is the
/// caller's responsibility; the engine treats unknown ids as neutral rather
/// than failing.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub fixtures: Vec<Fixture>,
    pub gameweeks: Vec<Gameweek>,
}

impl Snapshot {
    /// Look up a team by id.
    pub fn team(&self, id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// The first gameweek of the forward lookahead window.
    ///
    /// Prefers the gameweek flagged `is_next`; falls back to the one after
    /// the `is_current` gameweek, then to the earliest gameweek carrying an
    /// unfinished fixture. `None` when the snapshot offers no usable signal
    /// (e.g. season over).
    pub fn next_gameweek(&self) -> Option<u32> {
        if let Some(gw) = self.gameweeks.iter().find(|g| g.is_next) {
            return Some(gw.id);
        }
        if let Some(gw) = self.gameweeks.iter().find(|g| g.is_current) {
            return Some(gw.id + 1);
        }
        self.fixtures
            .iter()
            .filter(|f| !f.is_played())
            .filter_map(|f| f.gameweek)
            .min()
    }

    /// The last gameweek of the season calendar.
    pub fn final_gameweek(&self) -> Option<u32> {
        self.gameweeks.iter().map(|g| g.id).max()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
