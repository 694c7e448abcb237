// Transfer index aggregation.
//
// Walks each player's forward fixture window, accumulates classified
// difficulty (with blank gameweeks actively penalized, not skipped),
// normalizes the result into a fixture-ease score, and blends it with the
// player's own normalized form into the composite ranking index.

use crate::config::EngineConfig;
use crate::engine::difficulty::{self, DifficultyTier};
use crate::engine::strength::StrengthRating;
use crate::model::{Fixture, Snapshot};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Fixture window
// ---------------------------------------------------------------------------

/// Inclusive gameweek range the aggregation walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameweekWindow {
    pub start: u32,
    pub end: u32,
}

impl GameweekWindow {
    /// Build the lookahead window for a snapshot: `length` gameweeks from
    /// the next upcoming one, clipped to the season's final gameweek.
    /// `None` when the snapshot gives no upcoming-gameweek signal at all.
    pub fn for_snapshot(snapshot: &Snapshot, length: u32) -> Option<Self> {
        let start = snapshot.next_gameweek()?;
        let nominal_end = start + length.saturating_sub(1);
        let end = match snapshot.final_gameweek() {
            Some(last) if last >= start => nominal_end.min(last),
            // no calendar (or stale calendar); keep the nominal window
            _ => nominal_end,
        };
        Some(GameweekWindow { start, end })
    }

    /// Number of gameweeks in the window (at least 1 by construction).
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn gameweeks(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    pub fn contains(&self, gw: u32) -> bool {
        (self.start..=self.end).contains(&gw)
    }
}

/// One upcoming fixture from a single team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureSlot {
    pub opponent: u32,
    pub is_home: bool,
}

/// Per-team, per-gameweek lookup of unfinished fixtures inside the window.
/// Each fixture contributes an entry to both participants; a double
/// gameweek simply yields two entries under the same key.
pub fn build_fixture_lookup(
    fixtures: &[Fixture],
    window: &GameweekWindow,
) -> HashMap<(u32, u32), Vec<FixtureSlot>> {
    let mut lookup: HashMap<(u32, u32), Vec<FixtureSlot>> = HashMap::new();
    for fixture in fixtures.iter().filter(|f| !f.is_played()) {
        let Some(gw) = fixture.gameweek else { continue };
        if !window.contains(gw) {
            continue;
        }
        lookup
            .entry((fixture.home_team, gw))
            .or_default()
            .push(FixtureSlot {
                opponent: fixture.away_team,
                is_home: true,
            });
        lookup
            .entry((fixture.away_team, gw))
            .or_default()
            .push(FixtureSlot {
                opponent: fixture.home_team,
                is_home: false,
            });
    }
    lookup
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// One gameweek of a player's outlook. `opponent` is `None` for a blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameweekOutlook {
    pub gameweek: u32,
    pub opponent: Option<u32>,
    pub tier: DifficultyTier,
    pub is_home: bool,
}

/// Composite ranking result for one player.
#[derive(Debug, Clone)]
pub struct TransferIndex {
    pub player_id: u32,
    pub team_id: u32,
    /// Player form carried through for tie-breaking and display.
    pub form: f64,
    /// Composite score in [0, 1]; higher recommends the transfer harder.
    pub index: f64,
    /// Raw accumulated difficulty across the window (blanks included).
    pub difficulty_sum: f64,
    /// Ordered per-gameweek breakdown behind `difficulty_sum`.
    pub outlook: Vec<GameweekOutlook>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Normalize an accumulated difficulty sum into fixture ease in [0, 1].
///
/// An all-tier-1 window maps to 1.0 and an all-blank window to 0.0. The
/// clamp absorbs windows shorter than nominal near season end as well as
/// double-gameweek sums above the single-fixture range.
fn fixture_ease(difficulty_sum: f64, window_len: u32) -> f64 {
    if window_len == 0 {
        return 0.0;
    }
    let best = DifficultyTier::VeryEasy.value() as f64 * window_len as f64;
    let worst = DifficultyTier::Blank.value() as f64 * window_len as f64;
    ((worst - difficulty_sum) / (worst - best)).clamp(0.0, 1.0)
}

/// Normalize form against the configured ceiling, clamped into [0, 1].
fn normalized_form(form: f64, ceiling: f64) -> f64 {
    (form / ceiling).clamp(0.0, 1.0)
}

/// Compute the transfer index for every player in the snapshot.
///
/// `strengths` and `positions` come from the strength and standings stages;
/// the caller assembles them once per snapshot so the per-player walk stays
/// a pure lookup.
pub fn compute_all(
    snapshot: &Snapshot,
    config: &EngineConfig,
    strengths: &HashMap<u32, StrengthRating>,
    positions: &HashMap<u32, usize>,
) -> Vec<TransferIndex> {
    let window = GameweekWindow::for_snapshot(snapshot, config.index.lookahead);
    let lookup = window
        .map(|w| build_fixture_lookup(&snapshot.fixtures, &w))
        .unwrap_or_default();
    let total_teams = snapshot.teams.len();

    snapshot
        .players
        .iter()
        .map(|player| {
            let mut difficulty_sum = 0.0;
            let mut outlook = Vec::new();

            if let Some(window) = window {
                for gw in window.gameweeks() {
                    match lookup.get(&(player.team_id, gw)) {
                        Some(slots) => {
                            for slot in slots {
                                let tier = difficulty::rate_opponent(
                                    &config.difficulty,
                                    strengths,
                                    positions,
                                    total_teams,
                                    slot.opponent,
                                    !slot.is_home,
                                );
                                difficulty_sum += tier.value() as f64;
                                outlook.push(GameweekOutlook {
                                    gameweek: gw,
                                    opponent: Some(slot.opponent),
                                    tier,
                                    is_home: slot.is_home,
                                });
                            }
                        }
                        None => {
                            // blank gameweek: penalize, never skip
                            difficulty_sum += DifficultyTier::Blank.value() as f64;
                            outlook.push(GameweekOutlook {
                                gameweek: gw,
                                opponent: None,
                                tier: DifficultyTier::Blank,
                                is_home: false,
                            });
                        }
                    }
                }
            }

            let ease = fixture_ease(difficulty_sum, window.map(|w| w.len()).unwrap_or(0));
            let form_norm = normalized_form(player.form, config.index.form_ceiling);
            let index = config.index.form_weight * form_norm
                + config.index.fixture_weight * ease;

            TransferIndex {
                player_id: player.id,
                team_id: player.team_id,
                form: player.form,
                index,
                difficulty_sum,
                outlook,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
