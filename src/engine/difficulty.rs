// Dynamic fixture difficulty classification.
//
// Converts an opponent's averaged top-N form into a discrete 1-5 tier,
// nudged by league standing and by venue. Tier 6 is reserved for blank
// gameweeks (no fixture scheduled) and sorts strictly worse than tier 5
// everywhere difficulty is ordered.

use crate::config::DifficultyConfig;
use crate::engine::strength::StrengthRating;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Difficulty tiers
// ---------------------------------------------------------------------------

/// Discrete fixture difficulty. Lower is easier. The variant order matters:
/// the derived `Ord` places `Blank` above `VeryHard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DifficultyTier {
    VeryEasy,
    Easy,
    Average,
    Hard,
    VeryHard,
    /// No fixture in the requested gameweek. Never produced by score
    /// classification; only the window walk assigns it.
    Blank,
}

impl DifficultyTier {
    /// Numeric tier (1..=5, blank = 6) used for accumulation and display.
    pub fn value(&self) -> u8 {
        match self {
            DifficultyTier::VeryEasy => 1,
            DifficultyTier::Easy => 2,
            DifficultyTier::Average => 3,
            DifficultyTier::Hard => 4,
            DifficultyTier::VeryHard => 5,
            DifficultyTier::Blank => 6,
        }
    }

    /// Semantic label for display layers.
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::VeryEasy => "very easy",
            DifficultyTier::Easy => "easy",
            DifficultyTier::Average => "average",
            DifficultyTier::Hard => "hard",
            DifficultyTier::VeryHard => "very hard",
            DifficultyTier::Blank => "blank",
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Raw difficulty score for an opponent, on the average-form scale.
///
/// `strength_signal + table_adjustment + venue_adjustment`, where the table
/// term is the position-derived strength `(total_teams - position) + 1`
/// centered on mid-table and gently weighted, and the venue term adds a
/// bonus when the observer travels. Opponents with no known league position
/// (or a snapshot with no teams) take a neutral table term.
pub fn difficulty_score(
    cfg: &DifficultyConfig,
    opponent_average_form: f64,
    opponent_position: Option<usize>,
    total_teams: usize,
    observer_away: bool,
) -> f64 {
    let table_adjustment = match opponent_position {
        Some(position) if total_teams > 0 => {
            let table_strength = (total_teams.saturating_sub(position) + 1) as f64;
            let mid_table = (total_teams as f64 + 1.0) / 2.0;
            (table_strength - mid_table) * cfg.table_weight
        }
        _ => 0.0,
    };

    let venue_adjustment = if observer_away {
        cfg.away_bonus
    } else {
        -cfg.home_discount
    };

    opponent_average_form + table_adjustment + venue_adjustment
}

/// Classify a raw score into a 1-5 tier via the ascending thresholds.
pub fn tier_for_score(cfg: &DifficultyConfig, score: f64) -> DifficultyTier {
    let [t1, t2, t3, t4] = cfg.tier_thresholds;
    if score < t1 {
        DifficultyTier::VeryEasy
    } else if score < t2 {
        DifficultyTier::Easy
    } else if score < t3 {
        DifficultyTier::Average
    } else if score < t4 {
        DifficultyTier::Hard
    } else {
        DifficultyTier::VeryHard
    }
}

/// Full classification for one opponent, looked up from precomputed
/// strength ratings and league positions. Unknown opponent ids degrade to
/// zero strength and a neutral table term.
pub fn rate_opponent(
    cfg: &DifficultyConfig,
    strengths: &HashMap<u32, StrengthRating>,
    positions: &HashMap<u32, usize>,
    total_teams: usize,
    opponent_id: u32,
    observer_away: bool,
) -> DifficultyTier {
    let average_form = strengths
        .get(&opponent_id)
        .map(|r| r.average)
        .unwrap_or(0.0);
    let position = positions.get(&opponent_id).copied();
    let score = difficulty_score(cfg, average_form, position, total_teams, observer_away);
    tier_for_score(cfg, score)
}

/// Home and away difficulty tiers for one team viewed as an opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpponentRating {
    pub team_id: u32,
    /// Difficulty when the observer hosts this opponent.
    pub at_home: DifficultyTier,
    /// Difficulty when the observer travels to this opponent.
    pub away: DifficultyTier,
}

/// Rate every team as an opponent, per venue. Consumed by display layers
/// rendering difficulty badges.
pub fn rate_all_opponents(
    cfg: &DifficultyConfig,
    strengths: &HashMap<u32, StrengthRating>,
    positions: &HashMap<u32, usize>,
    team_ids: &[u32],
) -> Vec<OpponentRating> {
    let total_teams = team_ids.len();
    team_ids
        .iter()
        .map(|&team_id| OpponentRating {
            team_id,
            at_home: rate_opponent(cfg, strengths, positions, total_teams, team_id, false),
            away: rate_opponent(cfg, strengths, positions, total_teams, team_id, true),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
