// Derived-metrics pipeline: standings, team strength, fixture difficulty,
// transfer index.
//
// Every stage is a pure function of the snapshot and config; the engine
// holds no state between calls, so repeated or concurrent invocations with
// different snapshots cannot interfere.

pub mod difficulty;
pub mod standings;
pub mod strength;
pub mod transfer_index;

use crate::config::EngineConfig;
use crate::model::{Position, Snapshot};
use difficulty::OpponentRating;
use standings::StandingsRow;
use std::collections::HashMap;
use strength::StrengthRating;
use tracing::debug;
use transfer_index::TransferIndex;

/// Everything the engine derives from one snapshot.
#[derive(Debug, Clone)]
pub struct EngineReport {
    /// Full league table in rank order.
    pub table: Vec<StandingsRow>,
    /// Strength rating per team id.
    pub strengths: HashMap<u32, StrengthRating>,
    /// Per-team difficulty badges, both venues.
    pub opponent_ratings: Vec<OpponentRating>,
    /// Transfer index per player, sorted best-first.
    pub targets: Vec<TransferIndex>,
}

/// Run the full pipeline over one snapshot.
///
/// Targets come back sorted by index descending, ties broken by form
/// descending and then player id ascending so rankings are reproducible.
pub fn run(snapshot: &Snapshot, config: &EngineConfig) -> EngineReport {
    let table = standings::compute_table(&snapshot.teams, &snapshot.fixtures);
    let positions = standings::position_map(&table);
    let strengths = strength::rate_all(snapshot, config.strength.top_n);

    let team_ids: Vec<u32> = snapshot.teams.iter().map(|t| t.id).collect();
    let opponent_ratings =
        difficulty::rate_all_opponents(&config.difficulty, &strengths, &positions, &team_ids);

    let mut targets = transfer_index::compute_all(snapshot, config, &strengths, &positions);
    targets.sort_by(|a, b| {
        b.index
            .partial_cmp(&a.index)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.form
                    .partial_cmp(&a.form)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then(a.player_id.cmp(&b.player_id))
    });

    debug!(
        "pipeline complete: {} teams, {} players ranked",
        table.len(),
        targets.len()
    );

    EngineReport {
        table,
        strengths,
        opponent_ratings,
        targets,
    }
}

/// The best `limit` transfer targets, optionally restricted to one position.
pub fn top_targets<'a>(
    report: &'a EngineReport,
    snapshot: &Snapshot,
    position: Option<Position>,
    limit: usize,
) -> Vec<&'a TransferIndex> {
    let position_of: HashMap<u32, Position> = snapshot
        .players
        .iter()
        .map(|p| (p.id, p.position))
        .collect();

    report
        .targets
        .iter()
        .filter(|t| match position {
            Some(wanted) => position_of.get(&t.player_id) == Some(&wanted),
            None => true,
        })
        .take(limit)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
