// Team strength estimation from player form.
//
// A team's rating is built from its top-N players by current form. The sum
// is the headline strength scalar; the average of the same sample feeds the
// difficulty classifier, where it keeps tier thresholds stable regardless
// of roster depth.

use crate::model::{Player, Snapshot};
use std::collections::HashMap;

/// Aggregated form of a team's leading players.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrengthRating {
    /// Sum of the top-N form values.
    pub total: f64,
    /// Mean of the same sample (0.0 for an empty roster).
    pub average: f64,
    /// Players actually counted (less than N for short rosters).
    pub sample: usize,
}

/// Rate one team from its player list.
///
/// Players are sorted by form descending; the sort is stable, so ties keep
/// their input order. Rosters shorter than `top_n` are summed as-is rather
/// than padded, and an empty roster rates 0 rather than erroring.
pub fn rate_team(players: &[&Player], top_n: usize) -> StrengthRating {
    let mut forms: Vec<f64> = players.iter().map(|p| p.form).collect();
    forms.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    forms.truncate(top_n);

    let sample = forms.len();
    let total: f64 = forms.iter().sum();
    let average = if sample > 0 { total / sample as f64 } else { 0.0 };

    StrengthRating {
        total,
        average,
        sample,
    }
}

/// Rate every team in the snapshot. Teams with no players present get the
/// zero rating, and so does any unknown team id a caller later asks about.
pub fn rate_all(snapshot: &Snapshot, top_n: usize) -> HashMap<u32, StrengthRating> {
    let mut by_team: HashMap<u32, Vec<&Player>> = HashMap::new();
    for player in &snapshot.players {
        by_team.entry(player.team_id).or_default().push(player);
    }

    snapshot
        .teams
        .iter()
        .map(|team| {
            let roster = by_team.get(&team.id).map(Vec::as_slice).unwrap_or(&[]);
            (team.id, rate_team(roster, top_n))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
