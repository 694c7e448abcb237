// League table derivation from completed fixture results.
//
// The table is rebuilt from scratch on every call; there is no incremental
// update path, which keeps the calculation trivially deterministic.

use crate::model::{Fixture, Team};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Standings row
// ---------------------------------------------------------------------------

/// One team's accumulated league record.
///
/// Invariants: `points == 3 * won + drawn` and
/// `goal_difference == goals_for - goals_against`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingsRow {
    pub team_id: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
    /// 1-based rank after tie-break ordering.
    pub position: usize,
}

impl StandingsRow {
    fn zeroed(team_id: u32) -> Self {
        StandingsRow {
            team_id,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
            position: 0,
        }
    }

    fn record_result(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        if scored > conceded {
            self.won += 1;
        } else if scored < conceded {
            self.lost += 1;
        } else {
            self.drawn += 1;
        }
        self.points = 3 * self.won + self.drawn;
    }
}

// ---------------------------------------------------------------------------
// Table computation
// ---------------------------------------------------------------------------

/// Build the full league table from played fixtures.
///
/// Ordering: points desc, goal difference desc, goals scored desc, team id
/// asc (so exact ties resolve reproducibly). A fixture referencing an
/// unknown team id still credits the known side; a played fixture with no
/// scores reported cannot be settled and is skipped. An empty fixture list
/// yields an all-zero table ranked by team id.
pub fn compute_table(teams: &[Team], fixtures: &[Fixture]) -> Vec<StandingsRow> {
    let mut rows: HashMap<u32, StandingsRow> = teams
        .iter()
        .map(|t| (t.id, StandingsRow::zeroed(t.id)))
        .collect();

    for fixture in fixtures.iter().filter(|f| f.is_played()) {
        let (Some(home_goals), Some(away_goals)) = (fixture.home_score, fixture.away_score)
        else {
            // finished flag set but no scores reported
            continue;
        };
        if let Some(row) = rows.get_mut(&fixture.home_team) {
            row.record_result(home_goals, away_goals);
        }
        if let Some(row) = rows.get_mut(&fixture.away_team) {
            row.record_result(away_goals, home_goals);
        }
    }

    let mut table: Vec<StandingsRow> = rows.into_values().collect();
    table.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
            .then(a.team_id.cmp(&b.team_id))
    });
    for (idx, row) in table.iter_mut().enumerate() {
        row.position = idx + 1;
    }
    table
}

/// Map team id to 1-based league position.
pub fn position_map(table: &[StandingsRow]) -> HashMap<u32, usize> {
    table.iter().map(|row| (row.team_id, row.position)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: u32) -> Team {
        Team {
            id,
            name: format!("Team {id}"),
            short_name: format!("T{id}"),
        }
    }

    fn played(home: u32, away: u32, score: (u32, u32)) -> Fixture {
        Fixture {
            id: home * 100 + away,
            gameweek: Some(1),
            home_team: home,
            away_team: away,
            home_score: Some(score.0),
            away_score: Some(score.1),
            finished: true,
            kickoff: None,
        }
    }

    #[test]
    fn empty_fixture_list_ranks_by_id() {
        let teams: Vec<Team> = [3, 1, 2].into_iter().map(team).collect();
        let table = compute_table(&teams, &[]);

        assert_eq!(table.len(), 3);
        let ids: Vec<u32> = table.iter().map(|r| r.team_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        for (idx, row) in table.iter().enumerate() {
            assert_eq!(row.position, idx + 1);
            assert_eq!(row.points, 0);
            assert_eq!(row.played, 0);
        }
    }

    #[test]
    fn points_and_goal_accounting() {
        let teams: Vec<Team> = (1..=3).map(team).collect();
        let fixtures = vec![
            played(1, 2, (2, 0)), // 1 wins
            played(2, 3, (1, 1)), // draw
            played(3, 1, (0, 3)), // 1 wins away
        ];
        let table = compute_table(&teams, &fixtures);
        let row = |id: u32| *table.iter().find(|r| r.team_id == id).unwrap();

        let one = row(1);
        assert_eq!((one.won, one.drawn, one.lost), (2, 0, 0));
        assert_eq!(one.points, 6);
        assert_eq!(one.goals_for, 5);
        assert_eq!(one.goals_against, 0);
        assert_eq!(one.goal_difference, 5);
        assert_eq!(one.position, 1);

        let two = row(2);
        assert_eq!((two.won, two.drawn, two.lost), (0, 1, 1));
        assert_eq!(two.points, 1);

        let three = row(3);
        assert_eq!((three.won, three.drawn, three.lost), (0, 1, 1));
        assert_eq!(three.goal_difference, -3);

        // points invariant, per team and league-wide
        for r in &table {
            assert_eq!(r.points, 3 * r.won + r.drawn);
        }
        let total: u32 = table.iter().map(|r| r.points).sum();
        // 2 decisive fixtures, 1 drawn
        assert_eq!(total, 3 * 2 + 2);
    }

    #[test]
    fn tie_break_order_is_total() {
        let teams: Vec<Team> = (1..=4).map(team).collect();
        // Winners 1 and 2 have equal points and GD, team 2 scored more;
        // losers 3 and 4 have equal points and GD, team 4 scored more.
        let fixtures = vec![
            played(1, 3, (1, 0)),
            played(2, 4, (2, 1)),
        ];
        let table = compute_table(&teams, &fixtures);
        let ids: Vec<u32> = table.iter().map(|r| r.team_id).collect();
        assert_eq!(ids, vec![2, 1, 4, 3]);
    }

    #[test]
    fn score_signal_counts_without_finished_flag() {
        let teams: Vec<Team> = (1..=2).map(team).collect();
        let mut fixture = played(1, 2, (1, 0));
        fixture.finished = false;
        let table = compute_table(&teams, &[fixture]);
        assert_eq!(table[0].team_id, 1);
        assert_eq!(table[0].points, 3);
    }

    #[test]
    fn finished_without_scores_is_skipped() {
        let teams: Vec<Team> = (1..=2).map(team).collect();
        let fixture = Fixture {
            id: 1,
            gameweek: Some(1),
            home_team: 1,
            away_team: 2,
            home_score: None,
            away_score: None,
            finished: true,
            kickoff: None,
        };
        let table = compute_table(&teams, &[fixture]);
        assert!(table.iter().all(|r| r.played == 0));
    }

    #[test]
    fn unknown_team_id_credits_known_side() {
        let teams = vec![team(1)];
        let table = compute_table(&teams, &[played(1, 99, (2, 0))]);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].points, 3);
    }

    #[test]
    fn recomputation_is_deterministic() {
        let teams: Vec<Team> = (1..=20).map(team).collect();
        let fixtures: Vec<Fixture> = (1u32..=19)
            .map(|i| played(i, i + 1, (i % 3, (i + 1) % 2)))
            .collect();
        let first = compute_table(&teams, &fixtures);
        let second = compute_table(&teams, &fixtures);
        assert_eq!(first, second);
    }

    #[test]
    fn partial_season_scenario_ranks_a_above_b() {
        // Team A: 10W 3D 2L = 33 pts with narrow margins. Team B: 9W 5D 1L
        // = 32 pts with a much better goal difference. Points must dominate.
        let teams: Vec<Team> = (1..=20).map(team).collect();
        let mut fixtures = Vec::new();
        let mut opponent = 3u32;
        let mut next_opponent = || {
            let o = opponent;
            opponent = if opponent >= 20 { 3 } else { opponent + 1 };
            o
        };

        // Team A (id 1): 10 narrow wins, 3 draws, 2 heavy losses.
        let a_results: Vec<(u32, u32)> = std::iter::repeat((1, 0))
            .take(10)
            .chain(std::iter::repeat((0, 0)).take(3))
            .chain(std::iter::repeat((0, 3)).take(2))
            .collect();
        for score in a_results {
            fixtures.push(played(1, next_opponent(), score));
        }

        // Team B (id 2): 9 big wins, 5 draws, 1 narrow loss.
        let b_results: Vec<(u32, u32)> = std::iter::repeat((4, 0))
            .take(9)
            .chain(std::iter::repeat((1, 1)).take(5))
            .chain(std::iter::once((0, 1)))
            .collect();
        for score in b_results {
            fixtures.push(played(2, next_opponent(), score));
        }

        let table = compute_table(&teams, &fixtures);
        let positions = position_map(&table);

        let a = *positions.get(&1).unwrap();
        let b = *positions.get(&2).unwrap();
        assert!(a < b, "A (pos {a}) must rank above B (pos {b})");

        let row_a = table.iter().find(|r| r.team_id == 1).unwrap();
        let row_b = table.iter().find(|r| r.team_id == 2).unwrap();
        assert_eq!(row_a.points, 33);
        assert_eq!(row_b.points, 32);
        assert!(row_b.goal_difference > row_a.goal_difference);
    }
}
