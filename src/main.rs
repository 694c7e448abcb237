// Transfer scout entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the report)
// 2. Parse arguments (snapshot path, optional engine.toml path)
// 3. Load config, load snapshot
// 4. Run the pipeline
// 5. Print standings, opponent difficulty badges, and top transfer targets

use transfer_scout::config::EngineConfig;
use transfer_scout::engine;
use transfer_scout::feed;
use transfer_scout::model::{Position, Snapshot};

use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let mut args = std::env::args().skip(1);
    let snapshot_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .context("usage: scout <snapshot.json> [engine.toml]")?;
    let config_path = args.next().map(PathBuf::from);

    let config = match &config_path {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    info!(
        "config: top_n={}, lookahead={}, weights form/fixture {}/{}",
        config.strength.top_n,
        config.index.lookahead,
        config.index.form_weight,
        config.index.fixture_weight
    );

    let snapshot = feed::load_snapshot(&snapshot_path)
        .with_context(|| format!("failed to load snapshot from {}", snapshot_path.display()))?;
    info!(
        "snapshot: {} teams, {} players, {} fixtures, {} gameweeks",
        snapshot.teams.len(),
        snapshot.players.len(),
        snapshot.fixtures.len(),
        snapshot.gameweeks.len()
    );

    let report = engine::run(&snapshot, &config);

    print_standings(&report, &snapshot);
    print_opponent_ratings(&report, &snapshot);
    print_targets(&report, &snapshot);

    Ok(())
}

fn print_standings(report: &engine::EngineReport, snapshot: &Snapshot) {
    println!("League table");
    println!("{:>3}  {:<20} {:>2} {:>2} {:>2} {:>2} {:>4} {:>4}", "#", "Team", "P", "W", "D", "L", "GD", "Pts");
    for row in &report.table {
        let name = snapshot
            .team(row.team_id)
            .map(|t| t.name.as_str())
            .unwrap_or("?");
        println!(
            "{:>3}  {:<20} {:>2} {:>2} {:>2} {:>2} {:>4} {:>4}",
            row.position,
            name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goal_difference,
            row.points
        );
    }
    println!();
}

fn print_opponent_ratings(
    report: &engine::EngineReport,
    snapshot: &Snapshot,
) {
    println!("Opponent difficulty (home fixture / away fixture)");
    for rating in &report.opponent_ratings {
        let name = snapshot
            .team(rating.team_id)
            .map(|t| t.short_name.as_str())
            .unwrap_or("?");
        println!(
            "  {:<4} {} ({}) / {} ({})",
            name,
            rating.at_home.value(),
            rating.at_home.label(),
            rating.away.value(),
            rating.away.label()
        );
    }
    println!();
}

fn print_targets(report: &engine::EngineReport, snapshot: &Snapshot) {
    println!("Top transfer targets");
    for position in [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ] {
        println!("  {position}");
        for target in engine::top_targets(report, snapshot, Some(position), 5) {
            let player = snapshot.players.iter().find(|p| p.id == target.player_id);
            let name = player.map(|p| p.name.as_str()).unwrap_or("?");
            let window: Vec<String> = target
                .outlook
                .iter()
                .map(|o| match o.opponent {
                    Some(opp) => {
                        let short = snapshot
                            .team(opp)
                            .map(|t| t.short_name.as_str())
                            .unwrap_or("?");
                        let venue = if o.is_home { "H" } else { "A" };
                        format!("{short}({venue}/{})", o.tier.value())
                    }
                    None => "blank".into(),
                })
                .collect();
            println!(
                "    {:<18} index {:.3}  form {:>4.1}  next: {}",
                name,
                target.index,
                target.form,
                window.join(" ")
            );
        }
    }
}

/// Initialize tracing to stderr so the printed report stays clean on stdout.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("transfer_scout=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
