//! Homestead - headless runner
//!
//! Generates a world, places a few houses with a lumberjack each, runs the
//! simulation for a fixed number of frames and prints a summary.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use homestead::city::building::BuildingKind;
use homestead::core::config::{WorldConfig, NOMINAL_FRAME_MS};
use homestead::core::error::Result;
use homestead::core::types::GridCoord;
use homestead::ecs::world::World;
use homestead::simulation::tick::SimulationEvent;
use homestead::simulation::villager::{VillagerRole, VillagerState};
use homestead::world::terrain::TerrainTile;

/// Headless settlement runner
#[derive(Parser, Debug)]
#[command(name = "homestead")]
#[command(about = "Run the settlement simulation without a window and report the outcome")]
struct Args {
    /// World config file (TOML); defaults apply to missing keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the terrain seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Elapsed milliseconds per frame
    #[arg(long, default_value_t = NOMINAL_FRAME_MS)]
    delta_ms: f32,

    /// Houses to place, each with one lumberjack
    #[arg(long, default_value_t = 3)]
    houses: usize,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    elapsed_ms: f64,
    days_elapsed: u64,
    buildings: usize,
    villagers: usize,
    working: usize,
    walking: usize,
    idle: usize,
    wood: u64,
    trees_felled: usize,
    trees_regrown: usize,
    forest_remaining: usize,
    meadow: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("homestead=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;

    tracing::info!("Homestead starting with seed {}", config.seed);
    let mut world = World::new(config);

    let placed = place_houses(&mut world, args.houses);
    if placed < args.houses {
        tracing::warn!("Only found room for {} of {} houses", placed, args.houses);
    }

    let mut events = Vec::new();
    for _ in 0..args.ticks {
        events.extend(world.tick(args.delta_ms));
    }

    let summary = summarize(&world, &events);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Place up to `count` houses on the first valid anchors (row-major) and
/// spawn a lumberjack in each. Returns how many were placed.
fn place_houses(world: &mut World, count: usize) -> usize {
    let (width, height) = (world.terrain().width() as i32, world.terrain().height() as i32);
    let mut placed = 0;

    for y in 0..height {
        for x in 0..width {
            if placed == count {
                return placed;
            }
            let anchor = GridCoord::new(x, y);
            if world.place_building(anchor, BuildingKind::House).is_some() {
                world.spawn_villager(anchor, VillagerRole::Lumberjack);
                placed += 1;
            }
        }
    }

    placed
}

fn summarize(world: &World, events: &[SimulationEvent]) -> RunSummary {
    let count_state = |state: VillagerState| world.villagers().filter(|v| v.state == state).count();
    let count_events = |pred: fn(&SimulationEvent) -> bool| events.iter().filter(|e| pred(e)).count();

    RunSummary {
        seed: world.config().seed,
        ticks: world.current_tick(),
        elapsed_ms: world.elapsed_ms(),
        days_elapsed: world.clock().days_elapsed(),
        buildings: world.building_count(),
        villagers: world.villager_count(),
        working: count_state(VillagerState::Working),
        walking: count_state(VillagerState::Walking),
        idle: count_state(VillagerState::Idle),
        wood: world.ledger().wood(),
        trees_felled: count_events(|e| matches!(e, SimulationEvent::TreeFelled { .. })),
        trees_regrown: count_events(|e| matches!(e, SimulationEvent::TreeRegrown { .. })),
        forest_remaining: world.terrain().count(TerrainTile::Forest),
        meadow: world.terrain().count(TerrainTile::Meadow),
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n=== HOMESTEAD ===");
    println!("Seed: {}", summary.seed);
    println!(
        "Ticks: {} ({:.1}s simulated, {} days)",
        summary.ticks,
        summary.elapsed_ms / 1000.0,
        summary.days_elapsed
    );
    println!("Buildings: {}", summary.buildings);
    println!(
        "Villagers: {} ({} walking, {} working, {} idle)",
        summary.villagers, summary.walking, summary.working, summary.idle
    );
    println!("Wood: {}", summary.wood);
    println!(
        "Trees felled: {}, regrown: {}",
        summary.trees_felled, summary.trees_regrown
    );
    println!(
        "Terrain: {} forest, {} meadow",
        summary.forest_remaining, summary.meadow
    );
}
