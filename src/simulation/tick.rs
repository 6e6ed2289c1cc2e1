//! Tick system - orchestrates simulation updates
//!
//! One tick per rendered frame, driven by the elapsed milliseconds since the
//! previous one:
//!
//! regrowth timers -> villagers (serially, in spawn order) -> day/night clock
//!
//! Regrowth runs first, so a tree felled during this tick starts counting
//! on the next one. Only one agent mutates shared state at a time.

use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::city::building::BuildingRegistry;
use crate::city::ledger::{ResourceLedger, ResourceType};
use crate::core::config::{WorldConfig, NOMINAL_FRAME_MS};
use crate::core::types::{BuildingId, GridCoord, VillagerId};
use crate::ecs::world::World;
use crate::simulation::regrowth::RegrowthScheduler;
use crate::simulation::villager::{
    has_standing_tree, nearest_standing_tree, Destination, VillagerAgent, VillagerRole,
    VillagerState,
};
use crate::spatial::iso::IsoProjection;
use crate::world::terrain::TerrainGrid;

/// Events generated during a simulation tick
///
/// Returned by `run_simulation_tick` for the HUD and action log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    /// A lumberjack reached a standing tree and started chopping
    WorkStarted { villager: VillagerId, coord: GridCoord },
    /// Chopping finished; the stump now waits for regrowth
    TreeFelled { villager: VillagerId, coord: GridCoord },
    /// Carried wood reached the ledger
    WoodDelivered {
        villager: VillagerId,
        amount: u64,
        total: u64,
    },
    /// A stump turned into meadow
    TreeRegrown { coord: GridCoord },
    /// An unbound villager walked close enough to a free building to move in
    BuildingClaimed {
        villager: VillagerId,
        building: BuildingId,
        role: VillagerRole,
    },
}

/// The slice of world state an agent may touch while it is being updated.
/// Terrain is read-only here: felling only schedules regrowth.
pub(crate) struct AgentContext<'a> {
    pub config: &'a WorldConfig,
    pub iso: &'a IsoProjection,
    pub terrain: &'a TerrainGrid,
    pub buildings: &'a mut BuildingRegistry,
    pub regrowth: &'a mut RegrowthScheduler,
    pub ledger: &'a mut ResourceLedger,
    pub rng: &'a mut ChaCha8Rng,
}

/// Run a single simulation tick
///
/// Order:
/// 1. Advance regrowth timers, converting expired stumps to meadow
/// 2. Update every villager (homing, movement, arrival, work, animation)
/// 3. Advance the day/night clock and tick counters
///
/// Negative deltas are treated as zero.
pub fn run_simulation_tick(world: &mut World, delta_ms: f32) -> Vec<SimulationEvent> {
    let delta_ms = delta_ms.max(0.0);
    let mut events = Vec::new();

    advance_regrowth(world, delta_ms, &mut events);
    update_villagers(world, delta_ms, &mut events);

    world.clock.advance(delta_ms);
    world.current_tick += 1;
    world.elapsed_ms += f64::from(delta_ms);

    events
}

fn advance_regrowth(world: &mut World, delta_ms: f32, events: &mut Vec<SimulationEvent>) {
    let regrown = world.regrowth.advance(
        delta_ms,
        world.config.regrowth_delay_ms,
        &mut world.terrain,
        &mut world.occupancy,
    );

    for coord in regrown {
        tracing::debug!("Tree at {} regrew as meadow", coord);
        events.push(SimulationEvent::TreeRegrown { coord });
    }
}

fn update_villagers(world: &mut World, delta_ms: f32, events: &mut Vec<SimulationEvent>) {
    let (villagers, mut ctx) = world.split_for_agents();
    for agent in villagers.iter_mut() {
        update_villager(agent, &mut ctx, delta_ms, events);
    }
}

fn update_villager(
    agent: &mut VillagerAgent,
    ctx: &mut AgentContext<'_>,
    delta_ms: f32,
    events: &mut Vec<SimulationEvent>,
) {
    let animation_interval = ctx.config.animation_interval_ms;

    if agent.state == VillagerState::Working {
        agent.work_timer_ms += delta_ms;
        if agent.work_timer_ms > ctx.config.work_duration_ms {
            agent.work_timer_ms = 0.0;
            finish_work(agent, ctx, events);
        }
        agent.animate(delta_ms, animation_interval);
        return;
    }

    if !agent.is_bound() {
        try_claim_home(agent, ctx, events);
    }

    if agent.state == VillagerState::Walking {
        let step = ctx.config.villager_speed * delta_ms / NOMINAL_FRAME_MS;
        if agent.step_toward_target(step, ctx.config.arrival_epsilon) {
            arrive(agent, ctx, events);
        }
    }

    agent.animate(delta_ms, animation_interval);
}

/// Kick off the role's behaviour from a standstill (spawn, or a claim made while idle)
pub(crate) fn begin_role(agent: &mut VillagerAgent, ctx: &mut AgentContext<'_>) {
    match agent.role {
        VillagerRole::Lumberjack => seek_work(agent, ctx),
        VillagerRole::Wanderer => agent.wander(ctx.config.wander_radius, &mut *ctx.rng),
    }
}

/// Head for the nearest standing tree, or home to rest if none is left
fn seek_work(agent: &mut VillagerAgent, ctx: &mut AgentContext<'_>) {
    if agent.carrying_resource {
        agent.walk_home();
        return;
    }

    let from = ctx.iso.screen_to_grid(agent.position);
    match nearest_standing_tree(ctx.terrain, ctx.regrowth, from) {
        Some(coord) => agent.walk_to(Destination::Forest(coord), ctx.iso.tile_center(coord)),
        None if agent.position.distance(agent.home_position) < ctx.config.arrival_epsilon => {
            tracing::debug!("{:?} found no standing trees, going idle", agent.id);
            agent.go_idle();
        }
        None => agent.walk_home(),
    }
}

fn arrive(agent: &mut VillagerAgent, ctx: &mut AgentContext<'_>, events: &mut Vec<SimulationEvent>) {
    match agent.destination {
        Some(Destination::Home) if agent.carrying_resource => {
            deliver(agent, ctx, events);
            begin_role(agent, ctx);
        }
        Some(Destination::Forest(coord)) if agent.role == VillagerRole::Lumberjack => {
            if has_standing_tree(ctx.terrain, ctx.regrowth, coord) {
                agent.start_work();
                tracing::debug!("{:?} started chopping at {}", agent.id, coord);
                events.push(SimulationEvent::WorkStarted {
                    villager: agent.id,
                    coord,
                });
            } else {
                seek_work(agent, ctx);
            }
        }
        _ => begin_role(agent, ctx),
    }
}

fn finish_work(agent: &mut VillagerAgent, ctx: &mut AgentContext<'_>, events: &mut Vec<SimulationEvent>) {
    match agent.destination {
        Some(Destination::Forest(coord)) if has_standing_tree(ctx.terrain, ctx.regrowth, coord) => {
            ctx.regrowth.schedule(coord);
            agent.carrying_resource = true;
            tracing::debug!("{:?} felled tree at {}", agent.id, coord);
            events.push(SimulationEvent::TreeFelled {
                villager: agent.id,
                coord,
            });
            agent.walk_home();
        }
        // Someone else got the tree first
        _ => seek_work(agent, ctx),
    }
}

fn deliver(agent: &mut VillagerAgent, ctx: &mut AgentContext<'_>, events: &mut Vec<SimulationEvent>) {
    let amount = ctx.config.wood_per_delivery;
    let total = ctx.ledger.deliver(ResourceType::Wood, amount);
    agent.carrying_resource = false;
    tracing::debug!("{:?} delivered {} wood (total {})", agent.id, amount, total);
    events.push(SimulationEvent::WoodDelivered {
        villager: agent.id,
        amount,
        total,
    });
}

/// First free building (placement order) whose centre is within homing range
fn try_claim_home(agent: &mut VillagerAgent, ctx: &mut AgentContext<'_>, events: &mut Vec<SimulationEvent>) {
    let radius = ctx.config.homing_radius;
    let claim = ctx.buildings.iter_unoccupied().find_map(|building| {
        let center = ctx.iso.footprint_center(building.anchor, building.footprint_size());
        (center.distance(agent.position) <= radius).then_some((building.id, building.kind, center))
    });
    let Some((building, kind, center)) = claim else {
        return;
    };

    ctx.buildings.mark_occupied(building);
    agent.home = Some(building);
    agent.home_position = center;
    agent.role = VillagerRole::for_building(kind);
    tracing::debug!("{:?} claimed {:?} as {:?}", agent.id, building, agent.role);
    events.push(SimulationEvent::BuildingClaimed {
        villager: agent.id,
        building,
        role: agent.role,
    });

    match (agent.state, agent.destination) {
        (VillagerState::Idle, _) => begin_role(agent, ctx),
        (VillagerState::Walking, Some(Destination::Home)) => agent.walk_home(),
        _ => {}
    }
}
