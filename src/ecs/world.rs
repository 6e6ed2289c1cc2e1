//! World - the settlement aggregate
//!
//! Owns terrain, occupancy, buildings, villagers, regrowth timers, the
//! resource ledger and the clock. All mutation goes through `tick`,
//! `place_building` and `spawn_villager`, so the occupancy invariant holds
//! whenever a call returns.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::city::building::{Building, BuildingKind, BuildingRegistry};
use crate::city::ledger::ResourceLedger;
use crate::core::clock::DayNightClock;
use crate::core::config::WorldConfig;
use crate::core::types::{BuildingId, GridCoord, VillagerId};
use crate::simulation::regrowth::RegrowthScheduler;
use crate::simulation::tick::{begin_role, run_simulation_tick, AgentContext, SimulationEvent};
use crate::simulation::villager::{
    has_standing_tree, nearest_standing_tree, VillagerAgent, VillagerDirectory, VillagerRole,
};
use crate::spatial::iso::IsoProjection;
use crate::world::occupancy::OccupancyGrid;
use crate::world::terrain::{TerrainGrid, TerrainTile};

/// Keeps wander rolls independent of the terrain rolls for the same seed
const AGENT_RNG_SALT: u64 = 0xA5A5_5A5A_C3C3_3C3C;

/// The settlement and everything in it
pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) iso: IsoProjection,
    pub(crate) terrain: TerrainGrid,
    pub(crate) occupancy: OccupancyGrid,
    pub(crate) buildings: BuildingRegistry,
    pub(crate) regrowth: RegrowthScheduler,
    pub(crate) villagers: VillagerDirectory,
    pub(crate) ledger: ResourceLedger,
    pub(crate) clock: DayNightClock,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) current_tick: u64,
    pub(crate) elapsed_ms: f64,
}

impl World {
    /// Generate terrain from `config.seed` and build a world around it
    pub fn new(config: WorldConfig) -> Self {
        let terrain = TerrainGrid::generate(config.seed, config.world_width, config.world_height, &config);
        tracing::info!(
            "Generated {}x{} terrain (seed {}): {} water, {} meadow, {} forest, {} rocks",
            terrain.width(),
            terrain.height(),
            config.seed,
            terrain.count(TerrainTile::Water),
            terrain.count(TerrainTile::Meadow),
            terrain.count(TerrainTile::Forest),
            terrain.count(TerrainTile::Rocks),
        );
        Self::with_terrain(config, terrain)
    }

    /// Build a world on a prepared terrain. Occupancy is derived from it;
    /// the configured world size is ignored in favour of the terrain's.
    pub fn with_terrain(config: WorldConfig, terrain: TerrainGrid) -> Self {
        let occupancy = OccupancyGrid::from_terrain(&terrain);
        Self {
            iso: IsoProjection::from_config(&config),
            clock: DayNightClock::new(config.day_length_ms),
            rng: ChaCha8Rng::seed_from_u64(config.seed ^ AGENT_RNG_SALT),
            config,
            terrain,
            occupancy,
            buildings: BuildingRegistry::new(),
            regrowth: RegrowthScheduler::new(),
            villagers: VillagerDirectory::new(),
            ledger: ResourceLedger::new(),
            current_tick: 0,
            elapsed_ms: 0.0,
        }
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Whether a building of `kind` fits with its top-left cell at `anchor`
    pub fn can_place_building(&self, anchor: GridCoord, kind: BuildingKind) -> bool {
        self.buildings.can_place(&self.terrain, &self.occupancy, anchor, kind)
    }

    /// Place a building, re-validating the site. None if it no longer fits;
    /// nothing changes in that case.
    pub fn place_building(&mut self, anchor: GridCoord, kind: BuildingKind) -> Option<BuildingId> {
        self.buildings.place(&self.terrain, &mut self.occupancy, kind, anchor)
    }

    /// Spawn a villager at `anchor`.
    ///
    /// If an unclaimed building covers `anchor` the villager moves in right
    /// away: the building is marked occupied and its kind decides the role.
    /// Otherwise the villager is unbound, `role` applies and home is the
    /// spawn tile until it wanders near a free building.
    pub fn spawn_villager(&mut self, anchor: GridCoord, role: VillagerRole) -> VillagerId {
        let home = self
            .buildings
            .building_at(anchor)
            .filter(|b| !b.occupied)
            .map(|b| (b.id, b.kind, self.iso.footprint_center(b.anchor, b.footprint_size())));

        let (role, position) = match home {
            Some((_, kind, center)) => (VillagerRole::for_building(kind), center),
            None => (role, self.iso.tile_center(anchor)),
        };
        let id = self.villagers.spawn(role, position);

        if let Some((building, _, _)) = home {
            self.buildings.mark_occupied(building);
        }

        let (villagers, mut ctx) = self.split_for_agents();
        if let Some(agent) = villagers.get_mut(id) {
            if let Some((building, _, _)) = home {
                agent.home = Some(building);
            }
            begin_role(agent, &mut ctx);
        }

        tracing::info!("Spawned {:?} as {:?} at {} (home {:?})", id, role, anchor, home.map(|h| h.0));
        id
    }

    /// Advance the simulation by `delta_ms` of elapsed time
    pub fn tick(&mut self, delta_ms: f32) -> Vec<SimulationEvent> {
        run_simulation_tick(self, delta_ms)
    }

    /// Borrow the villagers and the rest of the world separately so each
    /// agent can be updated against shared state.
    pub(crate) fn split_for_agents(&mut self) -> (&mut VillagerDirectory, AgentContext<'_>) {
        let ctx = AgentContext {
            config: &self.config,
            iso: &self.iso,
            terrain: &self.terrain,
            buildings: &mut self.buildings,
            regrowth: &mut self.regrowth,
            ledger: &mut self.ledger,
            rng: &mut self.rng,
        };
        (&mut self.villagers, ctx)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn projection(&self) -> &IsoProjection {
        &self.iso
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn tile(&self, coord: GridCoord) -> Option<TerrainTile> {
        self.terrain.tile(coord)
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.occupancy.is_occupied(coord)
    }

    /// Forest tile whose tree has not been felled
    pub fn has_standing_tree(&self, coord: GridCoord) -> bool {
        has_standing_tree(&self.terrain, &self.regrowth, coord)
    }

    /// Felled trees still waiting to regrow
    pub fn pending_regrowth(&self) -> &RegrowthScheduler {
        &self.regrowth
    }

    pub fn find_nearest_forest(&self, from: GridCoord) -> Option<GridCoord> {
        nearest_standing_tree(&self.terrain, &self.regrowth, from)
    }

    pub fn buildings(&self) -> impl Iterator<Item = &Building> + '_ {
        self.buildings.iter()
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id)
    }

    pub fn building_count(&self) -> usize {
        self.buildings.count()
    }

    pub fn villagers(&self) -> impl Iterator<Item = &VillagerAgent> + '_ {
        self.villagers.iter()
    }

    pub fn villager(&self, id: VillagerId) -> Option<&VillagerAgent> {
        self.villagers.get(id)
    }

    pub fn villager_count(&self) -> usize {
        self.villagers.count()
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn clock(&self) -> &DayNightClock {
        &self.clock
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Every tile is occupied exactly when it holds a tree, a rock or part
    /// of a building footprint.
    pub fn occupancy_is_consistent(&self) -> bool {
        self.terrain.iter().all(|(coord, tile)| {
            let expected = tile.has_obstacle() || self.buildings.is_footprint_cell(coord);
            self.occupancy.is_occupied(coord) == expected
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::villager::VillagerState;

    fn meadow_world(width: u32, height: u32) -> World {
        World::with_terrain(
            WorldConfig::default(),
            TerrainGrid::filled(width, height, TerrainTile::Meadow),
        )
    }

    #[test]
    fn test_new_world_matches_generated_terrain() {
        let config = WorldConfig {
            world_width: 20,
            world_height: 12,
            ..WorldConfig::default()
        };
        let world = World::new(config.clone());
        let terrain = TerrainGrid::generate(config.seed, 20, 12, &config);

        assert_eq!(world.terrain(), &terrain);
        assert!(world.occupancy_is_consistent());
        assert_eq!(world.current_tick(), 0);
        assert_eq!(world.ledger().wood(), 0);
    }

    #[test]
    fn test_place_building_keeps_occupancy_consistent() {
        let mut world = meadow_world(8, 8);
        assert!(world.can_place_building(GridCoord::new(1, 1), BuildingKind::House));
        let id = world
            .place_building(GridCoord::new(1, 1), BuildingKind::House)
            .unwrap();

        assert!(world.is_occupied(GridCoord::new(2, 2)));
        assert!(!world.can_place_building(GridCoord::new(2, 2), BuildingKind::Teepee));
        assert!(world.place_building(GridCoord::new(2, 2), BuildingKind::Teepee).is_none());
        assert_eq!(world.building_count(), 1);
        assert_eq!(world.building(id).unwrap().kind, BuildingKind::House);
        assert!(world.occupancy_is_consistent());
    }

    #[test]
    fn test_spawn_binds_to_unclaimed_building() {
        let mut world = meadow_world(8, 8);
        let house = world
            .place_building(GridCoord::new(2, 2), BuildingKind::House)
            .unwrap();

        // Any footprint cell works, and the building decides the role
        let id = world.spawn_villager(GridCoord::new(3, 3), VillagerRole::Wanderer);
        let agent = world.villager(id).unwrap();
        assert_eq!(agent.home, Some(house));
        assert_eq!(agent.role, VillagerRole::Lumberjack);
        assert_eq!(
            agent.home_position,
            world.projection().footprint_center(GridCoord::new(2, 2), 2)
        );
        assert!(world.building(house).unwrap().occupied);

        // Second spawn finds the house taken and stays unbound
        let other = world.spawn_villager(GridCoord::new(2, 2), VillagerRole::Wanderer);
        let agent = world.villager(other).unwrap();
        assert_eq!(agent.home, None);
        assert_eq!(agent.role, VillagerRole::Wanderer);
        assert_eq!(agent.state, VillagerState::Walking);
    }

    #[test]
    fn test_spawned_lumberjack_without_trees_idles() {
        let mut world = meadow_world(4, 4);
        let id = world.spawn_villager(GridCoord::new(1, 1), VillagerRole::Lumberjack);
        assert_eq!(world.villager(id).unwrap().state, VillagerState::Idle);
    }

    #[test]
    fn test_find_nearest_forest() {
        let terrain = TerrainGrid::from_ascii(&["T...", "....", "...T"]).unwrap();
        let world = World::with_terrain(WorldConfig::default(), terrain);
        assert_eq!(world.find_nearest_forest(GridCoord::new(3, 1)), Some(GridCoord::new(3, 2)));
        assert_eq!(world.find_nearest_forest(GridCoord::new(0, 1)), Some(GridCoord::new(0, 0)));
        assert!(world.has_standing_tree(GridCoord::new(0, 0)));
    }
}
