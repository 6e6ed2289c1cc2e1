//! Villager agents - pure data plus movement and animation helpers
//!
//! Agents live in continuous screen space for smooth motion. The renderer
//! reads position, state and animation frame each frame and never writes
//! back. Decisions that touch the world (felling, delivering, claiming
//! homes) are made by the tick loop in `simulation::tick`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::city::building::BuildingKind;
use crate::core::types::{BuildingId, GridCoord, Vec2, VillagerId};
use crate::simulation::regrowth::RegrowthScheduler;
use crate::world::terrain::{TerrainGrid, TerrainTile};

/// What a villager does for a living
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VillagerRole {
    /// Fells the nearest tree, carries the wood home, repeats
    Lumberjack,
    /// Strolls to random points around home
    Wanderer,
}

impl VillagerRole {
    /// Role a villager takes on when a building of `kind` becomes its home
    pub fn for_building(kind: BuildingKind) -> Self {
        match kind {
            BuildingKind::House => VillagerRole::Lumberjack,
            BuildingKind::Teepee => VillagerRole::Wanderer,
        }
    }
}

/// Logical state. Animation is tracked separately and never affects transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VillagerState {
    Walking,
    Working,
    Idle,
}

/// Why a villager is heading to its target position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Forest(GridCoord),
    Home,
    Wander,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VillagerAgent {
    pub id: VillagerId,
    pub role: VillagerRole,
    pub state: VillagerState,
    /// Foot position (bottom-center anchor) in screen space
    pub position: Vec2,
    pub target_position: Vec2,
    pub destination: Option<Destination>,
    /// Claimed building, None while unbound
    pub home: Option<BuildingId>,
    /// Building center once bound, spawn point before that
    pub home_position: Vec2,
    pub carrying_resource: bool,
    pub work_timer_ms: f32,
    /// Walk cycle frame, 0 or 1
    pub animation_frame: u8,
    animation_timer_ms: f32,
}

impl VillagerAgent {
    /// A fresh agent standing at `position`, idle until given a target
    pub fn new(id: VillagerId, role: VillagerRole, position: Vec2) -> Self {
        Self {
            id,
            role,
            state: VillagerState::Idle,
            position,
            target_position: position,
            destination: None,
            home: None,
            home_position: position,
            carrying_resource: false,
            work_timer_ms: 0.0,
            animation_frame: 0,
            animation_timer_ms: 0.0,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.home.is_some()
    }

    /// Assign a target; any state becomes Walking
    pub fn walk_to(&mut self, destination: Destination, target: Vec2) {
        self.destination = Some(destination);
        self.target_position = target;
        self.state = VillagerState::Walking;
    }

    pub fn walk_home(&mut self) {
        let home = self.home_position;
        self.walk_to(Destination::Home, home);
    }

    /// Pick a random point within `radius` of home and walk there
    pub fn wander<R: Rng + ?Sized>(&mut self, radius: f32, rng: &mut R) {
        let angle = rng.gen::<f32>() * std::f32::consts::TAU;
        // sqrt keeps points uniform over the disc
        let distance = radius * rng.gen::<f32>().sqrt();
        let target = self.home_position + Vec2::new(angle.cos(), angle.sin()) * distance;
        self.walk_to(Destination::Wander, target);
    }

    pub fn start_work(&mut self) {
        self.state = VillagerState::Working;
        self.work_timer_ms = 0.0;
    }

    pub fn go_idle(&mut self) {
        self.state = VillagerState::Idle;
        self.destination = None;
        self.target_position = self.position;
    }

    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target_position)
    }

    /// Move up to `step` pixels straight toward the target without
    /// overshooting. Returns true once within `epsilon` of it.
    pub fn step_toward_target(&mut self, step: f32, epsilon: f32) -> bool {
        let offset = self.target_position - self.position;
        let distance = offset.length();
        if distance <= step {
            self.position = self.target_position;
        } else if distance > 0.0 {
            self.position += offset / distance * step;
        }
        self.distance_to_target() < epsilon
    }

    /// Toggle the walk frame every `interval_ms` while walking; frame 0 otherwise
    pub fn animate(&mut self, delta_ms: f32, interval_ms: f32) {
        if self.state != VillagerState::Walking {
            self.animation_frame = 0;
            self.animation_timer_ms = 0.0;
            return;
        }
        self.animation_timer_ms += delta_ms;
        if self.animation_timer_ms >= interval_ms {
            self.animation_timer_ms %= interval_ms;
            self.animation_frame ^= 1;
        }
    }
}

/// Whether `coord` still has a standing tree (Forest and not felled)
pub fn has_standing_tree(terrain: &TerrainGrid, regrowth: &RegrowthScheduler, coord: GridCoord) -> bool {
    terrain.tile(coord) == Some(TerrainTile::Forest) && !regrowth.is_pending(coord)
}

/// Nearest standing tree by Manhattan distance; ties go to the tile scanned
/// first (row by row). Full grid scan, so call on spawn and delivery only.
pub fn nearest_standing_tree(
    terrain: &TerrainGrid,
    regrowth: &RegrowthScheduler,
    from: GridCoord,
) -> Option<GridCoord> {
    let mut best: Option<(u32, GridCoord)> = None;
    for (coord, tile) in terrain.iter() {
        if tile != TerrainTile::Forest || regrowth.is_pending(coord) {
            continue;
        }
        let distance = from.manhattan(coord);
        if best.map_or(true, |(d, _)| distance < d) {
            best = Some((distance, coord));
        }
    }
    best.map(|(_, coord)| coord)
}

/// Every villager, indexed by id
#[derive(Debug, Clone, Default)]
pub struct VillagerDirectory {
    agents: Vec<VillagerAgent>,
}

impl VillagerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent standing at `position`, returns its id
    pub fn spawn(&mut self, role: VillagerRole, position: Vec2) -> VillagerId {
        let id = VillagerId(self.agents.len() as u32);
        self.agents.push(VillagerAgent::new(id, role, position));
        id
    }

    pub fn get(&self, id: VillagerId) -> Option<&VillagerAgent> {
        self.agents.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: VillagerId) -> Option<&mut VillagerAgent> {
        self.agents.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VillagerAgent> + '_ {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut VillagerAgent> + '_ {
        self.agents.iter_mut()
    }

    pub fn count(&self) -> usize {
        self.agents.len()
    }
}
