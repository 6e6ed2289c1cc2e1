//! Render views for the settlement
//!
//! Turns simulation state into draw lists for a painter's-algorithm
//! renderer. This module is READ-ONLY - it never modifies simulation state.
//!
//! Ground tiles are drawn first in a fixed top-left to bottom-right sweep.
//! Everything standing on them (trees, rocks, buildings, villagers) is
//! re-sorted every frame by the screen y of its bottom-center anchor.

use std::cmp::Ordering;

use serde::Serialize;

use crate::city::building::BuildingKind;
use crate::core::types::{BuildingId, GridCoord, Vec2, VillagerId};
use crate::ecs::world::World;
use crate::simulation::villager::{VillagerRole, VillagerState};
use crate::spatial::iso::{depth_key, static_depth_key};
use crate::world::terrain::TerrainTile;

/// A flat ground diamond
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundTile {
    pub coord: GridCoord,
    pub tile: TerrainTile,
    /// Top vertex of the diamond
    pub origin: Vec2,
}

/// What the villager sprite should show
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VillagerView {
    pub id: VillagerId,
    pub role: VillagerRole,
    pub state: VillagerState,
    pub frame: u8,
    pub carrying: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DrawKind {
    Tree(GridCoord),
    Rock(GridCoord),
    Building {
        id: BuildingId,
        kind: BuildingKind,
        occupied: bool,
    },
    Villager(VillagerView),
}

impl DrawKind {
    /// Tie-break for equal depth: ground clutter, then buildings, then people
    fn layer(&self) -> u8 {
        match self {
            DrawKind::Tree(_) | DrawKind::Rock(_) => 0,
            DrawKind::Building { .. } => 1,
            DrawKind::Villager(_) => 2,
        }
    }
}

/// One sprite to paint
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawItem {
    pub kind: DrawKind,
    /// Bottom-center anchor in screen space
    pub anchor: Vec2,
    pub depth: f32,
}

/// Collects ground tiles in static draw order into a reusable buffer.
/// Terrain only changes on regrowth, so callers may cache this.
pub fn collect_ground_tiles(world: &World, buffer: &mut Vec<GroundTile>) {
    buffer.clear();

    let iso = world.projection();
    buffer.extend(world.terrain().iter().map(|(coord, tile)| GroundTile {
        coord,
        tile,
        origin: iso.grid_to_screen(coord),
    }));
    // Stable sort keeps row-major order within a diagonal
    buffer.sort_by_key(|ground| static_depth_key(ground.coord));
}

/// Collects every standing object into a reusable buffer, back to front.
/// Call this once per frame, passing the same buffer to avoid allocations.
/// Felled trees are left out.
pub fn collect_draw_items(world: &World, buffer: &mut Vec<DrawItem>) {
    buffer.clear();

    let iso = world.projection();

    for (coord, tile) in world.terrain().iter() {
        let kind = match tile {
            TerrainTile::Forest if world.has_standing_tree(coord) => DrawKind::Tree(coord),
            TerrainTile::Rocks => DrawKind::Rock(coord),
            _ => continue,
        };
        let anchor = iso.footprint_base(coord, 1);
        buffer.push(DrawItem {
            kind,
            anchor,
            depth: depth_key(anchor),
        });
    }

    for building in world.buildings() {
        let anchor = iso.footprint_base(building.anchor, building.footprint_size());
        buffer.push(DrawItem {
            kind: DrawKind::Building {
                id: building.id,
                kind: building.kind,
                occupied: building.occupied,
            },
            anchor,
            depth: depth_key(anchor),
        });
    }

    for agent in world.villagers() {
        buffer.push(DrawItem {
            kind: DrawKind::Villager(VillagerView {
                id: agent.id,
                role: agent.role,
                state: agent.state,
                frame: agent.animation_frame,
                carrying: agent.carrying_resource,
            }),
            anchor: agent.position,
            depth: depth_key(agent.position),
        });
    }

    buffer.sort_by(|a, b| match a.depth.total_cmp(&b.depth) {
        Ordering::Equal => a.kind.layer().cmp(&b.kind.layer()),
        order => order,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldConfig;
    use crate::simulation::villager::VillagerRole;
    use crate::world::terrain::TerrainGrid;

    fn world_from(rows: &[&str]) -> World {
        World::with_terrain(WorldConfig::default(), TerrainGrid::from_ascii(rows).unwrap())
    }

    #[test]
    fn test_draw_items_sorted_back_to_front() {
        let mut world = world_from(&["T...", "..^.", "....", "...T"]);
        world.place_building(GridCoord::new(0, 2), BuildingKind::Teepee);
        world.spawn_villager(GridCoord::new(3, 0), VillagerRole::Wanderer);

        let mut items = Vec::new();
        collect_draw_items(&world, &mut items);

        assert_eq!(items.len(), 5);
        assert!(items.windows(2).all(|w| w[0].depth <= w[1].depth));
        assert_eq!(items[0].kind, DrawKind::Tree(GridCoord::new(0, 0)));
        assert_eq!(items[4].kind, DrawKind::Tree(GridCoord::new(3, 3)));
    }

    #[test]
    fn test_felled_trees_are_omitted() {
        let config = WorldConfig {
            work_duration_ms: 10.0,
            ..WorldConfig::default()
        };
        let mut world = World::with_terrain(config, TerrainGrid::from_ascii(&["T."]).unwrap());
        world.spawn_villager(GridCoord::new(0, 0), VillagerRole::Lumberjack);
        for _ in 0..5 {
            world.tick(16.0);
        }
        assert!(!world.has_standing_tree(GridCoord::new(0, 0)));

        let mut items = Vec::new();
        collect_draw_items(&world, &mut items);
        assert!(items.iter().all(|item| !matches!(item.kind, DrawKind::Tree(_))));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_buffer_is_reused() {
        let world = world_from(&["T"]);
        let mut items = Vec::new();
        collect_draw_items(&world, &mut items);
        collect_draw_items(&world, &mut items);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_ground_tiles_follow_diagonal_sweep() {
        let world = world_from(&["~.", "T^"]);
        let mut tiles = Vec::new();
        collect_ground_tiles(&world, &mut tiles);

        let coords: Vec<_> = tiles.iter().map(|t| t.coord).collect();
        assert_eq!(
            coords,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(1, 0),
                GridCoord::new(0, 1),
                GridCoord::new(1, 1),
            ]
        );
        assert_eq!(tiles[0].tile, TerrainTile::Water);
        assert_eq!(tiles[3].origin, world.projection().grid_to_screen(GridCoord::new(1, 1)));
    }
}
