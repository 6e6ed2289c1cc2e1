//! Buildings, footprints and the placement gate

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{BuildingId, GridCoord};
use crate::world::occupancy::OccupancyGrid;
use crate::world::terrain::{TerrainGrid, TerrainTile};

/// Type of building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    House,
    Teepee,
}

impl BuildingKind {
    /// Side length of the square footprint in tiles
    pub fn footprint_size(&self) -> u32 {
        match self {
            BuildingKind::House => 2,
            BuildingKind::Teepee => 1,
        }
    }
}

/// Cells of a `size x size` block anchored at its top-left cell, in scan order
pub fn footprint_cells(anchor: GridCoord, size: u32) -> impl Iterator<Item = GridCoord> {
    let size = size as i32;
    (0..size).flat_map(move |dy| (0..size).map(move |dx| anchor.offset(dx, dy)))
}

/// A placed building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub kind: BuildingKind,
    /// Top-left cell of the footprint
    pub anchor: GridCoord,
    /// Flips to true once, when a villager is assigned or walks in
    pub occupied: bool,
}

impl Building {
    pub fn footprint_size(&self) -> u32 {
        self.kind.footprint_size()
    }

    pub fn footprint(&self) -> impl Iterator<Item = GridCoord> {
        footprint_cells(self.anchor, self.footprint_size())
    }

    pub fn covers(&self, coord: GridCoord) -> bool {
        let size = self.footprint_size() as i32;
        (self.anchor.x..self.anchor.x + size).contains(&coord.x)
            && (self.anchor.y..self.anchor.y + size).contains(&coord.y)
    }
}

/// Every placed building, plus a cell -> building map covering each footprint
#[derive(Debug, Clone, Default)]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
    footprints: AHashMap<GridCoord, BuildingId>,
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single placement gate: every footprint cell must be in bounds,
    /// not Water, and unoccupied.
    pub fn can_place(
        &self,
        terrain: &TerrainGrid,
        occupancy: &OccupancyGrid,
        anchor: GridCoord,
        kind: BuildingKind,
    ) -> bool {
        footprint_cells(anchor, kind.footprint_size()).all(|cell| {
            matches!(terrain.tile(cell), Some(tile) if tile != TerrainTile::Water)
                && !occupancy.is_occupied(cell)
        })
    }

    /// Commit a placement. Re-validates first, since the caller's check may
    /// be stale (e.g. a confirmation dialog sat open). Returns None when
    /// the site is no longer valid.
    pub fn place(
        &mut self,
        terrain: &TerrainGrid,
        occupancy: &mut OccupancyGrid,
        kind: BuildingKind,
        anchor: GridCoord,
    ) -> Option<BuildingId> {
        if !self.can_place(terrain, occupancy, anchor, kind) {
            tracing::trace!("Placement of {:?} at {} rejected", kind, anchor);
            return None;
        }

        let id = BuildingId(self.buildings.len() as u32);
        for cell in footprint_cells(anchor, kind.footprint_size()) {
            let previous = self.footprints.insert(cell, id);
            debug_assert!(
                previous.is_none(),
                "footprint of {:?} at {} overlaps {:?} at {}",
                kind,
                anchor,
                previous,
                cell
            );
            occupancy.occupy(cell);
        }

        self.buildings.push(Building {
            id,
            kind,
            anchor,
            occupied: false,
        });
        tracing::info!("Placed {:?} at {} as {:?}", kind, anchor, id);
        Some(id)
    }

    /// Flip `occupied` to true. Returns true only on the call that flipped it;
    /// repeat calls are no-ops.
    pub fn mark_occupied(&mut self, id: BuildingId) -> bool {
        match self.buildings.get_mut(id.0 as usize) {
            Some(building) if !building.occupied => {
                building.occupied = true;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id.0 as usize)
    }

    /// The building whose footprint covers `coord`, if any
    pub fn building_at(&self, coord: GridCoord) -> Option<&Building> {
        self.footprints.get(&coord).and_then(|id| self.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Building> + '_ {
        self.buildings.iter()
    }

    /// Buildings no villager has claimed yet, in placement order
    pub fn iter_unoccupied(&self) -> impl Iterator<Item = &Building> + '_ {
        self.buildings.iter().filter(|b| !b.occupied)
    }

    pub fn is_footprint_cell(&self, coord: GridCoord) -> bool {
        self.footprints.contains_key(&coord)
    }

    pub fn count(&self) -> usize {
        self.buildings.len()
    }
}
