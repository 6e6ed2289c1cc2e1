//! Occupied tiles
//!
//! A dumb set over grid coordinates. A tile is occupied while it hosts a
//! tree, a rock, or part of a building footprint. Overlap rules live in
//! the building registry, not here.

use ahash::AHashSet;

use crate::core::types::GridCoord;
use crate::world::terrain::TerrainGrid;

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    cells: AHashSet<GridCoord>,
    width: u32,
    height: u32,
}

impl OccupancyGrid {
    /// Empty occupancy for a `width x height` world
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: AHashSet::new(),
            width,
            height,
        }
    }

    /// Occupancy as generated: every Forest and Rocks tile is occupied
    pub fn from_terrain(terrain: &TerrainGrid) -> Self {
        let mut grid = Self::new(terrain.width(), terrain.height());
        for (coord, tile) in terrain.iter() {
            if tile.has_obstacle() {
                grid.occupy(coord);
            }
        }
        grid
    }

    #[inline]
    fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as u32) < self.width && (coord.y as u32) < self.height
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.cells.contains(&coord)
    }

    pub fn occupy(&mut self, coord: GridCoord) {
        debug_assert!(self.in_bounds(coord), "occupy outside world bounds: {coord}");
        self.cells.insert(coord);
    }

    pub fn release(&mut self, coord: GridCoord) {
        debug_assert!(self.in_bounds(coord), "release outside world bounds: {coord}");
        self.cells.remove(&coord);
    }

    pub fn occupy_all(&mut self, coords: impl IntoIterator<Item = GridCoord>) {
        for coord in coords {
            self.occupy(coord);
        }
    }

    pub fn release_all(&mut self, coords: impl IntoIterator<Item = GridCoord>) {
        for coord in coords {
            self.release(coord);
        }
    }

    /// Get the number of occupied tiles
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
