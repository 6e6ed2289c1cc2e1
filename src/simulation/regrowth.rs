//! Regrowth of felled trees
//!
//! A felled Forest tile stays Forest and occupied (stump) until its timer
//! passes the regrowth delay, then it becomes unoccupied Meadow.

use serde::{Deserialize, Serialize};

use crate::core::types::GridCoord;
use crate::world::occupancy::OccupancyGrid;
use crate::world::terrain::TerrainGrid;

/// A felled tree waiting to turn into meadow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutTreeRecord {
    pub coord: GridCoord,
    /// Elapsed time since felling
    pub timer_ms: f32,
}

#[derive(Debug, Clone, Default)]
pub struct RegrowthScheduler {
    records: Vec<CutTreeRecord>,
}

impl RegrowthScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a regrowth timer for a felled tile. Returns false if one is
    /// already pending there.
    pub fn schedule(&mut self, coord: GridCoord) -> bool {
        if self.is_pending(coord) {
            return false;
        }
        self.records.push(CutTreeRecord {
            coord,
            timer_ms: 0.0,
        });
        true
    }

    /// True while the tile's tree is felled and not yet regrown
    pub fn is_pending(&self, coord: GridCoord) -> bool {
        self.records.iter().any(|r| r.coord == coord)
    }

    /// Advance every timer. Records whose timer exceeds `regrowth_delay_ms`
    /// convert their tile to Meadow, release it and are dropped. Fires once
    /// per record however far a long frame overshoots.
    pub fn advance(
        &mut self,
        delta_ms: f32,
        regrowth_delay_ms: f32,
        terrain: &mut TerrainGrid,
        occupancy: &mut OccupancyGrid,
    ) -> Vec<GridCoord> {
        let mut regrown = Vec::new();

        self.records.retain_mut(|record| {
            record.timer_ms += delta_ms;
            if record.timer_ms > regrowth_delay_ms {
                terrain.convert_to_meadow(record.coord);
                occupancy.release(record.coord);
                regrown.push(record.coord);
                false
            } else {
                true
            }
        });

        regrown
    }

    pub fn iter(&self) -> impl Iterator<Item = &CutTreeRecord> + '_ {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
