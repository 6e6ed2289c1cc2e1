//! Classified tile grid
//!
//! Built once from noise at world start. The only runtime mutation is a
//! harvested Forest tile regrowing into Meadow.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::WorldConfig;
use crate::core::types::GridCoord;
use crate::spatial::grid::Grid;
use crate::world::noise::NoiseField;

/// Salt mixed into the seed for rock scatter so it is independent of the noise table
const ROCK_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Terrain classification of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainTile {
    Water,
    Meadow,
    Forest,
    Rocks,
}

impl TerrainTile {
    /// Tiles that host a tree or rock and start out occupied
    pub fn has_obstacle(&self) -> bool {
        matches!(self, TerrainTile::Forest | TerrainTile::Rocks)
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '~' => Some(TerrainTile::Water),
            '.' => Some(TerrainTile::Meadow),
            'T' => Some(TerrainTile::Forest),
            '^' => Some(TerrainTile::Rocks),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerrainGrid {
    tiles: Grid<TerrainTile>,
}

impl TerrainGrid {
    /// Classify every cell from seeded octave noise.
    ///
    /// value < water_threshold -> Water, value > forest_threshold -> Forest,
    /// otherwise Rocks with probability `rocks_chance`, else Meadow.
    pub fn generate(seed: u64, width: u32, height: u32, config: &WorldConfig) -> Self {
        let noise = NoiseField::new(seed, config.noise_octaves, config.noise_persistence);
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ ROCK_SALT);
        let mut tiles = Vec::with_capacity(width as usize * height as usize);

        for y in 0..height {
            for x in 0..width {
                let value = noise.sample(x as f64 * config.noise_scale, y as f64 * config.noise_scale);

                let tile = if value < config.water_threshold {
                    TerrainTile::Water
                } else if value > config.forest_threshold {
                    TerrainTile::Forest
                } else if rng.gen::<f64>() < config.rocks_chance {
                    TerrainTile::Rocks
                } else {
                    TerrainTile::Meadow
                };
                tiles.push(tile);
            }
        }

        Self {
            tiles: Grid::from_cells(width, height, tiles)
                .unwrap_or_else(|| Grid::new(width, height, TerrainTile::Meadow)),
        }
    }

    /// A grid where every tile is `tile`
    pub fn filled(width: u32, height: u32, tile: TerrainTile) -> Self {
        Self {
            tiles: Grid::new(width, height, tile),
        }
    }

    /// Parse a hand-drawn map: `~` water, `.` meadow, `T` forest, `^` rocks.
    ///
    /// Returns None for ragged rows or unknown characters.
    pub fn from_ascii(rows: &[&str]) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0) as u32;
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in rows {
            if row.chars().count() as u32 != width {
                return None;
            }
            for c in row.chars() {
                cells.push(TerrainTile::from_char(c)?);
            }
        }
        Grid::from_cells(width, height, cells).map(|tiles| Self { tiles })
    }

    pub fn width(&self) -> u32 {
        self.tiles.width
    }

    pub fn height(&self) -> u32 {
        self.tiles.height
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        self.tiles.contains(coord)
    }

    pub fn tile(&self, coord: GridCoord) -> Option<TerrainTile> {
        self.tiles.get(coord).copied()
    }

    /// Tiles in scan order
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, TerrainTile)> + '_ {
        self.tiles.iter().map(|(c, t)| (c, *t))
    }

    pub fn count(&self, kind: TerrainTile) -> usize {
        self.tiles.iter().filter(|(_, t)| **t == kind).count()
    }

    /// Reclassify a Forest tile as Meadow. Returns false for any other tile.
    ///
    /// The caller releases the tile's occupancy.
    pub fn convert_to_meadow(&mut self, coord: GridCoord) -> bool {
        debug_assert!(
            self.contains(coord),
            "convert_to_meadow outside world bounds: {coord}"
        );
        match self.tiles.get_mut(coord) {
            Some(tile @ TerrainTile::Forest) => {
                *tile = TerrainTile::Meadow;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> WorldConfig {
        WorldConfig {
            world_width: 30,
            world_height: 30,
            ..WorldConfig::default()
        }
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = small_config();
        let a = TerrainGrid::generate(11, 30, 30, &config);
        let b = TerrainGrid::generate(11, 30, 30, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_forced_meadow_thresholds() {
        let config = WorldConfig {
            water_threshold: 0.0,
            forest_threshold: 1.0,
            rocks_chance: 0.0,
            ..small_config()
        };
        let terrain = TerrainGrid::generate(3, 10, 10, &config);
        assert_eq!(terrain.count(TerrainTile::Meadow), 100);
    }

    #[test]
    fn test_rocks_chance_one_gives_all_rocks_in_middle_band() {
        let config = WorldConfig {
            water_threshold: 0.0,
            forest_threshold: 1.0,
            rocks_chance: 1.0,
            ..small_config()
        };
        let terrain = TerrainGrid::generate(3, 5, 5, &config);
        assert_eq!(terrain.count(TerrainTile::Rocks), 25);
    }

    #[test]
    fn test_default_generation_has_variety() {
        let config = WorldConfig::default();
        let terrain = TerrainGrid::generate(42, 100, 100, &config);
        assert_eq!(terrain.iter().count(), 10_000);
        assert!(terrain.count(TerrainTile::Meadow) > 0);
    }

    #[test]
    fn test_from_ascii() {
        let terrain = TerrainGrid::from_ascii(&["~.T", "^.."]).unwrap();
        assert_eq!(terrain.width(), 3);
        assert_eq!(terrain.height(), 2);
        assert_eq!(terrain.tile(GridCoord::new(0, 0)), Some(TerrainTile::Water));
        assert_eq!(terrain.tile(GridCoord::new(2, 0)), Some(TerrainTile::Forest));
        assert_eq!(terrain.tile(GridCoord::new(0, 1)), Some(TerrainTile::Rocks));
        assert!(TerrainGrid::from_ascii(&["..", "."]).is_none());
        assert!(TerrainGrid::from_ascii(&["x"]).is_none());
    }

    #[test]
    fn test_convert_to_meadow_only_from_forest() {
        let mut terrain = TerrainGrid::from_ascii(&["T~^."]).unwrap();
        assert!(terrain.convert_to_meadow(GridCoord::new(0, 0)));
        assert_eq!(terrain.tile(GridCoord::new(0, 0)), Some(TerrainTile::Meadow));

        assert!(!terrain.convert_to_meadow(GridCoord::new(1, 0)));
        assert!(!terrain.convert_to_meadow(GridCoord::new(2, 0)));
        assert!(!terrain.convert_to_meadow(GridCoord::new(3, 0)));
        assert_eq!(terrain.tile(GridCoord::new(1, 0)), Some(TerrainTile::Water));
    }
}
