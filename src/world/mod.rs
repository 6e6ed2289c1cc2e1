//! Terrain: noise, tile classification and occupancy

pub mod noise;
pub mod occupancy;
pub mod terrain;

pub use noise::NoiseField;
pub use occupancy::OccupancyGrid;
pub use terrain::{TerrainGrid, TerrainTile};
