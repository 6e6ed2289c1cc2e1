//! Spatial primitives - dense grids and the isometric projection

pub mod grid;
pub mod iso;

pub use grid::Grid;
pub use iso::{depth_key, static_depth_key, IsoProjection};
