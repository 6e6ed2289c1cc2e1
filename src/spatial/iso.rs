//! Isometric projection between grid and screen space
//!
//! Grid `(x, y)` maps to the TOP vertex of that tile's diamond on screen.
//! Sprites are anchored at the bottom-center of their footprint, and the
//! depth key is the screen y of that anchor: larger y draws later (on top).

use crate::core::config::WorldConfig;
use crate::core::types::{GridCoord, Vec2};

/// Snap tolerance for `screen_to_grid`, in tiles
const SNAP_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoProjection {
    half_width: f32,
    half_height: f32,
}

impl IsoProjection {
    pub fn new(tile_width: f32, tile_height: f32) -> Self {
        Self {
            half_width: tile_width / 2.0,
            half_height: tile_height / 2.0,
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.tile_width, config.tile_height)
    }

    pub fn tile_width(&self) -> f32 {
        self.half_width * 2.0
    }

    pub fn tile_height(&self) -> f32 {
        self.half_height * 2.0
    }

    /// `x = (gx - gy) * w/2`, `y = (gx + gy) * h/2`
    #[inline]
    pub fn grid_to_screen(&self, coord: GridCoord) -> Vec2 {
        Vec2::new(
            (coord.x - coord.y) as f32 * self.half_width,
            (coord.x + coord.y) as f32 * self.half_height,
        )
    }

    /// Inverse of `grid_to_screen` for integer grid inputs; any point
    /// inside a tile's diamond maps to that tile.
    ///
    /// Points within `SNAP_EPSILON` tiles of a tile's upper edges snap to
    /// that tile, so rounding in non-integer tile sizes cannot drop a vertex
    /// into its neighbour.
    #[inline]
    pub fn screen_to_grid(&self, pos: Vec2) -> GridCoord {
        let u = f64::from(pos.x) / f64::from(self.half_width);
        let v = f64::from(pos.y) / f64::from(self.half_height);
        GridCoord::new(
            ((u + v) / 2.0 + SNAP_EPSILON).floor() as i32,
            ((v - u) / 2.0 + SNAP_EPSILON).floor() as i32,
        )
    }

    /// Center of a single tile's diamond (where villagers stand)
    pub fn tile_center(&self, coord: GridCoord) -> Vec2 {
        self.footprint_center(coord, 1)
    }

    /// Center of a `size x size` block anchored at its top-left cell
    pub fn footprint_center(&self, anchor: GridCoord, size: u32) -> Vec2 {
        self.grid_to_screen(anchor) + Vec2::new(0.0, size as f32 * self.half_height)
    }

    /// Bottom-center anchor of a `size x size` block: its bottom vertex
    pub fn footprint_base(&self, anchor: GridCoord, size: u32) -> Vec2 {
        self.grid_to_screen(anchor.offset(size as i32, size as i32))
    }

    /// Depth key of a footprint object, comparable with `depth_key`
    pub fn footprint_depth_key(&self, anchor: GridCoord, size: u32) -> f32 {
        depth_key(self.footprint_base(anchor, size))
    }
}

impl Default for IsoProjection {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

/// Depth key for a dynamic sprite whose bottom-center anchor is at `anchor`
#[inline]
pub fn depth_key(anchor: Vec2) -> f32 {
    anchor.y
}

/// One-time key for static terrain drawn in a top-left to bottom-right sweep
#[inline]
pub fn static_depth_key(coord: GridCoord) -> i32 {
    coord.x + coord.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_to_screen_formula() {
        let iso = IsoProjection::new(64.0, 32.0);
        assert_eq!(iso.grid_to_screen(GridCoord::new(0, 0)), Vec2::new(0.0, 0.0));
        assert_eq!(iso.grid_to_screen(GridCoord::new(1, 0)), Vec2::new(32.0, 16.0));
        assert_eq!(iso.grid_to_screen(GridCoord::new(0, 1)), Vec2::new(-32.0, 16.0));
        assert_eq!(iso.grid_to_screen(GridCoord::new(3, 5)), Vec2::new(-64.0, 128.0));
    }

    #[test]
    fn test_round_trip_small_grid() {
        let iso = IsoProjection::new(64.0, 32.0);
        for x in 0..20 {
            for y in 0..20 {
                let c = GridCoord::new(x, y);
                assert_eq!(iso.screen_to_grid(iso.grid_to_screen(c)), c);
            }
        }
    }

    #[test]
    fn test_round_trip_fractional_tile_sizes() {
        for (w, h) in [(70.2, 35.1), (33.33, 16.67), (48.6, 24.3), (128.4, 64.2)] {
            let iso = IsoProjection::new(w, h);
            for x in 0..100 {
                for y in 0..100 {
                    let c = GridCoord::new(x, y);
                    assert_eq!(iso.screen_to_grid(iso.grid_to_screen(c)), c, "{w}x{h}");
                    assert_eq!(iso.screen_to_grid(iso.tile_center(c)), c, "{w}x{h}");
                }
            }
        }
    }

    #[test]
    fn test_tile_center_maps_back_to_tile() {
        let iso = IsoProjection::new(64.0, 32.0);
        let c = GridCoord::new(5, 5);
        assert_eq!(iso.screen_to_grid(iso.tile_center(c)), c);
    }

    #[test]
    fn test_house_center_is_inside_footprint() {
        let iso = IsoProjection::new(64.0, 32.0);
        let anchor = GridCoord::new(4, 2);
        let cell = iso.screen_to_grid(iso.footprint_center(anchor, 2));
        assert!((4..6).contains(&cell.x) && (2..4).contains(&cell.y));
    }

    #[test]
    fn test_footprint_base_is_bottom_vertex() {
        let iso = IsoProjection::new(64.0, 32.0);
        let base = iso.footprint_base(GridCoord::new(0, 0), 2);
        assert_eq!(base, Vec2::new(0.0, 64.0));
    }

    #[test]
    fn test_depth_keys_are_monotone_in_grid_sum() {
        let iso = IsoProjection::new(64.0, 32.0);
        let a = iso.footprint_depth_key(GridCoord::new(2, 3), 1);
        let b = iso.footprint_depth_key(GridCoord::new(4, 2), 1);
        assert!(static_depth_key(GridCoord::new(2, 3)) < static_depth_key(GridCoord::new(4, 2)));
        assert!(a < b);
    }

    #[test]
    fn test_negative_screen_positions_floor() {
        let iso = IsoProjection::new(64.0, 32.0);
        // Just above the origin tile's top vertex
        assert_eq!(iso.screen_to_grid(Vec2::new(0.0, -1.0)), GridCoord::new(-1, -1));
    }
}
