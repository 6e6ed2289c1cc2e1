//! Generic dense grid for per-tile data

use crate::core::types::GridCoord;

/// Dense 2D grid stored row-major (`y` outer, `x` inner)
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: Clone> {
    pub width: u32,
    pub height: u32,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: u32, height: u32, fill: T) -> Self {
        Self {
            width,
            height,
            data: vec![fill; width as usize * height as usize],
        }
    }

    /// Build from row-major cells. Returns None if the length doesn't match.
    pub fn from_cells(width: u32, height: u32, cells: Vec<T>) -> Option<Self> {
        if cells.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data: cells,
        })
    }

    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && (coord.x as u32) < self.width && (coord.y as u32) < self.height
    }

    #[inline]
    fn index(&self, coord: GridCoord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<&T> {
        self.index(coord).map(|i| &self.data[i])
    }

    #[inline]
    pub fn get_mut(&mut self, coord: GridCoord) -> Option<&mut T> {
        self.index(coord).map(|i| &mut self.data[i])
    }

    #[inline]
    pub fn set(&mut self, coord: GridCoord, value: T) {
        if let Some(i) = self.index(coord) {
            self.data[i] = value;
        }
    }

    /// Iterate cells in scan order (row by row, left to right)
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, &T)> + '_ {
        let width = self.width as usize;
        self.data.iter().enumerate().map(move |(i, cell)| {
            (GridCoord::new((i % width) as i32, (i / width) as i32), cell)
        })
    }
}
