//! Cell-occupancy map for the approximate grid nester.
//!
//! The plate is divided into square cells of the grid step. Each committed
//! placement marks every cell its bounding box covers; a candidate is free
//! when none of the cells under its spacing-inflated box are marked.

use crate::grid_nester::PlacementArena;
use crate::part::PreparedShape;
use sheetnest_core::{AxisAlignedBox, Point2D};
use std::ops::Range;

/// Slack applied when snapping box edges to cell boundaries.
const CELL_EPSILON: f64 = 1e-9;

/// Boolean cell grid covering a plate.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    cell_size: f64,
    cols: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Creates an empty grid of `cell_size` cells over a `width` x `height` plate.
    pub fn new(width: f64, height: f64, cell_size: f64) -> Self {
        let cols = (width / cell_size).ceil().max(0.0) as usize;
        let rows = (height / cell_size).ceil().max(0.0) as usize;
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Returns true if the cell at (`col`, `row`) is occupied.
    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.cells[row * self.cols + col]
    }

    fn span(&self, min: f64, max: f64, limit: usize) -> Range<usize> {
        let start = (min / self.cell_size + CELL_EPSILON).floor().max(0.0) as usize;
        let end = (max / self.cell_size - CELL_EPSILON).ceil().max(0.0) as usize;
        start.min(limit)..end.min(limit)
    }

    fn cell_ranges(&self, bounds: &AxisAlignedBox) -> (Range<usize>, Range<usize>) {
        (
            self.span(bounds.min_x, bounds.max_x, self.cols),
            self.span(bounds.min_y, bounds.max_y, self.rows),
        )
    }

    /// Marks every cell covered by `bounds`.
    pub fn mark(&mut self, bounds: &AxisAlignedBox) {
        let (cols, rows) = self.cell_ranges(bounds);
        for row in rows {
            for col in cols.clone() {
                self.cells[row * self.cols + col] = true;
            }
        }
    }

    /// Returns true if no cell covered by `bounds` is occupied.
    pub fn is_free(&self, bounds: &AxisAlignedBox) -> bool {
        let (cols, rows) = self.cell_ranges(bounds);
        rows.into_iter()
            .all(|row| cols.clone().all(|col| !self.cells[row * self.cols + col]))
    }
}

impl PlacementArena for OccupancyGrid {
    fn fits(&self, shape: &PreparedShape, translation: Point2D, spacing: f64) -> bool {
        self.is_free(&shape.bounds_at(translation).inflate(spacing))
    }

    fn commit(&mut self, shape: &PreparedShape, translation: Point2D) {
        self.mark(&shape.bounds_at(translation));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions() {
        let grid = OccupancyGrid::new(10.0, 4.5, 1.0);
        assert_eq!(grid.cols(), 10);
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_mark_covers_cells() {
        let mut grid = OccupancyGrid::new(10.0, 10.0, 1.0);
        grid.mark(&AxisAlignedBox::new(0.0, 0.0, 3.0, 2.0));
        assert_eq!(grid.occupied_count(), 6);
        assert!(grid.is_occupied(2, 1));
        assert!(!grid.is_occupied(3, 1));

        grid.mark(&AxisAlignedBox::new(4.5, 4.5, 5.5, 5.5));
        assert_eq!(grid.occupied_count(), 10);
    }

    #[test]
    fn test_adjacent_box_is_free() {
        let mut grid = OccupancyGrid::new(10.0, 10.0, 1.0);
        grid.mark(&AxisAlignedBox::new(0.0, 0.0, 3.0, 3.0));
        assert!(grid.is_free(&AxisAlignedBox::new(3.0, 0.0, 6.0, 3.0)));
        assert!(!grid.is_free(&AxisAlignedBox::new(2.5, 0.0, 6.0, 3.0)));
        assert!(!grid.is_free(&AxisAlignedBox::new(3.0, 0.0, 6.0, 3.0).inflate(0.5)));
    }

    #[test]
    fn test_out_of_plate_is_clamped() {
        let mut grid = OccupancyGrid::new(4.0, 4.0, 1.0);
        grid.mark(&AxisAlignedBox::new(-2.0, -2.0, 10.0, 1.0));
        assert_eq!(grid.occupied_count(), 4);
        assert!(grid.is_free(&AxisAlignedBox::new(0.0, 1.0, 4.0, 4.0)));
    }
}
