//! 2D cell buffer with dirty tracking.
//!
//! This module defines the [`Grid`] struct, a dense row-major buffer of [`Cell`]s that
//! additionally remembers the bounding box of every cell written since its dirty state was last
//! reset (the *dirty rectangle*).
//!
//! The `Grid` provides methods for:
//!
//! *   Writing single cells, filling the whole grid or a sub-rectangle.
//! *   Reading cells and iterating over them in row-major order.
//! *   Producing resized copies and copying cell contents between grids.
//! *   Inspecting, taking and resetting the dirty rectangle.
//!
//! The dirty rectangle is a conservative approximation: it may contain cells that were not
//! written, but it never misses a written cell.

use crate::rendering::cell::Cell;
use crate::rendering::geometry::{Point, Rect};
use std::ops::Index;

/// A dense rectangular buffer of cells with an accumulated dirty rectangle.
///
/// # Example
///
/// ```rust
/// use deltacon::rendering::cell::Cell;
/// use deltacon::rendering::geometry::{Point, Rect};
/// use deltacon::rendering::grid::Grid;
///
/// let mut grid = Grid::new(10, 5);
/// assert_eq!(grid.dirty_rect(), None);
///
/// grid.set(Point::new(2, 3), Cell::new('X'));
/// grid.set(Point::new(4, 1), Cell::new('Y'));
///
/// assert_eq!(grid[Point::new(2, 3)].glyph, 'X');
/// assert_eq!(
///     grid.dirty_rect(),
///     Some(Rect::new(Point::new(2, 1), Point::new(5, 4)))
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    dirty: Option<Rect>,
}

impl Grid {
    /// Creates a new `Grid` filled with [`Cell::default`] and no dirty rectangle.
    pub fn new(width: usize, height: usize) -> Self {
        Self::new_filled(width, height, Cell::default())
    }

    /// Creates a new `Grid` filled with `cell` and no dirty rectangle.
    pub fn new_filled(width: usize, height: usize, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
            dirty: None,
        }
    }

    /// Calculates the linear index for a given position.
    #[inline]
    fn index_of(&self, p: Point) -> usize {
        p.y * self.width + p.x
    }

    /// Gets the width of the grid (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Gets the height of the grid (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` as a point.
    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    /// The rectangle covering the whole grid.
    pub fn bounds(&self) -> Rect {
        Rect::with_size(self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }

    /// The cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to the cells that bypasses dirty tracking.
    /// Only the differ uses this, for its shadow buffer.
    pub(crate) fn cells_mut_untracked(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Grows the dirty rectangle to also cover `rect`.
    fn touch(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(rect),
            None => rect,
        });
    }

    /// Writes `cell` at `p`.
    ///
    /// The caller guarantees that `p` is within bounds.
    pub fn set(&mut self, p: Point, cell: Cell) {
        debug_assert!(self.contains(p), "{p} is out of bounds of {}", self.bounds());
        let idx = self.index_of(p);
        self.cells[idx] = cell;
        self.touch(Rect::from_point(p));
    }

    /// Returns the cell at `p`.
    ///
    /// Panics if `p` is out of bounds.
    pub fn at(&self, p: Point) -> Cell {
        self[p]
    }

    /// Gets a reference to the cell at `p`, or `None` if `p` is out of bounds.
    pub fn get(&self, p: Point) -> Option<&Cell> {
        if !self.contains(p) {
            return None;
        }
        self.cells.get(self.index_of(p))
    }

    /// Fills the entire grid with `cell`.
    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
        self.touch(self.bounds());
    }

    /// Fills the part of `rect` that lies within the grid with `cell`.
    pub fn fill_rect(&mut self, rect: Rect, cell: Cell) {
        let rect = rect.intersect(self.bounds());
        if rect.is_empty() {
            return;
        }
        for y in rect.min.y..rect.max.y {
            let start = self.index_of(Point::new(rect.min.x, y));
            self.cells[start..start + rect.width()].fill(cell);
        }
        self.touch(rect);
    }

    /// Resets every cell to [`Cell::default`]. This is a write like any other and grows the
    /// dirty rectangle; see [`Grid::reset_dirty`] for forgetting the dirty state instead.
    pub fn clear(&mut self) {
        self.fill(Cell::default());
    }

    /// Returns a grid with the new dimensions, keeping existing cells where possible.
    ///
    /// Cells outside the old dimensions are [`Cell::default`]. The new grid has no dirty rectangle.
    pub fn resized(&self, width: usize, height: usize) -> Grid {
        let mut resized = Grid::new(width, height);
        let min_width = self.width.min(width);
        for y in 0..self.height.min(height) {
            let src_start = y * self.width;
            let dst_start = y * width;
            resized.cells[dst_start..dst_start + min_width]
                .copy_from_slice(&self.cells[src_start..src_start + min_width]);
        }
        resized
    }

    /// Copies the cells of `other` into `self`, over the region both grids share.
    ///
    /// Returns the size of the copied region. The copied region counts as written.
    pub fn copy_from(&mut self, other: &Grid) -> Point {
        let width = self.width.min(other.width);
        let height = self.height.min(other.height);
        if width == self.width && width == other.width {
            // identical row layout, one contiguous copy
            let len = width * height;
            self.cells[..len].copy_from_slice(&other.cells[..len]);
        } else {
            for y in 0..height {
                let src = y * other.width;
                let dst = y * self.width;
                self.cells[dst..dst + width].copy_from_slice(&other.cells[src..src + width]);
            }
        }
        self.touch(Rect::with_size(width, height));
        Point::new(width, height)
    }

    /// The bounding box of all cells written since the last reset, or `None` if nothing was written.
    pub fn dirty_rect(&self) -> Option<Rect> {
        self.dirty
    }

    /// Returns the dirty rectangle and resets it.
    pub fn take_dirty(&mut self) -> Option<Rect> {
        self.dirty.take()
    }

    /// Forgets the dirty rectangle without touching any cell.
    pub fn reset_dirty(&mut self) {
        self.dirty = None;
    }

    /// Returns an iterator over `(position, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Cell)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (Point::new(idx % width, idx / width), cell))
    }

    /// Returns the cells of row `y`.
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }
}

impl Index<Point> for Grid {
    type Output = Cell;

    fn index(&self, p: Point) -> &Self::Output {
        &self.cells[self.index_of(p)]
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = Cell;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        &self[Point::new(x, y)]
    }
}
