//! The output of one render cycle.

use crate::rendering::cell::Cell;
use crate::rendering::geometry::Point;
use std::cmp::Ordering;

/// A cell that changed, at its absolute position in the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameCell {
    pub position: Point,
    pub cell: Cell,
}

/// The ordered list of cells a render cycle must draw.
///
/// Entries are in row-major order. A sink replaying a frame must draw them in order.
/// The buffer is owned by the [`FrameDiffer`](crate::rendering::differ::FrameDiffer) and reused
/// across cycles, so a frame is only borrowed for the duration of one cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    cells: Vec<FrameCell>,
    half_width: bool,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the frame, keeping its allocation.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn push(&mut self, position: Point, cell: Cell) {
        self.cells.push(FrameCell { position, cell });
    }

    /// Folds the changes of a later `newer` frame into this one.
    ///
    /// Both frames must be in row-major order. The result stays in row-major order and holds one
    /// entry per position, taken from `newer` where both frames have one.
    pub fn merge(&mut self, newer: &Frame) {
        if newer.is_empty() {
            return;
        }
        let older = std::mem::take(&mut self.cells);
        self.cells.reserve(older.len() + newer.len());
        let mut older = older.into_iter().peekable();
        let mut newer = newer.iter().copied().peekable();
        loop {
            let order = match (older.peek(), newer.peek()) {
                (Some(a), Some(b)) => row_major(a.position).cmp(&row_major(b.position)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };
            let next = match order {
                Ordering::Less => older.next(),
                Ordering::Equal => {
                    older.next();
                    newer.next()
                }
                Ordering::Greater => newer.next(),
            };
            self.cells.extend(next);
        }
    }

    pub fn cells(&self) -> &[FrameCell] {
        &self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameCell> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether glyphs are drawn in half-width tiles.
    pub fn is_half_width(&self) -> bool {
        self.half_width
    }

    pub fn set_half_width(&mut self, half_width: bool) {
        self.half_width = half_width;
    }

    pub fn capacity(&self) -> usize {
        self.cells.capacity()
    }
}

fn row_major(p: Point) -> (usize, usize) {
    (p.y, p.x)
}

impl<'a> IntoIterator for &'a Frame {
    type Item = &'a FrameCell;
    type IntoIter = std::slice::Iter<'a, FrameCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
