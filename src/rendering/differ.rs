//! Incremental frame computation.
//!
//! The [`FrameDiffer`] keeps a private *shadow* copy of what was last handed to a sink and
//! compares the live [`Grid`] against it, restricted to the grid's dirty rectangle.
//!
//! Every call to [`FrameDiffer::diff`] runs in one of two regimes:
//!
//! *   **Full refresh:** if a refresh was requested with [`FrameDiffer::invalidate`], or the shadow
//!     does not exist yet or has different dimensions than the live grid. The shadow is brought to
//!     the live dimensions, overwritten with the live cells, and every cell is emitted.
//! *   **Incremental:** otherwise. Only cells inside the dirty rectangle are compared, and only
//!     cells that differ from the shadow are emitted (and copied into the shadow).
//!
//! If nothing was written and no refresh is needed, the differ returns an empty frame without
//! touching either buffer.

use crate::rendering::frame::Frame;
use crate::rendering::geometry::Point;
use crate::rendering::grid::Grid;
use log::{debug, trace};

/// Why the differ fell back to a full refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshReason {
    /// [`FrameDiffer::invalidate`] was called.
    Invalidated,
    /// No frame was computed yet.
    NoShadow,
    /// The live grid changed its dimensions.
    Resized,
}

/// Computes the cells that changed since the last frame.
///
/// # Example
///
/// ```rust
/// use deltacon::rendering::cell::Cell;
/// use deltacon::rendering::differ::FrameDiffer;
/// use deltacon::rendering::geometry::Point;
/// use deltacon::rendering::grid::Grid;
///
/// let mut grid = Grid::new(3, 3);
/// let mut differ = FrameDiffer::new();
///
/// // the first frame has to paint everything
/// assert_eq!(differ.diff(&mut grid).len(), 9);
///
/// grid.set(Point::new(1, 1), Cell::new('#'));
/// let frame = differ.diff(&mut grid);
/// assert_eq!(frame.len(), 1);
/// assert_eq!(frame.cells()[0].position, Point::new(1, 1));
///
/// // nothing changed since
/// assert!(differ.diff(&mut grid).is_empty());
/// ```
#[derive(Debug, Default)]
pub struct FrameDiffer {
    /// What the last frame left on the sink. Never exposed.
    shadow: Option<Grid>,
    frame: Frame,
    invalidated: bool,
}

impl FrameDiffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the next [`FrameDiffer::diff`] emits every cell.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Sets whether the frames this differ produces are drawn in half-width tiles.
    pub fn set_half_width(&mut self, half_width: bool) {
        self.frame.set_half_width(half_width);
    }

    /// The reason the next diff against `grid` would be a full refresh, if any.
    pub fn refresh_reason(&self, grid: &Grid) -> Option<RefreshReason> {
        if self.invalidated {
            return Some(RefreshReason::Invalidated);
        }
        match &self.shadow {
            None => Some(RefreshReason::NoShadow),
            Some(shadow) if shadow.size() != grid.size() => Some(RefreshReason::Resized),
            Some(_) => None,
        }
    }

    /// The frame produced by the last [`FrameDiffer::diff`].
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Computes the next frame and consumes the dirty rectangle of `grid`.
    pub fn diff(&mut self, grid: &mut Grid) -> &Frame {
        let dirty = grid.take_dirty();
        if let Some(reason) = self.refresh_reason(grid) {
            debug!(
                "full refresh of {}x{} grid: {reason:?}",
                grid.width(),
                grid.height()
            );
            self.refresh(grid);
            return &self.frame;
        }

        self.frame.clear();
        let Some(dirty) = dirty else {
            return &self.frame;
        };
        let dirty = dirty.intersect(grid.bounds());
        let Some(shadow) = self.shadow.as_mut() else {
            return &self.frame;
        };

        let width = grid.width();
        let live = grid.cells();
        let previous = shadow.cells_mut_untracked();
        for y in dirty.min.y..dirty.max.y {
            let row = y * width;
            for x in dirty.min.x..dirty.max.x {
                let idx = row + x;
                let cell = live[idx];
                if cell == previous[idx] {
                    continue;
                }
                previous[idx] = cell;
                self.frame.push(Point::new(x, y), cell);
            }
        }
        trace!(
            "diffed dirty window {dirty}: {} of {} cells changed",
            self.frame.len(),
            dirty.area()
        );
        &self.frame
    }

    fn refresh(&mut self, grid: &Grid) {
        self.invalidated = false;
        let mut shadow = match self.shadow.take() {
            Some(shadow) if shadow.size() == grid.size() => shadow,
            Some(shadow) => shadow.resized(grid.width(), grid.height()),
            None => Grid::new(grid.width(), grid.height()),
        };
        shadow.copy_from(grid);
        shadow.reset_dirty();
        self.shadow = Some(shadow);

        self.frame.clear();
        for (p, cell) in grid.iter() {
            self.frame.push(p, *cell);
        }
    }
}
