//! Grid coordinates.
//!
//! [`Point`] addresses a single cell, [`Rect`] a half-open rectangle of cells:
//! `min` is included, `max` is excluded on both axes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position, `x` growing to the right and `y` growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the point shifted by `(dx, dy)`.
    pub const fn shift(self, dx: usize, dy: usize) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Checks whether the point lies within `rect`.
    pub fn is_in(self, rect: Rect) -> bool {
        rect.contains(self)
    }
}

impl From<(usize, usize)> for Point {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A half-open rectangle of cells.
///
/// A rectangle is empty if it spans no cells on either axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// The rectangle starting at the origin with the given size.
    pub const fn with_size(width: usize, height: usize) -> Self {
        Self::new(Point::new(0, 0), Point::new(width, height))
    }

    /// The 1x1 rectangle containing only `p`.
    pub const fn from_point(p: Point) -> Self {
        Self::new(p, Point::new(p.x + 1, p.y + 1))
    }

    pub const fn width(&self) -> usize {
        self.max.x.saturating_sub(self.min.x)
    }

    pub const fn height(&self) -> usize {
        self.max.y.saturating_sub(self.min.y)
    }

    /// `(width, height)` as a point.
    pub const fn size(&self) -> Point {
        Point::new(self.width(), self.height())
    }

    pub const fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub const fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Checks whether `other` lies entirely within `self`. Empty rectangles are contained everywhere.
    pub fn contains_rect(&self, other: Rect) -> bool {
        if other.is_empty() {
            return true;
        }
        other.min.x >= self.min.x
            && other.min.y >= self.min.y
            && other.max.x <= self.max.x
            && other.max.y <= self.max.y
    }

    /// The smallest rectangle containing both. Empty rectangles do not contribute.
    pub fn union(&self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::new(
            Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        )
    }

    /// The overlap of both rectangles, possibly empty.
    pub fn intersect(&self, other: Rect) -> Rect {
        let min = Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
        let max = Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y));
        if min.x >= max.x || min.y >= max.y {
            return Rect::default();
        }
        Rect::new(min, max)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}
