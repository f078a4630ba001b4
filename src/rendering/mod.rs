//! Rendering module for incremental character-grid output.
//!
//! **Sub-modules:**
//!
//! *   [`color`](crate::rendering::color): RGB, HSV and 16-bit RGBA colors, tone mapping and alpha blending.
//! *   [`geometry`](crate::rendering::geometry): Grid positions and half-open rectangles.
//! *   [`cell`](crate::rendering::cell): The [`Cell`](cell::Cell) struct, the basic unit of rendering.
//! *   [`grid`](crate::rendering::grid): The [`Grid`](grid::Grid) struct, a 2D cell buffer that tracks a dirty rectangle.
//! *   [`frame`](crate::rendering::frame): The [`Frame`](frame::Frame), the ordered list of changed cells.
//! *   [`differ`](crate::rendering::differ): The [`FrameDiffer`](differ::FrameDiffer), which turns grid writes into frames.
//! *   [`renderer`](crate::rendering::renderer): The [`Renderer`](renderer::Renderer) trait and a surface sink.
//! *   [`surface`](crate::rendering::surface) and [`glyphs`](crate::rendering::glyphs): Pixel targets and glyph drawing.
//! *   [`terminal`](crate::rendering::terminal): A sink writing to a terminal using `crossterm`.
//!
//! **Rendering Process (Simplified):**
//!
//! 1.  Write cells into a [`Grid`](grid::Grid). Each write grows the grid's dirty rectangle.
//! 2.  Call [`FrameDiffer::diff`](differ::FrameDiffer::diff). It compares the dirty part of the
//!     grid against a shadow copy of the last frame and returns only the cells that changed.
//! 3.  Hand the [`Frame`](frame::Frame) to a [`Renderer`](renderer::Renderer), which paints every
//!     cell in order.

pub mod cell;
pub mod color;
pub mod differ;
pub mod frame;
pub mod geometry;
pub mod glyphs;
pub mod grid;
pub mod renderer;
pub mod surface;
pub mod terminal;
