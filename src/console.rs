//! The console: a grid of cells drawn incrementally onto a sink.
//!
//! A [`Console`] owns the live [`Grid`], the [`FrameDiffer`] and the DPI scale. One render cycle
//! looks like this:
//!
//! ```rust
//! use deltacon::config::GridConfig;
//! use deltacon::console::Console;
//! use deltacon::rendering::cell::Cell;
//! use deltacon::rendering::geometry::Point;
//! use deltacon::rendering::glyphs::BlockGlyphs;
//! use deltacon::rendering::renderer::SurfaceRenderer;
//! use deltacon::rendering::surface::Surface;
//!
//! let config = GridConfig {
//!     grid_width: 8,
//!     grid_height: 4,
//!     ..GridConfig::default()
//! };
//! let mut console = Console::new(config);
//! let (width, height) = config.window_size(console.scale());
//! let mut renderer = SurfaceRenderer::new(Surface::new(width, height), BlockGlyphs);
//!
//! // first cycle paints everything
//! console.flush();
//! assert!(console.draw(&mut renderer).unwrap());
//!
//! // later cycles only paint what changed
//! console.set(Point::new(3, 2), Cell::new('█'));
//! assert_eq!(console.flush().len(), 1);
//! assert!(console.draw(&mut renderer).unwrap());
//!
//! // nothing changed, nothing to draw
//! console.flush();
//! assert!(!console.draw(&mut renderer).unwrap());
//! ```

use crate::config::GridConfig;
use crate::error::Result;
use crate::rendering::cell::Cell;
use crate::rendering::color::{Rgba64, RgbColor};
use crate::rendering::differ::FrameDiffer;
use crate::rendering::frame::Frame;
use crate::rendering::geometry::{Point, Rect};
use crate::rendering::grid::Grid;
use crate::rendering::renderer::{Renderer, TileMetrics};
use log::debug;
use std::io;

/// The drawing interface application code writes against.
pub trait CellCanvas {
    /// Writes a cell. `p` must be inside the canvas.
    fn set(&mut self, p: Point, cell: Cell);

    /// Reads a cell. `p` must be inside the canvas.
    fn at(&self, p: Point) -> Cell;

    /// The size of the canvas in cells.
    fn size(&self) -> Point;

    /// Fills the part of `rect` that lies on the canvas.
    fn fill(&mut self, rect: Rect, cell: Cell);

    /// Blanks the canvas and forces the next frame to repaint everything.
    fn clear_screen(&mut self);

    /// Computes what changed since the last flush. Call it after all drawing of a cycle is done.
    fn flush(&mut self);
}

/// A console of cells.
#[derive(Debug)]
pub struct Console {
    config: GridConfig,
    scale: f64,
    grid: Grid,
    differ: FrameDiffer,
    /// Every change flushed since the last draw.
    pending: Frame,
    /// The pending frame was not drawn yet.
    frame_is_dirty: bool,
    clear_before_next_draw: bool,
}

impl Console {
    /// Creates a console of blank cells with a DPI scale of `1.0`.
    pub fn new(config: GridConfig) -> Self {
        let mut differ = FrameDiffer::new();
        differ.set_half_width(config.half_width);
        Self {
            config,
            scale: 1.0,
            grid: Grid::new(config.grid_width, config.grid_height),
            differ,
            pending: Frame::new(),
            frame_is_dirty: false,
            clear_before_next_draw: false,
        }
    }

    /// Like [`Console::new`], but rejects unusable configurations.
    pub fn try_new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn size(&self) -> Point {
        self.grid.size()
    }

    pub fn set(&mut self, p: Point, cell: Cell) {
        self.grid.set(p, cell);
    }

    /// Composites `cell` over the cell at `p`. See [`Cell::put_over`].
    pub fn put(&mut self, p: Point, cell: Cell) {
        let below = self.grid.at(p);
        self.grid.set(p, cell.put_over(below));
    }

    pub fn at(&self, p: Point) -> Cell {
        self.grid.at(p)
    }

    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        self.grid.fill_rect(rect, cell);
    }

    pub fn fill_all(&mut self, cell: Cell) {
        self.grid.fill(cell);
    }

    /// The live grid. Writes go through the console.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn clear_screen(&mut self) {
        self.grid.fill(
            Cell::new(' ')
                .with_fg(RgbColor::WHITE)
                .with_bg(RgbColor::BLACK),
        );
        self.differ.invalidate();
        self.clear_before_next_draw = true;
        self.frame_is_dirty = true;
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Sets the device DPI scale. A changed scale moves every tile, so the screen is cleared.
    ///
    /// Scales that are not positive and finite are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if !(scale.is_finite() && scale > 0.0) {
            debug!("ignoring invalid console scale {scale}");
            return;
        }
        if scale != self.scale {
            debug!("console scale changed from {} to {scale}", self.scale);
            self.scale = scale;
            self.clear_screen();
        }
    }

    pub fn tile_metrics(&self) -> TileMetrics {
        self.config.tile_metrics(self.scale)
    }

    /// The pixel size of the console at the current scale.
    pub fn window_size(&self) -> (u32, u32) {
        let config = GridConfig {
            grid_width: self.grid.width(),
            grid_height: self.grid.height(),
            ..self.config
        };
        config.window_size(self.scale)
    }

    /// Resizes the console, keeping the overlapping content. The next frame repaints everything.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == (self.grid.width(), self.grid.height()) {
            return;
        }
        debug!(
            "console resized from {}x{} to {width}x{height}",
            self.grid.width(),
            self.grid.height()
        );
        self.grid = self.grid.resized(width, height);
        self.config.grid_width = width;
        self.config.grid_height = height;
        // the shadow may still hold cells the shrink dropped
        self.differ.invalidate();
        self.clear_before_next_draw = true;
        self.frame_is_dirty = true;
    }

    /// Computes the delta between the last flush and the current grid.
    ///
    /// Call it after all drawing of a cycle is done, and before [`Console::draw`]. Deltas of
    /// several flushes without a draw in between are collected and drawn together.
    pub fn flush(&mut self) -> &Frame {
        let full_refresh = self.differ.refresh_reason(&self.grid).is_some();
        let frame = self.differ.diff(&mut self.grid);
        if full_refresh || !self.frame_is_dirty {
            self.pending.clone_from(frame);
        } else {
            self.pending.merge(frame);
        }
        if !frame.is_empty() {
            self.frame_is_dirty = true;
        }
        frame
    }

    /// The delta computed by the last [`Console::flush`].
    pub fn frame(&self) -> &Frame {
        self.differ.frame()
    }

    /// Everything the next [`Console::draw`] paints.
    pub fn pending_frame(&self) -> &Frame {
        &self.pending
    }

    /// Whether the next [`Console::draw`] has something to paint.
    pub fn needs_draw(&self) -> bool {
        self.frame_is_dirty
    }

    /// Hands the pending frame to `renderer`. Returns whether anything was drawn.
    ///
    /// After [`Console::clear_screen`] the sink is cleared to black first. A pending full repaint
    /// that was not flushed yet is flushed here, so a cleared sink is never left half painted.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) -> io::Result<bool> {
        if !self.frame_is_dirty {
            return Ok(false);
        }
        if self.differ.refresh_reason(&self.grid).is_some() {
            self.flush();
        }
        if self.clear_before_next_draw {
            self.clear_before_next_draw = false;
            renderer.clear(Rgba64::BLACK)?;
        }
        let tiles = self.tile_metrics();
        renderer.render_frame(&self.pending, tiles)?;
        self.pending.clear();
        self.frame_is_dirty = false;
        Ok(true)
    }
}

impl CellCanvas for Console {
    fn set(&mut self, p: Point, cell: Cell) {
        Console::set(self, p, cell);
    }

    fn at(&self, p: Point) -> Cell {
        Console::at(self, p)
    }

    fn size(&self) -> Point {
        Console::size(self)
    }

    fn fill(&mut self, rect: Rect, cell: Cell) {
        Console::fill(self, rect, cell);
    }

    fn clear_screen(&mut self) {
        Console::clear_screen(self);
    }

    fn flush(&mut self) {
        Console::flush(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::color::Color;

    /// Records what the console hands to its sink.
    #[derive(Default)]
    struct RecordingRenderer {
        clears: Vec<Rgba64>,
        frames: Vec<(Frame, TileMetrics)>,
    }

    impl Renderer for RecordingRenderer {
        fn render_frame(&mut self, frame: &Frame, tiles: TileMetrics) -> io::Result<()> {
            self.frames.push((frame.clone(), tiles));
            Ok(())
        }

        fn clear(&mut self, color: Rgba64) -> io::Result<()> {
            self.clears.push(color);
            Ok(())
        }
    }

    fn small_config() -> GridConfig {
        GridConfig {
            grid_width: 4,
            grid_height: 3,
            ..GridConfig::default()
        }
    }

    fn drawn_console() -> (Console, RecordingRenderer) {
        let mut console = Console::new(small_config());
        let mut renderer = RecordingRenderer::default();
        console.flush();
        console.draw(&mut renderer).unwrap();
        (console, renderer)
    }

    #[test]
    fn test_first_cycle_draws_everything() {
        let (console, renderer) = drawn_console();
        assert_eq!(renderer.frames.len(), 1);
        assert_eq!(renderer.frames[0].0.len(), 12);
        assert!(renderer.clears.is_empty());
        assert!(!console.needs_draw());
    }

    #[test]
    fn test_nothing_changed_draws_nothing() {
        let (mut console, mut renderer) = drawn_console();
        assert!(console.flush().is_empty());
        assert!(!console.draw(&mut renderer).unwrap());
        assert_eq!(renderer.frames.len(), 1);
    }

    #[test]
    fn test_single_change_is_drawn_alone() {
        let (mut console, mut renderer) = drawn_console();
        console.set(Point::new(2, 1), Cell::new('@'));
        console.flush();
        assert!(console.draw(&mut renderer).unwrap());
        let (frame, _) = &renderer.frames[1];
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.cells()[0].position, Point::new(2, 1));
    }

    #[test]
    fn test_clear_screen_clears_sink_and_repaints() {
        let (mut console, mut renderer) = drawn_console();
        console.set(Point::new(0, 0), Cell::new('x'));
        console.flush();
        console.clear_screen();
        assert_eq!(console.at(Point::new(0, 0)).glyph, ' ');
        assert_eq!(console.at(Point::new(0, 0)).bg, Color::BLACK);

        // not flushed yet, draw has to repaint everything anyway
        assert!(console.draw(&mut renderer).unwrap());
        assert_eq!(renderer.clears, vec![Rgba64::BLACK]);
        assert_eq!(renderer.frames.last().map(|(f, _)| f.len()), Some(12));

        console.flush();
        assert!(!console.draw(&mut renderer).unwrap());
        assert_eq!(renderer.clears.len(), 1);
    }

    #[test]
    fn test_scale_change_clears_screen() {
        let (mut console, mut renderer) = drawn_console();
        console.set_scale(2.0);
        assert!(console.needs_draw());
        console.flush();
        console.draw(&mut renderer).unwrap();
        let (frame, tiles) = renderer.frames.last().cloned().unwrap();
        assert_eq!(frame.len(), 12);
        assert_eq!(tiles.scaled_width(), 40);
        assert_eq!(renderer.clears.len(), 1);

        // same scale again is a no-op
        console.set_scale(2.0);
        assert!(!console.needs_draw());
        console.set_scale(f64::NAN);
        assert_eq!(console.scale(), 2.0);
    }

    #[test]
    fn test_resize_keeps_content_and_repaints() {
        let (mut console, mut renderer) = drawn_console();
        console.set(Point::new(1, 1), Cell::new('k'));
        console.resize(6, 2);
        assert_eq!(console.size(), Point::new(6, 2));
        assert_eq!(console.at(Point::new(1, 1)).glyph, 'k');
        assert_eq!(console.window_size(), (120, 40));

        assert_eq!(console.flush().len(), 12);
        console.draw(&mut renderer).unwrap();
        assert_eq!(renderer.clears.len(), 1);
    }

    #[test]
    fn test_flushes_between_draws_are_collected() {
        let (mut console, mut renderer) = drawn_console();
        console.set(Point::new(1, 0), Cell::new('a'));
        console.set(Point::new(0, 2), Cell::new('b'));
        assert_eq!(console.flush().len(), 2);
        assert!(console.flush().is_empty());
        console.set(Point::new(1, 0), Cell::new('c'));
        assert_eq!(console.flush().len(), 1);
        assert_eq!(console.pending_frame().len(), 2);

        assert!(console.draw(&mut renderer).unwrap());
        let (frame, _) = renderer.frames.last().unwrap();
        let glyphs: Vec<(Point, char)> = frame
            .iter()
            .map(|fc| (fc.position, fc.cell.glyph))
            .collect();
        assert_eq!(
            glyphs,
            vec![(Point::new(1, 0), 'c'), (Point::new(0, 2), 'b')]
        );
        assert!(console.pending_frame().is_empty());
    }

    #[test]
    fn test_clear_screen_survives_double_flush() {
        let (mut console, mut renderer) = drawn_console();
        console.clear_screen();
        assert_eq!(console.flush().len(), 12);
        assert!(console.flush().is_empty());
        assert!(console.draw(&mut renderer).unwrap());
        assert_eq!(renderer.clears, vec![Rgba64::BLACK]);
        assert_eq!(renderer.frames.last().map(|(f, _)| f.len()), Some(12));
    }

    #[test]
    fn test_shrink_and_grow_back_repaints() {
        let (mut console, mut renderer) = drawn_console();
        console.set(Point::new(3, 2), Cell::new('k'));
        console.flush();
        console.draw(&mut renderer).unwrap();

        console.resize(1, 1);
        console.resize(4, 3);
        assert_eq!(console.at(Point::new(3, 2)), Cell::default());
        assert_eq!(console.flush().len(), 12);
        console.draw(&mut renderer).unwrap();
        assert_eq!(renderer.clears.len(), 1);

        // the cell lost in the shrink is emitted again when rewritten
        console.set(Point::new(3, 2), Cell::new('k'));
        let frame = console.flush();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.cells()[0].position, Point::new(3, 2));
    }

    #[test]
    fn test_put_composites_over_existing_cell() {
        let (mut console, _) = drawn_console();
        console.set(
            Point::new(0, 0),
            Cell::new('#').with_bg(Rgba64::opaque(0, 0, 0xFFFF)),
        );
        console.put(
            Point::new(0, 0),
            Cell::transparent().with_bg(Rgba64::TRANSPARENT),
        );
        let cell = console.at(Point::new(0, 0));
        assert_eq!(cell.glyph, '#');
        assert_eq!(cell.bg, Color::Rgba(Rgba64::opaque(0, 0, 0xFFFF)));
    }

    #[test]
    fn test_fill_through_canvas_trait() {
        fn paint(canvas: &mut dyn CellCanvas) {
            let size = canvas.size();
            canvas.fill(Rect::with_size(size.x, 1), Cell::new('='));
            canvas.flush();
        }
        let (mut console, _) = drawn_console();
        paint(&mut console);
        assert_eq!(console.frame().len(), 4);
        assert!(console.needs_draw());
        assert_eq!(console.at(Point::new(3, 0)).glyph, '=');
        assert_eq!(console.at(Point::new(3, 1)).glyph, ' ');
    }

    #[test]
    fn test_try_new_rejects_empty_grid() {
        let config = GridConfig {
            grid_width: 0,
            ..GridConfig::default()
        };
        assert!(Console::try_new(config).is_err());
        assert!(Console::try_new(GridConfig::default()).is_ok());
    }
}
