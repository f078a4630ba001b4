//! Frame sinks and the `Renderer` trait.
//!
//! This module defines the boundary between the console and whatever actually paints pixels:
//!
//! *   [`Renderer`] trait: consumes a [`Frame`] together with the [`TileMetrics`] of the console.
//! *   [`SurfaceRenderer`]: a concrete sink that paints into an in-memory [`Surface`] using a
//!     [`GlyphSource`] for the glyphs.
//!
//! For every changed cell a sink paints a solid background rectangle at the scaled tile position,
//! then the glyph in the foreground color. Glyphs the sink cannot draw are replaced by a blank.
//! See [`TerminalRenderer`](crate::rendering::terminal::TerminalRenderer) for a terminal sink.

use crate::rendering::color::{Rgba64, ToneMapping};
use crate::rendering::frame::Frame;
use crate::rendering::geometry::Point;
use crate::rendering::glyphs::GlyphSource;
use crate::rendering::surface::{PixelRect, Surface};
use log::trace;
use std::io;

/// The pixel size of a console tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileMetrics {
    /// Unscaled width of a tile in pixels.
    pub tile_width: u32,
    /// Unscaled height of a tile in pixels.
    pub tile_height: u32,
    /// Device DPI scale factor.
    pub scale: f64,
}

impl TileMetrics {
    pub fn new(tile_width: u32, tile_height: u32, scale: f64) -> Self {
        Self {
            tile_width,
            tile_height,
            scale,
        }
    }

    /// Scaled tile width in device pixels, rounded up.
    pub fn scaled_width(&self) -> u32 {
        (f64::from(self.tile_width) * self.scale).ceil() as u32
    }

    /// Scaled tile height in device pixels, rounded up.
    pub fn scaled_height(&self) -> u32 {
        (f64::from(self.tile_height) * self.scale).ceil() as u32
    }

    /// The device pixel rectangle of the tile at `p`.
    ///
    /// Half-width tiles are half as wide (but at least one pixel).
    pub fn tile_rect(&self, p: Point, half_width: bool) -> PixelRect {
        let mut width = self.scaled_width();
        if half_width {
            width = (width / 2).max(1);
        }
        let height = self.scaled_height();
        PixelRect::new(
            saturating_offset(p.x, width),
            saturating_offset(p.y, height),
            width,
            height,
        )
    }
}

/// The pixel offset of tile `index`, saturating at the end of the pixel range.
fn saturating_offset(index: usize, tile: u32) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX).saturating_mul(tile)
}

/// A sink for frames.
pub trait Renderer {
    /// Draws every cell of `frame`, in order.
    fn render_frame(&mut self, frame: &Frame, tiles: TileMetrics) -> io::Result<()>;

    /// Clears the whole target to `color`.
    fn clear(&mut self, color: Rgba64) -> io::Result<()> {
        // default implementation does nothing
        let _ = color;
        Ok(())
    }
}

/// Paints frames into a [`Surface`].
///
/// # Example
///
/// ```rust
/// use deltacon::rendering::cell::Cell;
/// use deltacon::rendering::color::Rgba64;
/// use deltacon::rendering::differ::FrameDiffer;
/// use deltacon::rendering::geometry::Point;
/// use deltacon::rendering::glyphs::BlockGlyphs;
/// use deltacon::rendering::grid::Grid;
/// use deltacon::rendering::renderer::{Renderer, SurfaceRenderer, TileMetrics};
/// use deltacon::rendering::surface::Surface;
///
/// let tiles = TileMetrics::new(2, 2, 1.0);
/// let mut grid = Grid::new(2, 1);
/// grid.set(Point::new(1, 0), Cell::new('█').with_fg(Rgba64::WHITE));
///
/// let mut differ = FrameDiffer::new();
/// let mut renderer = SurfaceRenderer::new(Surface::new(4, 2), BlockGlyphs);
/// renderer.render_frame(differ.diff(&mut grid), tiles).unwrap();
///
/// assert_eq!(renderer.surface().pixel(3, 1), Some(Rgba64::WHITE));
/// ```
#[derive(Debug)]
pub struct SurfaceRenderer<G: GlyphSource> {
    surface: Surface,
    glyphs: G,
    tone_mapping: ToneMapping,
}

impl<G: GlyphSource> SurfaceRenderer<G> {
    pub fn new(surface: Surface, glyphs: G) -> Self {
        Self {
            surface,
            glyphs,
            tone_mapping: ToneMapping::default(),
        }
    }

    /// Sets the tone mapping used to resolve RGB colors. Works on the next frame.
    pub fn set_tone_mapping(&mut self, tone_mapping: ToneMapping) {
        self.tone_mapping = tone_mapping;
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn into_surface(self) -> Surface {
        self.surface
    }

    /// Resizes the surface and discards its content. The next frame should be a full refresh.
    pub fn resize_discard(&mut self, width: u32, height: u32) {
        self.surface.resize_discard(width, height);
    }
}

impl<G: GlyphSource> Renderer for SurfaceRenderer<G> {
    fn render_frame(&mut self, frame: &Frame, tiles: TileMetrics) -> io::Result<()> {
        for frame_cell in frame {
            let cell = frame_cell.cell;
            let tile = tiles.tile_rect(frame_cell.position, frame.is_half_width());
            self.surface
                .fill_rect(tile, cell.bg.to_rgba64_with(self.tone_mapping));

            let glyph = if self.glyphs.has_glyph(cell.glyph) {
                cell.glyph
            } else {
                ' '
            };
            self.glyphs.draw_glyph(
                &mut self.surface,
                glyph,
                tile,
                cell.fg.to_rgba64_with(self.tone_mapping),
            );
        }
        trace!("painted {} tiles onto surface", frame.len());
        Ok(())
    }

    fn clear(&mut self, color: Rgba64) -> io::Result<()> {
        self.surface.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::cell::Cell;
    use crate::rendering::color::RgbColor;
    use std::cell::RefCell;

    /// Records every glyph it is asked to draw.
    #[derive(Default)]
    struct RecordingGlyphs {
        drawn: RefCell<Vec<(char, PixelRect)>>,
    }

    impl GlyphSource for RecordingGlyphs {
        fn has_glyph(&self, glyph: char) -> bool {
            glyph.is_ascii()
        }

        fn draw_glyph(&self, _surface: &mut Surface, glyph: char, tile: PixelRect, _color: Rgba64) {
            self.drawn.borrow_mut().push((glyph, tile));
        }
    }

    #[test]
    fn test_tile_metrics_scale_rounds_up() {
        let tiles = TileMetrics::new(20, 20, 1.25);
        assert_eq!(tiles.scaled_width(), 25);
        let tiles = TileMetrics::new(3, 5, 1.5);
        assert_eq!(tiles.scaled_width(), 5);
        assert_eq!(tiles.scaled_height(), 8);
        assert_eq!(
            tiles.tile_rect(Point::new(2, 1), false),
            PixelRect::new(10, 8, 5, 8)
        );
        assert_eq!(
            tiles.tile_rect(Point::new(2, 1), true),
            PixelRect::new(4, 8, 2, 8)
        );
    }

    #[test]
    fn test_huge_scale_saturates_tile_rect() {
        let tiles = TileMetrics::new(20, 20, 1e12);
        assert_eq!(tiles.scaled_width(), u32::MAX);
        let rect = tiles.tile_rect(Point::new(3, 2), false);
        assert_eq!(rect, PixelRect::new(u32::MAX, u32::MAX, u32::MAX, u32::MAX));

        // off-surface tiles are clipped, not painted
        let mut frame = Frame::new();
        frame.push(Point::new(1, 0), Cell::new('a').with_bg(RgbColor::WHITE));
        let mut renderer = SurfaceRenderer::new(Surface::new(2, 2), RecordingGlyphs::default());
        let before = renderer.surface().pixels().to_vec();
        renderer.render_frame(&frame, tiles).unwrap();
        assert_eq!(renderer.surface().pixels(), before.as_slice());
    }

    #[test]
    fn test_paints_background_then_glyph() {
        let mut frame = Frame::new();
        frame.push(
            Point::new(1, 0),
            Cell::new('a').with_bg(Rgba64::opaque(0, 0, 0xFFFF)),
        );
        frame.push(Point::new(0, 0), Cell::new('é').with_bg(RgbColor::BLACK));

        let mut renderer = SurfaceRenderer::new(Surface::new(4, 2), RecordingGlyphs::default());
        renderer
            .render_frame(&frame, TileMetrics::new(2, 2, 1.0))
            .unwrap();

        assert_eq!(
            renderer.surface().pixel(2, 0),
            Some(Rgba64::opaque(0, 0, 0xFFFF))
        );
        assert_eq!(renderer.surface().pixel(0, 1), Some(Rgba64::BLACK));
        // the missing glyph was replaced by a blank
        assert_eq!(
            *renderer.glyphs.drawn.borrow(),
            vec![
                ('a', PixelRect::new(2, 0, 2, 2)),
                (' ', PixelRect::new(0, 0, 2, 2))
            ]
        );
    }

    #[test]
    fn test_clear_fills_surface() {
        let mut renderer = SurfaceRenderer::new(Surface::new(2, 2), RecordingGlyphs::default());
        renderer.clear(Rgba64::BLACK).unwrap();
        assert!(
            renderer
                .surface()
                .pixels()
                .iter()
                .all(|p| *p == Rgba64::BLACK)
        );
    }

    #[test]
    fn test_tone_mapping_is_configurable() {
        let mut frame = Frame::new();
        frame.push(Point::new(0, 0), Cell::new(' ').with_bg(RgbColor::WHITE));
        let mut renderer = SurfaceRenderer::new(Surface::new(1, 1), RecordingGlyphs::default());
        renderer.set_tone_mapping(ToneMapping::Reinhard);
        renderer
            .render_frame(&frame, TileMetrics::new(1, 1, 1.0))
            .unwrap();
        assert_eq!(
            renderer.surface().pixel(0, 0),
            Some(RgbColor::WHITE.tone_map(ToneMapping::Reinhard))
        );
    }
}
