//! Glyph sources.
//!
//! Glyph rasterization lives outside of the console. A [`GlyphSource`] answers whether it can draw a
//! glyph and draws it into a tile of a [`Surface`]. The console never caches glyphs itself.

use crate::rendering::color::Rgba64;
use crate::rendering::surface::{PixelRect, Surface};

/// Something that can draw glyphs onto a surface, usually backed by a font.
pub trait GlyphSource {
    /// Returns whether `glyph` can be drawn. Missing glyphs are replaced by a blank by the renderer.
    fn has_glyph(&self, glyph: char) -> bool;

    /// Draws `glyph` into `tile` with the given color. The pixel size of the glyph is the tile height.
    fn draw_glyph(&self, surface: &mut Surface, glyph: char, tile: PixelRect, color: Rgba64);
}

/// A built-in glyph source for the block elements `█ ▀ ▄ ▌ ▐` and the space.
///
/// Useful for pixel-art style consoles and whenever no font is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockGlyphs;

impl BlockGlyphs {
    /// The part of `tile` covered by `glyph`, or `None` if the glyph covers nothing.
    fn coverage(glyph: char, tile: PixelRect) -> Option<PixelRect> {
        let half_width = tile.width / 2;
        let half_height = tile.height / 2;
        let PixelRect {
            x,
            y,
            width,
            height,
        } = tile;
        match glyph {
            '█' => Some(tile),
            '▀' => Some(PixelRect::new(x, y, width, half_height)),
            '▄' => Some(PixelRect::new(x, y + half_height, width, height - half_height)),
            '▌' => Some(PixelRect::new(x, y, half_width, height)),
            '▐' => Some(PixelRect::new(x + half_width, y, width - half_width, height)),
            _ => None,
        }
    }
}

impl GlyphSource for BlockGlyphs {
    fn has_glyph(&self, glyph: char) -> bool {
        matches!(glyph, ' ' | '█' | '▀' | '▄' | '▌' | '▐')
    }

    fn draw_glyph(&self, surface: &mut Surface, glyph: char, tile: PixelRect, color: Rgba64) {
        if let Some(rect) = Self::coverage(glyph, tile) {
            surface.fill_rect(rect, color);
        }
    }
}
