//! Cell representation for console rendering.
//!
//! A [`Cell`] is the atomic unit of the console: one glyph with a foreground and a background color.
//! Cells are plain values; two cells are equal iff their glyphs and both colors are equal.

use crate::rendering::color::{Color, HsvColor, alpha_blend};
use serde::{Deserialize, Serialize};

/// A single glyph with its colors.
///
/// # Defaults
///
/// *   Glyph: `' '` (space)
/// *   Foreground: white
/// *   Background: black
///
/// # Example
///
/// ```rust
/// use deltacon::rendering::cell::Cell;
/// use deltacon::rendering::color::RgbColor;
///
/// let wall = Cell::new('#')
///     .with_fg(RgbColor::new(0.8, 0.8, 0.8))
///     .with_bg(RgbColor::new(0.9, 0.9, 0.9));
/// assert_eq!(wall.glyph, '#');
/// assert_ne!(wall, Cell::default());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// The character to be displayed.
    pub glyph: char,
    /// The color of the glyph.
    pub fg: Color,
    /// The color of the tile behind the glyph.
    pub bg: Color,
}

impl Cell {
    /// Creates a new `Cell` with the given glyph and default colors.
    pub fn new(glyph: char) -> Self {
        Self {
            glyph,
            ..Self::default()
        }
    }

    /// A cell that lets everything below it show through when put over another cell.
    pub fn transparent() -> Self {
        Self {
            glyph: ' ',
            fg: Color::TRANSPARENT,
            bg: Color::TRANSPARENT,
        }
    }

    pub fn with_glyph(self, glyph: char) -> Self {
        Self { glyph, ..self }
    }

    pub fn with_fg(self, fg: impl Into<Color>) -> Self {
        Self {
            fg: fg.into(),
            ..self
        }
    }

    pub fn with_bg(self, bg: impl Into<Color>) -> Self {
        Self {
            bg: bg.into(),
            ..self
        }
    }

    /// Applies both colors of `style`.
    pub fn with_style(self, style: Style) -> Self {
        self.with_fg(style.fg).with_bg(style.bg)
    }

    /// Composites `self` over `below` and returns the result.
    ///
    /// A fully transparent foreground lets the glyph and foreground of `below` through.
    /// The background is alpha blended over the background of `below`.
    ///
    /// ```rust
    /// use deltacon::rendering::cell::Cell;
    /// use deltacon::rendering::color::{Color, Rgba64};
    ///
    /// let floor = Cell::new('.').with_bg(Rgba64::opaque(0, 0, 0xFFFF));
    /// let overlay = Cell::transparent();
    /// assert_eq!(overlay.put_over(floor), floor);
    /// ```
    pub fn put_over(self, below: Cell) -> Self {
        let mut cell = self;
        if cell.fg.is_transparent() {
            cell.fg = below.fg;
            cell.glyph = below.glyph;
        }
        cell.bg = if cell.bg.is_opaque() {
            cell.bg
        } else if cell.bg.is_transparent() {
            below.bg
        } else {
            Color::Rgba(alpha_blend(cell.bg.to_rgba64(), below.bg.to_rgba64()))
        };
        cell
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            glyph: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

/// A foreground and background color pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fg: HsvColor,
    pub bg: HsvColor,
}

impl Style {
    pub fn new(fg: HsvColor, bg: HsvColor) -> Self {
        Self { fg, bg }
    }

    /// Returns a derived style with a new foreground color.
    pub fn with_fg(self, fg: HsvColor) -> Self {
        Self { fg, ..self }
    }

    /// Returns a derived style with a new background color.
    pub fn with_bg(self, bg: HsvColor) -> Self {
        Self { bg, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::color::{RgbColor, Rgba64};

    #[test]
    fn test_structural_equality() {
        let a = Cell::new('#').with_fg(RgbColor::WHITE);
        let b = Cell::new('#').with_fg(RgbColor::WHITE);
        assert_eq!(a, b);
        assert_ne!(a, b.with_bg(RgbColor::BLUE));
        assert_ne!(a, b.with_glyph('x'));
        // same display color, different representation
        assert_ne!(a, b.with_fg(RgbColor::WHITE.to_rgba64()));
    }

    #[test]
    fn test_with_style() {
        let style = Style::default()
            .with_fg(HsvColor::new(0.0, 1.0, 1.0))
            .with_bg(HsvColor::new(0.5, 1.0, 1.0));
        let cell = Cell::new('@').with_style(style);
        assert_eq!(cell.fg, Color::Hsv(style.fg));
        assert_eq!(cell.bg, Color::Hsv(style.bg));
    }

    #[test]
    fn test_put_over_keeps_opaque() {
        let top = Cell::new('@').with_bg(RgbColor::RED);
        let below = Cell::new('.').with_bg(RgbColor::BLUE);
        assert_eq!(top.put_over(below), top);
    }

    #[test]
    fn test_put_over_blends_background() {
        let top = Cell::new('@').with_bg(Rgba64::WHITE.with_alpha(0x8000));
        let below = Cell::new('.').with_bg(Rgba64::BLACK);
        let result = top.put_over(below);
        assert_eq!(result.glyph, '@');
        assert_eq!(result.bg, Color::Rgba(Rgba64::opaque(0x8000, 0x8000, 0x8000)));
    }

    #[test]
    fn test_put_over_transparent_foreground() {
        let top = Cell::new('@').with_fg(Color::TRANSPARENT).with_bg(RgbColor::RED);
        let below = Cell::new('.').with_fg(RgbColor::GREEN);
        let result = top.put_over(below);
        assert_eq!(result.glyph, '.');
        assert_eq!(result.fg, Color::Rgb(RgbColor::GREEN));
        assert_eq!(result.bg, Color::Rgb(RgbColor::RED));
    }
}
