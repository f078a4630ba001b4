//! In-memory pixel surface.
//!
//! A [`Surface`] is the pixel target of a [`SurfaceRenderer`](crate::rendering::renderer::SurfaceRenderer):
//! a row-major buffer of [`Rgba64`] pixels. Rectangles are alpha blended over what is already there.

use crate::rendering::color::{Rgba64, alpha_blend};

/// A rectangle in device pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A buffer of pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba64>,
}

impl Surface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba64::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba64] {
        &self.pixels
    }

    #[inline]
    fn index_of(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Returns the pixel at `(x, y)`, or `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index_of(x, y)])
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: Rgba64) {
        self.pixels.fill(color);
    }

    /// Blends `color` over the part of `rect` that lies on the surface.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba64) {
        let x_end = rect.x.saturating_add(rect.width).min(self.width);
        let y_end = rect.y.saturating_add(rect.height).min(self.height);
        if rect.x >= x_end || rect.y >= y_end {
            return;
        }
        for y in rect.y..y_end {
            let start = self.index_of(rect.x, y);
            let end = self.index_of(x_end, y);
            if color.is_opaque() {
                self.pixels[start..end].fill(color);
            } else {
                for pixel in &mut self.pixels[start..end] {
                    *pixel = alpha_blend(color, *pixel);
                }
            }
        }
    }

    /// Resizes the surface, discarding its content.
    pub fn resize_discard(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Rgba64::TRANSPARENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips_to_surface() {
        let mut surface = Surface::new(4, 4);
        surface.fill_rect(PixelRect::new(2, 2, 10, 10), Rgba64::WHITE);
        assert_eq!(surface.pixel(3, 3), Some(Rgba64::WHITE));
        assert_eq!(surface.pixel(1, 3), Some(Rgba64::TRANSPARENT));
        assert_eq!(surface.pixel(4, 0), None);
        let white = surface.pixels().iter().filter(|p| **p == Rgba64::WHITE).count();
        assert_eq!(white, 4);
    }

    #[test]
    fn test_fill_rect_blends() {
        let mut surface = Surface::new(1, 1);
        surface.fill(Rgba64::BLACK);
        surface.fill_rect(PixelRect::new(0, 0, 1, 1), Rgba64::WHITE.with_alpha(0x8000));
        assert_eq!(surface.pixel(0, 0), Some(Rgba64::opaque(0x8000, 0x8000, 0x8000)));
    }

    #[test]
    fn test_resize_discard() {
        let mut surface = Surface::new(2, 2);
        surface.fill(Rgba64::WHITE);
        surface.resize_discard(3, 1);
        assert_eq!(surface.pixels().len(), 3);
        assert_eq!(surface.pixel(2, 0), Some(Rgba64::TRANSPARENT));
    }
}
