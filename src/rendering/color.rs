//! Color model for the console.
//!
//! Colors come in three flavors:
//!
//! *   [`RgbColor`]: floating point channels in `[0, +inf)`. Values above `1.0` are valid ("HDR")
//!     and get compressed by a [`ToneMapping`] before they reach the screen.
//! *   [`HsvColor`]: hue, saturation and value, all in `[0, 1]`. The hue is a fraction of a full
//!     turn, never degrees.
//! *   [`Rgba64`]: the display-ready form, 16 bits per channel with straight (non-premultiplied) alpha.
//!
//! [`Color`] wraps all three so a [`Cell`](crate::rendering::cell::Cell) can carry any of them.
//! Every operation here is pure and total: degenerate inputs are handled by explicit branches.

use serde::{Deserialize, Serialize};

/// Maximum channel value of the 16-bit display domain.
pub const MAX_CHANNEL: u16 = 0xFFFF;

const MAX_CHANNEL_F: f64 = MAX_CHANNEL as f64;

/// CIE L* threshold between the linear and the cube-root branch.
const LIGHTNESS_EPSILON: f64 = 216.0 / 24389.0;
/// CIE L* slope of the linear branch.
const LIGHTNESS_KAPPA: f64 = 24389.0 / 27.0;

/// Clamps `f` into `[min, max]`.
pub fn clamp(f: f64, min: f64, max: f64) -> f64 {
    if f < min {
        return min;
    }
    if f > max {
        return max;
    }
    f
}

/// Linearizes a gamma-encoded sRGB channel value in `[0, 1]`.
pub fn degamma(channel: f64) -> f64 {
    if channel <= 0.04045 {
        channel / 12.92
    } else {
        ((channel + 0.055) / 1.055).powf(2.4)
    }
}

/// Converts RGB channels to `(h, s, v)`.
///
/// The hue wraps into `[0, 1)`. Achromatic inputs (all channels equal) have a hue of `0`,
/// and black has a saturation of `0`.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    let v = max;
    let s = if max > 0.0 { d / max } else { 0.0 };

    if max == min {
        return (0.0, s, v);
    }

    let sector = if max == r {
        let h = (g - b) / d;
        if g < b { h + 6.0 } else { h }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    let mut h = sector / 6.0;
    // (g - b) / d can be a tiny negative number, pushing the sum up to exactly 6.0
    if h >= 1.0 {
        h -= 1.0;
    }
    (h, s, v)
}

/// Converts `(h, s, v)` to RGB channels.
///
/// Inverse of [`rgb_to_hsv`]. The hue is taken modulo one full turn.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let hp = h.rem_euclid(1.0) * 6.0;
    let c = v * s;
    let x = c * (1.0 - ((hp % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match hp {
        hp if hp < 1.0 => (c, x, 0.0),
        hp if hp < 2.0 => (x, c, 0.0),
        hp if hp < 3.0 => (0.0, c, x),
        hp if hp < 4.0 => (0.0, x, c),
        hp if hp < 5.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    (m + r, m + g, m + b)
}

/// Converts HSV to HSL. Both use `[0, 1]` for every component.
pub fn hsv_to_hsl(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    let l = (2.0 - s) * v / 2.0;
    let s = if l == 0.0 {
        s
    } else if l == 1.0 {
        0.0
    } else if l < 0.5 {
        s * v / (l * 2.0)
    } else {
        s * v / (2.0 - l * 2.0)
    };
    (h, s, l)
}

/// Converts HSL to HSV. Both use `[0, 1]` for every component.
///
/// A resulting value of `0` (black) yields a saturation of `0`.
pub fn hsl_to_hsv(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let v = l + s * l.min(1.0 - l);
    let s = if v == 0.0 { 0.0 } else { 2.0 * (1.0 - l / v) };
    (h, s, v)
}

/// A color in the 16-bit display domain with straight alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba64 {
    pub r: u16,
    pub g: u16,
    pub b: u16,
    pub a: u16,
}

impl Rgba64 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(MAX_CHANNEL, MAX_CHANNEL, MAX_CHANNEL);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// A fully opaque color.
    pub const fn opaque(r: u16, g: u16, b: u16) -> Self {
        Self::new(r, g, b, MAX_CHANNEL)
    }

    pub fn is_opaque(self) -> bool {
        self.a == MAX_CHANNEL
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Returns the color with a different alpha.
    pub fn with_alpha(self, a: u16) -> Self {
        Self { a, ..self }
    }

    /// The top 8 bits of each color channel, for 24-bit outputs such as terminals.
    pub fn to_rgb8(self) -> [u8; 3] {
        [(self.r >> 8) as u8, (self.g >> 8) as u8, (self.b >> 8) as u8]
    }

    /// Composites `self` over `background`. See [`alpha_blend`].
    pub fn over(self, background: Rgba64) -> Rgba64 {
        alpha_blend(self, background)
    }
}

/// Composites `new` over `background` ("over" operator).
///
/// *   An opaque `new` wins outright.
/// *   A fully transparent `new` leaves the background untouched.
/// *   A fully transparent background is replaced by `new`.
/// *   Otherwise each channel is `new * alpha + background * (1 - alpha)`.
pub fn alpha_blend(new: Rgba64, background: Rgba64) -> Rgba64 {
    if new.is_opaque() {
        return new;
    }
    if new.is_transparent() {
        return background;
    }
    if background.is_transparent() {
        return new;
    }

    let na = u32::from(new.a);
    let inv = u32::from(MAX_CHANNEL) - na;
    let max = u32::from(MAX_CHANNEL);
    let mix = |n: u16, c: u16| ((u32::from(n) * na + u32::from(c) * inv) / max) as u16;
    Rgba64 {
        r: mix(new.r, background.r),
        g: mix(new.g, background.g),
        b: mix(new.b, background.b),
        a: ((na * max + u32::from(background.a) * inv) / max) as u16,
    }
}

fn to_channel(value: f64) -> u16 {
    clamp(value, 0.0, MAX_CHANNEL_F) as u16
}

/// Strategies for compressing HDR colors into the display range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToneMapping {
    /// `1 - exp(-channel * exposure)` with an exposure of `1.0`.
    #[default]
    Exposure,
    /// `channel * scale / (channel + 1)` with a scale derived from the color's lightness.
    Reinhard,
    /// Linear scale by the square root of the color's lightness.
    LightnessScaled,
}

impl ToneMapping {
    const EXPOSURE: f64 = 1.0;

    /// Maps an RGB color to an opaque display color.
    pub fn apply(self, color: RgbColor) -> Rgba64 {
        match self {
            ToneMapping::Exposure => {
                let map = |c: f64| to_channel((1.0 - (-(c * Self::EXPOSURE)).exp()) * MAX_CHANNEL_F);
                Rgba64::opaque(map(color.r), map(color.g), map(color.b))
            }
            ToneMapping::Reinhard => {
                let scale = MAX_CHANNEL_F * color.lightness().max(0.0).sqrt();
                let map = |c: f64| to_channel(c * scale / (c + 1.0));
                Rgba64::opaque(map(color.r), map(color.g), map(color.b))
            }
            ToneMapping::LightnessScaled => {
                let scale = MAX_CHANNEL_F * color.lightness().max(0.0).sqrt();
                let map = |c: f64| to_channel(c * scale);
                Rgba64::opaque(map(color.r), map(color.g), map(color.b))
            }
        }
    }
}

/// A color with floating point channels in `[0, +inf)`.
///
/// ```rust
/// use deltacon::rendering::color::{RgbColor, ToneMapping};
///
/// let hdr = RgbColor::new(3.0, 0.5, 0.0);
/// let display = hdr.tone_map(ToneMapping::Exposure);
/// assert!(display.r > display.g);
/// assert_eq!(display.b, 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl RgbColor {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Display color through the default tone mapping.
    pub fn to_rgba64(self) -> Rgba64 {
        self.tone_map(ToneMapping::default())
    }

    pub fn tone_map(self, mapping: ToneMapping) -> Rgba64 {
        mapping.apply(self)
    }

    /// Perceptually weighted sum of the gamma-compressed channels.
    pub fn luma(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Perceptually weighted sum of the linearized channels.
    pub fn luminance(self) -> f64 {
        0.2126 * degamma(self.r) + 0.7152 * degamma(self.g) + 0.0722 * degamma(self.b)
    }

    /// CIE L* of the luma, normalized so that white is `1.0`.
    pub fn lightness(self) -> f64 {
        let y = self.luma();
        let l = if y <= LIGHTNESS_EPSILON {
            y * LIGHTNESS_KAPPA
        } else {
            y.cbrt() * 116.0 - 16.0
        };
        l / 100.0
    }

    /// Clamps every channel into `[0, intensity]`.
    pub fn with_clamp_to(self, intensity: f64) -> Self {
        Self {
            r: clamp(self.r, 0.0, intensity),
            g: clamp(self.g, 0.0, intensity),
            b: clamp(self.b, 0.0, intensity),
        }
    }

    /// Shifts every channel down by the lightness difference.
    pub fn darken(self, current_lightness: f64, new_lightness: f64) -> Self {
        let diff = current_lightness - new_lightness;
        Self {
            r: self.r - diff,
            g: self.g - diff,
            b: self.b - diff,
        }
    }

    pub fn to_hsv(self) -> HsvColor {
        HsvColor::from_rgb(self.r, self.g, self.b)
    }
}

/// A color in hue, saturation and value, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HsvColor {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl HsvColor {
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        let (h, s, v) = rgb_to_hsv(r, g, b);
        Self::new(h, s, v)
    }

    /// Like [`HsvColor::from_rgb`]; the alpha channel carries no information in HSV and is dropped.
    pub fn from_rgba(r: f64, g: f64, b: f64, _a: f64) -> Self {
        Self::from_rgb(r, g, b)
    }

    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let (h, s, v) = hsl_to_hsv(h, s, l);
        Self::new(h, s, v)
    }

    /// Returns `(h, s, l)`.
    pub fn to_hsl(self) -> (f64, f64, f64) {
        hsv_to_hsl(self.h, self.s, self.v)
    }

    pub fn to_rgb(self) -> RgbColor {
        let (r, g, b) = hsv_to_rgb(self.h, self.s, self.v);
        RgbColor::new(r, g, b)
    }

    /// Display color. HSV values are already bounded, so no tone mapping is applied.
    pub fn to_rgba64(self) -> Rgba64 {
        let (r, g, b) = hsv_to_rgb(self.h, self.s, self.v);
        Rgba64::opaque(
            to_channel(r * MAX_CHANNEL_F),
            to_channel(g * MAX_CHANNEL_F),
            to_channel(b * MAX_CHANNEL_F),
        )
    }

    /// Moves the value towards `1.0` by `scale` (in `[0, 1]`) of the remaining interval.
    pub fn lighten(self, scale: f64) -> Self {
        let interval = 1.0 - self.v;
        Self::new(self.h, self.s, (self.v + interval * scale).min(1.0))
    }

    pub fn with_h(self, h: f64) -> Self {
        Self::new(h, self.s, self.v)
    }

    pub fn with_s(self, s: f64) -> Self {
        Self::new(self.h, s, self.v)
    }

    /// Sets the value, clamped into `[0, 1]`.
    pub fn with_v(self, v: f64) -> Self {
        Self::new(self.h, self.s, clamp(v, 0.0, 1.0))
    }

    /// Linearly interpolates the hue towards `h`.
    pub fn lerp_h(self, h: f64, ratio: f64) -> Self {
        Self::new(self.h + (h - self.h) * ratio, self.s, self.v)
    }

    /// Adds `light` onto this color in RGB space, clamping each channel to `1.0`.
    pub fn blend_rgb(self, light: RgbColor) -> Self {
        let solid = self.to_rgb();
        HsvColor::from_rgb(
            clamp(light.r + solid.r, 0.0, 1.0),
            clamp(light.g + solid.g, 0.0, 1.0),
            clamp(light.b + solid.b, 0.0, 1.0),
        )
    }
}

/// Any color a cell can carry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Color {
    Rgb(RgbColor),
    Hsv(HsvColor),
    Rgba(Rgba64),
}

impl Color {
    pub const WHITE: Self = Color::Rgb(RgbColor::WHITE);
    pub const BLACK: Self = Color::Rgb(RgbColor::BLACK);
    pub const TRANSPARENT: Self = Color::Rgba(Rgba64::TRANSPARENT);

    /// Resolves the color for display, using the default tone mapping for RGB colors.
    pub fn to_rgba64(self) -> Rgba64 {
        self.to_rgba64_with(ToneMapping::default())
    }

    /// Resolves the color for display with the given tone mapping for RGB colors.
    pub fn to_rgba64_with(self, mapping: ToneMapping) -> Rgba64 {
        match self {
            Color::Rgb(rgb) => rgb.tone_map(mapping),
            Color::Hsv(hsv) => hsv.to_rgba64(),
            Color::Rgba(rgba) => rgba,
        }
    }

    /// Only [`Color::Rgba`] can carry transparency.
    pub fn is_opaque(self) -> bool {
        match self {
            Color::Rgba(rgba) => rgba.is_opaque(),
            _ => true,
        }
    }

    pub fn is_transparent(self) -> bool {
        match self {
            Color::Rgba(rgba) => rgba.is_transparent(),
            _ => false,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<RgbColor> for Color {
    fn from(color: RgbColor) -> Self {
        Color::Rgb(color)
    }
}

impl From<HsvColor> for Color {
    fn from(color: HsvColor) -> Self {
        Color::Hsv(color)
    }
}

impl From<Rgba64> for Color {
    fn from(color: Rgba64) -> Self {
        Color::Rgba(color)
    }
}
