//! Floating-point color and its conversion to packed pixels.
//!
//! [`Color`] carries straight (unassociated) alpha with unconstrained
//! channel values. [`Color::to_pixel`] is the only place where channels are
//! clamped, premultiplied and quantized, so every surface operation that
//! takes a color produces bit-identical results.

use rgb::Rgba;

use crate::Pixel;

/// A straight-alpha color with `f32` channels.
///
/// Channels are nominally in `[0, 1]`, but any value is accepted; values
/// outside the range are clamped when converted with [`to_pixel`](Self::to_pixel).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    /// Alpha (coverage).
    pub a: f32,
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
}

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Create a color from alpha, red, green and blue.
    pub const fn new(a: f32, r: f32, g: f32, b: f32) -> Self {
        Self { a, r, g, b }
    }

    /// Create an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(1.0, r, g, b)
    }

    /// Convert to a packed premultiplied pixel.
    ///
    /// Each channel is clamped to `[0, 1]`, red/green/blue are multiplied by
    /// alpha, and the results are scaled by 255 and rounded half-up. NaN
    /// channels are treated as 0.
    ///
    /// ```
    /// use zensurface::Color;
    ///
    /// let pixel = Color::new(0.5, 1.0, 0.0, 0.5).to_pixel();
    /// assert_eq!(pixel.to_bits(), 0x8080_0040);
    /// ```
    pub fn to_pixel(self) -> Pixel {
        let a = unit(self.a);
        let r = unit(self.r) * a;
        let g = unit(self.g) * a;
        let b = unit(self.b) * a;
        Pixel::from_argb(quantize(a), quantize(r), quantize(g), quantize(b))
    }
}

impl From<Rgba<f32>> for Color {
    fn from(c: Rgba<f32>) -> Self {
        Self::new(c.a, c.r, c.g, c.b)
    }
}

impl From<Color> for Pixel {
    fn from(color: Color) -> Self {
        color.to_pixel()
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
#[inline]
fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Scale a `[0, 1]` value to `0..=255`, rounding half-up.
#[inline]
fn quantize(v: f32) -> u8 {
    // `as` truncates; the +0.5 turns that into round-half-up.
    (v * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_white() {
        assert_eq!(Color::WHITE.to_pixel(), Pixel::WHITE);
    }

    #[test]
    fn premultiplies_by_alpha() {
        let pixel = Color::new(0.5, 1.0, 0.0, 0.5).to_pixel();
        assert_eq!(pixel.to_bits(), 0x8080_0040);
    }

    #[test]
    fn barely_white_rounds_up() {
        let v = 0.999_999_9;
        assert_eq!(Color::new(v, v, v, v).to_pixel().to_bits(), 0xFFFF_FFFF);
    }

    #[test]
    fn out_of_range_channels_clamp() {
        let pixel = Color::new(4.0, -3.2, -3.2, 4.0).to_pixel();
        assert_eq!(pixel.to_bits(), 0xFF00_00FF);
    }

    #[test]
    fn nan_maps_to_zero() {
        let pixel = Color::new(1.0, f32::NAN, 1.0, 0.0).to_pixel();
        assert_eq!(pixel.to_bits(), 0xFF00_FF00);

        let pixel = Color::new(f32::NAN, 1.0, 1.0, 1.0).to_pixel();
        assert_eq!(pixel, Pixel::TRANSPARENT);
    }

    #[test]
    fn infinities_clamp() {
        let pixel = Color::new(f32::INFINITY, f32::NEG_INFINITY, f32::INFINITY, 0.0).to_pixel();
        assert_eq!(pixel.to_bits(), 0xFF00_FF00);
    }

    #[test]
    fn zero_alpha_discards_color() {
        let pixel = Color::new(0.0, 1.0, 1.0, 1.0).to_pixel();
        assert_eq!(pixel, Pixel::TRANSPARENT);
    }

    #[test]
    fn rounds_instead_of_truncating() {
        // 127.5
        assert_eq!(Color::new(0.5, 0.0, 0.0, 0.0).to_pixel().alpha(), 128);
        // 76.5
        assert_eq!(Color::new(0.3, 0.0, 0.0, 0.0).to_pixel().alpha(), 77);
        // 254.745
        assert_eq!(Color::new(0.999, 0.0, 0.0, 0.0).to_pixel().alpha(), 255);
        // 51.0
        assert_eq!(Color::new(0.2, 0.0, 0.0, 0.0).to_pixel().alpha(), 51);
    }

    #[test]
    fn from_rgba_f32() {
        let color = Color::from(Rgba {
            r: 1.0f32,
            g: 0.0,
            b: 0.5,
            a: 0.5,
        });
        assert_eq!(color, Color::new(0.5, 1.0, 0.0, 0.5));
        assert_eq!(Pixel::from(color).to_bits(), 0x8080_0040);
    }
}
