//! Packed premultiplied pixel.
//!
//! A [`Pixel`] is one 32-bit word laid out as `0xAARRGGBB`. Red, green and
//! blue are already multiplied by alpha. Surfaces store each pixel as the
//! native-endian bytes of that word, so reading the memory back as `u32`
//! yields the documented layout.

use core::fmt;

use rgb::Rgba;

/// Size of one packed pixel in bytes.
pub const BYTES_PER_PIXEL: usize = 4;

/// A packed, alpha-premultiplied `0xAARRGGBB` pixel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Pixel(u32);

impl Pixel {
    /// Fully transparent black (`0x00000000`).
    pub const TRANSPARENT: Self = Self(0);

    /// Opaque white (`0xFFFFFFFF`).
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Pack four already-premultiplied 8-bit channels.
    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Wrap a raw `0xAARRGGBB` word.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw `0xAARRGGBB` word.
    #[inline]
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Alpha channel (bits 24..32).
    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Premultiplied red channel (bits 16..24).
    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Premultiplied green channel (bits 8..16).
    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Premultiplied blue channel (bits 0..8).
    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// In-memory representation as stored in a surface.
    #[inline]
    pub const fn to_ne_bytes(self) -> [u8; BYTES_PER_PIXEL] {
        self.0.to_ne_bytes()
    }

    /// Read a pixel back from its in-memory representation.
    #[inline]
    pub const fn from_ne_bytes(bytes: [u8; BYTES_PER_PIXEL]) -> Self {
        Self(u32::from_ne_bytes(bytes))
    }

    /// The premultiplied channels as an `rgb` struct.
    ///
    /// No unpremultiply is performed; this is the stored data reordered.
    pub fn to_rgba8(self) -> Rgba<u8> {
        Rgba {
            r: self.red(),
            g: self.green(),
            b: self.blue(),
            a: self.alpha(),
        }
    }
}

impl From<Pixel> for u32 {
    fn from(pixel: Pixel) -> Self {
        pixel.0
    }
}

impl From<u32> for Pixel {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pixel(0x{:08X})", self.0)
    }
}
