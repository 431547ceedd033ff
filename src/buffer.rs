//! Bitmap descriptors.
//!
//! A [`Bitmap`] describes caller-owned pixel memory: dimensions, the byte
//! stride between row starts, and a borrow of the bytes. It is what a
//! caller hands to [`Surface::from_bitmap`](crate::Surface::from_bitmap).
//! [`BitmapInfo`] is the by-value export of whatever buffer a surface is
//! using, without access to the bytes themselves.

use core::fmt;
use core::ptr;

use crate::pixel::BYTES_PER_PIXEL;

// ---------------------------------------------------------------------------
// Bitmap (caller-supplied descriptor)
// ---------------------------------------------------------------------------

/// Caller-owned pixel memory plus its shape.
///
/// Fields are public and unvalidated; validation happens when the bitmap
/// is wrapped by a surface. `pixels: None` stands for a null pixel pointer
/// and is always rejected.
///
/// Pixels are packed `0xAARRGGBB` words stored native-endian, at byte
/// offset `y * row_bytes + x * 4`. Bytes past `width * 4` in each row are
/// padding and are never written.
#[derive(Default)]
pub struct Bitmap<'a> {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Bytes from the start of one row to the start of the next.
    pub row_bytes: i32,
    /// The pixel memory, or `None` for no memory at all.
    pub pixels: Option<&'a mut [u8]>,
}

impl<'a> Bitmap<'a> {
    /// Describe `pixels` as a `width` × `height` bitmap with the given stride.
    pub fn new(pixels: &'a mut [u8], width: i32, height: i32, row_bytes: i32) -> Self {
        Self {
            width,
            height,
            row_bytes,
            pixels: Some(pixels),
        }
    }

    /// Describe `pixels` as a tightly packed bitmap (`row_bytes == width * 4`).
    pub fn packed(pixels: &'a mut [u8], width: i32, height: i32) -> Self {
        let row_bytes = width.saturating_mul(BYTES_PER_PIXEL as i32);
        Self::new(pixels, width, height, row_bytes)
    }

    /// Export this descriptor's metadata and address.
    pub fn info(&self) -> BitmapInfo {
        BitmapInfo {
            width: self.width,
            height: self.height,
            row_bytes: self.row_bytes,
            pixels: self.pixels.as_deref().map_or(ptr::null(), <[u8]>::as_ptr),
        }
    }
}

impl fmt::Debug for Bitmap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bitmap({}x{}, row_bytes {}, {} bytes)",
            self.width,
            self.height,
            self.row_bytes,
            match &self.pixels {
                Some(bytes) => bytes.len(),
                None => 0,
            }
        )
    }
}

// ---------------------------------------------------------------------------
// BitmapInfo (exported descriptor)
// ---------------------------------------------------------------------------

/// By-value description of a pixel buffer.
///
/// Two infos compare equal when they describe the same memory with the
/// same shape. The address is for identity only; read pixels through the
/// surface that produced the info.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitmapInfo {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Bytes from the start of one row to the start of the next.
    pub row_bytes: i32,
    /// Address of the first pixel.
    pub pixels: *const u8,
}

impl BitmapInfo {
    /// Whether the descriptor has no pixel memory.
    #[inline]
    pub fn is_null(&self) -> bool {
        self.pixels.is_null()
    }

    /// Whether rows are tightly packed (`row_bytes == width * 4`).
    #[inline]
    pub fn is_packed(&self) -> bool {
        self.row_bytes as i64 == self.width as i64 * BYTES_PER_PIXEL as i64
    }
}

// ---------------------------------------------------------------------------
// BufferError
// ---------------------------------------------------------------------------

/// Why a [`Bitmap`] was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum BufferError {
    /// The bitmap has no pixel memory.
    NullPixels,
    /// Width or height is zero or negative.
    InvalidDimensions,
    /// `row_bytes` is smaller than `width * 4`.
    StrideTooSmall,
    /// `row_bytes` is not a multiple of the pixel size.
    MisalignedStride,
    /// The pixel slice is too short for the declared shape.
    InsufficientData,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullPixels => write!(f, "bitmap has no pixel memory"),
            Self::InvalidDimensions => write!(f, "width or height is not positive"),
            Self::StrideTooSmall => write!(f, "row_bytes is smaller than width * 4"),
            Self::MisalignedStride => write!(f, "row_bytes is not a multiple of 4"),
            Self::InsufficientData => {
                write!(f, "pixel memory is too small for the given dimensions")
            }
        }
    }
}

impl core::error::Error for BufferError {}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validated shape of a pixel buffer, in `usize` units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Layout {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) stride: usize,
}

impl Layout {
    /// Bytes of pixel data in one row (no padding).
    #[inline]
    pub(crate) fn row_len(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }

    /// Bytes spanned from the first pixel to the end of the last one.
    #[inline]
    pub(crate) fn span(&self) -> usize {
        (self.height - 1) * self.stride + self.row_len()
    }
}

/// Check a descriptor's shape against the bytes it claims to describe.
pub(crate) fn validate(
    width: i32,
    height: i32,
    row_bytes: i32,
    pixels: Option<&[u8]>,
) -> Result<Layout, BufferError> {
    if width <= 0 || height <= 0 {
        return Err(BufferError::InvalidDimensions);
    }
    let data = pixels.ok_or(BufferError::NullPixels)?;
    let (width, height) = (width as usize, height as usize);
    let min_stride = width
        .checked_mul(BYTES_PER_PIXEL)
        .ok_or(BufferError::InvalidDimensions)?;
    if row_bytes < 0 || (row_bytes as usize) < min_stride {
        return Err(BufferError::StrideTooSmall);
    }
    let stride = row_bytes as usize;
    if !stride.is_multiple_of(BYTES_PER_PIXEL) {
        return Err(BufferError::MisalignedStride);
    }
    let required = required_bytes(height, stride, min_stride)?;
    if data.len() < required {
        return Err(BufferError::InsufficientData);
    }
    Ok(Layout {
        width,
        height,
        stride,
    })
}

/// `(height - 1) * stride + row_len`, the last row needing no padding.
fn required_bytes(height: usize, stride: usize, row_len: usize) -> Result<usize, BufferError> {
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(BufferError::InsufficientData)
}
