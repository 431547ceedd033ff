//! Raster surface over owned or borrowed pixel memory.
//!
//! A [`Surface`] either allocates a tightly packed buffer itself
//! ([`Surface::new`]) or wraps a caller's [`Bitmap`] ([`Surface::from_bitmap`]).
//! The two cases differ only in who releases the memory: owned storage is
//! freed when the surface is dropped, borrowed storage is handed back to the
//! caller when the borrow ends. Writes through a borrowing surface land
//! directly in the caller's memory.

use alloc::vec::Vec;
use core::fmt;

use enough::{Stop, StopReason};
use imgref::ImgVec;
use log::{debug, trace};

use crate::buffer::{self, Bitmap, BitmapInfo, BufferError, Layout};
use crate::limits::{Footprint, LimitExceeded, SurfaceLimits};
use crate::pixel::BYTES_PER_PIXEL;
use crate::{Color, Pixel};

// ---------------------------------------------------------------------------
// SurfaceError
// ---------------------------------------------------------------------------

/// Why a surface could not be created.
///
/// No surface exists after any of these; nothing is left half-built.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum SurfaceError {
    /// Width or height is not positive, or the buffer size is not representable.
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
    /// A caller-supplied bitmap was rejected.
    InvalidBuffer(BufferError),
    /// A configured [`SurfaceLimits`] value was exceeded.
    Limit(LimitExceeded),
    /// The allocator could not provide the pixel storage.
    AllocationFailed {
        /// Bytes requested.
        bytes: usize,
    },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid surface dimensions {width}x{height}")
            }
            Self::InvalidBuffer(err) => write!(f, "invalid bitmap: {err}"),
            Self::Limit(err) => write!(f, "surface limit exceeded: {err}"),
            Self::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {bytes} bytes of pixel storage")
            }
        }
    }
}

impl core::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidBuffer(err) => Some(err),
            Self::Limit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BufferError> for SurfaceError {
    fn from(err: BufferError) -> Self {
        Self::InvalidBuffer(err)
    }
}

impl From<LimitExceeded> for SurfaceError {
    fn from(err: LimitExceeded) -> Self {
        Self::Limit(err)
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

enum Storage<'a> {
    /// Allocated by the surface, freed on drop.
    Owned(Vec<u8>),
    /// Caller memory; never reallocated or freed here.
    Borrowed(&'a mut [u8]),
}

impl Storage<'_> {
    #[inline]
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Owned(data) => data,
            Self::Borrowed(data) => data,
        }
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Self::Owned(data) => data,
            Self::Borrowed(data) => data,
        }
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A fixed-size raster of packed premultiplied `0xAARRGGBB` pixels.
///
/// The lifetime is that of the borrowed memory; surfaces that own their
/// storage are `Surface<'static>`. Dropping the surface is the only way to
/// destroy it.
pub struct Surface<'a> {
    storage: Storage<'a>,
    layout: Layout,
}

impl Surface<'static> {
    /// Allocate a tightly packed `width` × `height` surface.
    ///
    /// Fails with [`SurfaceError::InvalidDimensions`] if either dimension is
    /// zero or negative. Storage starts out transparent, but callers should
    /// fill the surface before reading it.
    pub fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        Self::with_limits(width, height, &SurfaceLimits::none())
    }

    /// Like [`new`](Self::new), rejecting sizes beyond `limits` before
    /// allocating.
    pub fn with_limits(
        width: i32,
        height: i32,
        limits: &SurfaceLimits,
    ) -> Result<Self, SurfaceError> {
        let Footprint { row_bytes, bytes } = limits.check(width, height)?;

        let mut data = Vec::new();
        if data.try_reserve_exact(bytes).is_err() {
            debug!("allocation of {bytes} bytes for {width}x{height} surface failed");
            return Err(SurfaceError::AllocationFailed { bytes });
        }
        data.resize(bytes, 0);
        debug!("allocated {width}x{height} surface ({bytes} bytes)");

        Ok(Self {
            storage: Storage::Owned(data),
            layout: Layout {
                width: width as usize,
                height: height as usize,
                stride: row_bytes,
            },
        })
    }
}

impl<'a> Surface<'a> {
    /// Wrap caller-owned memory described by `bitmap`.
    ///
    /// Fails with [`SurfaceError::InvalidBuffer`] if the dimensions are not
    /// positive, there is no pixel memory, `row_bytes` is smaller than
    /// `width * 4` or not a multiple of 4, or the memory is too short for
    /// the declared shape. The surface writes through the caller's stride
    /// and never touches the padding at the end of each row.
    pub fn from_bitmap(bitmap: Bitmap<'a>) -> Result<Self, SurfaceError> {
        let layout = buffer::validate(
            bitmap.width,
            bitmap.height,
            bitmap.row_bytes,
            bitmap.pixels.as_deref(),
        )
        .inspect_err(|err| debug!("rejecting {bitmap:?}: {err}"))?;
        let pixels = bitmap.pixels.ok_or(BufferError::NullPixels)?;

        Ok(Self {
            storage: Storage::Borrowed(pixels),
            layout,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.layout.width as u32
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.layout.height as u32
    }

    /// Byte stride between row starts.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.layout.stride
    }

    /// Whether the surface allocated (and will free) its own storage.
    #[inline]
    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    /// Export the descriptor of the buffer in use.
    ///
    /// The result is the same before and after any fill; only pixel
    /// contents change.
    pub fn bitmap_info(&self) -> BitmapInfo {
        // Every layout dimension came from an i32 or was checked to fit one.
        BitmapInfo {
            width: self.layout.width as i32,
            height: self.layout.height as i32,
            row_bytes: self.layout.stride as i32,
            pixels: self.storage.bytes().as_ptr(),
        }
    }

    /// Set every pixel to `color`, premultiplied and packed.
    pub fn fill(&mut self, color: Color) {
        self.fill_pixel(color.to_pixel());
    }

    /// Set every pixel to an already packed value.
    pub fn fill_pixel(&mut self, pixel: Pixel) {
        trace!("filling {self:?} with {pixel:?}");
        let bytes = pixel.to_ne_bytes();
        for row in self.rows_mut() {
            fill_row(row, bytes);
        }
    }

    /// Fill with `color`, checking `stop` before each row.
    ///
    /// On cancellation the rows already written keep the new color and the
    /// remaining rows are left as they were.
    pub fn fill_with_stop(&mut self, color: Color, stop: &dyn Stop) -> Result<(), StopReason> {
        let pixel = color.to_pixel();
        trace!("filling {self:?} with {pixel:?} (stoppable)");
        let bytes = pixel.to_ne_bytes();
        for row in self.rows_mut() {
            stop.check()?;
            fill_row(row, bytes);
        }
        Ok(())
    }

    /// All addressed bytes, from the first pixel to the end of the last one.
    ///
    /// Includes the padding between rows but not after the last row.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage.bytes()[..self.layout.span()]
    }

    /// Pixel bytes for row `y` (no padding, exactly `width * 4` bytes).
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(
            (y as usize) < self.layout.height,
            "row index {y} out of bounds (height: {})",
            self.layout.height
        );
        let start = y as usize * self.layout.stride;
        &self.storage.bytes()[start..start + self.layout.row_len()]
    }

    /// The pixel at (`x`, `y`), or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x as usize >= self.layout.width || y as usize >= self.layout.height {
            return None;
        }
        let (pixels, _) = self.row(y).as_chunks::<BYTES_PER_PIXEL>();
        pixels.get(x as usize).copied().map(Pixel::from_ne_bytes)
    }

    /// Copy the pixels into a tightly packed grid.
    pub fn to_imgvec(&self) -> ImgVec<Pixel> {
        let mut buf = Vec::with_capacity(self.layout.width * self.layout.height);
        for y in 0..self.height() {
            let (pixels, _) = self.row(y).as_chunks::<BYTES_PER_PIXEL>();
            buf.extend(pixels.iter().copied().map(Pixel::from_ne_bytes));
        }
        ImgVec::new(buf, self.layout.width, self.layout.height)
    }

    /// Consume the surface, returning its storage if it owned any.
    ///
    /// Borrowing surfaces return `None`; their memory goes back to the
    /// caller untouched by the release.
    pub fn into_owned_pixels(self) -> Option<Vec<u8>> {
        match self.storage {
            Storage::Owned(data) => Some(data),
            Storage::Borrowed(_) => None,
        }
    }

    /// Mutable pixel bytes of each row, padding excluded.
    fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let Layout { height, stride, .. } = self.layout;
        let row_len = self.layout.row_len();
        self.storage
            .bytes_mut()
            .chunks_mut(stride)
            .take(height)
            .map(move |row| &mut row[..row_len])
    }
}

impl fmt::Debug for Surface<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Surface({}x{}, row_bytes {}, {})",
            self.layout.width,
            self.layout.height,
            self.layout.stride,
            if self.is_owned() { "owned" } else { "borrowed" }
        )
    }
}

#[inline]
fn fill_row(row: &mut [u8], bytes: [u8; BYTES_PER_PIXEL]) {
    let (pixels, _) = row.as_chunks_mut::<BYTES_PER_PIXEL>();
    pixels.fill(bytes);
}
