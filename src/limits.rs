//! Caps on what an owned surface may allocate.
//!
//! [`SurfaceLimits::check`] turns a requested size into a [`Footprint`]
//! (stride and byte count) or refuses it. [`Surface::with_limits`](crate::Surface::with_limits)
//! only allocates what a successful check hands back.

use log::debug;

use crate::SurfaceError;
use crate::pixel::BYTES_PER_PIXEL;

/// Storage needed by a tightly packed surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    /// Row stride, equal to `width * 4`.
    pub row_bytes: usize,
    /// Total bytes, `row_bytes * height`.
    pub bytes: usize,
}

/// Optional caps for owned surfaces. Unset caps allow anything that fits
/// in memory.
///
/// ```
/// use zensurface::{Surface, SurfaceLimits};
///
/// let limits = SurfaceLimits::none()
///     .with_max_pixels(4096 * 4096)
///     .with_max_bytes(64 * 1024 * 1024);
/// let footprint = limits.check(1920, 1080).unwrap();
/// assert_eq!(footprint.row_bytes, 1920 * 4);
///
/// let surface = Surface::with_limits(1920, 1080, &limits).unwrap();
/// assert_eq!(surface.row_bytes(), footprint.row_bytes);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct SurfaceLimits {
    /// Widest surface allowed.
    pub max_width: Option<u32>,
    /// Tallest surface allowed.
    pub max_height: Option<u32>,
    /// Largest `width * height` allowed.
    pub max_pixels: Option<u64>,
    /// Largest storage allocation allowed.
    pub max_bytes: Option<u64>,
}

impl SurfaceLimits {
    /// Accept every size.
    pub const fn none() -> Self {
        Self {
            max_width: None,
            max_height: None,
            max_pixels: None,
            max_bytes: None,
        }
    }

    pub const fn with_max_width(self, width: u32) -> Self {
        Self {
            max_width: Some(width),
            ..self
        }
    }

    pub const fn with_max_height(self, height: u32) -> Self {
        Self {
            max_height: Some(height),
            ..self
        }
    }

    pub const fn with_max_pixels(self, pixels: u64) -> Self {
        Self {
            max_pixels: Some(pixels),
            ..self
        }
    }

    pub const fn with_max_bytes(self, bytes: u64) -> Self {
        Self {
            max_bytes: Some(bytes),
            ..self
        }
    }

    /// Work out the storage for a `width` × `height` surface and hold it
    /// against the caps.
    ///
    /// Non-positive sizes, and sizes whose stride does not fit an `i32` or
    /// whose byte count overflows, are [`SurfaceError::InvalidDimensions`].
    /// A size past a cap is [`SurfaceError::Limit`].
    pub fn check(&self, width: i32, height: i32) -> Result<Footprint, SurfaceError> {
        let reject = |err: SurfaceError| {
            debug!("rejecting surface of {width}x{height}: {err}");
            err
        };
        let invalid = || reject(SurfaceError::InvalidDimensions { width, height });

        if width <= 0 || height <= 0 {
            return Err(invalid());
        }
        let (w, h) = (width as u32, height as u32);
        let row_bytes = (w as usize)
            .checked_mul(BYTES_PER_PIXEL)
            .filter(|&stride| i32::try_from(stride).is_ok())
            .ok_or_else(invalid)?;
        let bytes = row_bytes.checked_mul(h as usize).ok_or_else(invalid)?;

        let pixels = w as u64 * h as u64;
        let over = match *self {
            Self { max_width: Some(max), .. } if w > max => Some(LimitExceeded::Width {
                requested: w,
                max,
            }),
            Self { max_height: Some(max), .. } if h > max => Some(LimitExceeded::Height {
                requested: h,
                max,
            }),
            Self { max_pixels: Some(max), .. } if pixels > max => Some(LimitExceeded::Pixels {
                requested: pixels,
                max,
            }),
            Self { max_bytes: Some(max), .. } if bytes as u64 > max => Some(LimitExceeded::Bytes {
                requested: bytes as u64,
                max,
            }),
            _ => None,
        };
        match over {
            Some(err) => Err(reject(SurfaceError::Limit(err))),
            None => Ok(Footprint { row_bytes, bytes }),
        }
    }
}

/// The cap a requested surface ran into, with the requested amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LimitExceeded {
    Width { requested: u32, max: u32 },
    Height { requested: u32, max: u32 },
    Pixels { requested: u64, max: u64 },
    Bytes { requested: u64, max: u64 },
}

impl core::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (what, requested, max) = match *self {
            Self::Width { requested, max } => ("width", requested as u64, max as u64),
            Self::Height { requested, max } => ("height", requested as u64, max as u64),
            Self::Pixels { requested, max } => ("pixel count", requested, max),
            Self::Bytes { requested, max } => ("storage bytes", requested, max),
        };
        write!(f, "{what} {requested} is over the cap of {max}")
    }
}

impl core::error::Error for LimitExceeded {}
