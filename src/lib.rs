//! Premultiplied ARGB raster surfaces over owned or borrowed pixel memory.
//!
//! This crate is the storage core of a software rasterizer:
//!
//! - [`Surface`]: a fixed-size raster that either allocates its own
//!   tightly packed storage or wraps a caller's [`Bitmap`], padding included
//! - [`Color`]: straight-alpha `f32` color, converted once per fill
//! - [`Pixel`]: the packed `0xAARRGGBB` premultiplied pixel
//! - [`BitmapInfo`]: by-value export of the buffer a surface is using
//! - [`SurfaceLimits`]: allocation caps checked before any memory is requested
//!
//! ```
//! use zensurface::{Bitmap, Color, Surface};
//!
//! // Owned storage.
//! let mut surface = Surface::new(32, 32)?;
//! surface.fill(Color::new(0.5, 1.0, 0.0, 0.5));
//! assert_eq!(surface.pixel(0, 0).map(|p| p.to_bits()), Some(0x8080_0040));
//!
//! // Caller storage with 16 bytes of padding per row.
//! let mut memory = vec![0u8; (8 * 4 + 16) * 4];
//! let mut surface = Surface::from_bitmap(Bitmap::new(&mut memory, 8, 4, 8 * 4 + 16))?;
//! surface.fill(Color::WHITE);
//! drop(surface);
//! assert_eq!(&memory[..4], &[0xFF; 4]);
//! assert_eq!(&memory[32..48], &[0; 16]);
//! # Ok::<(), zensurface::SurfaceError>(())
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod buffer;
mod color;
mod limits;
mod pixel;
mod surface;

pub use buffer::{Bitmap, BitmapInfo, BufferError};
pub use color::Color;
pub use limits::{Footprint, LimitExceeded, SurfaceLimits};
pub use pixel::{BYTES_PER_PIXEL, Pixel};
pub use surface::{Surface, SurfaceError};

// Re-exports for callers that cancel fills or consume pixel grids.
pub use enough::{Stop, StopReason, Unstoppable};
pub use imgref::{ImgRef, ImgVec};
pub use rgb;
pub use rgb::Rgba;
