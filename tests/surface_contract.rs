//! Surface behavior as seen by a caller: construction, clearing owned and
//! foreign memory, rounding, premultiplication and clamping.

use zensurface::{Bitmap, BufferError, Color, Pixel, Surface, SurfaceError, SurfaceLimits};

/// Error type of a caller that renders into surfaces.
#[derive(Debug, thiserror::Error)]
enum RenderError {
    #[error("could not create surface")]
    Surface(#[from] SurfaceError),
    #[error("pixel ({x}, {y}) is {found:?}, expected {expected:?}")]
    Mismatch {
        x: u32,
        y: u32,
        found: Option<Pixel>,
        expected: Pixel,
    },
}

/// Read the packed word at `offset`, the way a consumer of the raw buffer would.
fn word_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_ne_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

/// Create a `width` × `height` surface, fill it, and verify every pixel.
fn clear_and_verify(width: i32, height: i32, color: Color) -> Result<Surface<'static>, RenderError> {
    let mut surface = Surface::new(width, height)?;
    surface.fill(color);
    let expected = color.to_pixel();
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            let found = surface.pixel(x, y);
            if found != Some(expected) {
                return Err(RenderError::Mismatch {
                    x,
                    y,
                    found,
                    expected,
                });
            }
        }
    }
    Ok(surface)
}

#[test_log::test]
fn create_from_bitmap() {
    let mut pixels = vec![0u8; 64 * 128 * 4];
    let bitmap = Bitmap::packed(&mut pixels, 64, 128);
    let expected = bitmap.info();

    let surface = Surface::from_bitmap(bitmap).unwrap();
    assert_eq!(surface.bitmap_info(), expected);
}

#[test_log::test]
fn create_from_width_and_height() {
    let surface = Surface::new(64, 128).unwrap();
    let info = surface.bitmap_info();
    assert_eq!(info.width, 64);
    assert_eq!(info.height, 128);
    assert!(!info.is_null());
}

#[test_log::test]
fn clear_own_bitmap() {
    let mut surface = Surface::new(32, 32).unwrap();
    surface.fill(Color::new(1.0, 1.0, 1.0, 1.0));

    let info = surface.bitmap_info();
    assert_eq!((info.width, info.height), (32, 32));

    let bytes = surface.as_bytes();
    for j in 0..32 {
        for i in 0..32 {
            assert_eq!(word_at(bytes, (j * 32 + i) * 4), 0xFFFF_FFFF);
        }
    }
}

#[test_log::test]
fn clear_foreign_bitmap() {
    let mut pixels = vec![0u8; 64 * 128 * 4];
    let mut surface = Surface::from_bitmap(Bitmap::packed(&mut pixels, 64, 128)).unwrap();
    surface.fill(Color::WHITE);
    drop(surface);

    for j in 0..128 {
        for i in 0..64 {
            assert_eq!(word_at(&pixels, (j * 64 + i) * 4), 0xFFFF_FFFF);
        }
    }
}

#[test_log::test]
fn clear_bitmap_with_slop() {
    let (width, height) = (640, 12);
    let row_bytes = width * 4 + 16;
    let mut pixels = vec![0u8; row_bytes * height];
    let mut surface = Surface::from_bitmap(Bitmap::new(
        &mut pixels,
        width as i32,
        height as i32,
        row_bytes as i32,
    ))
    .unwrap();
    surface.fill(Color::WHITE);
    drop(surface);

    for j in 0..height {
        for i in 0..width {
            assert_eq!(word_at(&pixels, j * row_bytes + i * 4), 0xFFFF_FFFF);
        }
        let slop = &pixels[j * row_bytes + width * 4..(j + 1) * row_bytes];
        assert!(slop.iter().all(|&b| b == 0), "row {j} padding was written");
    }
}

#[test_log::test]
fn clear_bitmap_with_barely_white() {
    let v = 0.999_999_9;
    let surface = clear_and_verify(1423, 3, Color::new(v, v, v, v)).unwrap();
    assert_eq!((surface.width(), surface.height()), (1423, 3));
    assert!(surface.to_imgvec().buf().iter().all(|&p| p == Pixel::WHITE));
}

#[test_log::test]
fn clear_bitmap_with_alpha() {
    let surface = clear_and_verify(2, 123, Color::new(0.5, 1.0, 0.0, 0.5)).unwrap();
    let bytes = surface.as_bytes();
    for j in 0..123 {
        for i in 0..2 {
            assert_eq!(word_at(bytes, (j * 2 + i) * 4), 0x8080_0040);
        }
    }
}

#[test_log::test]
fn invalid_inputs() {
    let (iw, vw) = (-3, 3);
    let (ih, vh) = (-6, 6);

    for (w, h) in [(iw, vh), (0, vh), (vw, ih), (vw, 0), (iw, ih), (0, 0)] {
        assert!(Surface::new(w, h).is_err(), "{w}x{h} should fail");

        let mut pixels = vec![0u8; 64];
        let bitmap = Bitmap::new(&mut pixels, w, h, 16);
        assert!(Surface::from_bitmap(bitmap).is_err(), "{w}x{h} bitmap should fail");
    }

    assert_eq!(
        Surface::from_bitmap(Bitmap::default()).unwrap_err(),
        SurfaceError::InvalidBuffer(BufferError::InvalidDimensions)
    );
}

#[test_log::test]
fn persistent_bitmap() {
    let mut surface = Surface::new(2, 123).unwrap();
    let before = surface.bitmap_info();
    surface.fill(Color::WHITE);
    let after = surface.bitmap_info();

    assert_eq!(before, after);
    assert_eq!((after.width, after.height), (2, 123));
    let bytes = surface.as_bytes();
    for j in 0..123 {
        for i in 0..2 {
            assert_eq!(word_at(bytes, (j * 2 + i) * 4), 0xFFFF_FFFF);
        }
    }
}

#[test_log::test]
fn out_of_range_colors() {
    let color = Color::new(4.0, -3.2, -3.2, 4.0);
    let surface = clear_and_verify(2, 123, color).unwrap();
    assert_eq!(surface.pixel(1, 122).map(u32::from), Some(0xFF00_00FF));
}

#[test_log::test]
fn create_from_invalid_bitmap() {
    let (width, height) = (64, 128);
    let mut pixels = vec![0u8; width * height * 4];

    let err = Surface::from_bitmap(Bitmap::new(&mut pixels, 64, 128, 0)).unwrap_err();
    assert_eq!(err, SurfaceError::InvalidBuffer(BufferError::StrideTooSmall));

    let err = Surface::from_bitmap(Bitmap::new(&mut pixels, 64, 128, 64 * 4 + 13)).unwrap_err();
    assert_eq!(
        err,
        SurfaceError::InvalidBuffer(BufferError::MisalignedStride)
    );

    let null = Bitmap {
        width: 64,
        height: 128,
        row_bytes: 64 * 4,
        pixels: None,
    };
    let err = Surface::from_bitmap(null).unwrap_err();
    assert_eq!(err, SurfaceError::InvalidBuffer(BufferError::NullPixels));
}

#[test_log::test]
fn owned_fill_does_not_touch_foreign_memory() {
    let mut memory = vec![0x55u8; 2 * 2 * 4];
    let mut borrowed = Surface::from_bitmap(Bitmap::packed(&mut memory, 2, 2)).unwrap();
    let mut owned = Surface::new(2, 2).unwrap();

    borrowed.fill(Color::BLACK);
    owned.fill(Color::WHITE);
    assert_ne!(owned.bitmap_info().pixels, borrowed.bitmap_info().pixels);
    assert!(owned.to_imgvec().buf().iter().all(|&p| p == Pixel::WHITE));
    drop(owned);
    drop(borrowed);

    let black = Color::BLACK.to_pixel().to_bits();
    for offset in (0..memory.len()).step_by(4) {
        assert_eq!(word_at(&memory, offset), black, "offset {offset}");
    }
}

#[test_log::test]
fn limits_surface_through_caller_error() {
    let limits = SurfaceLimits::none().with_max_width(100);
    let result: Result<Surface<'static>, RenderError> =
        Surface::with_limits(101, 1, &limits).map_err(RenderError::from);
    let err = result.unwrap_err();
    assert!(matches!(
        err,
        RenderError::Surface(SurfaceError::Limit(_))
    ));
    assert_eq!(err.to_string(), "could not create surface");
    assert!(std::error::Error::source(&err).is_some());
}
