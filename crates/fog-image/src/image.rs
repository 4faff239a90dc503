//! [`Image`]: an immutable-header, copy-on-write pixel buffer.
//!
//! `spec.md` §3: attributes are width, height, (signed) stride, pixel
//! format, an optional palette, a reference count, and an adopted flag for
//! non-owning views. Invariants: `|stride| >= width * bytesPerPixel`; pixel
//! rows never overlap; all writes detach the buffer first (COW).

use std::sync::Arc;

use fog_geom::SizeI;

use crate::{FormatDescriptor, ImageError, PixelFormat};

#[derive(Debug)]
struct ImageData {
    width: i32,
    height: i32,
    stride: i32,
    format: PixelFormat,
    palette: Vec<[u8; 4]>,
    bytes: Vec<u8>,
    /// `true` if this buffer was adopted from caller-supplied memory rather
    /// than allocated by Fog. Adopted buffers behave identically under COW
    /// (a write still clones) but are reported distinctly for diagnostics,
    /// matching `spec.md`'s "adopted-flag (non-owning view)".
    adopted: bool,
}

/// A 2D pixel buffer, implicitly shared and copy-on-write.
///
/// Cloning an [`Image`] is O(1) (it bumps a reference count); the first
/// mutating access after a clone detaches the buffer by deep-copying it.
#[derive(Debug, Clone)]
pub struct Image {
    data: Arc<ImageData>,
}

impl Image {
    /// Allocates a new, zero-filled image of the given size and format.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidSize`] if `width` or `height` is
    /// non-positive, or [`ImageError::OutOfMemory`] if the backing buffer
    /// cannot be allocated (`spec.md` §7, error taxonomy item 1).
    pub fn new(width: i32, height: i32, format: PixelFormat) -> Result<Self, ImageError> {
        if width <= 0 || height <= 0 {
            return Err(ImageError::InvalidSize { w: width, h: height });
        }
        let stride = format.min_stride(width) as i32;
        let total = stride as usize * height as usize;
        let bytes = alloc_zeroed(total)?;
        let palette = if format.descriptor().indexed {
            vec![[0, 0, 0, 0]; 256]
        } else {
            Vec::new()
        };
        Ok(Self {
            data: Arc::new(ImageData {
                width,
                height,
                stride,
                format,
                palette,
                bytes,
                adopted: false,
            }),
        })
    }

    /// Wraps caller-supplied pixel bytes as an image, validating stride
    /// against the format's minimum row size.
    ///
    /// The bytes are copied into Fog-owned storage; see `DESIGN.md` for why
    /// this implementation resolves "adopted" views as a copy rather than an
    /// unsafe non-owning borrow.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::StrideTooSmall`] if `|stride|` is smaller than
    /// the format's minimum row size for `width`.
    pub fn adopt(
        width: i32,
        height: i32,
        stride: i32,
        format: PixelFormat,
        bytes: &[u8],
    ) -> Result<Self, ImageError> {
        if width <= 0 || height <= 0 {
            return Err(ImageError::InvalidSize { w: width, h: height });
        }
        let min_stride = format.min_stride(width);
        if (stride.unsigned_abs() as usize) < min_stride {
            return Err(ImageError::StrideTooSmall {
                stride,
                width,
                min_stride,
            });
        }
        Ok(Self {
            data: Arc::new(ImageData {
                width,
                height,
                stride,
                format,
                palette: Vec::new(),
                bytes: bytes.to_vec(),
                adopted: true,
            }),
        })
    }

    /// Image size in pixels.
    #[must_use]
    pub fn size(&self) -> SizeI {
        SizeI::new(self.data.width, self.data.height)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.data.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.data.height
    }

    /// Row stride in bytes. Positive for top-down storage, negative for
    /// bottom-up (see `spec.md` §3).
    #[must_use]
    pub fn stride(&self) -> i32 {
        self.data.stride
    }

    /// Pixel format of this image.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.data.format
    }

    /// Format descriptor, shorthand for `self.format().descriptor()`.
    #[must_use]
    pub fn descriptor(&self) -> FormatDescriptor {
        self.data.format.descriptor()
    }

    /// `true` if this image was adopted from external memory rather than
    /// allocated by Fog.
    #[must_use]
    pub fn is_adopted(&self) -> bool {
        self.data.adopted
    }

    /// Current reference count on the backing buffer. Used by tests and
    /// diagnostics to observe COW detach behavior.
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }

    /// Read-only view of one scanline's bytes.
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds. Callers within the engine always
    /// clip `y` to `[0, height)` before calling this.
    #[must_use]
    pub fn row(&self, y: i32) -> &[u8] {
        let (start, len) = self.row_range(y);
        &self.data.bytes[start..start + len]
    }

    /// Mutable view of one scanline's bytes, detaching the buffer first if
    /// it is shared (the "COW" in copy-on-write).
    ///
    /// # Panics
    ///
    /// Panics if `y` is out of bounds.
    pub fn row_mut(&mut self, y: i32) -> &mut [u8] {
        self.detach();
        let (start, len) = self.row_range(y);
        let data = Arc::get_mut(&mut self.data).expect("just detached, uniquely owned");
        &mut data.bytes[start..start + len]
    }

    /// Returns the byte offset and row length (`= |stride|`) for row `y`.
    fn row_range(&self, y: i32) -> (usize, usize) {
        assert!((0..self.data.height).contains(&y), "row {y} out of bounds");
        let row_len = self.data.stride.unsigned_abs() as usize;
        let start = if self.data.stride >= 0 {
            y as usize * row_len
        } else {
            // Bottom-up storage: row 0 is the last physical row.
            (self.data.height as usize - 1 - y as usize) * row_len
        };
        (start, row_len)
    }

    /// Ensures this image's buffer is not shared with any other [`Image`]
    /// handle, cloning the bytes if it is. A no-op if already unique.
    pub fn detach(&mut self) {
        if Arc::strong_count(&self.data) > 1 {
            self.data = Arc::new((*self.data).clone());
        }
    }

    /// The 256-entry palette for indexed formats, if any.
    #[must_use]
    pub fn palette(&self) -> &[[u8; 4]] {
        &self.data.palette
    }

    /// Replaces the palette on an indexed-format image, detaching first.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidPalette`] if `palette.len() != 256`.
    pub fn set_palette(&mut self, palette: Vec<[u8; 4]>) -> Result<(), ImageError> {
        if !self.descriptor().indexed {
            return Ok(());
        }
        if palette.len() != 256 {
            return Err(ImageError::InvalidPalette { got: palette.len() });
        }
        self.detach();
        Arc::get_mut(&mut self.data)
            .expect("just detached, uniquely owned")
            .palette = palette;
        Ok(())
    }
}

impl Clone for ImageData {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
            palette: self.palette.clone(),
            bytes: self.bytes.clone(),
            adopted: self.adopted,
        }
    }
}

fn alloc_zeroed(bytes: usize) -> Result<Vec<u8>, ImageError> {
    // `Vec` allocation in Rust already aborts the process on OOM rather than
    // returning an error (`handle_alloc_error`); this wrapper exists as the
    // single seam the engine's error taxonomy (`spec.md` §7 item 1) flows
    // through, and as a home for a future fallible-allocation path if one is
    // ever wired up via `try_reserve`.
    let mut v = Vec::new();
    v.try_reserve_exact(bytes)
        .map_err(|_| ImageError::OutOfMemory { bytes })?;
    v.resize(bytes, 0);
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_zero_filled() {
        let img = Image::new(4, 4, PixelFormat::Prgb32).unwrap();
        assert!(img.row(0).iter().all(|&b| b == 0));
    }

    #[test]
    fn clone_then_write_detaches() {
        let mut a = Image::new(2, 2, PixelFormat::Prgb32).unwrap();
        let b = a.clone();
        assert_eq!(a.strong_count(), 2);
        a.row_mut(0)[0] = 0xFF;
        assert_eq!(a.strong_count(), 1);
        assert_eq!(b.strong_count(), 1);
        assert_eq!(b.row(0)[0], 0);
        assert_eq!(a.row(0)[0], 0xFF);
    }

    #[test]
    fn negative_stride_reads_bottom_up() {
        let format = PixelFormat::A8;
        let stride = -2;
        let bytes = [1u8, 1, 2, 2]; // row for y=1 (bottom, physical first), then y=0
        let img = Image::adopt(2, 2, stride, format, &bytes).unwrap();
        assert_eq!(img.row(0), &[2, 2]);
        assert_eq!(img.row(1), &[1, 1]);
    }

    #[test]
    fn stride_too_small_is_rejected() {
        let err = Image::adopt(10, 1, 4, PixelFormat::Prgb32, &[0; 4]).unwrap_err();
        assert!(matches!(err, ImageError::StrideTooSmall { .. }));
    }
}
