//! Pixel format descriptor table (`spec.md` §3, §6).
//!
//! [`PixelFormat`] is a fixed enum; [`PixelFormat::descriptor`] maps each
//! variant to an immutable [`FormatDescriptor`] selected once per image and
//! never mutated afterward.

/// One of the pixel formats the engine can target or source from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    /// 32bpp, straight (non-premultiplied) alpha.
    Argb32,
    /// 32bpp, premultiplied alpha. The engine's internal working format.
    Prgb32,
    /// 32bpp, no alpha channel (high byte ignored).
    Xrgb32,
    /// 24bpp, no alpha channel.
    Rgb24,
    /// 8bpp, alpha-only.
    A8,
    /// 8bpp, index into a 256-entry palette.
    I8,
    /// 1bpp, MSB-first alpha mask.
    A1,
}

/// Immutable, per-format metadata: bit depth, premultiplied/indexed flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// Pixel format this descriptor belongs to.
    pub format: PixelFormat,
    /// Bits occupied by one pixel (not necessarily byte-aligned for `A1`).
    pub bits_per_pixel: u8,
    /// `true` if color channels are already multiplied by alpha.
    pub premultiplied: bool,
    /// `true` if pixel values are indices into a palette rather than color.
    pub indexed: bool,
    /// `true` if the format carries a meaningful alpha channel at all.
    pub has_alpha: bool,
}

impl PixelFormat {
    /// Returns the immutable descriptor for this format.
    #[must_use]
    pub const fn descriptor(self) -> FormatDescriptor {
        match self {
            Self::Argb32 => FormatDescriptor {
                format: self,
                bits_per_pixel: 32,
                premultiplied: false,
                indexed: false,
                has_alpha: true,
            },
            Self::Prgb32 => FormatDescriptor {
                format: self,
                bits_per_pixel: 32,
                premultiplied: true,
                indexed: false,
                has_alpha: true,
            },
            Self::Xrgb32 => FormatDescriptor {
                format: self,
                bits_per_pixel: 32,
                premultiplied: false,
                indexed: false,
                has_alpha: false,
            },
            Self::Rgb24 => FormatDescriptor {
                format: self,
                bits_per_pixel: 24,
                premultiplied: false,
                indexed: false,
                has_alpha: false,
            },
            Self::A8 => FormatDescriptor {
                format: self,
                bits_per_pixel: 8,
                premultiplied: false,
                indexed: false,
                has_alpha: true,
            },
            Self::I8 => FormatDescriptor {
                format: self,
                bits_per_pixel: 8,
                premultiplied: false,
                indexed: true,
                has_alpha: false,
            },
            Self::A1 => FormatDescriptor {
                format: self,
                bits_per_pixel: 1,
                premultiplied: false,
                indexed: false,
                has_alpha: true,
            },
        }
    }

    /// Minimum stride (in bytes) for an image of the given width, i.e.
    /// `width * bytesPerPixel` rounded up for sub-byte formats.
    #[must_use]
    pub fn min_stride(self, width: i32) -> usize {
        let bits = self.descriptor().bits_per_pixel as usize;
        let width = width.max(0) as usize;
        (width * bits).div_ceil(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prgb32_is_premultiplied_argb32_is_not() {
        assert!(PixelFormat::Prgb32.descriptor().premultiplied);
        assert!(!PixelFormat::Argb32.descriptor().premultiplied);
    }

    #[test]
    fn a1_min_stride_rounds_up() {
        assert_eq!(PixelFormat::A1.min_stride(9), 2);
        assert_eq!(PixelFormat::A1.min_stride(8), 1);
    }
}
