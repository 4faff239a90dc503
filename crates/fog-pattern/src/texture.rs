//! The image texture fetcher (`spec.md` §4.4): simple/affine/projective
//! sampling with spread and quality.

use fog_geom::{PointD, Transform, TransformType};
use fog_image::Image;

use crate::color::Color;
use crate::error::PatternError;
use crate::spread::Spread;

/// Sampling quality for a [`Texture`] fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureQuality {
    /// Nearest source pixel.
    Nearest,
    /// Bilinear interpolation of the four nearest source pixels.
    Bilinear,
}

/// An image sampled as a pattern source.
#[derive(Debug, Clone)]
pub struct Texture {
    pub image: Image,
    pub spread: Spread,
    pub quality: TextureQuality,
    /// Maps device space into the image's own pixel space.
    pub transform: Transform,
}

impl Texture {
    #[must_use]
    pub fn new(image: Image, spread: Spread, quality: TextureQuality, transform: Transform) -> Self {
        Self { image, spread, quality, transform }
    }

    /// Fetches `len` consecutive device pixels starting at `(x, y)`.
    ///
    /// Dispatches on the transform's classified type (`spec.md` §4.1/§4.4):
    /// a pure translation takes the simple row-wrap path; anything else
    /// goes through the general per-pixel inverse-map path (which also
    /// handles the projective case, since [`Transform::transform_point`]
    /// performs the homogeneous divide whenever the transform is
    /// projective).
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NotInvertible`] if `self.transform` has no
    /// inverse.
    pub fn fetch(&self, x: i32, y: i32, len: usize, out: &mut [u32]) -> Result<(), PatternError> {
        debug_assert!(out.len() >= len);
        let inv = self.transform.invert().map_err(|_| PatternError::NotInvertible)?;

        if self.transform.kind() <= TransformType::Translate {
            self.fetch_simple(x, y, &inv, len, out);
            return Ok(());
        }

        for i in 0..len {
            let device = PointD::new(f64::from(x) + i as f64 + 0.5, f64::from(y) + 0.5);
            let local = inv.transform_point(device);
            out[i] = self.sample(local.x - 0.5, local.y - 0.5).to_u32();
        }
        Ok(())
    }

    fn fetch_simple(&self, x: i32, y: i32, inv: &Transform, len: usize, out: &mut [u32]) {
        let origin = inv.transform_point(PointD::new(f64::from(x) + 0.5, f64::from(y) + 0.5));
        for i in 0..len {
            out[i] = self.sample(origin.x - 0.5 + i as f64, origin.y - 0.5).to_u32();
        }
    }

    fn sample(&self, u: f64, v: f64) -> Color {
        match self.quality {
            TextureQuality::Nearest => self.sample_nearest(u, v),
            TextureQuality::Bilinear => self.sample_bilinear(u, v),
        }
    }

    fn sample_nearest(&self, u: f64, v: f64) -> Color {
        let (w, h) = (self.image.width(), self.image.height());
        match (wrap(u + 0.5, w, self.spread), wrap(v + 0.5, h, self.spread)) {
            (Some(px), Some(py)) => self.read_pixel(px.floor() as i32, py.floor() as i32),
            _ => Color::TRANSPARENT,
        }
    }

    fn sample_bilinear(&self, u: f64, v: f64) -> Color {
        let (w, h) = (self.image.width(), self.image.height());
        let Some(wx) = wrap(u, w, self.spread) else { return Color::TRANSPARENT };
        let Some(wy) = wrap(v, h, self.spread) else { return Color::TRANSPARENT };

        let x0 = wx.floor();
        let y0 = wy.floor();
        let fx = wx - x0;
        let fy = wy - y0;

        let sample_at = |dx: f64, dy: f64| -> Color {
            match (wrap(x0 + dx, w, self.spread), wrap(y0 + dy, h, self.spread)) {
                (Some(px), Some(py)) => self.read_pixel(px.floor() as i32, py.floor() as i32),
                _ => Color::TRANSPARENT,
            }
        };

        let c00 = sample_at(0.0, 0.0);
        let c10 = sample_at(1.0, 0.0);
        let c01 = sample_at(0.0, 1.0);
        let c11 = sample_at(1.0, 1.0);

        let top = c00.lerp(c10, fx);
        let bottom = c01.lerp(c11, fx);
        top.lerp(bottom, fy)
    }

    fn read_pixel(&self, x: i32, y: i32) -> Color {
        let (w, h) = (self.image.width(), self.image.height());
        if x < 0 || y < 0 || x >= w || y >= h {
            return Color::TRANSPARENT;
        }
        let row = self.image.row(y);
        let offset = (x as usize) * 4;
        Color::from_u32(u32::from_le_bytes([row[offset], row[offset + 1], row[offset + 2], row[offset + 3]]))
    }
}

/// Maps a texture-pixel-space coordinate through `spread`, returning the
/// wrapped coordinate still in pixel units, or `None` under
/// [`Spread::None`] when outside `[0, size)`.
fn wrap(v: f64, size: i32, spread: Spread) -> Option<f64> {
    if size <= 0 {
        return None;
    }
    let t = v / f64::from(size);
    spread.apply(t).map(|t| t * f64::from(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fog_image::PixelFormat;

    fn checker_image() -> Image {
        let mut img = Image::new(2, 2, PixelFormat::Prgb32).unwrap();
        {
            let row0 = img.row_mut(0);
            row0[0..4].copy_from_slice(&Color::from_premultiplied(255, 255, 0, 0).to_u32().to_le_bytes());
            row0[4..8].copy_from_slice(&Color::from_premultiplied(255, 0, 255, 0).to_u32().to_le_bytes());
        }
        {
            let row1 = img.row_mut(1);
            row1[0..4].copy_from_slice(&Color::from_premultiplied(255, 0, 0, 255).to_u32().to_le_bytes());
            row1[4..8].copy_from_slice(&Color::from_premultiplied(255, 255, 255, 255).to_u32().to_le_bytes());
        }
        img
    }

    #[test]
    fn nearest_sample_reads_exact_pixel() {
        let tex = Texture::new(checker_image(), Spread::Pad, TextureQuality::Nearest, Transform::identity());
        let mut out = [0u32; 1];
        tex.fetch(0, 0, 1, &mut out).unwrap();
        assert_eq!(Color::from_u32(out[0]).r, 255);
    }

    #[test]
    fn pad_spread_clamps_beyond_edges() {
        let tex = Texture::new(checker_image(), Spread::Pad, TextureQuality::Nearest, Transform::identity());
        let mut out = [0u32; 1];
        tex.fetch(-10, -10, 1, &mut out).unwrap();
        assert_eq!(Color::from_u32(out[0]).r, 255); // clamps to pixel (0,0)
    }

    #[test]
    fn translate_only_transform_uses_simple_path() {
        let tex = Texture::new(
            checker_image(),
            Spread::Repeat,
            TextureQuality::Nearest,
            Transform::translation(1.0, 0.0),
        );
        assert!(tex.transform.kind() <= TransformType::Translate);
    }
}
