//! Shared command execution: both [`crate::serializer::StSerializer`] and
//! [`crate::serializer::MtSerializer`] call [`execute`] for every command
//! in their queue, differing only in how many [`WorkerContext`]s run it
//! and over which [`Band`]. Keeping this logic in one place is what makes
//! `spec.md` §8's "ST and MT produce pixel-identical output" achievable —
//! there is only one rasterize-fetch-composite path to keep identical.

use fog_geom::{BoxI, Region};
use fog_image::Image;
use fog_raster::{RasterSpan, Scanline};

use crate::command::Command;
use crate::error::EngineError;
use crate::worker::{Band, WorkerContext};

/// Intersects a raster span `[x0, x1)` against an optional clip region's
/// row spans, yielding the sub-intervals actually visible.
fn clipped_ranges(x0: i32, x1: i32, clip: Option<&Region>, y: i32) -> Vec<(i32, i32)> {
    let Some(clip) = clip else {
        return vec![(x0, x1)];
    };
    clip.row_spans(y)
        .filter_map(|(cx0, cx1)| {
            let lo = x0.max(cx0);
            let hi = x1.min(cx1);
            (lo < hi).then_some((lo, hi))
        })
        .collect()
}

fn fetch_row(source: &fog_pattern::Pattern, x0: i32, y: i32, len: usize) -> Result<Vec<u32>, EngineError> {
    let mut out = vec![0u32; len];
    source.fetch(x0, y, len, &mut out)?;
    Ok(out)
}

fn composite_scanline(
    target: &mut Image,
    y: i32,
    spans: &[RasterSpan],
    clip: Option<&Region>,
    source: &fog_pattern::Pattern,
    operator: fog_compose::Operator,
    opacity: u8,
    worker: &mut WorkerContext,
) -> Result<(), EngineError> {
    let format = target.format();
    let row = target.row_mut(y);
    for span in spans {
        if span.is_empty() {
            continue;
        }
        for (lo, hi) in clipped_ranges(span.x0, span.x1, clip, y) {
            let len = (hi - lo) as usize;
            let words = fetch_row(source, lo, y, len)?;
            let pixels: Vec<fog_compose::Pixel> = words.iter().map(|&w| fog_compose::Pixel::from_u32(w)).collect();
            let mask = worker.scratch_row(len);
            for (i, m) in mask.iter_mut().enumerate() {
                *m = span.coverage.at((lo - span.x0) as usize + i);
            }
            let bytes_per_pixel = (format.descriptor().bits_per_pixel as usize).div_ceil(8);
            let row_slice = &mut row[(lo as usize) * bytes_per_pixel..(hi as usize) * bytes_per_pixel];
            fog_compose::composite_span(
                operator,
                format,
                row_slice,
                len,
                fog_compose::SpanCoverage::Mask(mask),
                |i| fog_compose::apply_coverage(pixels[i], opacity),
            );
        }
    }
    Ok(())
}

/// Executes `command` against `target`, restricted to the rows `worker`'s
/// `band` owns. Commands entirely outside the band are skipped cheaply via
/// [`Command::bbox`]/[`Band::intersects`] (`spec.md` §4.7 step 5).
pub fn execute(command: &Command, target: &mut Image, worker: &mut WorkerContext) -> Result<(), EngineError> {
    if let Some(bbox) = command.bbox() {
        if !worker.band.intersects(bbox) {
            return Ok(());
        }
    }

    match command {
        Command::Fill { flat, fill_rule, clip, source, operator, opacity, bbox } => {
            let rasterizer = worker.rasterizer(*bbox, *fill_rule);
            let scanlines: Vec<Scanline> = rasterizer.rasterize(flat)?;
            for scanline in scanlines {
                if !worker.band.owns_row(scanline.y) {
                    continue;
                }
                composite_scanline(target, scanline.y, &scanline.spans, clip.as_deref(), source, *operator, *opacity, worker)?;
            }
            Ok(())
        }
        Command::FillRegion { region, source, operator, opacity } => {
            let bbox = region.bounding_box();
            for y in bbox.y0..bbox.y1 {
                if !worker.band.owns_row(y) {
                    continue;
                }
                let spans: Vec<RasterSpan> = region
                    .row_spans(y)
                    .map(|(x0, x1)| RasterSpan { x0, x1, coverage: fog_raster::Coverage::Constant(fog_raster::FULL_COVERAGE) })
                    .collect();
                composite_scanline(target, y, &spans, None, source, *operator, *opacity, worker)?;
            }
            Ok(())
        }
        Command::FillAll { clip, source, operator, opacity } => {
            let (w, h) = (target.width(), target.height());
            for y in 0..h {
                if !worker.band.owns_row(y) {
                    continue;
                }
                let span = RasterSpan { x0: 0, x1: w, coverage: fog_raster::Coverage::Constant(fog_raster::FULL_COVERAGE) };
                composite_scanline(target, y, std::slice::from_ref(&span), clip.as_deref(), source, *operator, *opacity, worker)?;
            }
            Ok(())
        }
        Command::DrawImage { image, dst, clip, operator, opacity } => {
            for y in dst.y0..dst.y1 {
                if !worker.band.owns_row(y) {
                    continue;
                }
                let src_y = (y - dst.y0).clamp(0, image.height() - 1);
                let src_row = image.row(src_y);
                let bpp = (image.descriptor().bits_per_pixel as usize).div_ceil(8);
                let words: Vec<u32> = (0..dst.width() as usize)
                    .map(|i| {
                        let sx = (i * image.width() as usize / dst.width().max(1) as usize).min(image.width() as usize - 1);
                        let b = &src_row[sx * bpp..sx * bpp + bpp];
                        u32::from(b[3]) << 24 | u32::from(b[2]) << 16 | u32::from(b[1]) << 8 | u32::from(b[0])
                    })
                    .collect();
                let pixels: Vec<fog_compose::Pixel> = words.iter().map(|&w| fog_compose::Pixel::from_u32(w)).collect();
                let span = RasterSpan { x0: dst.x0, x1: dst.x1, coverage: fog_raster::Coverage::Constant(fog_raster::FULL_COVERAGE) };
                for (lo, hi) in clipped_ranges(span.x0, span.x1, clip.as_deref(), y) {
                    let format = target.format();
                    let bpp_dst = (format.descriptor().bits_per_pixel as usize).div_ceil(8);
                    let row = target.row_mut(y);
                    let row_slice = &mut row[(lo as usize) * bpp_dst..(hi as usize) * bpp_dst];
                    let offset = (lo - dst.x0) as usize;
                    fog_compose::composite_span(
                        *operator,
                        format,
                        row_slice,
                        (hi - lo) as usize,
                        fog_compose::SpanCoverage::Constant(*opacity),
                        |i| pixels[offset + i],
                    );
                }
            }
            Ok(())
        }
        Command::Group { bounds, buffer, opacity } => {
            for y in bounds.y0..bounds.y1 {
                if !worker.band.owns_row(y) {
                    continue;
                }
                let src_y = y - bounds.y0;
                let bpp = (buffer.descriptor().bits_per_pixel as usize).div_ceil(8);
                let words: Vec<u32> = buffer
                    .row(src_y)
                    .chunks_exact(bpp)
                    .map(|b| u32::from(b[3]) << 24 | u32::from(b[2]) << 16 | u32::from(b[1]) << 8 | u32::from(b[0]))
                    .collect();
                let pixels: Vec<fog_compose::Pixel> = words.iter().map(|&w| fog_compose::Pixel::from_u32(w)).collect();
                let span = RasterSpan { x0: bounds.x0, x1: bounds.x1, coverage: fog_raster::Coverage::Constant(fog_raster::FULL_COVERAGE) };
                let format = target.format();
                let bpp_dst = (format.descriptor().bits_per_pixel as usize).div_ceil(8);
                let row = target.row_mut(y);
                let row_slice = &mut row[(span.x0 as usize) * bpp_dst..(span.x1 as usize) * bpp_dst];
                fog_compose::composite_span(
                    fog_compose::Operator::SrcOver,
                    format,
                    row_slice,
                    span.len(),
                    fog_compose::SpanCoverage::Constant(*opacity),
                    |i| pixels[i],
                );
            }
            Ok(())
        }
        Command::Barrier => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fog_geom::PointD;
    use fog_image::PixelFormat;
    use fog_path::{flatten, FlattenOptions, Path};
    use fog_pattern::{Color, Pattern, Solid};
    use fog_raster::Precision;

    #[test]
    fn fill_rect_paints_inside_and_leaves_outside_untouched() {
        let mut path = Path::new();
        path.move_to(PointD::new(2.0, 2.0));
        path.line_to(PointD::new(6.0, 2.0)).unwrap();
        path.line_to(PointD::new(6.0, 6.0)).unwrap();
        path.line_to(PointD::new(2.0, 6.0)).unwrap();
        path.close().unwrap();
        let flat = Arc::new(flatten(&path, &FlattenOptions::default()));
        let command = Command::Fill {
            flat,
            fill_rule: fog_raster::FillRule::NonZero,
            clip: None,
            source: Arc::new(Pattern::Solid(Solid::new(Color::from_straight(255, 10, 20, 30)))),
            operator: fog_compose::Operator::SrcOver,
            opacity: 255,
            bbox: BoxI::new(0, 0, 8, 8),
        };
        let mut img = Image::new(8, 8, PixelFormat::Prgb32).unwrap();
        let mut worker = WorkerContext::new(Band { offset: 0, delta: 1 }, Precision::Precision24x8);
        execute(&command, &mut img, &mut worker).unwrap();
        assert_ne!(img.row(3), vec![0u8; 32]);
        assert_eq!(img.row(0), vec![0u8; 32]);
    }
}
