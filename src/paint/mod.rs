// RasterView -- Display compositing and viewport transform core for tiled raster images
//
// Copyright (c) 2024-2025 Martin van der Werff <github (at) newinnovations.nl>
//
// This file is part of RasterView.
//
// RasterView is free software: you can redistribute it and/or modify it under the terms of
// the GNU Affero General Public License as published by the Free Software Foundation, either
// version 3 of the License, or (at your option) any later version.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS" AND ANY EXPRESS OR
// IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND
// FITNESS FOR A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR ANY
// DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
// LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR
// BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT,
// STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! The repaint driver: turns drained damage into bounded-size blit calls.
//!
//! Each dirty image rectangle is transformed with the viewport as it exists
//! at flush time, grown by one screen pixel so fractional scale factors
//! cannot leave seams between neighbouring exposes, clipped to the display,
//! and walked in fixed-size chunks. Pixel data comes from the external
//! [`PixelSource`] at a mip level matched to the current scale; finished
//! chunks go out through the [`PaintSink`].

use log::warn;

use crate::{
    error::{ViewError, ViewResult},
    rect::{RectI, SizeI},
    viewport::Viewport,
};

/// Pixel data currency of the paint path
pub type PixelBuffer = image::RgbaImage;

/// Default edge length of a paint chunk in screen pixels
const PAINT_CHUNK_SIZE: i32 = 256;

/// The external image projection the viewport reads from.
///
/// `get_pixels` takes a rectangle in full-resolution image coordinates and
/// a mip level; the returned buffer holds that area downsampled by
/// `2^level`, so a zoomed-out view never forces full-resolution decodes.
pub trait PixelSource {
    fn image_size(&self) -> SizeI;

    /// Image resolution in dots per inch, (x, y)
    fn resolution(&self) -> (f64, f64);

    /// Highest mip level this source can serve. Level 0 (full resolution)
    /// is always available.
    fn max_level(&self) -> u32 {
        0
    }

    fn get_pixels(&self, rect: RectI, level: u32) -> ViewResult<PixelBuffer>;
}

/// One bounded-size paint command.
#[derive(Debug, Clone)]
pub struct PaintOp {
    /// Destination in screen coordinates
    pub screen_rect: RectI,
    /// Source area in full-resolution image coordinates
    pub image_rect: RectI,
    /// Mip level the pixel buffer was fetched at
    pub level: u32,
    pub pixels: PixelBuffer,
    /// True when this chunk lies outside the active highlight and must be
    /// painted dimmed
    pub dimmed: bool,
}

/// Receives the paint commands; the display surface behind the viewport.
pub trait PaintSink {
    fn blit(&mut self, op: PaintOp);
}

/// Picks the mip level whose resolution best matches a screen scale.
/// At or above 1:1 only full resolution will do; below that, each halving
/// of the scale steps one level down, capped by what the source offers.
pub fn mip_level_for_scale(scale: f64, max_level: u32) -> u32 {
    if scale >= 1.0 {
        0
    } else {
        let level = ((1.0 / scale).log2() + 1.0e-9).floor() as u32;
        level.min(max_level)
    }
}

#[derive(Debug, Clone)]
pub struct RepaintDriver {
    chunk_width: i32,
    chunk_height: i32,
}

impl Default for RepaintDriver {
    fn default() -> Self {
        Self {
            chunk_width: PAINT_CHUNK_SIZE,
            chunk_height: PAINT_CHUNK_SIZE,
        }
    }
}

impl RepaintDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chunk_size(width: i32, height: i32) -> Self {
        Self {
            chunk_width: width.max(1),
            chunk_height: height.max(1),
        }
    }

    /// Paints a list of image-space dirty rectangles.
    ///
    /// A failing pixel fetch does not abort the walk: remaining chunks still
    /// paint, and the first error is returned at the end so the caller can
    /// substitute a placeholder for what is missing.
    pub fn paint(
        &self,
        viewport: &Viewport,
        damage: &[RectI],
        highlight: Option<RectI>,
        source: &dyn PixelSource,
        sink: &mut dyn PaintSink,
    ) -> ViewResult<()> {
        let display = viewport.display_rect();
        if display.is_empty() {
            return Ok(());
        }
        let bounds = viewport.image_bounds();
        let level = mip_level_for_scale(
            viewport.scale_x().max(viewport.scale_y()),
            source.max_level(),
        );

        let mut first_error: Option<ViewError> = None;
        for dirty in damage {
            let dirty = dirty.clamp_to(&bounds);
            if dirty.is_empty() {
                continue;
            }
            for (part, dimmed) in split_by_highlight(dirty, highlight) {
                self.paint_part(viewport, part, dimmed, level, source, sink, &mut first_error);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_part(
        &self,
        viewport: &Viewport,
        part: RectI,
        dimmed: bool,
        level: u32,
        source: &dyn PixelSource,
        sink: &mut dyn PaintSink,
        first_error: &mut Option<ViewError>,
    ) {
        let display = viewport.display_rect();
        let bounds = viewport.image_bounds();

        // One extra pixel on every side: fractional scales round the expose
        // boundary differently on both sides of a tile border
        let screen = viewport.transform_rect(&part).grow(1).clamp_to(&display);
        if screen.is_empty() {
            return;
        }

        let mut y = screen.y0;
        while y < screen.y1 {
            let mut x = screen.x0;
            while x < screen.x1 {
                let chunk = RectI::new(
                    x,
                    y,
                    (x + self.chunk_width).min(screen.x1),
                    (y + self.chunk_height).min(screen.y1),
                );
                let image_rect = viewport.untransform_rect(&chunk).clamp_to(&bounds);
                if !image_rect.is_empty() {
                    match source.get_pixels(image_rect, level) {
                        Ok(pixels) => sink.blit(PaintOp {
                            screen_rect: chunk,
                            image_rect,
                            level,
                            pixels,
                            dimmed,
                        }),
                        Err(e) => {
                            warn!("pixel fetch failed for chunk {chunk:?}: {e}");
                            if first_error.is_none() {
                                *first_error = Some(e);
                            }
                        }
                    }
                }
                x += self.chunk_width;
            }
            y += self.chunk_height;
        }
    }
}

/// Splits a dirty rectangle against the highlight: the part inside paints
/// normally, the parts outside paint dimmed. Without a highlight nothing is
/// dimmed.
fn split_by_highlight(dirty: RectI, highlight: Option<RectI>) -> Vec<(RectI, bool)> {
    match highlight {
        None => vec![(dirty, false)],
        Some(h) => {
            let mut parts = Vec::with_capacity(5);
            let inside = dirty.intersect(&h);
            if !inside.is_empty() {
                parts.push((inside, false));
            }
            for outside in dirty.subtract(&h) {
                parts.push((outside, true));
            }
            parts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::zoom::ZoomFactor;

    /// Source producing correctly-sized empty buffers, optionally failing
    /// for rectangles left of a threshold.
    struct TestSource {
        size: SizeI,
        max_level: u32,
        fail_left_of: Option<i32>,
    }

    impl TestSource {
        fn new(width: i32, height: i32) -> Self {
            Self {
                size: SizeI::new(width, height),
                max_level: 4,
                fail_left_of: None,
            }
        }
    }

    impl PixelSource for TestSource {
        fn image_size(&self) -> SizeI {
            self.size
        }

        fn resolution(&self) -> (f64, f64) {
            (96.0, 96.0)
        }

        fn max_level(&self) -> u32 {
            self.max_level
        }

        fn get_pixels(&self, rect: RectI, level: u32) -> ViewResult<PixelBuffer> {
            if let Some(threshold) = self.fail_left_of {
                if rect.x0 < threshold {
                    return Err(ViewError::PixelFetch {
                        rect,
                        level,
                        reason: "synthetic failure".into(),
                    });
                }
            }
            let shift = 1 << level;
            let width = (rect.width() + shift - 1) / shift;
            let height = (rect.height() + shift - 1) / shift;
            Ok(PixelBuffer::new(width as u32, height as u32))
        }
    }

    #[derive(Default)]
    struct RecordSink {
        ops: Vec<PaintOp>,
    }

    impl PaintSink for RecordSink {
        fn blit(&mut self, op: PaintOp) {
            self.ops.push(op);
        }
    }

    fn test_viewport(image: (i32, i32), display: (i32, i32), zoom: (u32, u32)) -> Viewport {
        let mut viewport = Viewport::new(SizeI::new(image.0, image.1), (96.0, 96.0));
        viewport.set_display_size(display.0, display.1);
        viewport.set_zoom(ZoomFactor::new(zoom.0, zoom.1));
        viewport
    }

    #[test]
    fn test_mip_level_for_scale() {
        assert_eq!(mip_level_for_scale(2.0, 4), 0);
        assert_eq!(mip_level_for_scale(1.0, 4), 0);
        assert_eq!(mip_level_for_scale(0.5, 4), 1);
        assert_eq!(mip_level_for_scale(0.4, 4), 1);
        assert_eq!(mip_level_for_scale(0.25, 4), 2);
        assert_eq!(mip_level_for_scale(1.0 / 16.0, 4), 4);
        // Capped by what the source offers
        assert_eq!(mip_level_for_scale(1.0 / 16.0, 2), 2);
    }

    #[test]
    fn test_chunks_are_bounded_and_clipped() {
        let viewport = test_viewport((1000, 800), (500, 500), (1, 1));
        let source = TestSource::new(1000, 800);
        let mut sink = RecordSink::default();
        let driver = RepaintDriver::new();

        driver
            .paint(
                &viewport,
                &[RectI::new(0, 0, 1000, 800)],
                None,
                &source,
                &mut sink,
            )
            .unwrap();

        // 500x500 visible at 256px chunks: a 2x2 grid
        assert_eq!(sink.ops.len(), 4);
        let display = viewport.display_rect();
        for op in &sink.ops {
            assert!(op.screen_rect.width() <= 256);
            assert!(op.screen_rect.height() <= 256);
            assert_eq!(op.screen_rect.clamp_to(&display), op.screen_rect);
            assert_eq!(
                op.image_rect.clamp_to(&viewport.image_bounds()),
                op.image_rect
            );
        }
    }

    #[test]
    fn test_no_dirty_pixel_dropped() {
        let viewport = test_viewport((1000, 800), (500, 500), (1, 3));
        let source = TestSource::new(1000, 800);
        let mut sink = RecordSink::default();
        let driver = RepaintDriver::new();

        let dirty = RectI::new(10, 20, 700, 600);
        driver.paint(&viewport, &[dirty], None, &source, &mut sink).unwrap();

        // The union of fetched image rects covers the visible dirty area
        let covered = sink
            .ops
            .iter()
            .fold(RectI::default(), |acc, op| acc.union(&op.image_rect));
        let visible = viewport
            .untransform_rect(&viewport.display_rect())
            .clamp_to(&viewport.image_bounds());
        let expected = dirty.intersect(&visible);
        assert_eq!(covered.intersect(&expected), expected);
    }

    #[test]
    fn test_level_matches_scale() {
        let viewport = test_viewport((1000, 800), (500, 500), (1, 4));
        let source = TestSource::new(1000, 800);
        let mut sink = RecordSink::default();
        let driver = RepaintDriver::new();

        driver
            .paint(
                &viewport,
                &[RectI::new(0, 0, 1000, 800)],
                None,
                &source,
                &mut sink,
            )
            .unwrap();

        assert!(!sink.ops.is_empty());
        for op in &sink.ops {
            assert_eq!(op.level, 2);
        }
    }

    #[test]
    fn test_empty_damage_paints_nothing() {
        let viewport = test_viewport((1000, 800), (500, 500), (1, 1));
        let source = TestSource::new(1000, 800);
        let mut sink = RecordSink::default();
        RepaintDriver::new()
            .paint(&viewport, &[], None, &source, &mut sink)
            .unwrap();
        assert!(sink.ops.is_empty());

        // Off-screen damage paints nothing either
        RepaintDriver::new()
            .paint(
                &viewport,
                &[RectI::new(900, 700, 1000, 800)],
                None,
                &source,
                &mut sink,
            )
            .unwrap();
        assert!(sink.ops.is_empty());
    }

    #[test]
    fn test_fetch_failure_keeps_painting_and_surfaces_error() {
        let viewport = test_viewport((1000, 800), (500, 500), (1, 1));
        let mut source = TestSource::new(1000, 800);
        source.fail_left_of = Some(250);
        let mut sink = RecordSink::default();

        let result = RepaintDriver::new().paint(
            &viewport,
            &[RectI::new(0, 0, 1000, 800)],
            None,
            &source,
            &mut sink,
        );

        // The right half painted, the failure surfaced
        assert!(matches!(result, Err(ViewError::PixelFetch { .. })));
        assert!(!sink.ops.is_empty());
        for op in &sink.ops {
            assert!(op.image_rect.x0 >= 250);
        }
    }

    #[test]
    fn test_highlight_dims_outside_only() {
        let viewport = test_viewport((1000, 800), (500, 500), (1, 1));
        let source = TestSource::new(1000, 800);
        let mut sink = RecordSink::default();
        let highlight = RectI::new(100, 100, 300, 300);

        RepaintDriver::new()
            .paint(
                &viewport,
                &[RectI::new(0, 0, 500, 500)],
                Some(highlight),
                &source,
                &mut sink,
            )
            .unwrap();

        let dimmed: Vec<_> = sink.ops.iter().filter(|op| op.dimmed).collect();
        let lit: Vec<_> = sink.ops.iter().filter(|op| !op.dimmed).collect();
        assert!(!dimmed.is_empty());
        assert!(!lit.is_empty());
        for op in &lit {
            // Undimmed chunks may overhang the highlight by the one-pixel
            // seam guard, never by more
            let overhang = op.image_rect.subtract(&highlight.grow(1));
            assert!(overhang.is_empty(), "lit chunk {:?} escapes", op.image_rect);
        }
    }

    #[test]
    fn test_buffer_size_matches_level() {
        let source = TestSource::new(1000, 800);
        let buffer = source.get_pixels(RectI::new(0, 0, 100, 50), 2).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (25, 13));
    }
}
