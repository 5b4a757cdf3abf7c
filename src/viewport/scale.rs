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

//! The zoom decision algorithm.
//!
//! A zoom request carries a direction or explicit factor plus a focus hint.
//! The focus resolves, per axis, to a pair of coordinates: an image-space
//! point and the screen-space point it should occupy after the change. The
//! new offset follows as `round(new_scale * image_point) - screen_point`.
//! Pointer-anchored pairs keep the pixel under the cursor stationary;
//! image-center pairs pull the image center to the viewport center.

use serde::{Deserialize, Serialize};

use crate::{
    rect::PointD,
    session::DisplaySession,
    viewport::{
        transform::scale_differs,
        zoom::{self, ZoomDirection, MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR},
    },
};

/// An on-screen image center within this many pixels of the viewport center
/// counts as "currently centered" for `RetainCenteringElseBestGuess`.
const CENTER_SNAP_TOLERANCE: f64 = 2.0;

/// A zoom request: one table step in either direction, or an explicit
/// factor (fit-to-window, percentage entry).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomAction {
    In,
    Out,
    To(f64),
}

/// Where a zoom should appear visually anchored.
#[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomFocus {
    /// Keep the pixel under the pointer stationary; falls back to the
    /// viewport center when the pointer is absent or outside the canvas
    Pointer,
    /// Pull the image center to the viewport center
    ImageCenter,
    /// Per axis: image center when the scaled image already fits the
    /// viewport on that axis, pointer/viewport-center otherwise
    #[default]
    BestGuess,
    /// Keep a centered image centered; otherwise behave like `BestGuess`
    RetainCenteringElseBestGuess,
}

/// One per-axis focus pairing: the image coordinate and the screen
/// coordinate it must map to after the scale change.
#[derive(Debug, Clone, Copy)]
struct FocusAxis {
    image: f64,
    screen: f64,
}

impl DisplaySession {
    /// Applies a zoom request using the configured default focus.
    pub fn request_zoom(&mut self, action: ZoomAction) {
        let focus = self.config.default_zoom_focus;
        self.request_zoom_with_focus(action, focus);
    }

    /// Applies a zoom request anchored per the given focus hint.
    pub fn request_zoom_with_focus(&mut self, action: ZoomAction, focus: ZoomFocus) {
        if !self.ensure_attached("request_zoom") {
            return;
        }

        let old_factor = self.zoom_model.factor();
        let new_factor = match action {
            ZoomAction::In => zoom::zoom_step(ZoomDirection::In, old_factor),
            ZoomAction::Out => zoom::zoom_step(ZoomDirection::Out, old_factor),
            ZoomAction::To(factor) => factor.clamp(MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR),
        };
        if !scale_differs(new_factor, old_factor) {
            return;
        }

        let old_scaled = self.viewport.scaled_image_size();
        let fit_before_x = old_scaled.width() <= self.viewport.display_width();
        let fit_before_y = old_scaled.height() <= self.viewport.display_height();

        if self.config.resize_windows_on_zoom {
            // The window moves instead of the content: apply the zoom
            // unconditionally, size the window to the new image extent, and
            // re-center. No focus-point logic on this path.
            self.apply_zoom_factor(new_factor);
            self.shrink_wrap(false);
            self.viewport.center_image(true, true);
            self.viewport.clamp_and_update();
            self.after_scale_change();
            return;
        }

        let (focus_x, focus_y) = self.zoom_focus(focus);

        self.apply_zoom_factor(new_factor);
        self.viewport.set_offset(
            (focus_x.image * self.viewport.scale_x() - focus_x.screen).round() as i32,
            (focus_y.image * self.viewport.scale_y() - focus_y.screen).round() as i32,
        );

        // An axis that starts to fit snaps to centered: a zoomed-out image
        // that now fits must not retain an arbitrary prior offset
        let new_scaled = self.viewport.scaled_image_size();
        let starts_fit_x = !fit_before_x && new_scaled.width() <= self.viewport.display_width();
        let starts_fit_y = !fit_before_y && new_scaled.height() <= self.viewport.display_height();
        if starts_fit_x || starts_fit_y {
            self.viewport.center_image(starts_fit_x, starts_fit_y);
        }

        self.viewport.clamp_and_update();
        self.after_scale_change();
    }

    /// Zooms so the whole image fits within the viewport, centered.
    pub fn zoom_fit_image(&mut self) {
        self.zoom_fit(false);
    }

    /// Zooms so the image fills the viewport completely, centered; the
    /// overflowing axis stays scrollable.
    pub fn zoom_fill_window(&mut self) {
        self.zoom_fit(true);
    }

    fn zoom_fit(&mut self, fill: bool) {
        if !self.ensure_attached("zoom_fit") {
            return;
        }
        let display_width = self.viewport.display_width() as f64;
        let display_height = self.viewport.display_height() as f64;
        // Extent at factor 1.0 folds in the resolution ratio, so the fit
        // factor is correct for non-square-resolution images too
        let base = self.viewport.scaled_image_size_at(1.0);
        if display_width < 1.0 || display_height < 1.0 || base.width() < 1 || base.height() < 1 {
            return;
        }
        let ratio_x = display_width / base.width() as f64;
        let ratio_y = display_height / base.height() as f64;
        let factor = if fill {
            ratio_x.max(ratio_y)
        } else {
            ratio_x.min(ratio_y)
        };
        self.request_zoom_with_focus(ZoomAction::To(factor), ZoomFocus::ImageCenter);
    }

    fn apply_zoom_factor(&mut self, factor: f64) {
        self.zoom_model.zoom_to(factor);
        self.viewport.set_zoom(self.zoom_model.zoom());
    }

    /// Resolves the focus hint to per-axis (image, screen) coordinate pairs
    /// under the transform as it exists before the scale change.
    fn zoom_focus(&self, focus: ZoomFocus) -> (FocusAxis, FocusAxis) {
        match focus {
            ZoomFocus::Pointer => {
                let pointer = self.pointer_candidate();
                (self.anchored_x(pointer), self.anchored_y(pointer))
            }
            ZoomFocus::ImageCenter => (self.image_center_x(), self.image_center_y()),
            ZoomFocus::BestGuess => {
                // Axes are decided independently: X may track the image
                // center while Y tracks the pointer
                let scaled = self.viewport.scaled_image_size();
                let pointer = self.pointer_candidate();
                let x = if scaled.width() <= self.viewport.display_width() {
                    self.image_center_x()
                } else {
                    self.anchored_x(pointer)
                };
                let y = if scaled.height() <= self.viewport.display_height() {
                    self.image_center_y()
                } else {
                    self.anchored_y(pointer)
                };
                (x, y)
            }
            ZoomFocus::RetainCenteringElseBestGuess => {
                if self.almost_centered() {
                    (self.image_center_x(), self.image_center_y())
                } else {
                    self.zoom_focus(ZoomFocus::BestGuess)
                }
            }
        }
    }

    /// The pointer position when it is trustworthy, the viewport center
    /// otherwise. A request driven by a menu or keyboard event carries no
    /// canvas pointer; a stale position must not anchor the zoom.
    fn pointer_candidate(&self) -> PointD {
        let display = self.viewport.display_rect().to_f64_rect();
        match self.pointer {
            Some(p) if display.contains(p) => p,
            _ => {
                let (cx, cy) = display.center();
                PointD::new(cx, cy)
            }
        }
    }

    fn anchored_x(&self, pointer: PointD) -> FocusAxis {
        FocusAxis {
            image: (pointer.x() + self.viewport.offset_x() as f64) / self.viewport.scale_x(),
            screen: pointer.x(),
        }
    }

    fn anchored_y(&self, pointer: PointD) -> FocusAxis {
        FocusAxis {
            image: (pointer.y() + self.viewport.offset_y() as f64) / self.viewport.scale_y(),
            screen: pointer.y(),
        }
    }

    fn image_center_x(&self) -> FocusAxis {
        FocusAxis {
            image: self.viewport.image_size().width() as f64 / 2.0,
            screen: self.viewport.display_width() as f64 / 2.0,
        }
    }

    fn image_center_y(&self) -> FocusAxis {
        FocusAxis {
            image: self.viewport.image_size().height() as f64 / 2.0,
            screen: self.viewport.display_height() as f64 / 2.0,
        }
    }

    /// Whether the on-screen image center currently sits within the snap
    /// tolerance of the viewport center on both axes.
    fn almost_centered(&self) -> bool {
        let image_size = self.viewport.image_size();
        let center = self.viewport.transform_point_f(PointD::new(
            image_size.width() as f64 / 2.0,
            image_size.height() as f64 / 2.0,
        ));
        let dx = center.x() - self.viewport.display_width() as f64 / 2.0;
        let dy = center.y() - self.viewport.display_height() as f64 / 2.0;
        dx.abs() <= CENTER_SNAP_TOLERANCE && dy.abs() <= CENTER_SNAP_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{
        config::DisplayConfig,
        error::ViewResult,
        paint::{PixelBuffer, PixelSource},
        rect::{RectI, SizeI},
        viewport::{window_size::WindowMetrics, zoom::ZoomFactor},
    };

    struct SolidSource {
        size: SizeI,
    }

    impl PixelSource for SolidSource {
        fn image_size(&self) -> SizeI {
            self.size
        }

        fn resolution(&self) -> (f64, f64) {
            (96.0, 96.0)
        }

        fn get_pixels(&self, rect: RectI, _level: u32) -> ViewResult<PixelBuffer> {
            Ok(PixelBuffer::new(rect.width() as u32, rect.height() as u32))
        }
    }

    fn test_session(image: (i32, i32), display: (i32, i32)) -> (DisplaySession, Rc<dyn PixelSource>) {
        let mut session = DisplaySession::new(DisplayConfig::default());
        let source: Rc<dyn PixelSource> = Rc::new(SolidSource {
            size: SizeI::new(image.0, image.1),
        });
        session.attach_source(&source);
        session.set_display_size(display.0, display.1);
        (session, source)
    }

    fn offsets(session: &DisplaySession) -> (i32, i32) {
        (session.viewport().offset_x(), session.viewport().offset_y())
    }

    #[test]
    fn test_zoom_to_image_center() {
        // 1000x800 at 1:1 in a 500x500 viewport, offset (0,0): doubling
        // with image-center focus lands the image center on the viewport
        // center
        let (mut session, _source) = test_session((1000, 800), (500, 500));
        session.request_zoom_with_focus(ZoomAction::To(2.0), ZoomFocus::ImageCenter);

        assert_eq!(session.zoom(), ZoomFactor::new(2, 1));
        assert_eq!(offsets(&session), (750, 550));
    }

    #[test]
    fn test_zoom_anchors_pointer() {
        let (mut session, _source) = test_session((1000, 800), (500, 500));
        let pointer = PointD::new(200.0, 150.0);
        session.set_pointer(Some(pointer));

        let before = session.viewport().untransform_point_f(pointer);
        session.request_zoom_with_focus(ZoomAction::To(2.0), ZoomFocus::Pointer);
        let after = session.viewport().transform_point_f(before);

        // The pixel under the pointer does not visibly jump
        assert!((after.x() - pointer.x()).abs() <= 1.0);
        assert!((after.y() - pointer.y()).abs() <= 1.0);
        assert_eq!(offsets(&session), (200, 150));
    }

    #[test]
    fn test_untrusted_pointer_falls_back_to_viewport_center() {
        let (mut session, _source) = test_session((1000, 800), (500, 500));

        // No pointer at all (menu-driven zoom)
        session.set_pointer(None);
        session.request_zoom_with_focus(ZoomAction::To(2.0), ZoomFocus::Pointer);
        assert_eq!(offsets(&session), (250, 250));

        // A pointer parked outside the canvas is just as untrustworthy
        let (mut session, _source) = test_session((1000, 800), (500, 500));
        session.set_pointer(Some(PointD::new(900.0, -30.0)));
        session.request_zoom_with_focus(ZoomAction::To(2.0), ZoomFocus::Pointer);
        assert_eq!(offsets(&session), (250, 250));
    }

    #[test]
    fn test_fits_after_zoom_out_snaps_centered() {
        // 2000x2000 at 1:1 in 800x800, scrolled somewhere arbitrary:
        // zooming to 1:4 makes the 500x500 result fit, so it snaps to
        // centered regardless of focus hint or prior offset
        let (mut session, _source) = test_session((2000, 2000), (800, 800));
        session.request_scroll(600, 600);
        session.set_pointer(Some(PointD::new(100.0, 100.0)));

        session.request_zoom_with_focus(ZoomAction::To(0.25), ZoomFocus::Pointer);
        assert_eq!(offsets(&session), (-150, -150));
    }

    #[test]
    fn test_best_guess_decides_axes_independently() {
        // 1000x200 in 500x500: X overflows (pointer-anchored), Y fits
        // (image-centered)
        let (mut session, _source) = test_session((1000, 200), (500, 500));
        session.set_pointer(Some(PointD::new(100.0, 100.0)));

        session.request_zoom_with_focus(ZoomAction::To(2.0), ZoomFocus::BestGuess);
        // X: image 100 under the pointer stays at screen 100
        // Y: image center 100 maps to viewport center 250
        assert_eq!(offsets(&session), (100, -50));
    }

    #[test]
    fn test_retain_centering_keeps_center() {
        // 400x400 centered in 500x500 counts as "currently centered"
        let (mut session, _source) = test_session((400, 400), (500, 500));
        session.viewport.center_image(true, true);
        assert_eq!(offsets(&session), (-50, -50));
        session.set_pointer(Some(PointD::new(10.0, 10.0)));

        session.request_zoom_with_focus(
            ZoomAction::To(2.0),
            ZoomFocus::RetainCenteringElseBestGuess,
        );
        // Still centered after the zoom: 800x800 in 500x500 -> offset 150
        assert_eq!(offsets(&session), (150, 150));
    }

    #[test]
    fn test_retain_centering_falls_back_when_off_center() {
        let (mut session, _source) = test_session((1000, 1000), (500, 500));
        session.request_scroll(100, 100);
        session.set_pointer(None);

        session.request_zoom_with_focus(
            ZoomAction::To(2.0),
            ZoomFocus::RetainCenteringElseBestGuess,
        );
        // Off center and overflowing: BestGuess anchors the viewport center,
        // image (350,350) -> 2*350 - 250
        assert_eq!(offsets(&session), (450, 450));
    }

    #[test]
    fn test_stepped_zoom_walks_the_table() {
        let (mut session, _source) = test_session((1000, 800), (500, 500));
        session.request_zoom(ZoomAction::In);
        assert_eq!(session.zoom(), ZoomFactor::new(3, 2));
        session.request_zoom(ZoomAction::In);
        assert_eq!(session.zoom(), ZoomFactor::new(2, 1));
        session.request_zoom(ZoomAction::Out);
        assert_eq!(session.zoom(), ZoomFactor::new(3, 2));
    }

    #[test]
    fn test_noop_zoom_changes_nothing() {
        let (mut session, _source) = test_session((1000, 800), (500, 500));
        session.request_scroll(100, 100);
        session.damage.flush();

        session.request_zoom_with_focus(ZoomAction::To(1.0), ZoomFocus::ImageCenter);
        assert_eq!(session.zoom(), ZoomFactor::new(1, 1));
        assert_eq!(offsets(&session), (100, 100));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_resize_windows_on_zoom_skips_focus_logic() {
        let mut config = DisplayConfig::default();
        config.resize_windows_on_zoom = true;
        let mut session = DisplaySession::new(config);
        let source: Rc<dyn PixelSource> = Rc::new(SolidSource {
            size: SizeI::new(1000, 800),
        });
        session.attach_source(&source);
        session.set_display_size(500, 500);
        session.set_window_metrics(WindowMetrics {
            chrome: SizeI::new(40, 60),
            monitor: SizeI::new(1920, 1080),
            content: SizeI::new(500, 500),
        });

        let requested = Rc::new(std::cell::RefCell::new(None));
        let seen = requested.clone();
        session.on_window_size_request(move |size| *seen.borrow_mut() = Some(size));

        session.request_zoom_with_focus(ZoomAction::To(2.0), ZoomFocus::Pointer);

        // Desired content 2000x1600 caps at 75% of the monitor minus chrome
        let expected = SizeI::new((1920.0 * 0.75) as i32 - 40, (1080.0 * 0.75) as i32 - 60);
        assert_eq!(*requested.borrow(), Some(expected));
        assert_eq!(session.viewport().display_width(), expected.width());
    }

    #[test]
    fn test_zoom_fit_image() {
        let (mut session, _source) = test_session((1000, 800), (500, 400));
        session.request_zoom_with_focus(ZoomAction::To(2.0), ZoomFocus::ImageCenter);

        session.zoom_fit_image();
        assert_eq!(session.zoom(), ZoomFactor::new(1, 2));
        // Fit result is centered and flush with the viewport
        assert_eq!(offsets(&session), (0, 0));
    }

    #[test]
    fn test_zoom_fill_window() {
        let (mut session, _source) = test_session((1000, 800), (500, 500));
        session.zoom_fill_window();
        // Fill uses the larger ratio: 500/800 = 0.625 = 5:8
        assert_eq!(session.zoom(), ZoomFactor::new(5, 8));
        // The overflowing X axis is centered by the image-center focus
        let scaled = session.viewport().scaled_image_size();
        assert_eq!(scaled, SizeI::new(625, 500));
        assert_eq!(offsets(&session), (63, 0));
    }

    #[test]
    fn test_explicit_zoom_clamps_to_range() {
        let (mut session, _source) = test_session((1000, 800), (500, 500));
        session.request_zoom_with_focus(ZoomAction::To(1.0e6), ZoomFocus::ImageCenter);
        assert_eq!(session.zoom_model.factor(), MAX_ZOOM_FACTOR);
        session.request_zoom_with_focus(ZoomAction::To(0.0), ZoomFocus::ImageCenter);
        assert_eq!(session.zoom_model.factor(), MIN_ZOOM_FACTOR);
    }
}
