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

pub mod scale;
pub mod scroll;
pub mod transform;
pub mod window_size;
pub mod zoom;

use crate::rect::{RectI, SizeI};

use self::zoom::ZoomFactor;

/// Fallback monitor resolution when the windowing system reports nothing
pub const DEFAULT_MONITOR_RESOLUTION: f64 = 96.0;

/// The live display state of one editing window: zoom factor, per-axis
/// scale, scroll offsets, viewport size, and the image/monitor resolutions
/// the scale derives from.
///
/// The per-axis scales are recomputed from the zoom factor whenever any of
/// their inputs change; they are never mutated directly. With `dot_for_dot`
/// enabled one image pixel maps to one screen pixel at 1:1 zoom regardless
/// of resolution; with it disabled the image/monitor dots-per-inch ratio is
/// folded in per axis, so images with non-square resolution render without
/// distortion.
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: ZoomFactor,
    scale_x: f64,
    scale_y: f64,
    offset_x: i32,
    offset_y: i32,
    display_width: i32,
    display_height: i32,
    image_width: i32,
    image_height: i32,
    image_xres: f64,
    image_yres: f64,
    monitor_xres: f64,
    monitor_yres: f64,
    dot_for_dot: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: ZoomFactor::default(),
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0,
            offset_y: 0,
            display_width: 0,
            display_height: 0,
            image_width: 0,
            image_height: 0,
            image_xres: DEFAULT_MONITOR_RESOLUTION,
            image_yres: DEFAULT_MONITOR_RESOLUTION,
            monitor_xres: DEFAULT_MONITOR_RESOLUTION,
            monitor_yres: DEFAULT_MONITOR_RESOLUTION,
            dot_for_dot: true,
        }
    }
}

impl Viewport {
    pub fn new(image_size: SizeI, image_resolution: (f64, f64)) -> Self {
        let mut viewport = Self {
            image_width: image_size.width(),
            image_height: image_size.height(),
            ..Self::default()
        };
        viewport.set_image_resolution(image_resolution);
        viewport
    }

    pub fn zoom(&self) -> ZoomFactor {
        self.zoom
    }

    /// Sets the zoom factor and recomputes the per-axis scales
    pub fn set_zoom(&mut self, zoom: ZoomFactor) {
        self.zoom = zoom;
        self.recompute_scale();
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    pub fn offset_x(&self) -> i32 {
        self.offset_x
    }

    pub fn offset_y(&self) -> i32 {
        self.offset_y
    }

    pub fn display_width(&self) -> i32 {
        self.display_width
    }

    pub fn display_height(&self) -> i32 {
        self.display_height
    }

    pub fn set_display_size(&mut self, width: i32, height: i32) {
        self.display_width = width.max(0);
        self.display_height = height.max(0);
    }

    /// The viewport area in screen coordinates, origin at (0, 0)
    pub fn display_rect(&self) -> RectI {
        RectI::new(0, 0, self.display_width, self.display_height)
    }

    pub fn image_size(&self) -> SizeI {
        SizeI::new(self.image_width, self.image_height)
    }

    pub fn set_image_size(&mut self, size: SizeI) {
        self.image_width = size.width().max(0);
        self.image_height = size.height().max(0);
    }

    /// The full image extent in image coordinates
    pub fn image_bounds(&self) -> RectI {
        RectI::new(0, 0, self.image_width, self.image_height)
    }

    pub fn image_resolution(&self) -> (f64, f64) {
        (self.image_xres, self.image_yres)
    }

    pub fn set_image_resolution(&mut self, resolution: (f64, f64)) {
        let (xres, yres) = resolution;
        // A source reporting a zero or negative resolution gets the monitor
        // resolution, which makes the ratio collapse to 1
        self.image_xres = if xres > 0.0 { xres } else { self.monitor_xres };
        self.image_yres = if yres > 0.0 { yres } else { self.monitor_yres };
        self.recompute_scale();
    }

    pub fn monitor_resolution(&self) -> (f64, f64) {
        (self.monitor_xres, self.monitor_yres)
    }

    pub fn set_monitor_resolution(&mut self, resolution: (f64, f64)) {
        let (xres, yres) = resolution;
        self.monitor_xres = if xres > 0.0 {
            xres
        } else {
            DEFAULT_MONITOR_RESOLUTION
        };
        self.monitor_yres = if yres > 0.0 {
            yres
        } else {
            DEFAULT_MONITOR_RESOLUTION
        };
        self.recompute_scale();
    }

    pub fn dot_for_dot(&self) -> bool {
        self.dot_for_dot
    }

    pub fn set_dot_for_dot(&mut self, dot_for_dot: bool) {
        self.dot_for_dot = dot_for_dot;
        self.recompute_scale();
    }

    fn recompute_scale(&mut self) {
        let factor = self.zoom.value();
        if self.dot_for_dot {
            self.scale_x = factor;
            self.scale_y = factor;
        } else {
            self.scale_x = factor * self.monitor_xres / self.image_xres;
            self.scale_y = factor * self.monitor_yres / self.image_yres;
        }
    }
}
