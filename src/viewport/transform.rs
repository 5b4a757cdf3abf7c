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

//! Image-space to screen-space coordinate conversion.
//!
//! The forward transform is `screen = round(image * scale) - offset`, the
//! inverse is `image = floor((screen + offset) / scale)`. Integer round
//! trips agree within one pixel at any valid scale. Rectangle variants use
//! conservative rounding (floor the origin, ceil the extent) so that a
//! transformed cover never loses a pixel to truncation.

use crate::rect::{PointD, PointI, RectI, SizeI};

use super::{zoom::ZOOM_EPSILON, Viewport};

/// Scale factors within this distance are considered equal. Comparing
/// accumulated floats with `==` re-triggers resizes on noise.
pub fn scale_differs(a: f64, b: f64) -> bool {
    (a - b).abs() >= ZOOM_EPSILON
}

impl Viewport {
    /// Maps an image-space point to screen space, rounded to integer pixels.
    /// This is the variant for rectangle painting, where pixel snap matters.
    pub fn transform_point(&self, image: PointD) -> PointI {
        PointI::new(
            (image.x() * self.scale_x).round() as i32 - self.offset_x,
            (image.y() * self.scale_y).round() as i32 - self.offset_y,
        )
    }

    /// Maps an image-space point to screen space at sub-pixel precision.
    /// This is the variant for cursor and guide rendering.
    pub fn transform_point_f(&self, image: PointD) -> PointD {
        PointD::new(
            image.x() * self.scale_x - self.offset_x as f64,
            image.y() * self.scale_y - self.offset_y as f64,
        )
    }

    /// Maps a screen-space point back to integer image coordinates.
    /// Exact algebraic inverse of `transform_point` up to one pixel.
    pub fn untransform_point(&self, screen: PointI) -> PointI {
        PointI::new(
            ((screen.x() + self.offset_x) as f64 / self.scale_x).floor() as i32,
            ((screen.y() + self.offset_y) as f64 / self.scale_y).floor() as i32,
        )
    }

    /// Maps a screen-space point back to image coordinates at sub-pixel
    /// precision.
    pub fn untransform_point_f(&self, screen: PointD) -> PointD {
        PointD::new(
            (screen.x() + self.offset_x as f64) / self.scale_x,
            (screen.y() + self.offset_y as f64) / self.scale_y,
        )
    }

    /// Maps an image-space rectangle to a conservative screen-space cover.
    pub fn transform_rect(&self, image: &RectI) -> RectI {
        RectI::new(
            (image.x0 as f64 * self.scale_x).floor() as i32 - self.offset_x,
            (image.y0 as f64 * self.scale_y).floor() as i32 - self.offset_y,
            (image.x1 as f64 * self.scale_x).ceil() as i32 - self.offset_x,
            (image.y1 as f64 * self.scale_y).ceil() as i32 - self.offset_y,
        )
    }

    /// Maps a screen-space rectangle to a conservative image-space cover.
    pub fn untransform_rect(&self, screen: &RectI) -> RectI {
        RectI::new(
            ((screen.x0 + self.offset_x) as f64 / self.scale_x).floor() as i32,
            ((screen.y0 + self.offset_y) as f64 / self.scale_y).floor() as i32,
            ((screen.x1 + self.offset_x) as f64 / self.scale_x).ceil() as i32,
            ((screen.y1 + self.offset_y) as f64 / self.scale_y).ceil() as i32,
        )
    }

    /// The image extent in screen pixels at the current scale.
    pub fn scaled_image_size(&self) -> SizeI {
        SizeI::new(
            (self.image_width as f64 * self.scale_x).round() as i32,
            (self.image_height as f64 * self.scale_y).round() as i32,
        )
    }

    /// The image extent in screen pixels at an arbitrary zoom factor,
    /// resolution-aware like the live scale.
    pub fn scaled_image_size_at(&self, factor: f64) -> SizeI {
        let (scale_x, scale_y) = if self.dot_for_dot {
            (factor, factor)
        } else {
            (
                factor * self.monitor_xres / self.image_xres,
                factor * self.monitor_yres / self.image_yres,
            )
        };
        SizeI::new(
            (self.image_width as f64 * scale_x).round() as i32,
            (self.image_height as f64 * scale_y).round() as i32,
        )
    }
}
