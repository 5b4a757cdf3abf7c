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

//! Scroll state: offset ownership, the clamp invariant, and scrollbar
//! ranges.
//!
//! The offset is the scaled-image-space coordinate aligned with the screen
//! origin. It is always kept within
//! `[min(0, scaled - display), max(0, scaled - display)]` per axis: an image
//! larger than the viewport scrolls within its extent, an image smaller than
//! the viewport may sit anywhere between flush-left and flush-right (a
//! negative offset puts empty space before the image).

use super::Viewport;

/// Value set for one external scrollbar: the classic adjustment quadruple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarRange {
    pub lower: f64,
    pub upper: f64,
    pub page_size: f64,
    pub value: f64,
}

fn clamp_offset(offset: i32, scaled: i32, display: i32) -> i32 {
    let span = scaled - display;
    offset.clamp(span.min(0), span.max(0))
}

fn scrollbar_range(offset: i32, scaled: i32, display: i32) -> ScrollbarRange {
    // The bar covers the union of the image extent and the current view so
    // the slider stays meaningful when empty space is visible
    ScrollbarRange {
        lower: offset.min(0) as f64,
        upper: scaled.max(offset + display) as f64,
        page_size: display as f64,
        value: offset as f64,
    }
}

impl Viewport {
    /// Clamps and stores the offset. Returns whether the stored value
    /// actually changed, so callers can skip redundant repaints.
    pub fn set_offset(&mut self, x: i32, y: i32) -> bool {
        let scaled = self.scaled_image_size();
        let x = clamp_offset(x, scaled.width(), self.display_width);
        let y = clamp_offset(y, scaled.height(), self.display_height);
        let changed = x != self.offset_x || y != self.offset_y;
        self.offset_x = x;
        self.offset_y = y;
        changed
    }

    /// Relative scroll, clamped like `set_offset`.
    pub fn scroll_by(&mut self, dx: i32, dy: i32) -> bool {
        self.set_offset(self.offset_x + dx, self.offset_y + dy)
    }

    /// Centers the scaled image on the requested axes. An axis whose image
    /// extent exceeds the viewport is left alone: there is nothing to
    /// center and scrolling remains meaningful there.
    pub fn center_image(&mut self, horizontally: bool, vertically: bool) -> bool {
        let scaled = self.scaled_image_size();
        let mut x = self.offset_x;
        let mut y = self.offset_y;
        if horizontally && scaled.width() <= self.display_width {
            x = (scaled.width() - self.display_width) / 2;
        }
        if vertically && scaled.height() <= self.display_height {
            y = (scaled.height() - self.display_height) / 2;
        }
        self.set_offset(x, y)
    }

    /// Re-applies the clamp invariant. Callers must invoke this after any
    /// change to the display size or the scale.
    pub fn clamp_and_update(&mut self) -> bool {
        self.set_offset(self.offset_x, self.offset_y)
    }

    pub fn hscrollbar_range(&self) -> ScrollbarRange {
        scrollbar_range(
            self.offset_x,
            self.scaled_image_size().width(),
            self.display_width,
        )
    }

    pub fn vscrollbar_range(&self) -> ScrollbarRange {
        scrollbar_range(
            self.offset_y,
            self.scaled_image_size().height(),
            self.display_height,
        )
    }
}
