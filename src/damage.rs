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

//! Dirty-region accumulation.
//!
//! Mutators report image-space rectangles; the list batches them so many
//! small edits coalesce into a bounded number of paint calls. Rectangles
//! are clamped to the image on entry and drained atomically on flush. The
//! list is plain bookkeeping and cannot fail.

use crate::rect::{RectI, SizeI};

/// Pending rectangles beyond this collapse into their union. Keeps a paint
/// storm from growing the list without bound while never dropping a pixel.
const MAX_DIRTY_RECTS: usize = 64;

#[derive(Debug, Default)]
pub struct DamageList {
    pending: Vec<RectI>,
    all: bool,
    bounds: SizeI,
}

impl DamageList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the image extent rectangles are clamped against. Already
    /// pending rectangles are re-clamped so a shrink cannot leave damage
    /// outside the image.
    pub fn set_bounds(&mut self, bounds: SizeI) {
        self.bounds = bounds;
        let clip = self.bounds_rect();
        self.pending.retain_mut(|rect| {
            *rect = rect.clamp_to(&clip);
            !rect.is_empty()
        });
    }

    pub fn bounds(&self) -> SizeI {
        self.bounds
    }

    fn bounds_rect(&self) -> RectI {
        RectI::new(0, 0, self.bounds.width(), self.bounds.height())
    }

    /// Records an image-space rectangle as needing repaint. Degenerate and
    /// out-of-image rectangles are dropped after clamping.
    pub fn mark_dirty(&mut self, rect: RectI) {
        if self.all {
            return;
        }
        let rect = rect.clamp_to(&self.bounds_rect());
        if rect.is_empty() {
            return;
        }
        if self.pending.len() >= MAX_DIRTY_RECTS {
            let merged = self
                .pending
                .drain(..)
                .fold(rect, |acc, r| acc.union(&r));
            self.pending.push(merged);
        } else {
            self.pending.push(rect);
        }
    }

    /// Marks the whole image dirty, short-circuiting rectangle bookkeeping.
    pub fn mark_all(&mut self) {
        self.pending.clear();
        self.all = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.all || !self.pending.is_empty()
    }

    /// Atomically takes the pending list, leaving the accumulator empty.
    /// Safe to call when clean: returns an empty list and does nothing else.
    pub fn flush(&mut self) -> Vec<RectI> {
        if self.all {
            self.all = false;
            self.pending.clear();
            let full = self.bounds_rect();
            if full.is_empty() {
                Vec::new()
            } else {
                vec![full]
            }
        } else {
            std::mem::take(&mut self.pending)
        }
    }
}

/// Damage caused by replacing the active highlight rectangle.
///
/// Everything outside the highlight paints dimmed, so swapping highlight
/// `old` for `new` only changes pixels in their symmetric difference. The
/// area inside both stays undimmed, the area outside both stays dimmed;
/// neither needs repainting.
pub fn highlight_damage(old: Option<RectI>, new: Option<RectI>) -> Vec<RectI> {
    match (old, new) {
        (None, None) => Vec::new(),
        (Some(a), Some(b)) if a == b => Vec::new(),
        (None, Some(r)) | (Some(r), None) => vec![r],
        (Some(a), Some(b)) => {
            let mut parts = a.subtract(&b);
            parts.extend(b.subtract(&a));
            parts
        }
    }
}
