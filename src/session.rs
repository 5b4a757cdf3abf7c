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

//! The display session: the single owner of one editing window's viewport,
//! zoom, scroll, and damage state.
//!
//! Everything here runs on one logical thread; there is no locking. The
//! pixel source is a shared external resource the session reads through a
//! non-owning handle. Foreign threads report damage through the channel
//! sender; `tick` drains it on the owning thread, and also fires the
//! coalesced scale/scroll observer notifications at most once per call, the
//! explicit replacement for toolkit idle callbacks.

use std::rc::{Rc, Weak};

use async_channel::Receiver;
use log::{debug, warn};

use crate::{
    config::DisplayConfig,
    damage::{highlight_damage, DamageList},
    error::{ViewError, ViewResult},
    notify::{
        damage_channel,
        model::{DamageEvent, DamageMessage},
        DamageSender,
    },
    paint::{PaintSink, PixelSource, RepaintDriver},
    rect::{PointD, RectI, SizeI},
    viewport::{
        window_size::{shrink_wrap_size, WindowMetrics},
        zoom::{ZoomFactor, ZoomModel},
        Viewport,
    },
};

/// Observer notifications queued for the next `tick`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PendingNotify {
    pub scale: bool,
    pub scroll: bool,
}

pub struct DisplaySession {
    pub(crate) viewport: Viewport,
    pub(crate) zoom_model: ZoomModel,
    pub(crate) damage: DamageList,
    pub(crate) highlight: Option<RectI>,
    pub(crate) config: DisplayConfig,
    pub(crate) driver: RepaintDriver,
    pub(crate) source: Option<Weak<dyn PixelSource>>,
    pub(crate) pointer: Option<PointD>,
    pub(crate) window: WindowMetrics,
    pub(crate) pending: PendingNotify,
    scale_listeners: Vec<Box<dyn FnMut(ZoomFactor)>>,
    scroll_listeners: Vec<Box<dyn FnMut(i32, i32)>>,
    window_listeners: Vec<Box<dyn FnMut(SizeI)>>,
    damage_rx: Receiver<DamageMessage>,
    damage_tx: DamageSender,
}

impl DisplaySession {
    pub fn new(config: DisplayConfig) -> Self {
        let (damage_tx, damage_rx) = damage_channel();
        let mut viewport = Viewport::default();
        viewport.set_monitor_resolution((config.monitor_xres, config.monitor_yres));
        viewport.set_dot_for_dot(config.dot_for_dot);
        Self {
            viewport,
            zoom_model: ZoomModel::new(),
            damage: DamageList::new(),
            highlight: None,
            config,
            driver: RepaintDriver::new(),
            source: None,
            pointer: None,
            window: WindowMetrics::default(),
            pending: PendingNotify::default(),
            scale_listeners: Vec::new(),
            scroll_listeners: Vec::new(),
            window_listeners: Vec::new(),
            damage_rx,
            damage_tx,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn zoom(&self) -> ZoomFactor {
        self.zoom_model.zoom()
    }

    /// Attaches the shared pixel source. The session keeps a non-owning
    /// handle; the source's lifetime belongs to its other users.
    pub fn attach_source(&mut self, source: &Rc<dyn PixelSource>) {
        self.source = Some(Rc::downgrade(source));
        let size = source.image_size();
        self.viewport.set_image_size(size);
        self.viewport.set_image_resolution(source.resolution());
        self.damage.set_bounds(size);
        self.highlight = None;
        self.viewport.clamp_and_update();
        self.after_scale_change();
        debug!(
            "attached {}x{} source at {:?} dpi",
            size.width(),
            size.height(),
            source.resolution()
        );
    }

    pub fn detach_source(&mut self) {
        self.source = None;
    }

    fn live_source(&self) -> Option<Rc<dyn PixelSource>> {
        self.source.as_ref()?.upgrade()
    }

    /// Precondition guard for operations that require an attached source.
    /// Calling them detached is a caller logic error: a panic in debug
    /// builds, a logged no-op in release.
    pub(crate) fn ensure_attached(&self, operation: &str) -> bool {
        if self.live_source().is_some() {
            true
        } else {
            debug_assert!(false, "{operation} called with no pixel source attached");
            warn!("{operation} called with no pixel source attached");
            false
        }
    }

    /// Records image-space damage from a mutator on the owning thread.
    pub fn notify_dirty(&mut self, rect: RectI) {
        if !self.ensure_attached("notify_dirty") {
            return;
        }
        self.damage.mark_dirty(rect);
    }

    /// Re-reads the source dimensions after a canvas resize. Scroll state is
    /// re-clamped and the surface fully repainted; with
    /// `resize_windows_on_resize` the window shrink-wraps too (grow-only, so
    /// automatic resizes never flicker the window smaller).
    pub fn notify_image_resized(&mut self) {
        let Some(source) = self.live_source() else {
            self.ensure_attached("notify_image_resized");
            return;
        };
        let size = source.image_size();
        self.viewport.set_image_size(size);
        self.viewport.set_image_resolution(source.resolution());
        self.damage.set_bounds(size);
        self.viewport.clamp_and_update();
        self.damage.mark_all();
        self.pending.scroll = true;
        if self.config.resize_windows_on_resize {
            self.shrink_wrap(true);
        }
    }

    pub fn request_scroll(&mut self, dx: i32, dy: i32) {
        if !self.ensure_attached("request_scroll") {
            return;
        }
        if self.viewport.scroll_by(dx, dy) {
            self.damage.mark_all();
            self.pending.scroll = true;
        }
    }

    /// The viewport was resized by the window system.
    pub fn set_display_size(&mut self, width: i32, height: i32) {
        self.viewport.set_display_size(width, height);
        self.window.content = SizeI::new(width.max(0), height.max(0));
        self.viewport.clamp_and_update();
        self.damage.mark_all();
        self.pending.scroll = true;
    }

    /// Updates the measured window geometry used by shrink-wrap sizing.
    pub fn set_window_metrics(&mut self, metrics: WindowMetrics) {
        self.window = metrics;
    }

    pub fn set_dot_for_dot(&mut self, dot_for_dot: bool) {
        if self.viewport.dot_for_dot() == dot_for_dot {
            return;
        }
        self.viewport.set_dot_for_dot(dot_for_dot);
        self.config.dot_for_dot = dot_for_dot;
        self.viewport.clamp_and_update();
        self.after_scale_change();
    }

    /// Latest pointer position in screen coordinates, or None when the
    /// driving event did not originate on the canvas (menu, keyboard).
    pub fn set_pointer(&mut self, pointer: Option<PointD>) {
        self.pointer = pointer;
    }

    /// Replaces the highlight rectangle (image-space). Only the symmetric
    /// difference of the old and new rectangle is repainted; the dim state
    /// everywhere else is unchanged.
    pub fn set_highlight(&mut self, highlight: Option<RectI>) {
        let bounds = self.viewport.image_bounds();
        let highlight = highlight
            .map(|r| r.clamp_to(&bounds))
            .filter(|r| !r.is_empty());
        for rect in highlight_damage(self.highlight, highlight) {
            self.damage.mark_dirty(rect);
        }
        self.highlight = highlight;
    }

    pub fn on_scale_changed(&mut self, callback: impl FnMut(ZoomFactor) + 'static) {
        self.scale_listeners.push(Box::new(callback));
    }

    pub fn on_scroll_changed(&mut self, callback: impl FnMut(i32, i32) + 'static) {
        self.scroll_listeners.push(Box::new(callback));
    }

    /// Registers for shrink-wrap window size requests (content size).
    pub fn on_window_size_request(&mut self, callback: impl FnMut(SizeI) + 'static) {
        self.window_listeners.push(Box::new(callback));
    }

    /// Hands out a sender that foreign threads use to report damage.
    pub fn create_damage_sender(&self) -> DamageSender {
        self.damage_tx.clone()
    }

    /// One event-loop turn: drains marshaled damage onto the owning thread
    /// and fires queued observer notifications, each at most once.
    pub fn tick(&mut self) {
        while let Ok(msg) = self.damage_rx.try_recv() {
            match msg.event {
                DamageEvent::Rect(rect) => self.damage.mark_dirty(rect),
                DamageEvent::All => self.damage.mark_all(),
            }
        }
        if self.pending.scale {
            self.pending.scale = false;
            let zoom = self.zoom_model.zoom();
            for callback in &mut self.scale_listeners {
                callback(zoom);
            }
        }
        if self.pending.scroll {
            self.pending.scroll = false;
            let (x, y) = (self.viewport.offset_x(), self.viewport.offset_y());
            for callback in &mut self.scroll_listeners {
                callback(x, y);
            }
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.damage.is_dirty()
    }

    /// Drains accumulated damage and paints it through the sink, using the
    /// viewport transform as it exists now.
    pub fn flush_damage(&mut self, sink: &mut dyn PaintSink) -> ViewResult<()> {
        let source = self.live_source().ok_or(ViewError::SourceDetached)?;
        let rects = self.damage.flush();
        if rects.is_empty() {
            return Ok(());
        }
        self.driver
            .paint(&self.viewport, &rects, self.highlight, source.as_ref(), sink)
    }

    /// Sizes the window to the scaled image, bounded by the monitor work
    /// area. With `grow_only` the window never shrinks (used for automatic
    /// resize sequences).
    pub fn shrink_wrap(&mut self, grow_only: bool) {
        let desired = self.viewport.scaled_image_size();
        if let Some(size) = shrink_wrap_size(&self.window, desired, grow_only) {
            debug!("shrink wrap to {}x{}", size.width(), size.height());
            self.window.content = size;
            // Assume the window system honors the request; a configure
            // event with the final size arrives via set_display_size
            self.viewport.set_display_size(size.width(), size.height());
            self.viewport.clamp_and_update();
            self.damage.mark_all();
            self.pending.scroll = true;
            for callback in &mut self.window_listeners {
                callback(size);
            }
        }
    }

    pub(crate) fn after_scale_change(&mut self) {
        self.damage.mark_all();
        self.pending.scale = true;
        self.pending.scroll = true;
    }
}
