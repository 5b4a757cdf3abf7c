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

//! Display compositing and viewport transform core for tiled raster images.
//!
//! Maps an arbitrarily large image buffer onto a zoomed, scrolled,
//! resolution-aware viewport, repaints only dirty regions in bounded-size
//! chunks, and keeps scroll/zoom state consistent under continuous
//! pointer-driven mutation. The surrounding application supplies a pixel
//! source and receives paint commands; widgets, menus, and file handling
//! live elsewhere.

pub mod config;
pub mod damage;
pub mod error;
pub mod notify;
pub mod paint;
pub mod rect;
pub mod session;
pub mod viewport;

pub use config::DisplayConfig;
pub use error::{ViewError, ViewResult};
pub use notify::DamageSender;
pub use paint::{PaintOp, PaintSink, PixelBuffer, PixelSource, RepaintDriver};
pub use session::DisplaySession;
pub use viewport::{
    scale::{ZoomAction, ZoomFocus},
    scroll::ScrollbarRange,
    window_size::WindowMetrics,
    zoom::{ZoomDirection, ZoomFactor, ZoomModel},
    Viewport,
};
