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

//! Shrink-wrap window sizing: pick a window size that exactly fits the
//! scaled image when that fits on the monitor, capped otherwise.

use crate::rect::SizeI;

/// Largest share of the monitor work area a shrink-wrapped window may take
pub const SHRINK_WRAP_MONITOR_FRACTION: f64 = 0.75;

/// Window geometry inputs the sizing decision needs, measured from the
/// current layout. Chrome (rulers, scrollbars, statusbar) must be measured,
/// not assumed constant: at very small sizes those widgets overlap and the
/// effective border changes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowMetrics {
    /// Screen pixels consumed around the canvas by window decorations
    pub chrome: SizeI,
    /// Work area of the monitor the window is on
    pub monitor: SizeI,
    /// Current canvas (content) size
    pub content: SizeI,
}

/// Computes the shrink-wrapped canvas size for a desired content extent.
///
/// The resulting window (content plus chrome) grows to exactly fit the
/// desired content when that stays within 75% of the monitor work area and
/// caps at 75% otherwise. With `grow_only` the result never falls below the
/// current content size, so sequences of automatic resizes do not flicker
/// the window smaller and larger again.
///
/// Returns None when the monitor size is unknown (nothing sensible to
/// compute) or the result equals the current content size.
pub fn shrink_wrap_size(
    metrics: &WindowMetrics,
    desired_content: SizeI,
    grow_only: bool,
) -> Option<SizeI> {
    if metrics.monitor.width() <= 0 || metrics.monitor.height() <= 0 {
        return None;
    }

    let max_width =
        (metrics.monitor.width() as f64 * SHRINK_WRAP_MONITOR_FRACTION) as i32 - metrics.chrome.width();
    let max_height = (metrics.monitor.height() as f64 * SHRINK_WRAP_MONITOR_FRACTION) as i32
        - metrics.chrome.height();

    let mut width = desired_content.width().clamp(1, max_width.max(1));
    let mut height = desired_content.height().clamp(1, max_height.max(1));

    if grow_only {
        width = width.max(metrics.content.width());
        height = height.max(metrics.content.height());
    }

    let size = SizeI::new(width, height);
    if size == metrics.content {
        None
    } else {
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(content: (i32, i32)) -> WindowMetrics {
        WindowMetrics {
            chrome: SizeI::new(40, 60),
            monitor: SizeI::new(1920, 1080),
            content: SizeI::new(content.0, content.1),
        }
    }

    #[test]
    fn test_grows_to_fit_content() {
        let m = metrics((400, 300));
        let size = shrink_wrap_size(&m, SizeI::new(800, 600), false);
        assert_eq!(size, Some(SizeI::new(800, 600)));
    }

    #[test]
    fn test_caps_at_monitor_fraction() {
        let m = metrics((400, 300));
        let size = shrink_wrap_size(&m, SizeI::new(4000, 4000), false).unwrap();
        assert_eq!(size.width(), (1920.0 * 0.75) as i32 - 40);
        assert_eq!(size.height(), (1080.0 * 0.75) as i32 - 60);
    }

    #[test]
    fn test_grow_only_never_shrinks() {
        let m = metrics((400, 300));
        assert_eq!(shrink_wrap_size(&m, SizeI::new(200, 200), true), None);

        // Mixed axes: width grows, height is held at the current size
        let size = shrink_wrap_size(&m, SizeI::new(600, 200), true);
        assert_eq!(size, Some(SizeI::new(600, 300)));
    }

    #[test]
    fn test_shrinks_without_grow_only() {
        let m = metrics((400, 300));
        let size = shrink_wrap_size(&m, SizeI::new(200, 200), false);
        assert_eq!(size, Some(SizeI::new(200, 200)));
    }

    #[test]
    fn test_no_change_returns_none() {
        let m = metrics((400, 300));
        assert_eq!(shrink_wrap_size(&m, SizeI::new(400, 300), false), None);
    }

    #[test]
    fn test_unknown_monitor_returns_none() {
        let m = WindowMetrics::default();
        assert_eq!(shrink_wrap_size(&m, SizeI::new(800, 600), false), None);
    }
}
