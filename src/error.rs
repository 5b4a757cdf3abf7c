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

use std::fmt;

use crate::rect::RectI;

pub type ViewResult<T> = Result<T, ViewError>;

/// Failures that can surface from the display pipeline.
///
/// The pipeline itself is mostly infallible geometry; errors originate at its
/// edges: configuration I/O and the external pixel source.
#[derive(Debug)]
pub enum ViewError {
    /// The session has no live pixel source (never attached, or dropped)
    SourceDetached,
    /// The pixel source failed to produce data for a tile
    PixelFetch {
        rect: RectI,
        level: u32,
        reason: String,
    },
    Io(std::io::Error),
    Json(serde_json::Error),
    App(String),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::SourceDetached => write!(f, "no pixel source attached"),
            ViewError::PixelFetch {
                rect,
                level,
                reason,
            } => write!(
                f,
                "pixel fetch failed for ({},{})-({},{}) at level {level}: {reason}",
                rect.x0, rect.y0, rect.x1, rect.y1
            ),
            ViewError::Io(e) => write!(f, "io: {e}"),
            ViewError::Json(e) => write!(f, "json: {e}"),
            ViewError::App(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::Io(e) => Some(e),
            ViewError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViewError {
    fn from(e: std::io::Error) -> Self {
        ViewError::Io(e)
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(e: serde_json::Error) -> Self {
        ViewError::Json(e)
    }
}

impl From<&str> for ViewError {
    fn from(msg: &str) -> Self {
        ViewError::App(msg.to_string())
    }
}

impl From<String> for ViewError {
    fn from(msg: String) -> Self {
        ViewError::App(msg)
    }
}

/// Creates a `ViewError::App` from a format string.
#[macro_export]
macro_rules! raster_error {
    ($($arg:tt)*) => {
        $crate::error::ViewError::App(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = ViewError::PixelFetch {
            rect: RectI::new(0, 0, 64, 64),
            level: 2,
            reason: "decode failed".into(),
        };
        let text = e.to_string();
        assert!(text.contains("level 2"));
        assert!(text.contains("decode failed"));

        assert_eq!(
            ViewError::SourceDetached.to_string(),
            "no pixel source attached"
        );
    }

    #[test]
    fn test_from_str_and_macro() {
        let e = ViewError::from("bad state");
        assert!(matches!(e, ViewError::App(_)));

        let e = raster_error!("tile {} missing", 7);
        assert_eq!(e.to_string(), "tile 7 missing");
    }
}
