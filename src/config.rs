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

use std::{
    fs::{create_dir_all, read_to_string, File},
    io::{BufWriter, Write},
    path::PathBuf,
};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::ViewResult,
    viewport::{scale::ZoomFocus, DEFAULT_MONITOR_RESOLUTION},
};

/// Display behavior preferences consumed by the session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Resize the window to the new image extent on every zoom instead of
    /// anchoring the zoom at a focus point
    pub resize_windows_on_zoom: bool,
    /// Shrink-wrap the window when the image size changes
    pub resize_windows_on_resize: bool,
    /// Map one image pixel to one screen pixel at 1:1, ignoring resolution
    pub dot_for_dot: bool,
    /// Focus hint used by zoom requests that do not carry one
    pub default_zoom_focus: ZoomFocus,
    /// Monitor resolution in dots per inch; only consulted when
    /// `dot_for_dot` is off
    pub monitor_xres: f64,
    pub monitor_yres: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            resize_windows_on_zoom: false,
            resize_windows_on_resize: false,
            dot_for_dot: true,
            default_zoom_focus: ZoomFocus::default(),
            monitor_xres: DEFAULT_MONITOR_RESOLUTION,
            monitor_yres: DEFAULT_MONITOR_RESOLUTION,
        }
    }
}

impl DisplayConfig {
    fn config_dir() -> PathBuf {
        let mut dir = dirs::config_dir().unwrap_or_default();
        dir.push("rasterview");
        dir
    }

    fn config_file() -> PathBuf {
        Self::config_dir().join("rasterview.json")
    }

    /// Loads the saved configuration, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load() -> Self {
        match read_to_string(Self::config_file()) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    warn!("ignoring malformed config: {e}");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> ViewResult<()> {
        create_dir_all(Self::config_dir())?;
        let file = File::create(Self::config_file())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert!(!config.resize_windows_on_zoom);
        assert!(!config.resize_windows_on_resize);
        assert!(config.dot_for_dot);
        assert_eq!(config.default_zoom_focus, ZoomFocus::BestGuess);
        assert_eq!(config.monitor_xres, 96.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = DisplayConfig::default();
        config.resize_windows_on_zoom = true;
        config.default_zoom_focus = ZoomFocus::RetainCenteringElseBestGuess;
        config.monitor_xres = 109.0;

        let text = serde_json::to_string(&config).unwrap();
        let back: DisplayConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: DisplayConfig =
            serde_json::from_str(r#"{ "dot_for_dot": false, "default_zoom_focus": "pointer" }"#)
                .unwrap();
        assert!(!config.dot_for_dot);
        assert_eq!(config.default_zoom_focus, ZoomFocus::Pointer);
        assert_eq!(config.monitor_yres, 96.0);
    }
}
