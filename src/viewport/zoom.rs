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

use std::{fmt, str::FromStr, sync::OnceLock};

use log::debug;
use regex::Regex;

use crate::{error::ViewError, raster_error};

/// Maximum allowed zoom factor
pub const MAX_ZOOM_FACTOR: f64 = 256.0;
/// Minimum allowed zoom factor
pub const MIN_ZOOM_FACTOR: f64 = 1.0 / 256.0;

/// Floating point comparison epsilon for zoom factor decisions.
/// Scale factors accumulate rounding noise; equality decisions must never
/// use `==` or a hair-off factor re-triggers resizes and repaints.
pub const ZOOM_EPSILON: f64 = 1.0e-4;

/// Largest numerator/denominator used when approximating an arbitrary
/// factor as a fraction for display ("2:3", "1:8").
const MAX_FRACTION_PART: i64 = 256;

/// The curated zoom step table, 1:16 through 16:1 with sub-steps.
/// Entries are (numerator, denominator) pairs in strictly ascending order
/// of value. Stepped zoom only ever lands on these; arbitrary factors come
/// in through `zoom_to` (fit-to-window, percentage entry).
const ZOOM_STEPS: &[(u32, u32)] = &[
    (1, 16),
    (1, 12),
    (1, 8),
    (1, 6),
    (1, 5),
    (1, 4),
    (1, 3),
    (1, 2),
    (2, 3),
    (1, 1),
    (3, 2),
    (2, 1),
    (3, 1),
    (4, 1),
    (5, 1),
    (6, 1),
    (8, 1),
    (12, 1),
    (16, 1),
];

/// Direction of a stepped zoom request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// An exact zoom factor, kept as a positive numerator/denominator pair.
///
/// The floating factor is always recomputed from the fraction, never the
/// other way around, so repeated stepping cannot drift. The fraction is
/// also what the title bar and status bar display ("1:2", "150%").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomFactor {
    numerator: u32,
    denominator: u32,
}

impl Default for ZoomFactor {
    fn default() -> Self {
        Self {
            numerator: 1,
            denominator: 1,
        }
    }
}

impl ZoomFactor {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        debug_assert!(numerator > 0 && denominator > 0);
        Self {
            numerator: numerator.max(1),
            denominator: denominator.max(1),
        }
    }

    /// Approximates an arbitrary factor as a fraction by continued-fraction
    /// expansion, with numerator and denominator capped at 256. The input is
    /// clamped to the valid zoom range first.
    pub fn from_factor(factor: f64) -> Self {
        let factor = factor.clamp(MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR);

        let (mut p0, mut q0) = (0i64, 1i64);
        let (mut p1, mut q1) = (1i64, 0i64);
        let mut x = factor;

        loop {
            let a = x.floor();
            let p2 = a as i64 * p1 + p0;
            let q2 = a as i64 * q1 + q0;
            if p2 > MAX_FRACTION_PART || q2 > MAX_FRACTION_PART {
                break;
            }
            p0 = p1;
            q0 = q1;
            p1 = p2;
            q1 = q2;

            let frac = x - a;
            if frac < 1.0e-9 || (p1 as f64 / q1 as f64 - factor).abs() < ZOOM_EPSILON {
                break;
            }
            x = 1.0 / frac;
        }

        Self::new(p1.max(1) as u32, q1.max(1) as u32)
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// The floating zoom factor, recomputed from the fraction
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn percentage(&self) -> f64 {
        self.value() * 100.0
    }

    /// Ratio form used in window titles, e.g. "1:2" or "3:1"
    pub fn ratio_label(&self) -> String {
        format!("{}:{}", self.numerator, self.denominator)
    }
}

/// Percentage form used in the status bar scale entry, e.g. "150%"
impl fmt::Display for ZoomFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = self.percentage();
        if (pct - pct.round()).abs() < 0.05 {
            write!(f, "{:.0}%", pct)
        } else {
            write!(f, "{:.1}%", pct)
        }
    }
}

fn ratio_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*:\s*(\d+)\s*$").unwrap())
}

fn percent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*%?\s*$").unwrap())
}

impl FromStr for ZoomFactor {
    type Err = ViewError;

    /// Parses "n:d" ratio form and "p" / "p%" percentage form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(caps) = ratio_re().captures(s) {
            let num: u32 = caps[1].parse().map_err(|_| "zoom ratio out of range")?;
            let den: u32 = caps[2].parse().map_err(|_| "zoom ratio out of range")?;
            if num == 0 || den == 0 {
                return Err(ViewError::from("zoom ratio terms must be positive"));
            }
            return Ok(ZoomFactor::from_factor(num as f64 / den as f64));
        }
        if let Some(caps) = percent_re().captures(s) {
            let pct: f64 = caps[1].parse().map_err(|_| "zoom percentage out of range")?;
            if pct <= 0.0 {
                return Err(ViewError::from("zoom percentage must be positive"));
            }
            return Ok(ZoomFactor::from_factor(pct / 100.0));
        }
        Err(raster_error!("not a zoom ratio or percentage: {s:?}"))
    }
}

/// Returns the next table entry strictly greater (In) or less (Out) than
/// `current`, or None when `current` already sits at or beyond the table
/// extreme in that direction.
fn next_step(direction: ZoomDirection, current: f64) -> Option<(u32, u32)> {
    match direction {
        ZoomDirection::In => ZOOM_STEPS
            .iter()
            .find(|(n, d)| *n as f64 / *d as f64 > current + ZOOM_EPSILON)
            .copied(),
        ZoomDirection::Out => ZOOM_STEPS
            .iter()
            .rev()
            .find(|(n, d)| (*n as f64 / *d as f64) < current - ZOOM_EPSILON)
            .copied(),
    }
}

/// Stepped zoom over the fixed table. Saturates: stepping past either end
/// returns `current` unchanged, never an error.
pub fn zoom_step(direction: ZoomDirection, current: f64) -> f64 {
    match next_step(direction, current) {
        Some((n, d)) => n as f64 / d as f64,
        None => current,
    }
}

/// Holds the current zoom factor and applies stepped or explicit changes.
///
/// The model never fails: out-of-range requests saturate silently (logged
/// at debug level so misbehaving callers stay visible in development).
#[derive(Debug, Default, Clone)]
pub struct ZoomModel {
    current: ZoomFactor,
}

impl ZoomModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> ZoomFactor {
        self.current
    }

    pub fn factor(&self) -> f64 {
        self.current.value()
    }

    /// Steps to the next table entry. Returns whether the factor changed.
    pub fn step(&mut self, direction: ZoomDirection) -> bool {
        match next_step(direction, self.current.value()) {
            Some((n, d)) => {
                self.current = ZoomFactor::new(n, d);
                true
            }
            None => {
                debug!(
                    "zoom step {direction:?} saturated at {}",
                    self.current.ratio_label()
                );
                false
            }
        }
    }

    /// Sets an arbitrary factor, clamped to the valid range. Returns whether
    /// the factor changed (within epsilon).
    pub fn zoom_to(&mut self, factor: f64) -> bool {
        let clamped = factor.clamp(MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR);
        if (clamped - factor).abs() > ZOOM_EPSILON {
            debug!("zoom factor {factor} clamped to {clamped}");
        }
        if (clamped - self.current.value()).abs() < ZOOM_EPSILON {
            return false;
        }
        self.current = ZoomFactor::from_factor(clamped);
        true
    }
}
