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

use std::fmt::Debug;

/// A rectangle defined by two corner points (x0, y0) and (x1, y1).
/// The rectangle is valid when x0 <= x1 and y0 <= y1.
/// Empty rectangles have x0 >= x1 or y0 >= y1.
///
/// Generic over numeric types T that support basic arithmetic and comparison operations.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Rect<T> {
    pub x0: T,
    pub y0: T,
    pub x1: T,
    pub y1: T,
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Size<T> {
    width: T,
    height: T,
}

impl<T> Size<T>
where
    T: Copy,
{
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> T {
        self.width
    }

    pub fn height(&self) -> T {
        self.height
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct VectorPoint<T> {
    x: T,
    y: T,
}

impl<T> VectorPoint<T>
where
    T: Copy,
{
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> T {
        self.x
    }

    pub fn y(&self) -> T {
        self.y
    }
}

impl VectorPoint<i32> {
    /// Converts this i32 point to an f64 point
    pub fn to_f64_point(self) -> VectorPoint<f64> {
        VectorPoint::new(self.x as f64, self.y as f64)
    }
}

impl VectorPoint<f64> {
    /// Rounds both components to the nearest integer point
    pub fn round(self) -> VectorPoint<i32> {
        VectorPoint::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl<T> Rect<T>
where
    T: Copy
        + PartialOrd
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Mul<Output = T>
        + std::ops::Div<Output = T>
        + Debug
        + Default,
{
    /// Creates a new rectangle with the given coordinates.
    /// No validation is performed - the rectangle may be invalid or empty.
    pub const fn new(x0: T, y0: T, x1: T, y1: T) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Returns true if the rectangle is empty (has zero or negative area).
    /// An empty rectangle has x0 >= x1 or y0 >= y1.
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Returns true if the rectangle is valid (x0 <= x1 and y0 <= y1).
    /// A valid rectangle may still be empty if x0 == x1 or y0 == y1.
    pub fn is_valid(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    /// Returns true if the point (x, y) is contained within the rectangle.
    /// Uses half-open intervals: [x0, x1) and [y0, y1).
    /// Returns false for empty rectangles.
    pub fn contains(&self, p: VectorPoint<T>) -> bool {
        if self.is_empty() {
            false
        } else {
            p.x >= self.x0 && p.x < self.x1 && p.y >= self.y0 && p.y < self.y1
        }
    }

    /// Returns the width of the rectangle.
    /// Returns zero for empty rectangles.
    pub fn width(&self) -> T {
        if self.is_empty() {
            T::default()
        } else {
            self.x1 - self.x0
        }
    }

    /// Returns the height of the rectangle.
    /// Returns zero for empty rectangles.
    pub fn height(&self) -> T {
        if self.is_empty() {
            T::default()
        } else {
            self.y1 - self.y0
        }
    }

    /// Returns the size of the rectangle.
    /// Returns zero for empty rectangles.
    pub fn size(&self) -> Size<T> {
        if self.is_empty() {
            Size::default()
        } else {
            Size {
                width: self.x1 - self.x0,
                height: self.y1 - self.y0,
            }
        }
    }

    /// Returns the union of this rectangle with another rectangle.
    /// The union is the smallest rectangle that contains both rectangles.
    /// If one rectangle is empty, returns the other rectangle.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() && other.is_empty() {
            Self::new(T::default(), T::default(), T::default(), T::default())
        } else if self.is_empty() {
            *other
        } else if other.is_empty() {
            *self
        } else {
            Self::new(
                if self.x0 <= other.x0 {
                    self.x0
                } else {
                    other.x0
                },
                if self.y0 <= other.y0 {
                    self.y0
                } else {
                    other.y0
                },
                if self.x1 >= other.x1 {
                    self.x1
                } else {
                    other.x1
                },
                if self.y1 >= other.y1 {
                    self.y1
                } else {
                    other.y1
                },
            )
        }
    }

    /// Returns the intersection of this rectangle with another rectangle.
    /// The intersection is the largest rectangle contained in both rectangles.
    /// Returns an empty rectangle if there is no intersection.
    pub fn intersect(&self, other: &Self) -> Self {
        let x0 = if self.x0 >= other.x0 {
            self.x0
        } else {
            other.x0
        };
        let y0 = if self.y0 >= other.y0 {
            self.y0
        } else {
            other.y0
        };
        let x1 = if self.x1 <= other.x1 {
            self.x1
        } else {
            other.x1
        };
        let y1 = if self.y1 <= other.y1 {
            self.y1
        } else {
            other.y1
        };

        Self::new(x0, y0, x1, y1)
    }

    /// Returns this rectangle clamped to lie within the given bounds.
    /// Equivalent to intersect, named for call sites where the second
    /// rectangle acts as a limit rather than a peer.
    pub fn clamp_to(&self, bounds: &Self) -> Self {
        self.intersect(bounds)
    }

    /// Returns a new rectangle with each axis scaled independently.
    /// Needed when horizontal and vertical resolutions differ.
    pub fn scale_xy(&self, scale_x: T, scale_y: T) -> Self {
        Self::new(
            self.x0 * scale_x,
            self.y0 * scale_y,
            self.x1 * scale_x,
            self.y1 * scale_y,
        )
    }

    /// Returns a new rectangle translated by the given offsets.
    /// Both corner points are moved by (xoff, yoff).
    pub fn translate(&self, offset: VectorPoint<T>) -> Self {
        Self::new(
            self.x0 + offset.x(),
            self.y0 + offset.y(),
            self.x1 + offset.x(),
            self.y1 + offset.y(),
        )
    }
}

// Floating-point specific implementations
impl Rect<f64> {
    /// Rounds the rectangle coordinates to the nearest integers.
    /// Returns (x0, y0, x1, y1) as i32 values.
    /// Uses floor for top-left corner and ceil for bottom-right to ensure coverage.
    pub fn round(&self) -> (i32, i32, i32, i32) {
        (
            self.x0.floor() as i32,
            self.y0.floor() as i32,
            self.x1.ceil() as i32,
            self.y1.ceil() as i32,
        )
    }

    /// Converts this f64 rectangle to an i32 rectangle using conservative rounding
    pub fn to_i32_rect(self) -> Rect<i32> {
        let (x0, y0, x1, y1) = self.round();
        Rect::new(x0, y0, x1, y1)
    }

    pub fn center(self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

// Integer specific implementations
impl Rect<i32> {
    /// Converts this i32 rectangle to an f64 rectangle
    pub fn to_f64_rect(self) -> Rect<f64> {
        Rect::new(
            self.x0 as f64,
            self.y0 as f64,
            self.x1 as f64,
            self.y1 as f64,
        )
    }

    /// Returns this rectangle grown outward by the given margin on all sides.
    pub fn grow(&self, margin: i32) -> Self {
        Self::new(
            self.x0 - margin,
            self.y0 - margin,
            self.x1 + margin,
            self.y1 + margin,
        )
    }

    /// Returns the parts of this rectangle not covered by `other`, as up to
    /// four disjoint rectangles (bands above, below, left, right of the
    /// overlap). Returns this rectangle whole when there is no overlap, and
    /// nothing when `other` covers it completely.
    pub fn subtract(&self, other: &Self) -> Vec<Self> {
        let mut parts = Vec::with_capacity(4);
        if self.is_empty() {
            return parts;
        }
        let overlap = self.intersect(other);
        if overlap.is_empty() {
            parts.push(*self);
            return parts;
        }
        if overlap.y0 > self.y0 {
            parts.push(Self::new(self.x0, self.y0, self.x1, overlap.y0));
        }
        if overlap.y1 < self.y1 {
            parts.push(Self::new(self.x0, overlap.y1, self.x1, self.y1));
        }
        if overlap.x0 > self.x0 {
            parts.push(Self::new(self.x0, overlap.y0, overlap.x0, overlap.y1));
        }
        if overlap.x1 < self.x1 {
            parts.push(Self::new(overlap.x1, overlap.y0, self.x1, overlap.y1));
        }
        parts
    }

    /// Total number of pixels covered by the rectangle.
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }
}

// Type aliases for convenience
pub type RectI = Rect<i32>;
pub type RectD = Rect<f64>;
pub type SizeI = Size<i32>;
pub type SizeD = Size<f64>;
pub type PointI = VectorPoint<i32>;
pub type PointD = VectorPoint<f64>;
pub type VectorI = VectorPoint<i32>;
pub type VectorD = VectorPoint<f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i32_rect() {
        let rect = RectI::new(0, 0, 10, 20);

        assert!(!rect.is_empty());
        assert!(rect.is_valid());
        assert!(rect.contains(PointI::new(5, 5)));
        assert!(!rect.contains(PointI::new(10, 5))); // Exclusive upper bound
        assert_eq!(rect.width(), 10);
        assert_eq!(rect.height(), 20);
        assert_eq!(rect.size(), SizeI::new(10, 20));
        assert_eq!(rect.area(), 200);

        let translated = rect.translate(VectorI::new(5, 5));
        assert_eq!(translated, RectI::new(5, 5, 15, 25));
    }

    #[test]
    fn test_union() {
        let rect1 = RectI::new(0, 0, 5, 5);
        let rect2 = RectI::new(3, 3, 8, 8);
        assert_eq!(rect1.union(&rect2), RectI::new(0, 0, 8, 8));

        // Union with an empty rectangle returns the other operand
        let empty = RectI::new(4, 4, 4, 4);
        assert_eq!(rect1.union(&empty), rect1);
        assert_eq!(empty.union(&rect2), rect2);
    }

    #[test]
    fn test_intersect_and_clamp() {
        let rect1 = RectI::new(0, 0, 10, 10);
        let rect2 = RectI::new(5, 5, 15, 15);
        assert_eq!(rect1.intersect(&rect2), RectI::new(5, 5, 10, 10));

        let rect3 = RectI::new(20, 20, 30, 30);
        assert!(rect1.intersect(&rect3).is_empty());

        let bounds = RectI::new(0, 0, 8, 8);
        assert_eq!(rect2.clamp_to(&bounds), RectI::new(5, 5, 8, 8));
    }

    #[test]
    fn test_scale_xy() {
        let rect = RectD::new(1.0, 2.0, 3.0, 4.0);
        let scaled = rect.scale_xy(2.0, 0.5);
        assert_eq!(scaled, RectD::new(2.0, 1.0, 6.0, 2.0));
    }

    #[test]
    fn test_grow() {
        let rect = RectI::new(5, 5, 10, 10);
        assert_eq!(rect.grow(1), RectI::new(4, 4, 11, 11));
        assert_eq!(rect.grow(1).grow(-1), rect);
    }

    #[test]
    fn test_f64_rounding_is_conservative() {
        let rect = RectD::new(1.2, 2.7, 5.1, 6.9);
        let (x0, y0, x1, y1) = rect.round();
        assert_eq!((x0, y0, x1, y1), (1, 2, 6, 7));

        let exact = RectD::new(2.0, 3.0, 4.0, 5.0);
        assert_eq!(exact.round(), (2, 3, 4, 5));
        assert_eq!(exact.to_i32_rect(), RectI::new(2, 3, 4, 5));
    }

    #[test]
    fn test_subtract_no_overlap() {
        let a = RectI::new(0, 0, 5, 5);
        let b = RectI::new(10, 10, 15, 15);
        assert_eq!(a.subtract(&b), vec![a]);
    }

    #[test]
    fn test_subtract_fully_covered() {
        let a = RectI::new(2, 2, 4, 4);
        let b = RectI::new(0, 0, 10, 10);
        assert!(a.subtract(&b).is_empty());
    }

    #[test]
    fn test_subtract_partial_overlap() {
        let a = RectI::new(0, 0, 10, 10);
        let b = RectI::new(4, 4, 6, 6);
        let parts = a.subtract(&b);
        assert_eq!(parts.len(), 4);

        // The pieces are disjoint and together with the overlap cover `a`
        let total: i64 = parts.iter().map(|r| r.area()).sum();
        assert_eq!(total + a.intersect(&b).area(), a.area());
        for (i, p) in parts.iter().enumerate() {
            assert!(!p.is_empty());
            assert!(p.intersect(&b).is_empty());
            for q in parts.iter().skip(i + 1) {
                assert!(p.intersect(q).is_empty());
            }
        }
    }

    #[test]
    fn test_subtract_edge_overlap() {
        // Overlap flush with the left edge produces three bands
        let a = RectI::new(0, 0, 10, 10);
        let b = RectI::new(0, 3, 4, 7);
        let parts = a.subtract(&b);
        assert_eq!(parts.len(), 3);
        let total: i64 = parts.iter().map(|r| r.area()).sum();
        assert_eq!(total, a.area() - b.area());
    }

    #[test]
    fn test_point_conversions() {
        let p = PointI::new(3, -2);
        assert_eq!(p.to_f64_point(), PointD::new(3.0, -2.0));
        assert_eq!(PointD::new(3.4, -2.6).round(), PointI::new(3, -3));
    }

    #[test]
    fn test_center() {
        let rect = RectD::new(0.0, 0.0, 10.0, 4.0);
        assert_eq!(rect.center(), (5.0, 2.0));
    }
}
