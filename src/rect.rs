// TransferView -- Smooth crop-to-fit image transitions built with Rust and GTK4
//
// Copyright (c) 2024-2025 Martin van der Werff <github (at) newinnovations.nl>
//
// This file is part of TransferView.
//
// TransferView is free software: you can redistribute it and/or modify it under the terms of
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

/// Axis-aligned rectangle between corners (x0, y0) and (x1, y1), in view
/// coordinates. A plain value: operations return new rectangles.
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
    T: Copy + Default + PartialOrd + std::ops::Mul<Output = T>,
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

    /// Either dimension zero or negative
    pub fn is_empty(&self) -> bool {
        self.width <= T::default() || self.height <= T::default()
    }

    pub fn scale(&self, scale: T) -> Self {
        Self::new(self.width * scale, self.height * scale)
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

impl<T> Rect<T>
where
    T: Copy
        + PartialOrd
        + std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Mul<Output = T>
        + Debug
        + Default,
{
    pub const fn new(x0: T, y0: T, x1: T, y1: T) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Rectangle of `size` with its top-left corner at the origin.
    pub fn new_from_size(size: Size<T>) -> Self {
        Self::new(T::default(), T::default(), size.width, size.height)
    }

    /// Rectangle of `size` with its top-left corner at `origin`.
    pub fn new_from_origin(origin: VectorPoint<T>, size: Size<T>) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    /// No area: x0 >= x1 or y0 >= y1
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn left(&self) -> T {
        self.x0
    }

    pub fn top(&self) -> T {
        self.y0
    }

    /// Zero when empty, as is [`Self::height`].
    pub fn width(&self) -> T {
        if self.is_empty() {
            T::default()
        } else {
            self.x1 - self.x0
        }
    }

    pub fn height(&self) -> T {
        if self.is_empty() {
            T::default()
        } else {
            self.y1 - self.y0
        }
    }

    pub fn size(&self) -> Size<T> {
        Size::new(self.width(), self.height())
    }

    pub fn origin(&self) -> VectorPoint<T> {
        VectorPoint::new(self.x0, self.y0)
    }
}

impl Rect<f64> {
    /// Linear blend between `self` (t = 0) and `other` (t = 1).
    ///
    /// Corners are blended as `a * (1 - t) + b * t`, so both end points are
    /// reproduced exactly.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            lerp(self.x0, other.x0, t),
            lerp(self.y0, other.y0, t),
            lerp(self.x1, other.x1, t),
            lerp(self.y1, other.y1, t),
        )
    }

    /// Rectangle of `size` centered inside `bounds` (origin at 0, 0).
    pub fn centered(size: SizeD, bounds: SizeD) -> Self {
        Self::new_from_origin(
            VectorD::new(
                (bounds.width() - size.width()) / 2.0,
                (bounds.height() - size.height()) / 2.0,
            ),
            size,
        )
    }
}

/// `a * (1 - t) + b * t`; equal end points stay constant for every `t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if a == b {
        a
    } else {
        a * (1.0 - t) + b * t
    }
}

pub type RectD = Rect<f64>;
pub type SizeD = Size<f64>;
pub type VectorD = VectorPoint<f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_from_origin() {
        let rect = RectD::new_from_origin(VectorD::new(20.0, 40.0), SizeD::new(300.0, 200.0));

        assert!(!rect.is_empty());
        assert_eq!(rect.left(), 20.0);
        assert_eq!(rect.top(), 40.0);
        assert_eq!(rect.width(), 300.0);
        assert_eq!(rect.height(), 200.0);
        assert_eq!(rect.size(), SizeD::new(300.0, 200.0));
        assert_eq!(rect.origin(), VectorD::new(20.0, 40.0));
    }

    #[test]
    fn test_empty_rectangles() {
        let empty = RectD::new(5.0, 5.0, 5.0, 5.0);

        assert!(empty.is_empty());
        assert_eq!(empty.width(), 0.0);
        assert_eq!(empty.size(), SizeD::default());
        assert!(SizeD::new(0.0, 10.0).is_empty());
        assert!(SizeD::new(10.0, -1.0).is_empty());
        assert!(!SizeD::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_lerp_end_points_exact() {
        let a = RectD::new(20.0, 40.0, 320.0, 240.0);
        let b = RectD::new(0.0, 266.666_666_7, 640.0, 693.333_333_3);

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);

        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.left(), 10.0);
        assert_eq!(mid.x1, 480.0);
    }

    #[test]
    fn test_centered() {
        let rect = RectD::centered(SizeD::new(640.0, 400.0), SizeD::new(640.0, 960.0));
        assert_eq!(rect, RectD::new(0.0, 280.0, 640.0, 680.0));

        // wider than bounds gives a negative origin
        let rect = RectD::centered(SizeD::new(200.0, 100.0), SizeD::new(100.0, 100.0));
        assert_eq!(rect.left(), -50.0);
        assert_eq!(rect.top(), 0.0);
    }

    #[test]
    fn test_size_scale() {
        assert_eq!(SizeD::new(1200.0, 800.0).scale(0.25), SizeD::new(300.0, 200.0));
    }
}
