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

//! Geometry of a crop/fit transition.
//!
//! The start of a transition is the thumbnail: the image scaled to cover the
//! source rectangle (CENTER_CROP, the overflow is clipped). The end is the
//! image scaled to fit inside the view and centered (FIT_CENTER). Every frame
//! in between is a [`FrameSnapshot`] blended linearly from one end to the other.

use crate::{
    error::{TransferError, TransferResult},
    rect::{lerp, RectD, SizeD, VectorD},
};

/// On-screen geometry of the thumbnail, in view coordinates.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct SourceInfo {
    pub width: f64,
    pub height: f64,
    pub location_x: f64,
    pub location_y: f64,
}

impl SourceInfo {
    pub fn new(width: f64, height: f64, location_x: f64, location_y: f64) -> Self {
        Self {
            width,
            height,
            location_x,
            location_y,
        }
    }

    pub fn from_rect(rect: &RectD) -> Self {
        Self::new(rect.width(), rect.height(), rect.left(), rect.top())
    }

    pub fn size(&self) -> SizeD {
        SizeD::new(self.width, self.height)
    }

    pub fn rect(&self) -> RectD {
        RectD::new_from_origin(VectorD::new(self.location_x, self.location_y), self.size())
    }
}

/// Smallest scale at which `image` fully covers `target`.
pub fn crop_scale(image: SizeD, target: SizeD) -> f64 {
    (target.width() / image.width()).max(target.height() / image.height())
}

/// Largest scale at which `image` fully fits inside `bounds`.
pub fn fit_scale(image: SizeD, bounds: SizeD) -> f64 {
    (bounds.width() / image.width()).min(bounds.height() / image.height())
}

/// Everything needed to draw one frame. Replaced, never mutated, per tick.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    /// Image pixels to view pixels
    pub scale: f64,
    /// Visible window onto the scaled image
    pub rect: RectD,
    /// Opacity of the backing layer
    pub alpha: u8,
}

impl FrameSnapshot {
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            scale: lerp(self.scale, other.scale, t),
            rect: self.rect.lerp(&other.rect, t),
            alpha: lerp(self.alpha as f64, other.alpha as f64, t).round() as u8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    CropToFit,
    FitToCrop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    image_size: SizeD,
    start_scale: f64,
    end_scale: f64,
    start_rect: RectD,
    end_rect: RectD,
    from: FrameSnapshot,
    to: FrameSnapshot,
    current: FrameSnapshot,
}

impl TransformState {
    /// Compute start and end geometry for `image_size` shown in a view of
    /// `view_size`, starting from the thumbnail described by `source`.
    ///
    /// With `pin_scale` the end scale equals the start scale, so the segment
    /// only translates.
    ///
    /// Fails with [`TransferError::NotReady`] while either size is unknown.
    pub fn initialize(
        image_size: SizeD,
        view_size: SizeD,
        source: &SourceInfo,
        pin_scale: bool,
    ) -> TransferResult<Self> {
        if image_size.is_empty() || view_size.is_empty() {
            return Err(TransferError::NotReady);
        }

        let start_scale = crop_scale(image_size, source.size());
        let end_scale = if pin_scale {
            start_scale
        } else {
            fit_scale(image_size, view_size)
        };

        let start_rect = source.rect();
        let end_rect = RectD::centered(image_size.scale(end_scale), view_size);

        let start = FrameSnapshot {
            scale: start_scale,
            rect: start_rect,
            alpha: 0,
        };

        Ok(Self {
            image_size,
            start_scale,
            end_scale,
            start_rect,
            end_rect,
            from: start,
            to: start,
            current: start,
        })
    }

    /// Set the end points of the segment and rewind to its first frame.
    /// `alpha` is the backing layer opacity at the first and last frame.
    pub fn begin(&mut self, direction: Direction, alpha: (u8, u8)) {
        let start = FrameSnapshot {
            scale: self.start_scale,
            rect: self.start_rect,
            alpha: 0,
        };
        let end = FrameSnapshot {
            scale: self.end_scale,
            rect: self.end_rect,
            alpha: 0,
        };
        let (from, to) = match direction {
            Direction::CropToFit => (start, end),
            Direction::FitToCrop => (end, start),
        };
        self.from = FrameSnapshot {
            alpha: alpha.0,
            ..from
        };
        self.to = FrameSnapshot {
            alpha: alpha.1,
            ..to
        };
        self.current = self.from;
    }

    /// Move to fraction `t` of the segment (already eased).
    pub fn advance(&mut self, t: f64) -> FrameSnapshot {
        self.current = self.from.lerp(&self.to, t);
        self.current
    }

    pub fn image_size(&self) -> SizeD {
        self.image_size
    }

    pub fn start_scale(&self) -> f64 {
        self.start_scale
    }

    pub fn end_scale(&self) -> f64 {
        self.end_scale
    }

    pub fn start_rect(&self) -> RectD {
        self.start_rect
    }

    pub fn end_rect(&self) -> RectD {
        self.end_rect
    }

    pub fn current(&self) -> FrameSnapshot {
        self.current
    }
}
