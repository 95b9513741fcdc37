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

//! Turns a [`FrameSnapshot`] into drawing operations.
//!
//! A frame is drawn in two steps: the origin moves to the snapshot rectangle
//! and drawing is clipped to its extent, then the image is scaled and centered
//! on that window. The clip window grows and moves per frame while the image
//! scales underneath it, which turns the cropped thumbnail into the fitted
//! image.

use cairo::{Context, Matrix};
use gdk_pixbuf::Pixbuf;
use gtk4::gdk::prelude::GdkCairoContextExt;

use crate::{
    error::TransferResult,
    rect::{RectD, SizeD},
    transfer::geometry::{fit_scale, FrameSnapshot},
};

/// Drawing surface capabilities needed to paint a transition frame.
pub trait Canvas {
    type Image;

    /// Fill the whole surface with `color` at opacity `alpha`.
    fn fill_background(&self, color: [u8; 3], alpha: u8) -> TransferResult<()>;
    fn save_state(&self) -> TransferResult<()>;
    fn restore_state(&self) -> TransferResult<()>;
    fn translate_origin(&self, x: f64, y: f64);
    fn clip_to(&self, rect: &RectD);
    fn concat(&self, matrix: &Matrix);
    /// Draw `image` of `size` with its top-left corner at the origin.
    fn draw_image(&self, image: &Self::Image, size: SizeD) -> TransferResult<()>;
}

/// Scale the image uniformly by `scale` and center it on the `rect` window.
/// The window itself is positioned by the caller.
pub fn image_matrix(scale: f64, rect: &RectD, image_size: SizeD) -> Matrix {
    Matrix::new(
        scale,
        0.0,
        0.0,
        scale,
        -(scale * image_size.width() / 2.0 - rect.width() / 2.0),
        -(scale * image_size.height() / 2.0 - rect.height() / 2.0),
    )
}

/// Clip window in the coordinate frame translated to the rect's origin.
pub fn clip_rect(rect: &RectD) -> RectD {
    RectD::new_from_size(rect.size())
}

/// Frame showing the image FIT_CENTER on an opaque background.
pub fn fit_snapshot(image_size: SizeD, view_size: SizeD) -> Option<FrameSnapshot> {
    if image_size.is_empty() || view_size.is_empty() {
        return None;
    }
    let scale = fit_scale(image_size, view_size);
    Some(FrameSnapshot {
        scale,
        rect: RectD::centered(image_size.scale(scale), view_size),
        alpha: 255,
    })
}

pub fn paint_frame<C: Canvas>(
    canvas: &C,
    image: &C::Image,
    image_size: SizeD,
    frame: &FrameSnapshot,
    background: [u8; 3],
) -> TransferResult<()> {
    canvas.fill_background(background, frame.alpha)?;
    canvas.save_state()?;
    canvas.translate_origin(frame.rect.left(), frame.rect.top());
    canvas.clip_to(&clip_rect(&frame.rect));
    canvas.concat(&image_matrix(frame.scale, &frame.rect, image_size));
    let drawn = canvas.draw_image(image, image_size);
    // always restore, the context is shared with the widget
    canvas.restore_state()?;
    drawn
}

impl Canvas for Context {
    type Image = Pixbuf;

    fn fill_background(&self, color: [u8; 3], alpha: u8) -> TransferResult<()> {
        self.set_source_rgba(
            color[0] as f64 / 255.0,
            color[1] as f64 / 255.0,
            color[2] as f64 / 255.0,
            alpha as f64 / 255.0,
        );
        self.paint()?;
        Ok(())
    }

    fn save_state(&self) -> TransferResult<()> {
        Context::save(self)?;
        Ok(())
    }

    fn restore_state(&self) -> TransferResult<()> {
        Context::restore(self)?;
        Ok(())
    }

    fn translate_origin(&self, x: f64, y: f64) {
        self.translate(x, y);
    }

    fn clip_to(&self, rect: &RectD) {
        self.rectangle(rect.left(), rect.top(), rect.width(), rect.height());
        self.clip();
    }

    fn concat(&self, matrix: &Matrix) {
        self.transform(*matrix);
    }

    fn draw_image(&self, image: &Pixbuf, size: SizeD) -> TransferResult<()> {
        self.set_source_pixbuf(image, 0.0, 0.0);
        self.rectangle(0.0, 0.0, size.width(), size.height());
        self.fill()?;
        Ok(())
    }
}
