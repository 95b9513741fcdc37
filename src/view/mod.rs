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

mod imp;

use gdk_pixbuf::Pixbuf;
use glib::{closure_local, object::ObjectExt, subclass::types::ObjectSubclassIsExt, SignalHandlerId};
use gtk4::prelude::WidgetExt;

use crate::{
    error::{TransferError, TransferResult},
    transfer::{
        ApartStage, ChoreographyMode, Easing, SourceInfo, TransferEngine, TransferEvent,
        TransitionState,
    },
};

/// Emitted once per finished segment with `(state, mode, stage)` codes,
/// see [`TransferEvent::codes`].
pub const SIGNAL_TRANSFER_COMPLETE: &str = "transfer-complete";

glib::wrapper! {
    pub struct TransferView(ObjectSubclass<imp::TransferViewImp>)
        @extends gtk4::DrawingArea, gtk4::Widget, @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget;
}

impl Default for TransferView {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferView {
    pub fn new() -> Self {
        glib::Object::builder().build()
    }

    /// Replace the displayed image. A running transition keeps its geometry
    /// until it finishes.
    pub fn set_pixbuf(&self, pixbuf: Option<Pixbuf>) {
        self.imp().pixbuf.replace(pixbuf);
        self.queue_draw();
    }

    pub fn pixbuf(&self) -> Option<Pixbuf> {
        self.imp().pixbuf.borrow().clone()
    }

    pub fn set_background(&self, color: [u8; 3]) {
        self.imp().background.set(color);
        self.queue_draw();
    }

    /// Geometry of the thumbnail the transition starts from (in) or ends at (out).
    pub fn set_source_info(&self, width: f64, height: f64, location_x: f64, location_y: f64) {
        self.engine(|engine| engine.set_source_info(width, height, location_x, location_y));
    }

    pub fn source_info(&self) -> Option<SourceInfo> {
        self.engine(|engine| engine.source_info()).flatten()
    }

    /// Animate from the thumbnail to the fitted image. `stage` selects
    /// [`ChoreographyMode::Apart`]; `None` moves and scales together.
    pub fn transform_in(&self, stage: Option<ApartStage>) -> TransferResult<()> {
        self.engine(|engine| engine.begin_transition_in(stage))
            .unwrap_or(Err(TransferError::NotReady))?;
        self.queue_draw();
        Ok(())
    }

    /// Animate from the fitted image back to the thumbnail.
    pub fn transform_out(&self) -> TransferResult<()> {
        self.engine(|engine| engine.begin_transition_out())
            .unwrap_or(Err(TransferError::NotReady))?;
        self.queue_draw();
        Ok(())
    }

    /// Stop a pending or running segment without completing it.
    pub fn cancel(&self) {
        self.engine(|engine| engine.cancel());
    }

    pub fn duration(&self) -> u64 {
        self.engine(|engine| engine.duration()).unwrap_or_default()
    }

    pub fn set_duration(&self, duration_ms: u64) -> TransferResult<()> {
        self.engine(|engine| engine.set_duration(duration_ms))
            .unwrap_or(Err(TransferError::NotReady))
    }

    pub fn easing(&self) -> Easing {
        self.engine(|engine| engine.easing()).unwrap_or_default()
    }

    pub fn set_easing(&self, easing: Easing) {
        self.engine(|engine| engine.set_easing(easing));
    }

    pub fn state(&self) -> TransitionState {
        self.engine(|engine| engine.state()).unwrap_or_default()
    }

    pub fn mode(&self) -> ChoreographyMode {
        self.engine(|engine| engine.mode()).unwrap_or_default()
    }

    pub fn stage(&self) -> Option<ApartStage> {
        self.engine(|engine| engine.stage()).flatten()
    }

    pub fn is_busy(&self) -> bool {
        self.engine(|engine| engine.is_busy()).unwrap_or_default()
    }

    pub fn connect_transfer_complete<F: Fn(&Self, TransferEvent) + 'static>(
        &self,
        f: F,
    ) -> SignalHandlerId {
        self.connect_closure(
            SIGNAL_TRANSFER_COMPLETE,
            false,
            closure_local!(move |view: &TransferView, state: i32, mode: i32, stage: i32| {
                f(view, TransferEvent::from_codes(state, mode, stage))
            }),
        )
    }

    fn engine<R>(&self, f: impl FnOnce(&mut TransferEngine) -> R) -> Option<R> {
        self.imp().with_engine(f)
    }
}
