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

use std::{cell::OnceCell, env};

use gdk_pixbuf::Pixbuf;
use glib::clone;
use gtk4::{
    gdk::BUTTON_SECONDARY, glib, prelude::*, subclass::prelude::*, ApplicationWindow,
    GestureClick, HeaderBar,
};
use log::{debug, error, info, warn};

use transfer_view::{
    error::TransferResult,
    rect::RectD,
    transfer::{ApartStage, ChoreographyMode, TransferEvent, TransitionState},
    view::TransferView,
};

/// Where the thumbnail sits in the view
const THUMBNAIL: RectD = RectD {
    x0: 24.0,
    y0: 24.0,
    x1: 184.0,
    y1: 144.0,
};

#[derive(Debug, Default)]
pub struct TransferWindowImp {
    view: OnceCell<TransferView>,
}

#[glib::object_subclass]
impl ObjectSubclass for TransferWindowImp {
    const NAME: &'static str = "TransferWindow";
    type Type = super::TransferWindow;
    type ParentType = ApplicationWindow;
}

impl TransferWindowImp {
    fn load_image(view: &TransferView) -> TransferResult<()> {
        let Some(filename) = env::args().nth(1) else {
            warn!("no image given, usage: transfer-view <image>");
            return Ok(());
        };
        let pixbuf = Pixbuf::from_file(&filename)?;
        info!("loaded {filename} ({}x{})", pixbuf.width(), pixbuf.height());
        view.set_pixbuf(Some(pixbuf));
        Ok(())
    }

    /// Primary click toggles between thumbnail and full image, secondary
    /// click animates in with translation and scaling apart.
    fn on_click(&self, button: u32) {
        let Some(view) = self.view.get() else {
            return;
        };
        if view.is_busy() {
            debug!("click ignored, transition active");
            return;
        }
        view.set_source_info(
            THUMBNAIL.width(),
            THUMBNAIL.height(),
            THUMBNAIL.left(),
            THUMBNAIL.top(),
        );
        let result = match (view.state(), button) {
            (TransitionState::TransitioningOut, BUTTON_SECONDARY) => {
                view.transform_in(Some(ApartStage::Translate))
            }
            (TransitionState::TransitioningOut, _) => view.transform_in(None),
            _ => view.transform_out(),
        };
        if let Err(e) = result {
            warn!("transition not started: {e}");
        }
    }

    fn on_complete(view: &TransferView, event: TransferEvent) {
        debug!("transfer complete: {event:?}");
        // chain the scale stage after the translate stage
        if event.mode == ChoreographyMode::Apart
            && event.stage == Some(ApartStage::Translate)
            && !view.is_busy()
        {
            if let Err(e) = view.transform_in(Some(ApartStage::Scale)) {
                warn!("scale stage not started: {e}");
            }
        }
    }
}

impl ObjectImpl for TransferWindowImp {
    fn constructed(&self) {
        self.parent_constructed();

        let window = self.obj();
        window.set_title(Some("TransferView"));
        window.set_default_size(960, 720);

        let header_bar = HeaderBar::new();
        window.set_titlebar(Some(&header_bar));

        let view = TransferView::new();
        if let Err(e) = Self::load_image(&view) {
            error!("failed to load image: {e}");
        }
        view.connect_transfer_complete(Self::on_complete);

        let gesture_click = GestureClick::new();
        gesture_click.set_button(0);
        gesture_click.connect_pressed(clone!(
            #[weak(rename_to = this)]
            self,
            move |gesture, _n_press, _x, _y| this.on_click(gesture.current_button())
        ));
        view.add_controller(gesture_click);

        window.set_child(Some(&view));
        if self.view.set(view).is_err() {
            error!("window constructed twice");
        }
    }
}

impl WidgetImpl for TransferWindowImp {}
impl WindowImpl for TransferWindowImp {}
impl ApplicationWindowImpl for TransferWindowImp {}
