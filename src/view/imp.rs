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

use std::{
    cell::{Cell, RefCell},
    sync::OnceLock,
};

use gdk_pixbuf::Pixbuf;
use gio::prelude::StaticType;
use glib::{clone, object::ObjectExt, subclass::Signal};
use gtk4::{prelude::*, subclass::prelude::*};
use log::{debug, warn};

use crate::{
    config::config,
    rect::SizeD,
    transfer::{
        compositor::{fit_snapshot, paint_frame},
        GlibTimeDriver, TickOutcome, TransferEngine,
    },
};

use super::{TransferView, SIGNAL_TRANSFER_COMPLETE};

#[derive(Default)]
pub struct TransferViewImp {
    engine: RefCell<Option<TransferEngine>>,
    pub(super) pixbuf: RefCell<Option<Pixbuf>>,
    pub(super) background: Cell<[u8; 3]>,
}

#[glib::object_subclass]
impl ObjectSubclass for TransferViewImp {
    const NAME: &'static str = "TransferView";
    type Type = TransferView;
    type ParentType = gtk4::DrawingArea;
}

impl TransferViewImp {
    /// Run `f` on the engine. `None` only before the widget is constructed.
    ///
    /// The borrow is released when `f` returns, so callers may emit signals
    /// afterwards without risking a reentrant borrow.
    pub(super) fn with_engine<R>(&self, f: impl FnOnce(&mut TransferEngine) -> R) -> Option<R> {
        self.engine.borrow_mut().as_mut().map(f)
    }

    fn image_size(&self) -> SizeD {
        match self.pixbuf.borrow().as_ref() {
            Some(pixbuf) => SizeD::new(pixbuf.width() as f64, pixbuf.height() as f64),
            None => SizeD::default(),
        }
    }

    fn tick(&self, fraction: f64) {
        match self.with_engine(|engine| engine.tick(fraction)) {
            Some(TickOutcome::Redraw) => self.obj().queue_draw(),
            Some(TickOutcome::Completed(event)) => {
                self.obj().queue_draw();
                let (state, mode, stage) = event.codes();
                self.obj()
                    .emit_by_name::<()>(SIGNAL_TRANSFER_COMPLETE, &[&state, &mode, &stage]);
            }
            Some(TickOutcome::Ignored) | None => (),
        }
    }

    fn draw(&self, context: &cairo::Context, width: i32, height: i32) {
        let view_size = SizeD::new(width as f64, height as f64);
        let image_size = self.image_size();

        let pixbuf = self.pixbuf.borrow();
        let Some(pixbuf) = pixbuf.as_ref() else {
            return;
        };

        // a running segment keeps the image size it was initialized with
        let frame = self
            .with_engine(|engine| {
                let frame = engine.frame(image_size, view_size)?;
                Some((frame, engine.transform()?.image_size()))
            })
            .flatten()
            .or_else(|| Some((fit_snapshot(image_size, view_size)?, image_size)));

        if let Some((frame, image_size)) = frame {
            if let Err(e) = paint_frame(context, pixbuf, image_size, &frame, self.background.get())
            {
                warn!("paint_frame: {e}");
            }
        }
    }
}

impl ObjectImpl for TransferViewImp {
    fn signals() -> &'static [Signal] {
        static SIGNALS: OnceLock<Vec<Signal>> = OnceLock::new();
        SIGNALS.get_or_init(|| {
            vec![Signal::builder(SIGNAL_TRANSFER_COMPLETE)
                .param_types([i32::static_type(), i32::static_type(), i32::static_type()])
                .build()]
        })
    }

    fn constructed(&self) {
        self.parent_constructed();
        let view = self.obj();
        view.set_hexpand(true);
        view.set_vexpand(true);

        let config = config();
        self.background.set(config.background);

        let driver = GlibTimeDriver::new(clone!(
            #[weak(rename_to = this)]
            self,
            move |fraction| this.tick(fraction)
        ));
        self.engine
            .replace(Some(TransferEngine::with_config(config, Box::new(driver))));
    }

    fn dispose(&self) {
        self.with_engine(|engine| engine.cancel());
    }
}

impl WidgetImpl for TransferViewImp {
    fn realize(&self) {
        self.parent_realize();
        self.obj().set_draw_func(clone!(
            #[weak(rename_to = this)]
            self,
            move |_, context, width, height| this.draw(context, width, height)
        ));
    }

    fn unrealize(&self) {
        if self.with_engine(|engine| engine.is_busy()) == Some(true) {
            debug!("view unrealized during a transition, cancelling");
            self.with_engine(|engine| engine.cancel());
        }
        self.parent_unrealize();
    }
}

impl DrawingAreaImpl for TransferViewImp {}
