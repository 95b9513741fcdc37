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

use gio::subclass::prelude::{ApplicationImpl, ApplicationImplExt};
use glib::subclass::{object::ObjectImpl, types::ObjectSubclass};
use gtk4::{
    glib,
    prelude::{GtkApplicationExt, GtkWindowExt},
    subclass::prelude::{GtkApplicationImpl, ObjectSubclassExt},
    Application,
};

use crate::window::TransferWindow;

#[derive(Debug, Default)]
pub struct TransferApplicationImp;

#[glib::object_subclass]
impl ObjectSubclass for TransferApplicationImp {
    const NAME: &'static str = "TransferApplication";
    type Type = super::TransferApplication;
    type ParentType = Application;
}

impl ObjectImpl for TransferApplicationImp {}

impl ApplicationImpl for TransferApplicationImp {
    fn activate(&self) {
        self.parent_activate();
        let app = self.obj();
        match app.active_window() {
            Some(window) => window.present(),
            None => TransferWindow::new(&app).present(),
        }
    }
}

impl GtkApplicationImpl for TransferApplicationImp {}
