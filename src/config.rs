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
    fs::{create_dir_all, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::OnceLock,
};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{error::TransferResult, transfer::easing::Easing};

pub const DEFAULT_DURATION_MS: u64 = 300;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Duration of one transition segment in milliseconds
    pub duration_ms: u64,
    pub easing: Easing,
    /// RGB of the backing layer drawn behind the image
    pub background: [u8; 3],
    /// Start the scale stage automatically when the translate stage completes
    pub auto_chain_stages: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::default(),
            background: [0, 0, 0],
            auto_chain_stages: false,
        }
    }
}

impl Config {
    fn config_dir() -> PathBuf {
        let mut dir = dirs::config_dir().unwrap_or_default();
        dir.push("transfer-view");
        dir
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    pub fn load(path: &Path) -> TransferResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, path: &Path) -> TransferResult<()> {
        if let Some(dir) = path.parent() {
            create_dir_all(dir)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

fn read_config() -> Config {
    let path = Config::config_file();
    match Config::load(&path) {
        Ok(config) => {
            info!("loaded configuration from {path:?}");
            config
        }
        Err(e) => {
            warn!("using default configuration ({path:?}: {e})");
            Config::default()
        }
    }
}

pub fn config<'a>() -> &'a Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(read_config)
}
