use crate::display::catalog::CatalogOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io: {0}")]
    Io(#[from] io::Error),
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub show_all_modes: bool,
    pub show_hidpi_modes: bool,
    /// Mirrors the launch agent on disk, never written to the file.
    #[serde(skip)]
    pub launch_at_login: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_all_modes: false,
            show_hidpi_modes: true,
            launch_at_login: false,
        }
    }
}

pub fn config_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_default();
    PathBuf::from(home).join("Library/Application Support/resolution-menu")
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&config_dir().join(CONFIG_FILE))
    }

    /// Missing or unreadable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match Self::read(path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                log::warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self) {
        let path = config_dir().join(CONFIG_FILE);
        if let Err(e) = self.save_to(&path) {
            log::warn!("failed to save {}: {}", path.display(), e);
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            show_all_modes: self.show_all_modes,
            show_hidpi_modes: self.show_hidpi_modes,
        }
    }
}
