use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::angle::{MAX_DEGREES, SNAP_UNIT};
use crate::app_dirs::AppDirs;
use crate::error::{ProtractorError, Result};
use crate::session::Mode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: Mode,
    /// Target typed into the field when a target round starts
    pub default_target: u16,
    pub snap_unit: u16,
    pub sound: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Free,
            default_target: 90,
            snap_unit: SNAP_UNIT,
            sound: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let unit = self.snap_unit;
        if unit == 0 || unit > 90 || MAX_DEGREES % unit != 0 {
            return Err(ProtractorError::InvalidSnapUnit(unit));
        }
        Ok(())
    }

    /// Replaces invalid fields with their defaults
    pub fn sanitized(mut self) -> Self {
        if let Err(e) = self.validate() {
            warn!("{}; using {}", e, SNAP_UNIT);
            self.snap_unit = SNAP_UNIT;
        }
        self.default_target = self.default_target.min(MAX_DEGREES);
        self
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg.sanitized(),
            Err(e) => {
                warn!("ignoring malformed config {}: {}", self.path.display(), e);
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        cfg.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
