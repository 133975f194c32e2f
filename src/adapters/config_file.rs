//! JSON configuration file adapter.
//!
//! Implements [`ConfigPort`] by reading an [`AppConfig`] from the file
//! named in `VEHICLE_SKELETON_CONFIG`.  Missing keys take their defaults;
//! the result is validated before it is returned.

use std::io::ErrorKind;
use std::path::PathBuf;

use log::info;

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::AppConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "VEHICLE_SKELETON_CONFIG";

pub struct FileConfigAdapter {
    path: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Path from [`CONFIG_ENV`]; unset means there is no file to load.
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig, ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::NotFound)?;
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound,
            _ => ConfigError::IoError(e.to_string()),
        })?;
        let config: AppConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate()?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }
}
