//! Binding Configuration
//!
//! Handles parsing and management of `cronet.toml` files, which tell the
//! process-wide loader where to look for the native library.
//!
//! ```toml
//! [library]
//! path = "/opt/cronet/libcronet.so"
//! search_paths = ["/opt/cronet/lib"]
//! ```

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ffi::LibraryLocator;

/// File name searched for from the working directory upward
pub const CONFIG_FILE_NAME: &str = "cronet.toml";

/// Environment variable that replaces `library.path`
pub const LIBRARY_PATH_ENV: &str = "CRONET_LIBRARY_PATH";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching cronet.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BindConfig {
    /// Native library discovery
    #[serde(default)]
    pub library: LibraryConfig,
}

/// `[library]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LibraryConfig {
    /// Explicit library file; skips the directory search
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Directories searched after the standard ones
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,
}

impl BindConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: BindConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the current directory or parents, then apply
    /// `CRONET_LIBRARY_PATH`.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::Io)?;
        let config = Self::find_and_load(&cwd)?;
        Ok(config.with_env_override(std::env::var_os(LIBRARY_PATH_ENV)))
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                log::debug!("cronet: using config {}", config_path.display());
                return Self::load(&config_path);
            }
            if !dir.pop() {
                return Ok(Self::default());
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Replace `library.path` with a non-empty override value.
    pub fn with_env_override(mut self, value: Option<OsString>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.library.path = Some(PathBuf::from(value));
        }
        self
    }

    /// Discovery plan for this configuration.
    pub fn locator(&self) -> LibraryLocator {
        let mut locator = LibraryLocator::new();
        if let Some(path) = &self.library.path {
            locator = locator.with_explicit_path(path.clone());
        }
        for dir in &self.library.search_paths {
            locator.add_search_path(dir);
        }
        locator
    }
}
