//! Application configuration
//!
//! Built in three layers: compiled-in defaults, an optional `streamia.toml`
//! file, then `STREAMIA_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;
use streamia_net::{normalize_base_url, DEFAULT_API_URL};
use tracing::{info, warn};

use crate::error::{Error, Result};

pub const CONFIG_FILE: &str = "streamia.toml";
pub const CONFIG_PATH_VAR: &str = "STREAMIA_CONFIG";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub request_timeout: Duration,
    pub health_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            app_name: "STREAMIA".to_string(),
            app_version: "1.0.0".to_string(),
            debug: false,
            request_timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
        }
    }
}

/// On-disk shape of `streamia.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    app_name: Option<String>,
    app_version: Option<String>,
    debug: Option<bool>,
    request_timeout_secs: Option<u64>,
    health_timeout_secs: Option<u64>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "streamia", "streamia")
}

/// Directory holding the local key-value database
pub fn data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(Error::NoDataDir)
}

impl AppConfig {
    /// Load from the platform config directory (or `STREAMIA_CONFIG`) and
    /// the process environment
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let mut config = Self::default();

        match explicit {
            Some(path) => config.apply_toml(&read_file(&path)?)?,
            None => {
                let default_path = project_dirs().map(|d| d.config_dir().join(CONFIG_FILE));
                if let Some(path) = default_path.filter(|p| p.exists()) {
                    config.apply_toml(&read_file(&path)?)?;
                }
            }
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values from TOML text
    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(url) = file.api_url {
            self.api_url = normalize_base_url(&url);
        }
        if let Some(name) = file.app_name {
            self.app_name = name;
        }
        if let Some(version) = file.app_version {
            self.app_version = version;
        }
        if let Some(debug) = file.debug {
            self.debug = debug;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.health_timeout_secs {
            self.health_timeout = Duration::from_secs(secs);
        }
        Ok(())
    }

    /// Overlay `STREAMIA_*` variables, read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STREAMIA_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = normalize_base_url(&url);
        }
        if let Some(name) = lookup("STREAMIA_APP_NAME") {
            self.app_name = name;
        }
        if let Some(version) = lookup("STREAMIA_APP_VERSION") {
            self.app_version = version;
        }
        if let Some(debug) = lookup("STREAMIA_DEBUG") {
            self.debug = debug.trim() == "true";
        }
    }

    pub fn points_at_localhost(&self) -> bool {
        self.api_url.contains("localhost") || self.api_url.contains("127.0.0.1")
    }

    /// Log the resolved configuration when debug is on
    pub fn log_summary(&self) {
        if !self.debug {
            return;
        }
        info!(
            api_url = %self.api_url,
            app_name = %self.app_name,
            app_version = %self.app_version,
            request_timeout_secs = self.request_timeout.as_secs(),
            "Configuration loaded"
        );
        if self.points_at_localhost() {
            warn!(api_url = %self.api_url, "API URL points at localhost, set STREAMIA_API_URL for a deployed backend");
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })
}
