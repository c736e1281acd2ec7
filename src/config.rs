use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::HeaderStyle;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    #[serde(default = "default_output_path")]
    pub output_path: String,

    #[serde(default)]
    pub header_style: HeaderStyle,

    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    /// Where a playlist fetched over HTTP is also saved, if anywhere.
    pub download_copy_path: Option<String>,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("m3u-curator");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("channels.db").to_string_lossy().to_string()
}

fn default_output_path() -> String {
    "filtered.m3u".to_string()
}

fn default_fetch_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            output_path: default_output_path(),
            header_style: HeaderStyle::default(),
            fetch_timeout_secs: default_fetch_timeout(),
            download_copy_path: None,
        }
    }
}

impl Config {
    /// Defaults rooted in `dir`, without touching the user's data directory.
    #[cfg(test)]
    pub(crate) fn in_dir(dir: &std::path::Path) -> Self {
        Self {
            db_path: dir.join("channels.db").to_string_lossy().to_string(),
            output_path: dir.join("filtered.m3u").to_string_lossy().to_string(),
            header_style: HeaderStyle::default(),
            fetch_timeout_secs: default_fetch_timeout(),
            download_copy_path: None,
        }
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("m3u-curator")
            .join("config.toml")
    }
}
