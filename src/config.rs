use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.yml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub notification_timeout_ms: u64,
    pub chat_reply_delay_ms: u64,
    pub tick_rate_ms: u64,
    pub current_user: String,
    pub storage_limit: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            notification_timeout_ms: 3000,
            chat_reply_delay_ms: 1000,
            tick_rate_ms: 200,
            current_user: "Dr. Sarah Smith".into(),
            storage_limit: "10 GB".into(),
        }
    }
}

impl Config {
    /// Defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    pub fn chat_reply_delay(&self) -> Duration {
        Duration::from_millis(self.chat_reply_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}
