//! JSON configuration for the server and client binaries.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_log_level() -> String {
    "info".to_owned()
}

/// Runtime configuration loaded from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address of the server to connect to or bind on.
    pub server_address: String,

    /// TCP port of the server.
    pub server_port: u16,

    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Optional path for file logging; stderr only when absent.
    #[serde(default)]
    pub log_file_path: Option<String>,

    /// Username-to-credential map for the server's credential store.
    #[serde(default)]
    pub users: HashMap<String, String>,
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Read`] if the file cannot be read.
    /// - [`ConfigError::Parse`] if it is not valid JSON or is missing a
    ///   required field.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// The `address:port` pair as a connect/bind string.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.server_address, self.server_port)
    }
}
