use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::protocol::DEFAULT_MAX_MESSAGE_SIZE;

/// Settings of a single model mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Name of the remote object the mirror binds to
    pub server_object: String,
    /// Display text for cells and header sections whose data is in flight
    pub loading_text: String,
    /// Largest inbound frame accepted by the channel client
    pub max_message_size: usize,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            server_object: String::new(),
            loading_text: "Loading...".to_string(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl MirrorConfig {
    /// Default settings bound to `server_object`
    pub fn for_object(server_object: impl Into<String>) -> Self {
        Self {
            server_object: server_object.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
