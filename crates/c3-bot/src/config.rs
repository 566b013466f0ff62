//! Bot configuration
//!
//! Loaded from an optional TOML file; command-line flags override it.
//!
//! ```toml
//! privileged_user = "780258092042551376"
//! bot_user_id = "1000"
//! catalog_root = "cocktails"
//!
//! [store]
//! root = "/var/lib/c3"
//!
//! [log]
//! filter = "info,c3_catalog=debug"
//! json = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identifier allowed to moderate when none is configured
pub const DEFAULT_PRIVILEGED_USER: &str = "780258092042551376";

/// Message prefix that triggers a picture upload
pub const DEFAULT_UPLOAD_PREFIX: &str = "/c3 upload-picture";

/// Errors loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for [`BotConfig`]
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Object store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory backing the filesystem store
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("catalog"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives used when no environment override is set
    pub filter: String,
    /// Emit JSON log lines
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level bot configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// The one user allowed to approve, deny and upload pictures
    pub privileged_user: String,
    /// The bot's own user id; its messages are ignored
    pub bot_user_id: Option<String>,
    /// Prefix under which catalog entries live in the store
    pub catalog_root: String,
    /// Message prefix for picture uploads
    pub upload_prefix: String,
    /// Store settings
    pub store: StoreConfig,
    /// Log settings
    pub log: LogConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            privileged_user: DEFAULT_PRIVILEGED_USER.to_string(),
            bot_user_id: None,
            catalog_root: String::new(),
            upload_prefix: DEFAULT_UPLOAD_PREFIX.to_string(),
            store: StoreConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl BotConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// - `toml::de::Error` if the text is not valid configuration
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Read` if the file cannot be read
    /// - `ConfigError::Parse` if it is not valid configuration
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Set privileged user
    #[must_use]
    pub fn with_privileged_user(mut self, user: impl Into<String>) -> Self {
        self.privileged_user = user.into();
        self
    }

    /// Set the bot's own user id
    #[must_use]
    pub fn with_bot_user_id(mut self, id: impl Into<String>) -> Self {
        self.bot_user_id = Some(id.into());
        self
    }

    /// Set catalog root prefix
    #[must_use]
    pub fn with_catalog_root(mut self, root: impl Into<String>) -> Self {
        self.catalog_root = root.into();
        self
    }

    /// Set store directory
    #[must_use]
    pub fn with_store_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.store.root = root.into();
        self
    }

    /// Set upload prefix
    #[must_use]
    pub fn with_upload_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.upload_prefix = prefix.into();
        self
    }

    /// Enable or disable JSON logs
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.log.json = json;
        self
    }
}
