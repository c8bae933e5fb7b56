//! JSON configuration for a download trigger.
//!
//! Lets a host page describe a trigger as data, e.g.
//! `{"file_name": "counts.xlsx", "format": "xlsx"}`.

use serde::{Deserialize, Serialize};

use crate::format::DownloadFormat;

/// Errors from parsing or validating a [`DownloadConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON could not be parsed into a config.
    #[error("invalid download config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The file name is empty or whitespace.
    #[error("download file name is empty")]
    EmptyFileName,

    /// The file name contains a path separator or control character.
    #[error("download file name {0:?} contains a path separator or control character")]
    InvalidFileName(String),
}

/// Settings for one download trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Suggested save name, used verbatim.
    pub file_name: String,

    /// Output format.  Defaults to CSV when absent.
    #[serde(default)]
    pub format: DownloadFormat,
}

impl DownloadConfig {
    /// Create a config, validating the file name.
    ///
    /// # Errors
    ///
    /// See [`DownloadConfig::validate`].
    pub fn new(file_name: impl Into<String>, format: DownloadFormat) -> Result<Self, ConfigError> {
        let config = Self {
            file_name: file_name.into(),
            format,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON or missing
    /// fields, and the [`validate`](Self::validate) errors otherwise.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the file name is usable as a suggested save name.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyFileName`] for an empty or all-whitespace
    /// name; [`ConfigError::InvalidFileName`] when the name contains
    /// `/`, `\`, or a control character.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::EmptyFileName);
        }
        if self
            .file_name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control())
        {
            return Err(ConfigError::InvalidFileName(self.file_name.clone()));
        }
        Ok(())
    }
}
