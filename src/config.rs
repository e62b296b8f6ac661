//! Application configuration.
//!
//! Loaded from an optional TOML file. Every key has a default, so an empty
//! file and no file at all give the same result:
//!
//! ```toml
//! wrap_width = 100
//!
//! [summarizer]
//! chunk_tokens = 800
//! max_chunks = 5
//! parallel_map = false
//! ```

use crate::Result;
use crate::error::Error;
use crate::summarizer::SummarizerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Column width used when printing summaries as text.
pub const DEFAULT_WRAP_WIDTH: usize = 100;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Column width for wrapped summary output.
    pub wrap_width: usize,

    /// Summarizer options.
    pub summarizer: SummarizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrap_width: DEFAULT_WRAP_WIDTH,
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Config {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the TOML is malformed or has wrong types.
    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
