//! Tree configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! keyed_directives = ["location", "upstream", "map"]
//! dump_after_change = true
//! ```

use cfgtree_index::{KeyPolicy, DEFAULT_KEYED};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tree configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Directives keyed by name and arguments
    pub keyed_directives: Vec<String>,

    /// Dump every indexed path to the debug log after a change set
    pub dump_after_change: bool,
}

impl TreeConfig {
    /// Create with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With keyed directives
    #[must_use]
    pub fn with_keyed_directives<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keyed_directives = names.into_iter().map(Into::into).collect();
        self
    }

    /// With post-change dump
    #[inline]
    #[must_use]
    pub fn with_dump_after_change(mut self, dump: bool) -> Self {
        self.dump_after_change = dump;
        self
    }

    /// Key policy described by this configuration
    #[must_use]
    pub fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::new(self.keyed_directives.iter().cloned())
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] on malformed input.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            keyed_directives: DEFAULT_KEYED.iter().map(|s| (*s).to_string()).collect(),
            dump_after_change: false,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
}
