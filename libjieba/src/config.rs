//! Segmenter configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `libjieba_core::Config` (flattened via serde)
//! - HMM decode cache sizing
//! - Keyword extraction parameters (TF-IDF and TextRank)
//!
//! # Example
//!
//! ```rust
//! use libjieba::JiebaConfig;
//!
//! let config = JiebaConfig::from_toml_str("textrank_span = 3\n").unwrap();
//! assert_eq!(config.textrank_span, 3);
//! assert_eq!(config.min_keyword_len, 2);
//! ```
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JiebaConfig {
    /// Base configuration fields (default emission, user word weight)
    #[serde(flatten)]
    pub base: libjieba_core::Config,

    /// Entries in the HMM decode cache; 0 disables caching.
    pub hmm_cache_size: usize,

    /// Shortest keyword candidate, in codepoints.
    pub min_keyword_len: usize,

    // TextRank
    /// Co-occurrence window: tokens closer than this many positions are linked.
    pub textrank_span: usize,
    pub textrank_damping: f64,
    pub textrank_iterations: usize,
    /// Stop iterating once no score moves more than this.
    pub textrank_tolerance: f64,
}

impl Default for JiebaConfig {
    fn default() -> Self {
        Self {
            base: libjieba_core::Config::default(),
            hmm_cache_size: 1024,
            min_keyword_len: 2,
            textrank_span: 5,
            textrank_damping: 0.85,
            textrank_iterations: 10,
            textrank_tolerance: 1e-6,
        }
    }
}

impl JiebaConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the extractors cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.textrank_span < 2 {
            return Err(ConfigError::Invalid(format!(
                "textrank_span must be at least 2, got {}",
                self.textrank_span
            )));
        }
        if !(self.textrank_damping > 0.0 && self.textrank_damping < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "textrank_damping must be in (0, 1), got {}",
                self.textrank_damping
            )));
        }
        if !(self.textrank_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "textrank_tolerance must be non-negative, got {}",
                self.textrank_tolerance
            )));
        }
        Ok(())
    }

    /// Get the underlying core config.
    pub fn base(&self) -> &libjieba_core::Config {
        &self.base
    }
}
