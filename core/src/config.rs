//! Configuration shared by the segmentation core.
//!
//! Language-agnostic knobs live here; keyword extraction and caching options
//! belong to `JiebaConfig` in the `libjieba` crate, which flattens this
//! struct.

use serde::{Deserialize, Serialize};

/// Emission log-probability used when a state never emitted a codepoint.
pub const DEFAULT_EMISSION: f64 = -3.14e100;

/// Frequency assigned to user words that come without one.
///
/// The value is picked from the main dictionary's frequency distribution,
/// so a bare user word competes like a rare, typical or very common word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserWordWeight {
    Min,
    #[default]
    Median,
    Max,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Emission score for (state, codepoint) pairs absent from the model.
    pub default_emission: f64,

    /// Frequency policy for user dictionary words without a frequency.
    pub user_word_weight: UserWordWeight,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_emission: DEFAULT_EMISSION,
            user_word_weight: UserWordWeight::Median,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
