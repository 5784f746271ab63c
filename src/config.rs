//! Extractor configuration.
//!
//! Everything has a sensible default: UTC and the builtin vocabulary. A TOML
//! document can override either, which is how deployments pin a home
//! timezone or extend the vocabulary with domain words.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::grammar::Vocabulary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Timezone every resolved instant is expressed in.
    pub timezone: Tz,
    pub vocabulary: Vocabulary,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self { timezone: Tz::UTC, vocabulary: Vocabulary::default() }
    }
}

impl ExtractorConfig {
    /// Parse a TOML document; unspecified fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ExtractError> {
        toml::from_str(text).map_err(|e| ExtractError::InvalidConfig(e.to_string()))
    }
}
