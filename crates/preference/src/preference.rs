//! Syntax preference shown by every code example on a page.

use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;

/// Storage key used when no other key is configured.
pub const DEFAULT_STORAGE_KEY: &str = "language";

/// JavaScript syntax variants a code example can be displayed in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Preference {
    #[serde(rename = "ES5")]
    Es5,
    #[default]
    #[serde(rename = "ES6")]
    Es6,
    #[serde(rename = "ESNext")]
    EsNext,
}

impl Preference {
    /// Literal value written to storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Es5 => "ES5",
            Preference::Es6 => "ES6",
            Preference::EsNext => "ESNext",
        }
    }

    /// Label for the selector UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            Preference::Es5 => "ES5",
            Preference::Es6 => "ES2015+",
            Preference::EsNext => "ESNext",
        }
    }

    /// All variants in selector order.
    pub fn all() -> [Preference; 3] {
        [Preference::Es5, Preference::Es6, Preference::EsNext]
    }
}

impl std::fmt::Display for Preference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Preference {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ES5" => Ok(Preference::Es5),
            "ES6" => Ok(Preference::Es6),
            "ESNext" => Ok(Preference::EsNext),
            other => Err(PreferenceError::UnknownPreference(other.to_string())),
        }
    }
}

/// Where the preference is persisted and what to show before anything is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceConfig {
    pub storage_key: String,
    pub default: Preference,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default: Preference::default(),
        }
    }
}
