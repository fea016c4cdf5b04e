//! Arena-wide configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// How tag and attribute names are compared by lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NameMatching {
    /// HTML behaviour: `DIV` finds `div`
    #[default]
    AsciiCaseInsensitive,
    /// XML behaviour
    Exact,
}

impl NameMatching {
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            NameMatching::AsciiCaseInsensitive => a.eq_ignore_ascii_case(b),
            NameMatching::Exact => a == b,
        }
    }
}

/// Configuration for a [`crate::DomArena`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomConfig {
    /// Base URI for documents created without one
    pub working_directory: String,
    pub name_matching: NameMatching,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            working_directory: std::env::current_dir()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            name_matching: NameMatching::default(),
        }
    }
}

impl DomConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
