//! Loader options

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Which tokenizer rules to apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// Well-formed XML; mismatched end tags are errors
    #[default]
    Xml,
    /// Void elements, omitted end tags, bare attributes, unknown entities
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadOptions {
    pub syntax: Syntax,
    /// Document base URI; the arena's working directory when unset
    pub base_uri: Option<String>,
    /// Reject tag names outside `[A-Za-z][A-Za-z0-9:_.-]*`
    pub validate_tag_names: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            syntax: Syntax::Xml,
            base_uri: None,
            validate_tag_names: true,
        }
    }
}

impl LoadOptions {
    pub fn xml() -> Self {
        Self::default()
    }

    pub fn html() -> Self {
        Self {
            syntax: Syntax::Html,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
