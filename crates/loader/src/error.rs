//! Error types for loading markup

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("DOM error: {0}")]
    Dom(#[from] dom::DomError),

    #[error("Invalid token {0}")]
    InvalidToken(String),

    #[error("Options error: {0}")]
    Options(#[from] serde_json::Error),
}
