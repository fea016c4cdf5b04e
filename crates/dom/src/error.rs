//! Error types for DOM operations
//!
//! Flat error hierarchy. The DOM-level variants carry the numeric
//! DOMException code through [`DomError::code`].

use crate::types::NodeType;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Payload does not fit node type {0:?}")]
    InvalidPayload(NodeType),

    #[error("Node is used in a different document than the one that created it")]
    WrongDocument,

    #[error("Node is not a child of this node")]
    NotFound,

    #[error("Node cannot be inserted at this point in the hierarchy")]
    HierarchyRequest,

    #[error("Namespace error: {0}")]
    Namespace(String),

    #[error("Offset {offset} is out of bounds for length {length}")]
    IndexSize { offset: usize, length: usize },

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl DomError {
    /// DOMException code for the DOM-level variants.
    pub fn code(&self) -> Option<u16> {
        match self {
            DomError::IndexSize { .. } => Some(1),
            DomError::HierarchyRequest => Some(3),
            DomError::WrongDocument => Some(4),
            DomError::NotFound => Some(8),
            DomError::NotSupported(_) => Some(9),
            DomError::Namespace(_) => Some(14),
            _ => None,
        }
    }

    pub(crate) fn wrong_kind(expected: &str, actual: NodeType) -> Self {
        DomError::InvalidNodeType {
            expected: expected.to_string(),
            actual: format!("{:?}", actual),
        }
    }
}
