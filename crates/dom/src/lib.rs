//! Markup DOM
//!
//! An in-memory W3C-style document object model for XML and HTML trees,
//! with mutation, namespace resolution and serialization back to text.
//!
//! ## Core Design
//!
//! ```text
//! tokenizer events → TreeBuilder → DomArena (records by NodeId) → DomSerializer
//!                                       ↑
//!                     facade handles (Document, Element, Text, ...)
//! ```
//!
//! Every record lives in one [`DomArena`] and refers to its parent, owner,
//! children and attributes by [`NodeId`]. The facade handles are `Copy`
//! ids with kind-specific methods; they borrow the arena per call.

pub mod arena;
pub mod builder;
pub mod config;
pub mod error;
pub mod facade;
pub mod mutation;
pub mod namespace;
pub mod serializer;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use builder::{build_from_json, TreeBuilder, TreeSink};
pub use config::{DomConfig, NameMatching};
pub use error::{DomError, Result};
pub use facade::*;
pub use namespace::{validate_qualified_name, NamespaceScope};
pub use serializer::{detect_format, serialize, DomSerializer, Format, SerializerConfig};
pub use types::*;
