//! Tree construction from tokenizer events
//!
//! A tokenizer drives a [`TreeSink`] depth-first in document order. The
//! [`TreeBuilder`] sink appends through the raw arena operations, so it
//! performs no hierarchy or lexical validation of its own.
//!
//! [`build_from_json`] ingests a serialized node tree of the shape
//! ```json
//! {
//!   "nodeType": 9,
//!   "nodeName": "#document",
//!   "children": [{
//!     "nodeType": 1,
//!     "nodeName": "html",
//!     "attributes": ["lang", "en"],
//!     "children": []
//!   }]
//! }
//! ```

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::facade::Document;
use crate::types::*;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

/// Receiver of structural events
pub trait TreeSink {
    /// Create an element with its attributes and descend into it
    fn open_element(&mut self, name: &str, attributes: IndexMap<String, String>) -> Result<()>;

    /// Return to the parent of the current element
    fn close_element(&mut self) -> Result<()>;

    fn text(&mut self, data: &str) -> Result<()>;

    fn cdata(&mut self, data: &str) -> Result<()>;

    fn comment(&mut self, data: &str) -> Result<()>;

    /// Always lands on the document, whatever the current scope
    fn doctype(&mut self, name: &str, public_id: Option<&str>, system_id: Option<&str>)
        -> Result<()>;

    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()>;
}

/// Sink building into a document of a [`DomArena`]
pub struct TreeBuilder<'a> {
    arena: &'a mut DomArena,
    document: NodeId,
    scope: NodeId,
}

impl<'a> TreeBuilder<'a> {
    /// Start a fresh document
    pub fn new(arena: &'a mut DomArena, base_uri: Option<&str>) -> Result<Self> {
        let document = arena.create_document(base_uri)?;
        Ok(Self {
            arena,
            document,
            scope: document,
        })
    }

    /// Continue building into an existing document
    pub fn for_document(arena: &'a mut DomArena, document: Document) -> Self {
        Self {
            arena,
            document: document.id(),
            scope: document.id(),
        }
    }

    pub fn document(&self) -> Document {
        Document(self.document)
    }

    /// Node that receives the next event
    pub fn current(&self) -> NodeId {
        self.scope
    }

    pub fn arena(&self) -> &DomArena {
        self.arena
    }

    /// Hand back the document, closing whatever is still open
    pub fn finish(self) -> Document {
        if self.scope != self.document {
            debug!("finishing with node {} still open", self.scope);
        }
        Document(self.document)
    }

    fn leaf(&mut self, kind: NodeType, name: &str, data: &str) -> Result<()> {
        let node_id = self.arena.create(kind, name, data.into())?;
        self.arena.append(self.scope, node_id)?;
        Ok(())
    }
}

impl TreeSink for TreeBuilder<'_> {
    fn open_element(&mut self, name: &str, attributes: IndexMap<String, String>) -> Result<()> {
        let element_id = self
            .arena
            .create(NodeType::Element, name, NodeInit::Attributes(attributes))?;
        self.arena.append(self.scope, element_id)?;
        self.scope = element_id;
        trace!("opened <{}> as {}", name, element_id);
        Ok(())
    }

    fn close_element(&mut self) -> Result<()> {
        if self.scope == self.document {
            debug!("close at document scope ignored");
            return Ok(());
        }
        self.scope = self.arena.parent(self.scope)?.unwrap_or(self.document);
        Ok(())
    }

    fn text(&mut self, data: &str) -> Result<()> {
        self.leaf(NodeType::Text, "", data)
    }

    fn cdata(&mut self, data: &str) -> Result<()> {
        self.leaf(NodeType::CdataSection, "", data)
    }

    fn comment(&mut self, data: &str) -> Result<()> {
        self.leaf(NodeType::Comment, "", data)
    }

    fn doctype(
        &mut self,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> Result<()> {
        let ids = DoctypeIds::new(public_id, system_id);
        let doctype_id = self
            .arena
            .create(NodeType::DocumentType, name, NodeInit::DocumentType(ids))?;
        self.arena.append(self.document, doctype_id)?;
        Ok(())
    }

    fn processing_instruction(&mut self, target: &str, data: &str) -> Result<()> {
        self.leaf(NodeType::ProcessingInstruction, target, data)
    }
}

/// Build a document from a JSON node tree
///
/// The root must be a document (`nodeType` 9). Attributes come as a flat
/// `[name, value, name, value, ...]` array.
pub fn build_from_json(arena: &mut DomArena, root: &Value) -> Result<Document> {
    let node_type = json_node_type(root)?;
    if node_type != NodeType::Document {
        return Err(DomError::wrong_kind("Document", node_type));
    }

    let document_id = arena.create_document(root["baseURI"].as_str())?;
    append_json_children(arena, document_id, root)?;
    Ok(Document(document_id))
}

fn json_node_type(node: &Value) -> Result<NodeType> {
    let value = node["nodeType"]
        .as_u64()
        .ok_or_else(|| DomError::InvalidNodeType {
            expected: "nodeType".to_string(),
            actual: node["nodeType"].to_string(),
        })?;

    u8::try_from(value)
        .ok()
        .and_then(NodeType::from_u8)
        .ok_or_else(|| DomError::InvalidNodeType {
            expected: "valid NodeType".to_string(),
            actual: value.to_string(),
        })
}

fn append_json_children(arena: &mut DomArena, parent_id: NodeId, node: &Value) -> Result<()> {
    let Some(children) = node["children"].as_array() else {
        return Ok(());
    };

    for child in children {
        let child_id = parse_json_node(arena, child)?;
        arena.append(parent_id, child_id)?;
        append_json_children(arena, child_id, child)?;
    }

    Ok(())
}

fn parse_json_node(arena: &mut DomArena, node: &Value) -> Result<NodeId> {
    let node_type = json_node_type(node)?;
    let node_name = node["nodeName"].as_str().unwrap_or("");
    let node_value = node["nodeValue"].as_str().unwrap_or("");

    let init = match node_type {
        NodeType::Element => {
            let mut attributes = IndexMap::new();
            if let Some(attrs) = node["attributes"].as_array() {
                for pair in attrs.chunks_exact(2) {
                    if let (Some(key), Some(value)) = (pair[0].as_str(), pair[1].as_str()) {
                        attributes.insert(key.to_string(), value.to_string());
                    }
                }
            }
            NodeInit::Attributes(attributes)
        }
        NodeType::DocumentType => {
            let mut ids = DoctypeIds::new(node["publicId"].as_str(), node["systemId"].as_str());
            ids.internal_subset = node["internalSubset"].as_str().map(String::from);
            NodeInit::DocumentType(ids)
        }
        NodeType::Attribute
        | NodeType::Text
        | NodeType::CdataSection
        | NodeType::Comment
        | NodeType::ProcessingInstruction => NodeInit::Data(node_value.to_string()),
        _ => NodeInit::Empty,
    };

    arena.create(node_type, node_name, init)
}
