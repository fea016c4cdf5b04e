//! Typed views over arena records
//!
//! A handle is a `Copy` wrapper around a [`NodeId`]; two handles are the
//! same node exactly when their ids are equal. Handles only expose the
//! operations that make sense for their kind, and every operation takes
//! the arena explicitly.
//!
//! ```text
//! DomArena::view(id) → NodeView::Element(Element)
//!                               ↓
//!                   element.set_attribute(&mut arena, "id", "x")
//! ```

mod character_data;
mod document;
mod element;
mod list;
mod node;

pub use character_data::CharacterDataOps;
pub use list::{ChildNodes, NamedNodeMap, NodeList};
pub use node::Node;

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType};

macro_rules! handle {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name(pub(crate) NodeId);

            impl $name {
                pub fn id(self) -> NodeId {
                    self.0
                }
            }

            impl From<$name> for NodeId {
                fn from(handle: $name) -> NodeId {
                    handle.0
                }
            }

            impl Node for $name {}
        )*
    };
}

handle!(
    /// Any node
    NodeRef,
    Document,
    Element,
    Attr,
    /// Text, Comment or CDATA section
    CharacterData,
    /// Text or CDATA section
    Text,
    ProcessingInstruction,
    DocumentType,
    DocumentFragment,
);

macro_rules! widen {
    ($($from:ident => $to:ident),* $(,)?) => {
        $(
            impl From<$from> for $to {
                fn from(handle: $from) -> $to {
                    $to(handle.0)
                }
            }
        )*
    };
}

widen!(
    Document => NodeRef,
    Element => NodeRef,
    Attr => NodeRef,
    CharacterData => NodeRef,
    Text => NodeRef,
    ProcessingInstruction => NodeRef,
    DocumentType => NodeRef,
    DocumentFragment => NodeRef,
    Text => CharacterData,
);

/// Kind-tagged view of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeView {
    Element(Element),
    Attribute(Attr),
    Text(Text),
    CdataSection(Text),
    EntityReference(NodeRef),
    ProcessingInstruction(ProcessingInstruction),
    Comment(CharacterData),
    Document(Document),
    DocumentType(DocumentType),
    DocumentFragment(DocumentFragment),
}

impl DomArena {
    fn expect_kind(&self, node_id: NodeId, kinds: &[NodeType], expected: &str) -> Result<NodeId> {
        let actual = self.node_type(node_id)?;
        if kinds.contains(&actual) {
            Ok(node_id)
        } else {
            Err(DomError::wrong_kind(expected, actual))
        }
    }

    /// View of any existing record
    pub fn node(&self, node_id: NodeId) -> Result<NodeRef> {
        self.get(node_id)?;
        Ok(NodeRef(node_id))
    }

    /// Kind-tagged view; entities and notations have none
    pub fn view(&self, node_id: NodeId) -> Result<NodeView> {
        Ok(match self.node_type(node_id)? {
            NodeType::Element => NodeView::Element(Element(node_id)),
            NodeType::Attribute => NodeView::Attribute(Attr(node_id)),
            NodeType::Text => NodeView::Text(Text(node_id)),
            NodeType::CdataSection => NodeView::CdataSection(Text(node_id)),
            NodeType::EntityReference => NodeView::EntityReference(NodeRef(node_id)),
            NodeType::ProcessingInstruction => {
                NodeView::ProcessingInstruction(ProcessingInstruction(node_id))
            }
            NodeType::Comment => NodeView::Comment(CharacterData(node_id)),
            NodeType::Document => NodeView::Document(Document(node_id)),
            NodeType::DocumentType => NodeView::DocumentType(DocumentType(node_id)),
            NodeType::DocumentFragment => NodeView::DocumentFragment(DocumentFragment(node_id)),
            kind @ (NodeType::Entity | NodeType::Notation) => {
                return Err(DomError::NotSupported(format!("{:?} nodes", kind)))
            }
        })
    }

    pub fn document(&self, node_id: NodeId) -> Result<Document> {
        self.expect_kind(node_id, &[NodeType::Document], "Document")
            .map(Document)
    }

    pub fn element(&self, node_id: NodeId) -> Result<Element> {
        self.expect_kind(node_id, &[NodeType::Element], "Element")
            .map(Element)
    }

    pub fn attr(&self, node_id: NodeId) -> Result<Attr> {
        self.expect_kind(node_id, &[NodeType::Attribute], "Attr")
            .map(Attr)
    }

    pub fn character_data(&self, node_id: NodeId) -> Result<CharacterData> {
        self.expect_kind(
            node_id,
            &[NodeType::Text, NodeType::CdataSection, NodeType::Comment],
            "CharacterData",
        )
        .map(CharacterData)
    }

    pub fn text(&self, node_id: NodeId) -> Result<Text> {
        self.expect_kind(node_id, &[NodeType::Text, NodeType::CdataSection], "Text")
            .map(Text)
    }

    pub fn processing_instruction(&self, node_id: NodeId) -> Result<ProcessingInstruction> {
        self.expect_kind(
            node_id,
            &[NodeType::ProcessingInstruction],
            "ProcessingInstruction",
        )
        .map(ProcessingInstruction)
    }

    pub fn document_type(&self, node_id: NodeId) -> Result<DocumentType> {
        self.expect_kind(node_id, &[NodeType::DocumentType], "DocumentType")
            .map(DocumentType)
    }

    pub fn document_fragment(&self, node_id: NodeId) -> Result<DocumentFragment> {
        self.expect_kind(node_id, &[NodeType::DocumentFragment], "DocumentFragment")
            .map(DocumentFragment)
    }
}
