//! Core type definitions
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Parent and owner are ids, never owning pointers
//! 3. Use SmallVec for child/attribute lists (most nodes have few)
//! 4. One payload enum per record, shaped by the node kind

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Node identifier (index into arena)
pub type NodeId = u32;

/// Namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace of `xmlns` declarations themselves.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// W3C DOM node kinds with their numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Attribute = 2,
    Text = 3,
    CdataSection = 4,
    EntityReference = 5,
    Entity = 6,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    Notation = 12,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            2 => Some(NodeType::Attribute),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CdataSection),
            5 => Some(NodeType::EntityReference),
            6 => Some(NodeType::Entity),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            12 => Some(NodeType::Notation),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Fixed `nodeName` for kinds that do not carry their own name.
    pub fn fixed_name(self) -> Option<&'static str> {
        match self {
            NodeType::Text => Some("#text"),
            NodeType::CdataSection => Some("#cdata-section"),
            NodeType::Comment => Some("#comment"),
            NodeType::Document => Some("#document"),
            NodeType::DocumentFragment => Some("#document-fragment"),
            _ => None,
        }
    }

    /// Text, Comment and CDATASection.
    pub fn is_character_data(self) -> bool {
        matches!(
            self,
            NodeType::Text | NodeType::CdataSection | NodeType::Comment
        )
    }

    /// Kinds that may hold child nodes.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeType::Element
                | NodeType::Document
                | NodeType::DocumentFragment
                | NodeType::EntityReference
        )
    }

    /// Kinds whose `parentNode` is always null.
    pub fn forbids_parent(self) -> bool {
        matches!(
            self,
            NodeType::Attribute
                | NodeType::Document
                | NodeType::DocumentFragment
                | NodeType::Entity
                | NodeType::Notation
        )
    }
}

/// publicId/systemId/internal subset of a document type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctypeIds {
    pub public_id: Option<String>,
    pub system_id: Option<String>,
    pub internal_subset: Option<String>,
}

impl DoctypeIds {
    pub fn new(public_id: Option<&str>, system_id: Option<&str>) -> Self {
        Self {
            public_id: public_id.map(String::from),
            system_id: system_id.map(String::from),
            internal_subset: None,
        }
    }
}

/// Kind-dependent data stored on a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    None,
    /// Character data, PI data or attribute value
    Data(String),
    DocumentType(DoctypeIds),
    Document { base_uri: String },
}

/// Creation input handed to [`crate::DomArena::create`]
#[derive(Debug, Clone, Default)]
pub enum NodeInit {
    #[default]
    Empty,
    Data(String),
    /// Expanded into Attribute records in map order
    Attributes(IndexMap<String, String>),
    DocumentType(DoctypeIds),
    BaseUri(String),
}

impl From<&str> for NodeInit {
    fn from(data: &str) -> Self {
        NodeInit::Data(data.to_string())
    }
}

impl From<String> for NodeInit {
    fn from(data: String) -> Self {
        NodeInit::Data(data)
    }
}

/// The tree node record
///
/// - `attribute_ids` is only populated for elements and never overlaps
///   `children_ids`
/// - `owner_id` survives detachment
/// - Documents own themselves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    pub parent_id: Option<NodeId>,
    pub owner_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,
    pub attribute_ids: SmallVec<[NodeId; 4]>,

    pub node_name: String,
    /// URI given at namespaced creation, if any
    pub namespace_uri: Option<String>,
    pub payload: Payload,
}

impl DomNode {
    pub fn new(node_id: NodeId, node_type: NodeType, node_name: String, payload: Payload) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            owner_id: None,
            children_ids: SmallVec::new(),
            attribute_ids: SmallVec::new(),
            node_name,
            namespace_uri: None,
            payload,
        }
    }

    /// Character payload, if the kind carries one
    pub fn data(&self) -> Option<&str> {
        match &self.payload {
            Payload::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut String> {
        match &mut self.payload {
            Payload::Data(data) => Some(data),
            _ => None,
        }
    }

    pub fn doctype_ids(&self) -> Option<&DoctypeIds> {
        match &self.payload {
            Payload::DocumentType(ids) => Some(ids),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Part of the name before the first `:`
    pub fn prefix(&self) -> Option<&str> {
        crate::utils::split_qualified_name(&self.node_name).0
    }

    /// Part of the name after the first `:`
    pub fn local_name(&self) -> &str {
        crate::utils::split_qualified_name(&self.node_name).1
    }
}

/// Bitmask returned by `compare_document_position`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DocumentPosition(u16);

impl DocumentPosition {
    pub const DISCONNECTED: Self = Self(0x01);
    pub const PRECEDING: Self = Self(0x02);
    pub const FOLLOWING: Self = Self(0x04);
    pub const CONTAINS: Self = Self(0x08);
    pub const CONTAINED_BY: Self = Self(0x10);
    pub const IMPLEMENTATION_SPECIFIC: Self = Self(0x20);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for DocumentPosition {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DocumentPosition {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DocumentPosition {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
