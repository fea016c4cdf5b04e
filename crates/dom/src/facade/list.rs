//! Node collections
//!
//! `ChildNodes` and `NamedNodeMap` hold only the owning node's id and read
//! the arena on every call, so they always reflect the current tree.
//! `NodeList` is a snapshot taken when a search ran.

use super::{Attr, Element, NodeRef};
use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType};

/// Live children of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildNodes {
    parent: NodeId,
}

impl ChildNodes {
    pub(crate) fn new(parent: NodeId) -> Self {
        Self { parent }
    }

    pub fn length(&self, arena: &DomArena) -> Result<usize> {
        Ok(arena.children(self.parent)?.len())
    }

    pub fn item(&self, arena: &DomArena, index: usize) -> Result<Option<NodeRef>> {
        Ok(arena.children(self.parent)?.get(index).copied().map(NodeRef))
    }

    pub fn iter<'a>(&self, arena: &'a DomArena) -> Result<impl Iterator<Item = NodeRef> + 'a> {
        Ok(arena.children(self.parent)?.iter().copied().map(NodeRef))
    }
}

/// Live attribute map of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedNodeMap {
    element: NodeId,
}

impl NamedNodeMap {
    pub(crate) fn new(element: NodeId) -> Self {
        Self { element }
    }

    pub fn length(&self, arena: &DomArena) -> Result<usize> {
        Ok(arena.attributes(self.element)?.len())
    }

    pub fn item(&self, arena: &DomArena, index: usize) -> Result<Option<Attr>> {
        Ok(arena.attributes(self.element)?.get(index).copied().map(Attr))
    }

    pub fn iter<'a>(&self, arena: &'a DomArena) -> Result<impl Iterator<Item = Attr> + 'a> {
        Ok(arena.attributes(self.element)?.iter().copied().map(Attr))
    }

    pub fn get_named_item(&self, arena: &DomArena, name: &str) -> Result<Option<Attr>> {
        Element(self.element).get_attribute_node(arena, name)
    }

    pub fn get_named_item_ns(
        &self,
        arena: &DomArena,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Result<Option<Attr>> {
        Element(self.element).get_attribute_node_ns(arena, namespace_uri, local_name)
    }

    /// Add or replace by name; returns the replaced attribute
    pub fn set_named_item(&self, arena: &mut DomArena, attr: Attr) -> Result<Option<Attr>> {
        Element(self.element).set_attribute_node(arena, attr)
    }

    pub fn set_named_item_ns(&self, arena: &mut DomArena, attr: Attr) -> Result<Option<Attr>> {
        Element(self.element).set_attribute_node_ns(arena, attr)
    }

    /// Fails with `NotFound` when no attribute has that name
    pub fn remove_named_item(&self, arena: &mut DomArena, name: &str) -> Result<Attr> {
        let attr = self
            .get_named_item(arena, name)?
            .ok_or(DomError::NotFound)?;
        arena.remove_child(self.element, attr.id())?;
        Ok(attr)
    }

    pub fn remove_named_item_ns(
        &self,
        arena: &mut DomArena,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Result<Attr> {
        let attr = self
            .get_named_item_ns(arena, namespace_uri, local_name)?
            .ok_or(DomError::NotFound)?;
        arena.remove_child(self.element, attr.id())?;
        Ok(attr)
    }
}

/// Search result, fixed at call time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList(Vec<NodeId>);

impl NodeList {
    pub(crate) fn new(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }

    pub fn length(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<NodeRef> {
        self.0.get(index).copied().map(NodeRef)
    }

    /// Entries as elements; every tag-name search yields only elements
    pub fn elements(&self, arena: &DomArena) -> Result<Vec<Element>> {
        self.0
            .iter()
            .map(|&id| match arena.node_type(id)? {
                NodeType::Element => Ok(Element(id)),
                other => Err(DomError::wrong_kind("Element", other)),
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.0.iter().copied().map(NodeRef)
    }
}

impl IntoIterator for NodeList {
    type Item = NodeRef;
    type IntoIter = std::iter::Map<std::vec::IntoIter<NodeId>, fn(NodeId) -> NodeRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter().map(NodeRef as fn(NodeId) -> NodeRef)
    }
}
