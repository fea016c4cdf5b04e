//! Tree mutation with DOM ownership and hierarchy rules
//!
//! The raw record operations in `arena.rs` trust their caller. Everything
//! here validates first and leaves the tree untouched when it fails.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{DocumentPosition, NodeId, NodeType};
use smallvec::SmallVec;
use tracing::debug;

/// Child list with adjacent Text runs merged, used by equality
enum Logical {
    Text(String),
    Node(NodeId),
}

impl DomArena {
    /// Owner used for same-document checks (a document is its own)
    fn document_of(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        let node = self.get(node_id)?;
        Ok(match node.node_type {
            NodeType::Document => Some(node_id),
            _ => node.owner_id,
        })
    }

    /// `ancestor` is `node` or one of its ancestors
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node_id: NodeId) -> Result<bool> {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.get(id)?.parent_id;
        }
        Ok(false)
    }

    fn check_insertion(&self, parent_id: NodeId, new_id: NodeId) -> Result<()> {
        let parent_type = self.node_type(parent_id)?;
        let new_type = self.node_type(new_id)?;

        if !parent_type.is_container() || new_id == parent_id {
            return Err(DomError::HierarchyRequest);
        }
        match new_type {
            NodeType::Attribute | NodeType::Document | NodeType::Entity | NodeType::Notation => {
                return Err(DomError::HierarchyRequest)
            }
            NodeType::DocumentType if parent_type != NodeType::Document => {
                return Err(DomError::HierarchyRequest)
            }
            _ => {}
        }

        if self.document_of(new_id)? != self.document_of(parent_id)? {
            return Err(DomError::WrongDocument);
        }

        Ok(())
    }

    /// Empty a fragment, returning its former children
    fn drain_fragment(&mut self, fragment_id: NodeId) -> Result<SmallVec<[NodeId; 4]>> {
        let children = std::mem::take(&mut self.get_mut(fragment_id)?.children_ids);
        for &child_id in &children {
            self.get_mut(child_id)?.parent_id = None;
        }
        Ok(children)
    }

    /// Insert `new` before `reference` among the children of `parent`
    ///
    /// Without a reference this appends. A fragment contributes its
    /// children, never itself. A node that is already attached is moved.
    pub fn insert_before(
        &mut self,
        parent_id: NodeId,
        new_id: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId> {
        let Some(ref_id) = reference else {
            return self.append_child(parent_id, new_id);
        };

        self.check_insertion(parent_id, new_id)?;
        if self.parent(ref_id)? != Some(parent_id) {
            return Err(DomError::NotFound);
        }
        if self.is_inclusive_ancestor(new_id, ref_id)? {
            return Err(DomError::HierarchyRequest);
        }

        let incoming = if self.node_type(new_id)? == NodeType::DocumentFragment {
            self.drain_fragment(new_id)?
        } else {
            self.release(new_id)?;
            SmallVec::from_slice(&[new_id])
        };

        let index = self.index(parent_id, ref_id)?.ok_or(DomError::NotFound)?;
        let parent = self.get_mut(parent_id)?;
        parent
            .children_ids
            .insert_many(index, incoming.iter().copied());
        for &child_id in &incoming {
            self.bind(child_id, parent_id)?;
        }

        debug!("inserted {} node(s) into {} at {}", incoming.len(), parent_id, index);
        Ok(new_id)
    }

    /// Append `new` as the last child of `parent`, same rules as
    /// [`DomArena::insert_before`]
    pub fn append_child(&mut self, parent_id: NodeId, new_id: NodeId) -> Result<NodeId> {
        self.check_insertion(parent_id, new_id)?;
        if self.is_inclusive_ancestor(new_id, parent_id)? {
            return Err(DomError::HierarchyRequest);
        }

        if self.node_type(new_id)? == NodeType::DocumentFragment {
            for child_id in self.drain_fragment(new_id)? {
                self.append(parent_id, child_id)?;
            }
        } else {
            self.append(parent_id, new_id)?;
        }

        Ok(new_id)
    }

    /// Detach `old` from `parent`
    pub fn remove_child(&mut self, parent_id: NodeId, old_id: NodeId) -> Result<NodeId> {
        let parent = self.get_mut(parent_id)?;
        let before = parent.children_ids.len() + parent.attribute_ids.len();
        parent.children_ids.retain(|id| *id != old_id);
        parent.attribute_ids.retain(|id| *id != old_id);
        if parent.children_ids.len() + parent.attribute_ids.len() == before {
            return Err(DomError::NotFound);
        }

        self.get_mut(old_id)?.parent_id = None;
        debug!("removed node {} from {}", old_id, parent_id);
        Ok(old_id)
    }

    /// Put `new` where `old` is and detach `old`
    pub fn replace_child(
        &mut self,
        parent_id: NodeId,
        new_id: NodeId,
        old_id: NodeId,
    ) -> Result<NodeId> {
        if new_id == old_id {
            return match self.parent(old_id)? {
                Some(id) if id == parent_id => Ok(old_id),
                _ => Err(DomError::NotFound),
            };
        }

        self.insert_before(parent_id, new_id, Some(old_id))?;
        self.remove_child(parent_id, old_id)
    }

    /// Move `source` (and its subtree) into `document` without copying
    pub fn adopt_node(&mut self, document_id: NodeId, source_id: NodeId) -> Result<NodeId> {
        let target_type = self.node_type(document_id)?;
        if target_type != NodeType::Document {
            return Err(DomError::wrong_kind("Document", target_type));
        }
        if self.node_type(source_id)? == NodeType::Document {
            return Err(DomError::NotSupported("adopting a document".to_string()));
        }

        self.release(source_id)?;
        self.assign_owner(source_id, Some(document_id))?;

        debug!("adopted node {} into document {}", source_id, document_id);
        Ok(source_id)
    }

    /// Copy `source` into `document`, unattached
    pub fn import_node(
        &mut self,
        document_id: NodeId,
        source_id: NodeId,
        deep: bool,
    ) -> Result<NodeId> {
        let target_type = self.node_type(document_id)?;
        if target_type != NodeType::Document {
            return Err(DomError::wrong_kind("Document", target_type));
        }
        match self.node_type(source_id)? {
            kind @ (NodeType::Document | NodeType::DocumentType) => {
                Err(DomError::NotSupported(format!("importing {:?} nodes", kind)))
            }
            _ => self.clone_node(source_id, deep, Some(document_id)),
        }
    }

    fn root_chain(&self, node_id: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = vec![node_id];
        let mut current = self.get(node_id)?.parent_id;
        while let Some(id) = current {
            chain.push(id);
            current = self.get(id)?.parent_id;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Relative position of `other` with respect to `node`
    ///
    /// An ancestor reports `CONTAINS | PRECEDING`, a descendant
    /// `CONTAINED_BY | FOLLOWING`. Siblings compare at the point where the
    /// two ancestor chains diverge, attributes ordered before children.
    pub fn compare_document_position(
        &self,
        node_id: NodeId,
        other_id: NodeId,
    ) -> Result<DocumentPosition> {
        if node_id == other_id {
            return Ok(DocumentPosition::empty());
        }

        let chain = self.root_chain(node_id)?;
        let other_chain = self.root_chain(other_id)?;
        if chain[0] != other_chain[0] {
            return Ok(DocumentPosition::DISCONNECTED);
        }

        let shared = chain
            .iter()
            .zip(other_chain.iter())
            .take_while(|(a, b)| a == b)
            .count();

        if shared == chain.len() {
            return Ok(DocumentPosition::CONTAINS | DocumentPosition::PRECEDING);
        }
        if shared == other_chain.len() {
            return Ok(DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING);
        }

        let common = self.get(chain[shared - 1])?;
        let branch = chain[shared];
        let other_branch = other_chain[shared];
        let first = common
            .attribute_ids
            .iter()
            .chain(common.children_ids.iter())
            .find(|id| **id == branch || **id == other_branch);

        if first == Some(&branch) {
            Ok(DocumentPosition::FOLLOWING)
        } else {
            Ok(DocumentPosition::PRECEDING)
        }
    }

    pub fn is_same_node(&self, node_id: NodeId, other_id: NodeId) -> bool {
        node_id == other_id
    }

    /// Structural equality
    ///
    /// Adjacent Text children compare as if normalized; neither tree is
    /// modified.
    pub fn is_equal_node(&self, node_id: NodeId, other_id: NodeId) -> Result<bool> {
        let a = self.get(node_id)?;
        let b = self.get(other_id)?;

        if a.node_type != b.node_type
            || a.node_name != b.node_name
            || a.data() != b.data()
            || a.doctype_ids() != b.doctype_ids()
        {
            return Ok(false);
        }

        if a.attribute_ids.len() != b.attribute_ids.len() {
            return Ok(false);
        }
        for &attr_id in &a.attribute_ids {
            let attr = self.get(attr_id)?;
            let mut matched = false;
            for &candidate_id in &b.attribute_ids {
                let candidate = self.get(candidate_id)?;
                if candidate.node_name == attr.node_name && candidate.data() == attr.data() {
                    matched = true;
                    break;
                }
            }
            if !matched {
                return Ok(false);
            }
        }

        let left = self.logical_children(node_id)?;
        let right = self.logical_children(other_id)?;
        if left.len() != right.len() {
            return Ok(false);
        }

        for (l, r) in left.iter().zip(right.iter()) {
            let equal = match (l, r) {
                (Logical::Text(x), Logical::Text(y)) => x == y,
                (Logical::Node(x), Logical::Node(y)) => self.is_equal_node(*x, *y)?,
                _ => false,
            };
            if !equal {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn logical_children(&self, node_id: NodeId) -> Result<Vec<Logical>> {
        let mut out: Vec<Logical> = Vec::new();
        for &child_id in &self.get(node_id)?.children_ids {
            let child = self.get(child_id)?;
            if child.is_text() {
                let data = child.data().unwrap_or_default();
                if let Some(Logical::Text(run)) = out.last_mut() {
                    run.push_str(data);
                    continue;
                }
                out.push(Logical::Text(data.to_string()));
            } else {
                out.push(Logical::Node(child_id));
            }
        }
        Ok(out)
    }
}
