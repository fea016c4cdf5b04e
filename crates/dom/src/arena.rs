//! Arena-based DOM tree storage
//!
//! Every record lives in one `Vec<DomNode>` and is addressed by its index.
//! Parent and owner links are ids, so there are no reference cycles and
//! identity is a `u32` comparison.
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Doc0][Elem1][Attr2][Text3]...
//!          ↑ owner_id of every record bound below it
//! ```
//!
//! Records are never freed. A detached subtree simply stops being
//! reachable from any document.

use crate::config::DomConfig;
use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeInit, NodeType, Payload, XMLNS_NAMESPACE};
use tracing::{debug, trace};

/// Arena allocator for DOM nodes
#[derive(Debug)]
pub struct DomArena {
    nodes: Vec<DomNode>,
    config: DomConfig,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_config(DomConfig::default())
    }

    pub fn with_config(config: DomConfig) -> Self {
        Self {
            nodes: Vec::with_capacity(256),
            config,
        }
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            config: DomConfig::default(),
        }
    }

    pub fn config(&self) -> &DomConfig {
        &self.config
    }

    /// Compare two names under the configured matching rule
    pub fn names_match(&self, a: &str, b: &str) -> bool {
        self.config.name_matching.matches(a, b)
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over all records, attached or not
    pub fn iter(&self) -> impl Iterator<Item = &DomNode> {
        self.nodes.iter()
    }

    pub fn node_type(&self, node_id: NodeId) -> Result<NodeType> {
        Ok(self.get(node_id)?.node_type)
    }

    pub fn parent(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.parent_id)
    }

    pub fn owner(&self, node_id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.get(node_id)?.owner_id)
    }

    pub fn children(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node_id)?.children_ids)
    }

    pub fn attributes(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node_id)?.attribute_ids)
    }

    /// Traverse tree depth-first (iterative, no recursion)
    ///
    /// Visits children only; attributes are not part of document order.
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    fn push(&mut self, node_type: NodeType, node_name: String, payload: Payload) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        self.nodes
            .push(DomNode::new(node_id, node_type, node_name, payload));
        node_id
    }

    /// Create a detached record
    ///
    /// Element attribute maps are expanded into Attribute records in map
    /// order. Documents get the configured working directory as base URI
    /// unless one is given, and own themselves.
    pub fn create(&mut self, kind: NodeType, name: &str, init: NodeInit) -> Result<NodeId> {
        let name = kind.fixed_name().unwrap_or(name).to_string();

        let payload = match (kind, init) {
            (NodeType::Entity | NodeType::Notation, _) => {
                return Err(DomError::NotSupported(format!("creating {:?} nodes", kind)))
            }
            (NodeType::Element, NodeInit::Attributes(map)) => {
                let element_id = self.push(kind, name, Payload::None);
                for (attr_name, value) in map {
                    let attr_id = self.push(NodeType::Attribute, attr_name, Payload::Data(value));
                    self.append(element_id, attr_id)?;
                }
                return Ok(element_id);
            }
            (
                NodeType::Element
                | NodeType::DocumentFragment
                | NodeType::EntityReference,
                NodeInit::Empty,
            ) => Payload::None,
            (
                NodeType::Attribute
                | NodeType::Text
                | NodeType::CdataSection
                | NodeType::Comment
                | NodeType::ProcessingInstruction,
                NodeInit::Empty,
            ) => Payload::Data(String::new()),
            (
                NodeType::Attribute
                | NodeType::Text
                | NodeType::CdataSection
                | NodeType::Comment
                | NodeType::ProcessingInstruction,
                NodeInit::Data(data),
            ) => Payload::Data(data),
            (NodeType::Document, NodeInit::Empty) => Payload::Document {
                base_uri: self.config.working_directory.clone(),
            },
            (NodeType::Document, NodeInit::BaseUri(base_uri)) => Payload::Document { base_uri },
            (NodeType::DocumentType, NodeInit::Empty) => Payload::DocumentType(Default::default()),
            (NodeType::DocumentType, NodeInit::DocumentType(ids)) => Payload::DocumentType(ids),
            _ => return Err(DomError::InvalidPayload(kind)),
        };

        let node_id = self.push(kind, name, payload);
        if kind == NodeType::Document {
            self.get_mut(node_id)?.owner_id = Some(node_id);
        }

        trace!("created {:?} node {}", kind, node_id);
        Ok(node_id)
    }

    /// Create a document, optionally with an explicit base URI
    pub fn create_document(&mut self, base_uri: Option<&str>) -> Result<NodeId> {
        let init = match base_uri {
            Some(uri) => NodeInit::BaseUri(uri.to_string()),
            None => NodeInit::Empty,
        };
        self.create(NodeType::Document, "", init)
    }

    /// Append `child` to `node`
    ///
    /// Attributes go to the attribute list, everything else to the
    /// children. Appending to a CDATA section concatenates the child's
    /// data into it instead of inserting anything.
    pub fn append(&mut self, node_id: NodeId, child_id: NodeId) -> Result<NodeId> {
        let node_type = self.node_type(node_id)?;
        let child_type = self.node_type(child_id)?;

        if child_type == NodeType::Attribute {
            if node_type != NodeType::Element {
                return Err(DomError::HierarchyRequest);
            }
            self.release(child_id)?;
            self.get_mut(node_id)?.attribute_ids.push(child_id);
        } else if node_type == NodeType::CdataSection {
            let data = self.get(child_id)?.data().unwrap_or_default().to_string();
            if let Some(target) = self.get_mut(node_id)?.data_mut() {
                target.push_str(&data);
            }
            return Ok(child_id);
        } else {
            if child_type.forbids_parent() {
                return Err(DomError::HierarchyRequest);
            }
            self.release(child_id)?;
            self.get_mut(node_id)?.children_ids.push(child_id);
        }

        self.bind(child_id, node_id)?;
        Ok(child_id)
    }

    /// Link `child` under `parent`
    ///
    /// Detaches `child` from a different previous parent, takes over the
    /// parent's owner for the whole subtree and, for prefixed attributes
    /// carrying a namespace URI, declares the prefix on the element when it
    /// is not in scope yet. List placement is the caller's job (`append`
    /// does both).
    pub fn bind(&mut self, child_id: NodeId, parent_id: NodeId) -> Result<()> {
        if let Some(previous) = self.parent(child_id)? {
            if previous != parent_id {
                self.release(child_id)?;
            }
        }

        let parent = self.get(parent_id)?;
        let owner_id = if parent.node_type == NodeType::Document {
            Some(parent_id)
        } else {
            parent.owner_id
        };

        let child = self.get_mut(child_id)?;
        child.parent_id = Some(parent_id);
        let child_type = child.node_type;
        if child.owner_id != owner_id {
            self.assign_owner(child_id, owner_id)?;
        }

        if child_type == NodeType::Attribute {
            self.declare_prefix(child_id, parent_id)?;
        }

        Ok(())
    }

    /// Remove `node` from its parent's lists
    ///
    /// Clears the parent link but keeps the owner. Returns whether there
    /// was a parent.
    pub fn release(&mut self, node_id: NodeId) -> Result<bool> {
        let Some(parent_id) = self.parent(node_id)? else {
            return Ok(false);
        };

        let parent = self.get_mut(parent_id)?;
        parent.children_ids.retain(|id| *id != node_id);
        parent.attribute_ids.retain(|id| *id != node_id);
        self.get_mut(node_id)?.parent_id = None;

        trace!("released node {} from {}", node_id, parent_id);
        Ok(true)
    }

    /// Set the owner of a subtree (attributes included)
    pub(crate) fn assign_owner(&mut self, node_id: NodeId, owner_id: Option<NodeId>) -> Result<()> {
        let mut stack = vec![node_id];

        while let Some(id) = stack.pop() {
            let node = self.get_mut(id)?;
            if node.node_type != NodeType::Document {
                node.owner_id = owner_id;
            }
            stack.extend(node.attribute_ids.iter().copied());
            stack.extend(node.children_ids.iter().copied());
        }

        Ok(())
    }

    /// Declare a namespaced attribute's prefix on `element` unless in scope
    pub(crate) fn declare_prefix(&mut self, attr_id: NodeId, element_id: NodeId) -> Result<()> {
        let attr = self.get(attr_id)?;
        let (Some(prefix), Some(uri)) = (attr.prefix(), attr.namespace_uri.as_deref()) else {
            return Ok(());
        };
        if prefix == "xmlns" || prefix == "xml" {
            return Ok(());
        }

        if self.ns(element_id)?.contains_key(prefix) {
            return Ok(());
        }

        let declaration = format!("xmlns:{}", prefix);
        let uri = uri.to_string();
        debug!("declaring {}=\"{}\" on node {}", declaration, uri, element_id);

        let decl_id = self.push(NodeType::Attribute, declaration, Payload::Data(uri));
        self.get_mut(decl_id)?.namespace_uri = Some(XMLNS_NAMESPACE.to_string());
        self.get_mut(element_id)?.attribute_ids.push(decl_id);
        self.bind(decl_id, element_id)
    }

    /// Matching descendants in document order
    ///
    /// Asking for attributes of an element also searches the element's own
    /// attribute list.
    pub fn find(
        &self,
        node_id: NodeId,
        kind: Option<NodeType>,
        name: Option<&str>,
        recursive: bool,
    ) -> Result<Vec<NodeId>> {
        let mut found = Vec::new();
        self.find_into(node_id, kind, name, recursive, &mut found)?;
        Ok(found)
    }

    fn find_into(
        &self,
        node_id: NodeId,
        kind: Option<NodeType>,
        name: Option<&str>,
        recursive: bool,
        found: &mut Vec<NodeId>,
    ) -> Result<()> {
        let node = self.get(node_id)?;
        let attributes: &[NodeId] = if kind == Some(NodeType::Attribute) && node.is_element() {
            &node.attribute_ids
        } else {
            &[]
        };

        for &child_id in attributes.iter().chain(node.children_ids.iter()) {
            let child = self.get(child_id)?;
            let kind_ok = kind.map_or(true, |k| k == child.node_type);
            let name_ok = name.map_or(true, |n| self.names_match(n, &child.node_name));
            if kind_ok && name_ok {
                found.push(child_id);
            }
            if recursive {
                self.find_into(child_id, kind, name, recursive, found)?;
            }
        }

        Ok(())
    }

    /// Copy a record
    ///
    /// Element attributes are always copied. Children only when `deep`.
    /// The copy keeps the source's owner unless one is given, and is not
    /// attached anywhere.
    pub fn clone_node(
        &mut self,
        node_id: NodeId,
        deep: bool,
        owner_id: Option<NodeId>,
    ) -> Result<NodeId> {
        let source = self.get(node_id)?;
        let node_type = source.node_type;
        let node_name = source.node_name.clone();
        let namespace_uri = source.namespace_uri.clone();
        let payload = source.payload.clone();
        let attribute_ids = source.attribute_ids.clone();
        let children_ids = source.children_ids.clone();
        let owner_id = owner_id.or(source.owner_id);

        let copy_id = self.push(node_type, node_name, payload);
        let copy = self.get_mut(copy_id)?;
        copy.namespace_uri = namespace_uri;
        copy.owner_id = if node_type == NodeType::Document {
            Some(copy_id)
        } else {
            owner_id
        };

        for attr_id in attribute_ids {
            let attr_copy = self.clone_node(attr_id, false, owner_id)?;
            self.get_mut(copy_id)?.attribute_ids.push(attr_copy);
            self.get_mut(attr_copy)?.parent_id = Some(copy_id);
        }

        if deep {
            let child_owner = if node_type == NodeType::Document {
                Some(copy_id)
            } else {
                owner_id
            };
            for child_id in children_ids {
                let child_copy = self.clone_node(child_id, true, child_owner)?;
                self.get_mut(copy_id)?.children_ids.push(child_copy);
                self.get_mut(child_copy)?.parent_id = Some(copy_id);
            }
        }

        Ok(copy_id)
    }

    /// Position of `child` among the children of `node`
    pub fn index(&self, node_id: NodeId, child_id: NodeId) -> Result<Option<usize>> {
        Ok(self
            .get(node_id)?
            .children_ids
            .iter()
            .position(|id| *id == child_id))
    }

    /// Merge runs of adjacent Text children, recursing into elements and
    /// documents
    pub fn normalize(&mut self, node_id: NodeId) -> Result<()> {
        let children = self.get(node_id)?.children_ids.clone();

        for i in (0..children.len()).rev() {
            let child_id = children[i];
            match self.node_type(child_id)? {
                NodeType::Text => {
                    let siblings = &self.get(node_id)?.children_ids;
                    let next = siblings
                        .iter()
                        .position(|id| *id == child_id)
                        .and_then(|pos| siblings.get(pos + 1).copied());
                    let Some(next_id) = next else {
                        continue;
                    };
                    if self.node_type(next_id)? != NodeType::Text {
                        continue;
                    }
                    let tail = self.get(next_id)?.data().unwrap_or_default().to_string();
                    if let Some(data) = self.get_mut(child_id)?.data_mut() {
                        data.push_str(&tail);
                    }
                    self.release(next_id)?;
                }
                NodeType::Element | NodeType::Document => self.normalize(child_id)?,
                _ => {}
            }
        }

        Ok(())
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn element_with(arena: &mut DomArena, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let map: IndexMap<String, String> = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        arena
            .create(NodeType::Element, name, NodeInit::Attributes(map))
            .unwrap()
    }

    #[test]
    fn test_create_expands_attributes_in_order() {
        let mut arena = DomArena::new();
        let div = element_with(&mut arena, "div", &[("id", "a"), ("class", "b")]);

        let attrs = arena.attributes(div).unwrap().to_vec();
        assert_eq!(attrs.len(), 2);
        assert_eq!(arena.get(attrs[0]).unwrap().node_name, "id");
        assert_eq!(arena.get(attrs[1]).unwrap().data(), Some("b"));
        assert_eq!(arena.parent(attrs[0]).unwrap(), Some(div));
        assert!(arena.children(div).unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_entity_and_bad_payload() {
        let mut arena = DomArena::new();
        assert!(matches!(
            arena.create(NodeType::Entity, "e", NodeInit::Empty),
            Err(DomError::NotSupported(_))
        ));
        assert!(matches!(
            arena.create(NodeType::Text, "", NodeInit::BaseUri("x".into())),
            Err(DomError::InvalidPayload(NodeType::Text))
        ));
    }

    #[test]
    fn test_document_owns_itself() {
        let mut arena = DomArena::new();
        let doc = arena.create_document(Some("/tmp")).unwrap();
        assert_eq!(arena.owner(doc).unwrap(), Some(doc));
        assert_eq!(arena.get(doc).unwrap().node_name, "#document");

        let root = arena.create(NodeType::Element, "root", NodeInit::Empty).unwrap();
        arena.append(doc, root).unwrap();
        assert_eq!(arena.owner(root).unwrap(), Some(doc));
    }

    #[test]
    fn test_append_moves_node() {
        let mut arena = DomArena::new();
        let a = arena.create(NodeType::Element, "a", NodeInit::Empty).unwrap();
        let b = arena.create(NodeType::Element, "b", NodeInit::Empty).unwrap();
        let n = arena.create(NodeType::Text, "", "x".into()).unwrap();

        arena.append(a, n).unwrap();
        arena.append(b, n).unwrap();

        assert!(arena.children(a).unwrap().is_empty());
        assert_eq!(arena.children(b).unwrap(), &[n]);
        assert_eq!(arena.parent(n).unwrap(), Some(b));
    }

    #[test]
    fn test_append_to_cdata_concatenates() {
        let mut arena = DomArena::new();
        let cdata = arena
            .create(NodeType::CdataSection, "", "a<b".into())
            .unwrap();
        let text = arena.create(NodeType::Text, "", "&c".into()).unwrap();

        arena.append(cdata, text).unwrap();

        assert_eq!(arena.get(cdata).unwrap().data(), Some("a<b&c"));
        assert!(arena.children(cdata).unwrap().is_empty());
        assert_eq!(arena.parent(text).unwrap(), None);
    }

    #[test]
    fn test_release_keeps_owner() {
        let mut arena = DomArena::new();
        let doc = arena.create_document(None).unwrap();
        let root = arena.create(NodeType::Element, "root", NodeInit::Empty).unwrap();
        arena.append(doc, root).unwrap();

        assert!(arena.release(root).unwrap());
        assert!(!arena.release(root).unwrap());
        assert_eq!(arena.parent(root).unwrap(), None);
        assert_eq!(arena.owner(root).unwrap(), Some(doc));
        assert!(arena.children(doc).unwrap().is_empty());
    }

    #[test]
    fn test_bind_declares_missing_prefix() {
        let mut arena = DomArena::new();
        let el = arena.create(NodeType::Element, "node", NodeInit::Empty).unwrap();
        let attr = arena
            .create(NodeType::Attribute, "d:e", "f".into())
            .unwrap();
        arena.get_mut(attr).unwrap().namespace_uri = Some("/c".into());

        arena.append(el, attr).unwrap();
        let scope = arena.ns(el).unwrap();
        assert_eq!(scope.get("d").map(String::as_str), Some("/c"));
        assert_eq!(arena.attributes(el).unwrap().len(), 2);

        // in scope now, no second declaration
        let other = arena
            .create(NodeType::Attribute, "d:g", "h".into())
            .unwrap();
        arena.get_mut(other).unwrap().namespace_uri = Some("/c".into());
        arena.append(el, other).unwrap();
        assert_eq!(arena.attributes(el).unwrap().len(), 3);
    }

    #[test]
    fn test_find_case_insensitive_and_attributes() {
        let mut arena = DomArena::new();
        let root = element_with(&mut arena, "root", &[("ID", "r")]);
        let div = element_with(&mut arena, "DIV", &[]);
        let inner = element_with(&mut arena, "div", &[]);
        arena.append(root, div).unwrap();
        arena.append(div, inner).unwrap();

        let shallow = arena.find(root, Some(NodeType::Element), Some("div"), false).unwrap();
        assert_eq!(shallow, vec![div]);

        let deep = arena.find(root, Some(NodeType::Element), Some("div"), true).unwrap();
        assert_eq!(deep, vec![div, inner]);

        let attrs = arena.find(root, Some(NodeType::Attribute), Some("id"), false).unwrap();
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_find_exact_matching() {
        let config = DomConfig {
            name_matching: crate::config::NameMatching::Exact,
            ..DomConfig::default()
        };
        let mut arena = DomArena::with_config(config);
        let root = element_with(&mut arena, "root", &[]);
        let div = element_with(&mut arena, "DIV", &[]);
        arena.append(root, div).unwrap();

        assert!(arena.find(root, None, Some("div"), true).unwrap().is_empty());
        assert_eq!(arena.find(root, None, Some("DIV"), true).unwrap(), vec![div]);
    }

    #[test]
    fn test_clone_copies_attributes_always() {
        let mut arena = DomArena::new();
        let root = element_with(&mut arena, "root", &[("a", "1")]);
        let child = element_with(&mut arena, "child", &[]);
        arena.append(root, child).unwrap();

        let shallow = arena.clone_node(root, false, None).unwrap();
        assert_eq!(arena.attributes(shallow).unwrap().len(), 1);
        assert!(arena.children(shallow).unwrap().is_empty());

        let deep = arena.clone_node(root, true, None).unwrap();
        let copied = arena.children(deep).unwrap().to_vec();
        assert_eq!(copied.len(), 1);
        assert_ne!(copied[0], child);
        assert_eq!(arena.parent(copied[0]).unwrap(), Some(deep));

        // attribute lists are independent
        let source_attr = arena.attributes(root).unwrap()[0];
        arena.get_mut(source_attr).unwrap().payload = Payload::Data("2".into());
        let copy_attr = arena.attributes(deep).unwrap()[0];
        assert_eq!(arena.get(copy_attr).unwrap().data(), Some("1"));
    }

    #[test]
    fn test_index() {
        let mut arena = DomArena::new();
        let root = element_with(&mut arena, "root", &[]);
        let a = element_with(&mut arena, "a", &[]);
        let b = element_with(&mut arena, "b", &[]);
        arena.append(root, a).unwrap();
        arena.append(root, b).unwrap();

        assert_eq!(arena.index(root, b).unwrap(), Some(1));
        assert_eq!(arena.index(a, b).unwrap(), None);
    }

    #[test]
    fn test_normalize_merges_text_runs() {
        let mut arena = DomArena::new();
        let root = element_with(&mut arena, "root", &[]);
        let inner = element_with(&mut arena, "inner", &[]);
        for data in ["a", "b", "c"] {
            let t = arena.create(NodeType::Text, "", data.into()).unwrap();
            arena.append(root, t).unwrap();
        }
        arena.append(root, inner).unwrap();
        for data in ["d", "e"] {
            let t = arena.create(NodeType::Text, "", data.into()).unwrap();
            arena.append(inner, t).unwrap();
        }

        arena.normalize(root).unwrap();
        let children = arena.children(root).unwrap().to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(arena.get(children[0]).unwrap().data(), Some("abc"));
        assert_eq!(arena.children(inner).unwrap().len(), 1);

        arena.normalize(root).unwrap();
        assert_eq!(arena.children(root).unwrap().len(), 2);
    }

    #[test]
    fn test_traverse_df() {
        let mut arena = DomArena::new();
        let root = element_with(&mut arena, "div", &[("id", "x")]);
        let s1 = element_with(&mut arena, "span", &[]);
        let s2 = element_with(&mut arena, "p", &[]);
        arena.append(root, s1).unwrap();
        arena.append(root, s2).unwrap();

        let mut visited = Vec::new();
        arena
            .traverse_df(root, |node| {
                visited.push(node.node_name.clone());
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, vec!["div", "span", "p"]);
    }
}
