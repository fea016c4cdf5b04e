use super::{ChildNodes, Document, NodeRef};
use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{DocumentPosition, NodeId, NodeInit, NodeType, Payload};
use crate::utils;

/// Operations shared by every node kind
pub trait Node: Copy + Into<NodeId> {
    fn node_type(self, arena: &DomArena) -> Result<NodeType> {
        arena.node_type(self.into())
    }

    fn node_name(self, arena: &DomArena) -> Result<&str> {
        Ok(&arena.get(self.into())?.node_name)
    }

    /// Data of attributes, character data and processing instructions
    fn node_value(self, arena: &DomArena) -> Result<Option<&str>> {
        Ok(arena.get(self.into())?.data())
    }

    /// No effect on kinds without a value
    fn set_node_value(self, arena: &mut DomArena, value: &str) -> Result<()> {
        if let Some(data) = arena.get_mut(self.into())?.data_mut() {
            *data = value.to_string();
        }
        Ok(())
    }

    fn text_content(self, arena: &DomArena) -> Result<Option<String>> {
        let node = arena.get(self.into())?;
        match node.node_type {
            NodeType::Document | NodeType::DocumentType | NodeType::Notation => Ok(None),
            NodeType::Element | NodeType::DocumentFragment | NodeType::EntityReference => {
                utils::get_text_content(arena, self.into()).map(Some)
            }
            _ => Ok(node.data().map(String::from)),
        }
    }

    /// Replace all children with a single text node (none for `""`)
    fn set_text_content(self, arena: &mut DomArena, text: &str) -> Result<()> {
        let node_id = self.into();
        let (node_type, owner, children) = {
            let node = arena.get(node_id)?;
            (node.node_type, node.owner_id, node.children_ids.clone())
        };
        match node_type {
            NodeType::Element | NodeType::DocumentFragment | NodeType::EntityReference => {
                for child_id in children {
                    arena.remove_child(node_id, child_id)?;
                }
                if !text.is_empty() {
                    let text_id = arena.create(NodeType::Text, "", NodeInit::from(text))?;
                    arena.assign_owner(text_id, owner)?;
                    arena.append(node_id, text_id)?;
                }
                Ok(())
            }
            NodeType::Document | NodeType::DocumentType | NodeType::Notation => Ok(()),
            _ => self.set_node_value(arena, text),
        }
    }

    /// Always `None` for attributes, documents and fragments
    fn parent_node(self, arena: &DomArena) -> Result<Option<NodeRef>> {
        let node = arena.get(self.into())?;
        if node.node_type.forbids_parent() {
            return Ok(None);
        }
        Ok(node.parent_id.map(NodeRef))
    }

    /// Live view of the children
    fn child_nodes(self) -> ChildNodes {
        ChildNodes::new(self.into())
    }

    fn first_child(self, arena: &DomArena) -> Result<Option<NodeRef>> {
        Ok(arena.children(self.into())?.first().copied().map(NodeRef))
    }

    fn last_child(self, arena: &DomArena) -> Result<Option<NodeRef>> {
        Ok(arena.children(self.into())?.last().copied().map(NodeRef))
    }

    fn previous_sibling(self, arena: &DomArena) -> Result<Option<NodeRef>> {
        sibling(arena, self.into(), -1)
    }

    fn next_sibling(self, arena: &DomArena) -> Result<Option<NodeRef>> {
        sibling(arena, self.into(), 1)
    }

    fn has_child_nodes(self, arena: &DomArena) -> Result<bool> {
        Ok(!arena.children(self.into())?.is_empty())
    }

    fn has_attributes(self, arena: &DomArena) -> Result<bool> {
        Ok(!arena.attributes(self.into())?.is_empty())
    }

    /// `None` for documents themselves
    fn owner_document(self, arena: &DomArena) -> Result<Option<Document>> {
        let node = arena.get(self.into())?;
        if node.node_type == NodeType::Document {
            return Ok(None);
        }
        Ok(node.owner_id.map(Document))
    }

    fn prefix(self, arena: &DomArena) -> Result<Option<&str>> {
        let node = arena.get(self.into())?;
        match node.node_type {
            NodeType::Element | NodeType::Attribute => Ok(node.prefix()),
            _ => Ok(None),
        }
    }

    fn local_name(self, arena: &DomArena) -> Result<Option<&str>> {
        let node = arena.get(self.into())?;
        match node.node_type {
            NodeType::Element | NodeType::Attribute => Ok(Some(node.local_name())),
            _ => Ok(None),
        }
    }

    fn namespace_uri(self, arena: &DomArena) -> Result<Option<String>> {
        arena.namespace_uri(self.into())
    }

    /// Base URI of the owning document
    fn base_uri(self, arena: &DomArena) -> Result<Option<&str>> {
        let Some(owner_id) = arena.owner(self.into())? else {
            return Ok(None);
        };
        match &arena.get(owner_id)?.payload {
            Payload::Document { base_uri } => Ok(Some(base_uri.as_str())),
            _ => Ok(None),
        }
    }

    fn lookup_prefix(self, arena: &DomArena, uri: &str) -> Result<Option<String>> {
        arena.lookup_prefix(self.into(), uri)
    }

    fn lookup_namespace_uri(self, arena: &DomArena, prefix: Option<&str>) -> Result<Option<String>> {
        arena.lookup_namespace_uri(self.into(), prefix)
    }

    fn is_default_namespace(self, arena: &DomArena, uri: Option<&str>) -> Result<bool> {
        arena.is_default_namespace(self.into(), uri)
    }

    /// Core and XML, levels 1.0 to 3.0
    fn is_supported(self, feature: &str, version: Option<&str>) -> bool {
        let feature = feature.trim_start_matches('+');
        let known = feature.eq_ignore_ascii_case("core") || feature.eq_ignore_ascii_case("xml");
        known && matches!(version, None | Some("") | Some("1.0") | Some("2.0") | Some("3.0"))
    }

    fn get_feature(self, feature: &str, version: Option<&str>) -> Result<NodeRef> {
        if self.is_supported(feature, version) {
            Ok(NodeRef(self.into()))
        } else {
            Err(DomError::NotSupported(format!("feature {}", feature)))
        }
    }

    fn is_same_node(self, other: impl Node) -> bool {
        let (a, b): (NodeId, NodeId) = (self.into(), other.into());
        a == b
    }

    fn is_equal_node(self, arena: &DomArena, other: impl Node) -> Result<bool> {
        arena.is_equal_node(self.into(), other.into())
    }

    fn compare_document_position(
        self,
        arena: &DomArena,
        other: impl Node,
    ) -> Result<DocumentPosition> {
        arena.compare_document_position(self.into(), other.into())
    }

    fn insert_before<N: Node>(
        self,
        arena: &mut DomArena,
        new_child: N,
        reference: Option<NodeRef>,
    ) -> Result<N> {
        arena.insert_before(self.into(), new_child.into(), reference.map(NodeId::from))?;
        Ok(new_child)
    }

    fn append_child<N: Node>(self, arena: &mut DomArena, new_child: N) -> Result<N> {
        arena.append_child(self.into(), new_child.into())?;
        Ok(new_child)
    }

    fn remove_child<N: Node>(self, arena: &mut DomArena, old_child: N) -> Result<N> {
        arena.remove_child(self.into(), old_child.into())?;
        Ok(old_child)
    }

    fn replace_child<N: Node>(
        self,
        arena: &mut DomArena,
        new_child: impl Node,
        old_child: N,
    ) -> Result<N> {
        arena.replace_child(self.into(), new_child.into(), old_child.into())?;
        Ok(old_child)
    }

    fn clone_node(self, arena: &mut DomArena, deep: bool) -> Result<NodeRef> {
        arena.clone_node(self.into(), deep, None).map(NodeRef)
    }

    fn normalize(self, arena: &mut DomArena) -> Result<()> {
        arena.normalize(self.into())
    }
}

fn sibling(arena: &DomArena, node_id: NodeId, step: isize) -> Result<Option<NodeRef>> {
    let Some(parent_id) = arena.parent(node_id)? else {
        return Ok(None);
    };
    if arena.node_type(node_id)? == NodeType::Attribute {
        return Ok(None);
    }

    let siblings = arena.children(parent_id)?;
    let sibling = siblings
        .iter()
        .position(|id| *id == node_id)
        .and_then(|pos| pos.checked_add_signed(step))
        .and_then(|pos| siblings.get(pos).copied());

    Ok(sibling.map(NodeRef))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::CharacterDataOps;

    #[test]
    fn test_navigation() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let root = doc.create_element(&mut arena, "root").unwrap();
        doc.append_child(&mut arena, root).unwrap();
        let a = doc.create_element(&mut arena, "a").unwrap();
        let b = doc.create_text_node(&mut arena, "b").unwrap();
        root.append_child(&mut arena, a).unwrap();
        root.append_child(&mut arena, b).unwrap();

        assert_eq!(root.first_child(&arena).unwrap(), Some(a.into()));
        assert_eq!(root.last_child(&arena).unwrap(), Some(b.into()));
        assert_eq!(a.next_sibling(&arena).unwrap(), Some(b.into()));
        assert_eq!(b.previous_sibling(&arena).unwrap(), Some(a.into()));
        assert_eq!(a.previous_sibling(&arena).unwrap(), None);
        assert_eq!(b.next_sibling(&arena).unwrap(), None);
        assert_eq!(a.parent_node(&arena).unwrap(), Some(root.into()));
        assert_eq!(root.owner_document(&arena).unwrap(), Some(doc));
        assert_eq!(doc.owner_document(&arena).unwrap(), None);
        assert_eq!(doc.parent_node(&arena).unwrap(), None);
    }

    #[test]
    fn test_attribute_has_no_parent_node() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let el = doc.create_element(&mut arena, "e").unwrap();
        el.set_attribute(&mut arena, "k", "v").unwrap();
        let attr = el.get_attribute_node(&arena, "k").unwrap().unwrap();

        assert_eq!(attr.parent_node(&arena).unwrap(), None);
        assert_eq!(attr.owner_element(&arena).unwrap(), Some(el));
        assert_eq!(attr.next_sibling(&arena).unwrap(), None);
        assert_eq!(attr.node_value(&arena).unwrap(), Some("v"));
    }

    #[test]
    fn test_text_content() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let p = doc.create_element(&mut arena, "p").unwrap();
        let t = doc.create_text_node(&mut arena, "one ").unwrap();
        let em = doc.create_element(&mut arena, "em").unwrap();
        let t2 = doc.create_text_node(&mut arena, "two").unwrap();
        let c = doc.create_comment(&mut arena, "skip").unwrap();
        p.append_child(&mut arena, t).unwrap();
        p.append_child(&mut arena, em).unwrap();
        em.append_child(&mut arena, t2).unwrap();
        p.append_child(&mut arena, c).unwrap();

        assert_eq!(p.text_content(&arena).unwrap().as_deref(), Some("one two"));
        assert_eq!(doc.text_content(&arena).unwrap(), None);

        p.set_text_content(&mut arena, "fresh").unwrap();
        assert_eq!(p.child_nodes().length(&arena).unwrap(), 1);
        assert_eq!(p.text_content(&arena).unwrap().as_deref(), Some("fresh"));
        assert_eq!(em.parent_node(&arena).unwrap(), None);

        t.set_text_content(&mut arena, "changed").unwrap();
        assert_eq!(t.data(&arena).unwrap(), "changed");
    }

    #[test]
    fn test_names_and_features() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(Some("/base")).unwrap();
        let el = doc
            .create_element_ns(&mut arena, Some("/lab"), "lab:node")
            .unwrap();
        let text = doc.create_text_node(&mut arena, "x").unwrap();

        assert_eq!(el.prefix(&arena).unwrap(), Some("lab"));
        assert_eq!(el.local_name(&arena).unwrap(), Some("node"));
        assert_eq!(text.local_name(&arena).unwrap(), None);
        assert_eq!(text.node_name(&arena).unwrap(), "#text");
        assert_eq!(el.base_uri(&arena).unwrap(), Some("/base"));

        assert!(el.is_supported("Core", Some("2.0")));
        assert!(!el.is_supported("Events", None));
        assert!(el.get_feature("xml", None).is_ok());
        assert!(matches!(
            el.get_feature("Views", None),
            Err(DomError::NotSupported(_))
        ));
    }
}
