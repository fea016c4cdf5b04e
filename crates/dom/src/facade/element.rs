use super::{Attr, Element, NamedNodeMap, Node, NodeList};
use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::namespace::validate_qualified_name;
use crate::types::{NodeId, NodeInit, NodeType};

impl Element {
    pub fn tag_name(self, arena: &DomArena) -> Result<&str> {
        self.node_name(arena)
    }

    /// Live attribute map
    pub fn attributes(self) -> NamedNodeMap {
        NamedNodeMap::new(self.0)
    }

    pub fn get_attribute_node(self, arena: &DomArena, name: &str) -> Result<Option<Attr>> {
        for &attr_id in arena.attributes(self.0)? {
            if arena.names_match(&arena.get(attr_id)?.node_name, name) {
                return Ok(Some(Attr(attr_id)));
            }
        }
        Ok(None)
    }

    pub fn get_attribute<'a>(self, arena: &'a DomArena, name: &str) -> Result<Option<&'a str>> {
        match self.get_attribute_node(arena, name)? {
            Some(attr) => attr.value(arena).map(Some),
            None => Ok(None),
        }
    }

    pub fn has_attribute(self, arena: &DomArena, name: &str) -> Result<bool> {
        Ok(self.get_attribute_node(arena, name)?.is_some())
    }

    /// Update in place, or append a new attribute
    pub fn set_attribute(self, arena: &mut DomArena, name: &str, value: &str) -> Result<()> {
        if let Some(attr) = self.get_attribute_node(arena, name)? {
            return attr.set_value(arena, value);
        }

        let attr_id = arena.create(NodeType::Attribute, name, NodeInit::from(value))?;
        let owner = arena.owner(self.0)?;
        arena.assign_owner(attr_id, owner)?;
        arena.append(self.0, attr_id)?;
        Ok(())
    }

    /// No effect when the attribute is absent
    pub fn remove_attribute(self, arena: &mut DomArena, name: &str) -> Result<()> {
        if let Some(attr) = self.get_attribute_node(arena, name)? {
            arena.remove_child(self.0, attr.0)?;
        }
        Ok(())
    }

    /// Attach `attr`, replacing a same-named one; returns the replaced
    pub fn set_attribute_node(self, arena: &mut DomArena, attr: Attr) -> Result<Option<Attr>> {
        let name = attr.name(arena)?.to_string();
        let existing = self.get_attribute_node(arena, &name)?;
        self.put_attribute(arena, attr, existing)
    }

    pub fn remove_attribute_node(self, arena: &mut DomArena, attr: Attr) -> Result<Attr> {
        if arena.parent(attr.0)? != Some(self.0) {
            return Err(DomError::NotFound);
        }
        arena.remove_child(self.0, attr.0)?;
        Ok(attr)
    }

    fn put_attribute(
        self,
        arena: &mut DomArena,
        attr: Attr,
        existing: Option<Attr>,
    ) -> Result<Option<Attr>> {
        if arena.node_type(attr.0)? != NodeType::Attribute {
            return Err(DomError::HierarchyRequest);
        }
        if existing == Some(attr) {
            return Ok(None);
        }

        let document = arena.owner(self.0)?;
        let attr_document = arena.owner(attr.0)?;
        if document.is_some() && attr_document.is_some() && document != attr_document {
            return Err(DomError::WrongDocument);
        }

        let Some(old) = existing else {
            arena.append(self.0, attr.0)?;
            return Ok(None);
        };

        arena.release(attr.0)?;
        let element = arena.get_mut(self.0)?;
        if let Some(slot) = element.attribute_ids.iter_mut().find(|id| **id == old.0) {
            *slot = attr.0;
        }
        arena.get_mut(old.0)?.parent_id = None;
        arena.bind(attr.0, self.0)?;
        Ok(Some(old))
    }

    fn find_attribute_ns(
        self,
        arena: &DomArena,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Result<Option<NodeId>> {
        let namespace_uri = namespace_uri.filter(|uri| !uri.is_empty());
        for &attr_id in arena.attributes(self.0)? {
            if arena.get(attr_id)?.local_name() != local_name {
                continue;
            }
            if arena.namespace_uri(attr_id)?.as_deref() == namespace_uri {
                return Ok(Some(attr_id));
            }
        }
        Ok(None)
    }

    pub fn get_attribute_node_ns(
        self,
        arena: &DomArena,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Result<Option<Attr>> {
        Ok(self
            .find_attribute_ns(arena, namespace_uri, local_name)?
            .map(Attr))
    }

    pub fn get_attribute_ns<'a>(
        self,
        arena: &'a DomArena,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Result<Option<&'a str>> {
        match self.find_attribute_ns(arena, namespace_uri, local_name)? {
            Some(attr_id) => Ok(arena.get(attr_id)?.data()),
            None => Ok(None),
        }
    }

    pub fn has_attribute_ns(
        self,
        arena: &DomArena,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Result<bool> {
        Ok(self
            .find_attribute_ns(arena, namespace_uri, local_name)?
            .is_some())
    }

    /// Namespaced set
    ///
    /// An attribute with the same namespace and local name is updated in
    /// place (taking the new prefix). A new prefixed attribute gets its
    /// `xmlns:<prefix>` declaration when the prefix is not in scope.
    pub fn set_attribute_ns(
        self,
        arena: &mut DomArena,
        namespace_uri: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> Result<()> {
        let (_, local_name) = validate_qualified_name(namespace_uri, qualified_name)?;
        let namespace_uri = namespace_uri.filter(|uri| !uri.is_empty());

        if let Some(attr_id) = self.find_attribute_ns(arena, namespace_uri, local_name)? {
            let attr = arena.get_mut(attr_id)?;
            attr.node_name = qualified_name.to_string();
            attr.namespace_uri = namespace_uri.map(String::from);
            if let Some(data) = attr.data_mut() {
                *data = value.to_string();
            }
            return arena.declare_prefix(attr_id, self.0);
        }

        let attr_id = arena.create(NodeType::Attribute, qualified_name, NodeInit::from(value))?;
        arena.get_mut(attr_id)?.namespace_uri = namespace_uri.map(String::from);
        let owner = arena.owner(self.0)?;
        arena.assign_owner(attr_id, owner)?;
        arena.append(self.0, attr_id)?;
        Ok(())
    }

    pub fn remove_attribute_ns(
        self,
        arena: &mut DomArena,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Result<()> {
        if let Some(attr_id) = self.find_attribute_ns(arena, namespace_uri, local_name)? {
            arena.remove_child(self.0, attr_id)?;
        }
        Ok(())
    }

    /// Attach `attr`, replacing the one with its namespace and local name
    pub fn set_attribute_node_ns(self, arena: &mut DomArena, attr: Attr) -> Result<Option<Attr>> {
        let namespace_uri = arena.namespace_uri(attr.0)?;
        let local_name = arena.get(attr.0)?.local_name().to_string();
        let existing = self.get_attribute_node_ns(arena, namespace_uri.as_deref(), &local_name)?;
        self.put_attribute(arena, attr, existing)
    }

    /// Descendant elements named `name` (`*` for all), in document order
    pub fn get_elements_by_tag_name(self, arena: &DomArena, name: &str) -> Result<NodeList> {
        elements_by_tag_name(arena, self.0, name)
    }

    pub fn get_elements_by_tag_name_ns(
        self,
        arena: &DomArena,
        namespace_uri: Option<&str>,
        local_name: &str,
    ) -> Result<NodeList> {
        elements_by_tag_name_ns(arena, self.0, namespace_uri, local_name)
    }
}

pub(super) fn elements_by_tag_name(arena: &DomArena, root: NodeId, name: &str) -> Result<NodeList> {
    let name = (name != "*").then_some(name);
    Ok(NodeList::new(arena.find(root, Some(NodeType::Element), name, true)?))
}

pub(super) fn elements_by_tag_name_ns(
    arena: &DomArena,
    root: NodeId,
    namespace_uri: Option<&str>,
    local_name: &str,
) -> Result<NodeList> {
    let namespace_uri = namespace_uri.filter(|uri| !uri.is_empty());
    let mut matches = Vec::new();

    for id in arena.find(root, Some(NodeType::Element), None, true)? {
        let local_ok = local_name == "*" || arena.get(id)?.local_name() == local_name;
        if !local_ok {
            continue;
        }
        let uri_ok =
            namespace_uri == Some("*") || arena.namespace_uri(id)?.as_deref() == namespace_uri;
        if uri_ok {
            matches.push(id);
        }
    }

    Ok(NodeList::new(matches))
}

impl Attr {
    pub fn name(self, arena: &DomArena) -> Result<&str> {
        self.node_name(arena)
    }

    pub fn value(self, arena: &DomArena) -> Result<&str> {
        Ok(arena.get(self.0)?.data().unwrap_or_default())
    }

    pub fn set_value(self, arena: &mut DomArena, value: &str) -> Result<()> {
        self.set_node_value(arena, value)
    }

    /// Element the attribute is attached to
    pub fn owner_element(self, arena: &DomArena) -> Result<Option<Element>> {
        Ok(arena.parent(self.0)?.map(Element))
    }

    pub fn specified(self) -> bool {
        true
    }

    /// Attributes named `id` identify their element
    pub fn is_id(self, arena: &DomArena) -> Result<bool> {
        Ok(arena.names_match(self.name(arena)?, "id"))
    }
}
