//! Namespace resolution
//!
//! Bindings are never cached: every query walks the ancestor chain and
//! reads the `xmlns`/`xmlns:<prefix>` attributes as they are right now.

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType, XMLNS_NAMESPACE, XML_NAMESPACE};
use crate::utils::split_qualified_name;
use indexmap::IndexMap;

/// Prefix → URI bindings in scope; the default namespace uses the key `""`
pub type NamespaceScope = IndexMap<String, String>;

/// Check a `(namespaceURI, qualifiedName)` pair for namespaced creation
///
/// Returns the split `(prefix, local_name)`. An empty URI counts as none.
pub fn validate_qualified_name<'a>(
    namespace_uri: Option<&str>,
    qualified_name: &'a str,
) -> Result<(Option<&'a str>, &'a str)> {
    let namespace_uri = namespace_uri.filter(|uri| !uri.is_empty());
    let (prefix, local_name) = split_qualified_name(qualified_name);

    if local_name.is_empty() || prefix == Some("") {
        return Err(DomError::Namespace(format!(
            "malformed qualified name '{}'",
            qualified_name
        )));
    }

    let is_xmlns = qualified_name == "xmlns" || prefix == Some("xmlns");

    match (namespace_uri, prefix) {
        (None, Some(prefix)) => Err(DomError::Namespace(format!(
            "prefix '{}' without a namespace",
            prefix
        ))),
        (Some(uri), None) if !is_xmlns => Err(DomError::Namespace(format!(
            "namespace '{}' requires a prefixed name, got '{}'",
            uri, qualified_name
        ))),
        (uri, Some("xml")) if uri != Some(XML_NAMESPACE) => Err(DomError::Namespace(
            "prefix 'xml' is reserved for the XML namespace".to_string(),
        )),
        (uri, _) if is_xmlns && uri != Some(XMLNS_NAMESPACE) => Err(DomError::Namespace(
            "'xmlns' is reserved for the xmlns namespace".to_string(),
        )),
        (Some(XMLNS_NAMESPACE), _) if !is_xmlns => Err(DomError::Namespace(
            "the xmlns namespace is reserved for 'xmlns' names".to_string(),
        )),
        _ => Ok((prefix, local_name)),
    }
}

impl DomArena {
    /// Namespace bindings visible from `node`, outermost declarations first
    pub fn ns(&self, node_id: NodeId) -> Result<NamespaceScope> {
        let mut chain = Vec::new();
        let mut current = Some(node_id);
        while let Some(id) = current {
            chain.push(id);
            current = self.get(id)?.parent_id;
        }

        let mut scope = NamespaceScope::new();
        for &id in chain.iter().rev() {
            let node = self.get(id)?;
            if !node.is_element() {
                continue;
            }
            for &attr_id in &node.attribute_ids {
                let attr = self.get(attr_id)?;
                let value = attr.data().unwrap_or_default().to_string();
                match split_qualified_name(&attr.node_name) {
                    (None, "xmlns") => {
                        scope.insert(String::new(), value);
                    }
                    (Some("xmlns"), prefix) => {
                        scope.insert(prefix.to_string(), value);
                    }
                    _ => {}
                }
            }
        }

        Ok(scope)
    }

    /// First prefix bound to `uri`, ignoring the default namespace
    pub fn lookup_prefix(&self, node_id: NodeId, uri: &str) -> Result<Option<String>> {
        Ok(self
            .ns(node_id)?
            .into_iter()
            .find(|(prefix, bound)| !prefix.is_empty() && bound == uri)
            .map(|(prefix, _)| prefix))
    }

    /// URI bound to `prefix` (`None` asks for the default namespace)
    pub fn lookup_namespace_uri(
        &self,
        node_id: NodeId,
        prefix: Option<&str>,
    ) -> Result<Option<String>> {
        match prefix {
            Some("xml") => return Ok(Some(XML_NAMESPACE.to_string())),
            Some("xmlns") => return Ok(Some(XMLNS_NAMESPACE.to_string())),
            _ => {}
        }

        Ok(self
            .ns(node_id)?
            .swap_remove(prefix.unwrap_or(""))
            .filter(|uri| !uri.is_empty()))
    }

    pub fn is_default_namespace(&self, node_id: NodeId, uri: Option<&str>) -> Result<bool> {
        let uri = uri.filter(|uri| !uri.is_empty());
        let default = self.lookup_namespace_uri(node_id, None)?;
        Ok(default.as_deref() == uri)
    }

    /// `prefix:local_name` for the first binding of `uri`
    ///
    /// No URI asks for the default namespace. `None` when nothing is bound.
    pub fn qualified_name(
        &self,
        node_id: NodeId,
        uri: Option<&str>,
        local_name: &str,
    ) -> Result<Option<String>> {
        let uri = uri.unwrap_or("");
        let scope = self.ns(node_id)?;

        let prefix = if uri.is_empty() {
            scope.get_key_value("").map(|(key, _)| key.as_str())
        } else {
            scope
                .iter()
                .find(|(_, bound)| bound.as_str() == uri)
                .map(|(key, _)| key.as_str())
        };

        Ok(prefix.map(|prefix| match prefix {
            "" => local_name.to_string(),
            prefix => format!("{}:{}", prefix, local_name),
        }))
    }

    /// Effective namespace of an element or attribute
    ///
    /// Uses the URI given at namespaced creation, otherwise resolves the
    /// prefix in scope. Unprefixed attributes have no namespace.
    pub fn namespace_uri(&self, node_id: NodeId) -> Result<Option<String>> {
        let node = self.get(node_id)?;
        if let Some(uri) = &node.namespace_uri {
            return Ok(Some(uri.clone()));
        }

        match (node.node_type, node.prefix()) {
            (NodeType::Attribute, None) if node.node_name == "xmlns" => {
                Ok(Some(XMLNS_NAMESPACE.to_string()))
            }
            (NodeType::Attribute, None) => Ok(None),
            (NodeType::Element | NodeType::Attribute, prefix) => {
                self.lookup_namespace_uri(node_id, prefix)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeInit;
    use indexmap::IndexMap;

    fn element(arena: &mut DomArena, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let map: IndexMap<String, String> = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        arena
            .create(NodeType::Element, name, NodeInit::Attributes(map))
            .unwrap()
    }

    #[test]
    fn test_scope_merges_ancestors() {
        let mut arena = DomArena::new();
        let root = element(&mut arena, "lab:root", &[("xmlns", "/spul"), ("xmlns:lab", "/lab")]);
        let test = element(&mut arena, "lab:test", &[("xmlns", "/default")]);
        arena.append(root, test).unwrap();

        let scope = arena.ns(test).unwrap();
        assert_eq!(scope.get("").map(String::as_str), Some("/default"));
        assert_eq!(scope.get("lab").map(String::as_str), Some("/lab"));

        assert!(arena.is_default_namespace(root, Some("/spul")).unwrap());
        assert!(!arena.is_default_namespace(test, Some("/spul")).unwrap());
        assert!(arena.is_default_namespace(test, Some("/default")).unwrap());

        assert_eq!(arena.lookup_prefix(root, "/lab").unwrap().as_deref(), Some("lab"));
        assert_eq!(arena.lookup_prefix(root, "/spul").unwrap(), None);
    }

    #[test]
    fn test_scope_is_live() {
        let mut arena = DomArena::new();
        let root = element(&mut arena, "root", &[("xmlns:a", "/a")]);
        let child = element(&mut arena, "child", &[]);
        assert!(arena.ns(child).unwrap().is_empty());

        arena.append(root, child).unwrap();
        assert_eq!(arena.lookup_namespace_uri(child, Some("a")).unwrap().as_deref(), Some("/a"));

        arena.release(child).unwrap();
        assert_eq!(arena.lookup_namespace_uri(child, Some("a")).unwrap(), None);
    }

    #[test]
    fn test_lookup_prefix_takes_first_declared() {
        let mut arena = DomArena::new();
        let root = element(&mut arena, "root", &[("xmlns:b", "/same"), ("xmlns:a", "/same")]);
        assert_eq!(arena.lookup_prefix(root, "/same").unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_qualified_name() {
        let mut arena = DomArena::new();
        let root = element(&mut arena, "root", &[("xmlns", "/d"), ("xmlns:x", "/x")]);

        assert_eq!(arena.qualified_name(root, Some("/x"), "n").unwrap().as_deref(), Some("x:n"));
        assert_eq!(arena.qualified_name(root, Some("/d"), "n").unwrap().as_deref(), Some("n"));
        assert_eq!(arena.qualified_name(root, None, "n").unwrap().as_deref(), Some("n"));
        assert_eq!(arena.qualified_name(root, Some("/nope"), "n").unwrap(), None);
    }

    #[test]
    fn test_namespace_uri_resolution() {
        let mut arena = DomArena::new();
        let root = element(&mut arena, "root", &[("xmlns", "/spul"), ("xmlns:foo", "/foo")]);
        let child = element(&mut arena, "child", &[("foo", "bar"), ("foo:bar", "baz")]);
        arena.append(root, child).unwrap();

        let attrs = arena.attributes(child).unwrap().to_vec();
        assert_eq!(arena.namespace_uri(attrs[0]).unwrap(), None);
        assert_eq!(arena.namespace_uri(attrs[1]).unwrap().as_deref(), Some("/foo"));
        assert_eq!(arena.namespace_uri(child).unwrap().as_deref(), Some("/spul"));
    }

    #[test]
    fn test_validate_qualified_name() {
        assert!(validate_qualified_name(None, "foo:bar").is_err());
        assert!(validate_qualified_name(Some("/new"), "foo").is_err());
        assert!(validate_qualified_name(Some("/new"), "xml:foo").is_err());
        assert!(validate_qualified_name(Some("/new"), "xmlns").is_err());
        assert!(validate_qualified_name(None, "xmlns").is_err());
        assert!(validate_qualified_name(Some(XMLNS_NAMESPACE), "foo:bar").is_err());
        assert!(validate_qualified_name(None, ":bar").is_err());

        assert_eq!(validate_qualified_name(None, "node").unwrap(), (None, "node"));
        assert_eq!(
            validate_qualified_name(Some("/lab"), "lab:node").unwrap(),
            (Some("lab"), "node")
        );
        assert!(validate_qualified_name(Some(XML_NAMESPACE), "xml:g").is_ok());
        assert!(validate_qualified_name(Some(XMLNS_NAMESPACE), "xmlns").is_ok());
        assert!(validate_qualified_name(Some(XMLNS_NAMESPACE), "xmlns:p").is_ok());
    }
}
