//! DOM Serializer - render a (sub)tree back to XML or HTML text
//!
//! This module handles:
//! - Format-specific tags (self-closing in XML, void elements in HTML)
//! - Attribute quoting and boolean attributes
//! - Text encoding and whitespace collapsing
//! - Format inference from the first doctype or processing instruction

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::*;
use crate::utils::{collapse_whitespace, split_qualified_name};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Elements that never have content (HTML)
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "img", "input",
    "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Attributes written by name only (HTML)
pub const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "autofocus",
    "autoplay",
    "async",
    "checked",
    "controls",
    "defer",
    "disabled",
    "hidden",
    "loop",
    "multiple",
    "open",
    "readonly",
    "required",
    "scoped",
    "selected",
];

/// Output dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Xml,
    Xhtml,
    Html,
}

impl Format {
    pub fn is_html(self) -> bool {
        self == Format::Html
    }
}

/// Find the leftmost `xhtml`, `xml`, `html` or bare `ml` in a value
pub fn detect_format(value: &str) -> Option<Format> {
    let lower = value.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    for start in 0..bytes.len() {
        let rest = &bytes[start..];
        if rest.starts_with(b"xhtml") {
            return Some(Format::Xhtml);
        }
        if rest.starts_with(b"xml") || rest.starts_with(b"ml") {
            return Some(Format::Xml);
        }
        if rest.starts_with(b"html") {
            return Some(Format::Html);
        }
    }

    None
}

/// Character to entity text
pub type EntityMap = HashMap<char, String, ahash::RandomState>;

/// Predicate deciding which comments survive
pub type CommentFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Serializer configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SerializerConfig {
    /// Inferred from the first doctype/PI when unset
    pub format: Option<Format>,
    pub preserve_white_space: bool,
    pub preserve_comment: bool,
    /// Wins over `preserve_comment` when set
    #[serde(skip)]
    pub comment_filter: Option<CommentFilter>,
    pub remove_empty_attributes: bool,
    /// Replaces the default entity table when set
    pub entity: Option<EntityMap>,
    /// Skip declarations that repeat the binding already in scope
    pub omit_redundant_namespaces: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            format: None,
            preserve_white_space: false,
            preserve_comment: false,
            comment_filter: None,
            remove_empty_attributes: true,
            entity: None,
            omit_redundant_namespaces: false,
        }
    }
}

impl fmt::Debug for SerializerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerConfig")
            .field("format", &self.format)
            .field("preserve_white_space", &self.preserve_white_space)
            .field("preserve_comment", &self.preserve_comment)
            .field("comment_filter", &self.comment_filter.is_some())
            .field("remove_empty_attributes", &self.remove_empty_attributes)
            .field("entity", &self.entity)
            .field("omit_redundant_namespaces", &self.omit_redundant_namespaces)
            .finish()
    }
}

impl SerializerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_comment_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.comment_filter = Some(Arc::new(filter));
        self
    }
}

/// DOM Tree Serializer
pub struct DomSerializer {
    config: SerializerConfig,
    entities: EntityMap,
}

/// Per-call state
struct Pass {
    format: Option<Format>,
    out: String,
}

impl Pass {
    fn is_html(&self) -> bool {
        self.format.is_some_and(Format::is_html)
    }
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::with_config(SerializerConfig::default())
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        let entities = config.entity.clone().unwrap_or_else(|| {
            [('<', "&lt;"), ('>', "&gt;"), ('&', "&amp;"), ('"', "&quot;")]
                .into_iter()
                .map(|(c, e)| (c, e.to_string()))
                .collect()
        });
        Self { config, entities }
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Render `node_id` and everything below it
    pub fn serialize(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut pass = Pass {
            format: self.config.format,
            out: String::with_capacity(1024),
        };
        self.serialize_node(arena, node_id, &mut pass)?;
        Ok(pass.out)
    }

    fn serialize_node(&self, arena: &DomArena, node_id: NodeId, pass: &mut Pass) -> Result<()> {
        let node = arena.get(node_id)?;

        match node.node_type {
            NodeType::Element => {
                pass.out.push('<');
                pass.out.push_str(&node.node_name);

                for &attr_id in &node.attribute_ids {
                    self.serialize_attribute(arena, attr_id, pass)?;
                }

                if node.children_ids.is_empty() {
                    if !pass.is_html() {
                        pass.out.push_str("/>");
                        return Ok(());
                    }
                    if is_void(&node.node_name) {
                        pass.out.push('>');
                        return Ok(());
                    }
                }

                pass.out.push('>');
                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, pass)?;
                }
                pass.out.push_str("</");
                pass.out.push_str(&node.node_name);
                pass.out.push('>');
            }
            NodeType::Attribute => self.serialize_attribute(arena, node_id, pass)?,
            NodeType::Document | NodeType::DocumentFragment => {
                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, pass)?;
                }
            }
            NodeType::Text => {
                let data = node.data().unwrap_or_default();
                let encoded = self.encode(data, &['<', '&']);
                if self.config.preserve_white_space || preserves_white_space(arena, node_id)? {
                    pass.out.push_str(&encoded);
                } else {
                    pass.out.push_str(&collapse_whitespace(&encoded));
                }
            }
            NodeType::CdataSection => {
                pass.out.push_str("<![CDATA[");
                pass.out.push_str(node.data().unwrap_or_default());
                pass.out.push_str("]]>");
            }
            NodeType::Comment => {
                let data = node.data().unwrap_or_default();
                let keep = match &self.config.comment_filter {
                    Some(filter) => filter(data),
                    None => self.config.preserve_comment,
                };
                if keep {
                    pass.out.push_str("<!--");
                    pass.out.push_str(data);
                    pass.out.push_str("-->");
                }
            }
            NodeType::DocumentType => {
                let ids = node.doctype_ids().cloned().unwrap_or_default();
                if pass.format.is_none() {
                    pass.format = [ids.public_id.as_deref(), ids.system_id.as_deref()]
                        .into_iter()
                        .flatten()
                        .chain(std::iter::once(node.node_name.as_str()))
                        .find_map(detect_format);
                    debug!("inferred {:?} from doctype", pass.format);
                }

                pass.out.push_str("<!DOCTYPE ");
                pass.out.push_str(&node.node_name);
                if let Some(public_id) = ids.public_id.as_deref().filter(|id| !id.is_empty()) {
                    pass.out.push_str(" PUBLIC \"");
                    pass.out.push_str(public_id);
                    pass.out.push('"');
                }
                if let Some(system_id) = ids
                    .system_id
                    .as_deref()
                    .filter(|id| !id.is_empty() && *id != ".")
                {
                    if ids.public_id.as_deref().map_or(true, str::is_empty) {
                        pass.out.push_str(" SYSTEM");
                    }
                    pass.out.push_str(" \"");
                    pass.out.push_str(system_id);
                    pass.out.push('"');
                }
                if let Some(subset) = ids.internal_subset.as_deref().filter(|s| !s.is_empty()) {
                    pass.out.push_str(" [");
                    pass.out.push_str(subset);
                    pass.out.push(']');
                }
                pass.out.push('>');
            }
            NodeType::ProcessingInstruction => {
                let data = node.data().unwrap_or_default();
                if pass.format.is_none() {
                    pass.format = detect_format(&node.node_name).or_else(|| detect_format(data));
                    debug!("inferred {:?} from processing instruction", pass.format);
                }
                pass.out.push_str("<?");
                pass.out.push_str(&node.node_name);
                pass.out.push(' ');
                pass.out.push_str(data);
                pass.out.push_str("?>");
            }
            NodeType::EntityReference => {
                pass.out.push('&');
                pass.out.push_str(&node.node_name);
                pass.out.push(';');
            }
            NodeType::Entity | NodeType::Notation => {
                warn!("skipping unsupported {:?} node {}", node.node_type, node_id);
            }
        }

        Ok(())
    }

    fn serialize_attribute(&self, arena: &DomArena, attr_id: NodeId, pass: &mut Pass) -> Result<()> {
        let attr = arena.get(attr_id)?;
        let name = attr.node_name.as_str();
        let value = attr.data().unwrap_or_default();

        if pass.is_html() && is_boolean_attribute(name) {
            pass.out.push(' ');
            pass.out.push_str(name);
            return Ok(());
        }
        if value.is_empty()
            && self.config.remove_empty_attributes
            && !name.to_ascii_lowercase().starts_with("data-")
        {
            return Ok(());
        }
        if self.config.omit_redundant_namespaces && is_redundant_declaration(arena, attr_id)? {
            return Ok(());
        }

        let quote = if pass.is_html() {
            if is_bare_token(value) {
                None
            } else if value.contains('"') {
                Some('\'')
            } else {
                Some('"')
            }
        } else {
            Some('"')
        };

        pass.out.push(' ');
        pass.out.push_str(name);
        pass.out.push('=');
        match quote {
            Some(q) => {
                pass.out.push(q);
                pass.out.push_str(&self.encode(value, &['<', '&', q]));
                pass.out.push(q);
            }
            None => pass.out.push_str(value),
        }

        Ok(())
    }

    /// Replace `targets` through the entity table, numeric reference otherwise
    fn encode(&self, text: &str, targets: &[char]) -> String {
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            if !targets.contains(&c) {
                out.push(c);
                continue;
            }
            match self.entities.get(&c) {
                Some(entity) => out.push_str(entity),
                None => {
                    out.push_str("&#");
                    out.push_str(&(c as u32).to_string());
                    out.push(';');
                }
            }
        }
        out
    }
}

impl Default for DomSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize with a one-off configuration
pub fn serialize(arena: &DomArena, node_id: NodeId, config: SerializerConfig) -> Result<String> {
    DomSerializer::with_config(config).serialize(arena, node_id)
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn is_boolean_attribute(name: &str) -> bool {
    BOOLEAN_ATTRIBUTES.iter().any(|b| b.eq_ignore_ascii_case(name))
}

/// Safe to write without quotes in HTML
fn is_bare_token(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| matches!(c, '"' | '\'' | '=' | '>' | '<' | '`' | ' '))
}

/// The nearest element ancestor keeps whitespace (`pre`, `script`, ...)
fn preserves_white_space(arena: &DomArena, node_id: NodeId) -> Result<bool> {
    let mut current = arena.parent(node_id)?;
    while let Some(id) = current {
        let node = arena.get(id)?;
        if node.is_element() {
            let name = node.node_name.to_ascii_lowercase();
            return Ok(name.contains("pre") || name.contains("script"));
        }
        current = node.parent_id;
    }
    Ok(false)
}

/// `xmlns`/`xmlns:p` repeating the binding visible from the parent element
fn is_redundant_declaration(arena: &DomArena, attr_id: NodeId) -> Result<bool> {
    let attr = arena.get(attr_id)?;
    let prefix = match split_qualified_name(&attr.node_name) {
        (None, "xmlns") => "",
        (Some("xmlns"), prefix) => prefix,
        _ => return Ok(false),
    };

    let Some(element_id) = attr.parent_id else {
        return Ok(false);
    };
    let Some(parent_id) = arena.parent(element_id)? else {
        return Ok(false);
    };

    let inherited = arena.ns(parent_id)?;
    Ok(inherited.get(prefix).map(String::as_str) == attr.data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::Node;

    fn html() -> SerializerConfig {
        SerializerConfig::default().with_format(Format::Html)
    }

    fn xml() -> SerializerConfig {
        SerializerConfig::default().with_format(Format::Xml)
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format("-//W3C//DTD XHTML 1.0 Strict//EN"), Some(Format::Xhtml));
        assert_eq!(detect_format("-//W3C//DTD HTML 4.01//EN"), Some(Format::Html));
        assert_eq!(detect_format("xml"), Some(Format::Xml));
        assert_eq!(detect_format("about:legacy-compat"), None);
    }

    #[test]
    fn test_boolean_and_void_rules() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let root = doc.create_element(&mut arena, "root").unwrap();
        root.set_attribute(&mut arena, "selected", "selected").unwrap();
        root.set_attribute(&mut arena, "disabled", "").unwrap();
        doc.append_child(&mut arena, root).unwrap();

        assert_eq!(
            serialize(&arena, doc.id(), html()).unwrap(),
            "<root selected disabled></root>"
        );
        assert_eq!(
            serialize(&arena, doc.id(), xml()).unwrap(),
            "<root selected=\"selected\"/>"
        );

        let br = doc.create_element(&mut arena, "br").unwrap();
        assert_eq!(serialize(&arena, br.id(), html()).unwrap(), "<br>");
        assert_eq!(serialize(&arena, br.id(), xml()).unwrap(), "<br/>");
    }

    #[test]
    fn test_html_quoting() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let div = doc.create_element(&mut arena, "div").unwrap();
        div.set_attribute(&mut arena, "id", "case").unwrap();
        let script = doc.create_element(&mut arena, "script").unwrap();
        script.set_attribute(&mut arena, "type", "text/javascript").unwrap();
        script.set_attribute(&mut arena, "src", "/path/to/file.js").unwrap();
        let br = doc.create_element(&mut arena, "br").unwrap();
        div.append_child(&mut arena, script).unwrap();
        div.append_child(&mut arena, br).unwrap();

        assert_eq!(
            serialize(&arena, div.id(), html()).unwrap(),
            "<div id=case><script type=text/javascript src=/path/to/file.js></script><br></div>"
        );

        let p = doc.create_element(&mut arena, "p").unwrap();
        p.set_attribute(&mut arena, "title", "my \" quote").unwrap();
        p.set_attribute(&mut arena, "alt", "two words").unwrap();
        assert_eq!(
            serialize(&arena, p.id(), html()).unwrap(),
            "<p title='my \" quote' alt=\"two words\"></p>"
        );
        assert_eq!(
            serialize(&arena, p.id(), xml()).unwrap(),
            "<p title=\"my &quot; quote\" alt=\"two words\"/>"
        );
    }

    #[test]
    fn test_attribute_encoding() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let a = doc.create_element(&mut arena, "a").unwrap();
        a.set_attribute(&mut arena, "href", "?a=1&b=<2>").unwrap();
        a.set_attribute(&mut arena, "data-empty", "").unwrap();
        a.set_attribute(&mut arena, "empty", "").unwrap();

        assert_eq!(
            serialize(&arena, a.id(), xml()).unwrap(),
            "<a href=\"?a=1&amp;b=&lt;2>\" data-empty=\"\"/>"
        );

        let keep = SerializerConfig {
            remove_empty_attributes: false,
            ..xml()
        };
        assert_eq!(
            serialize(&arena, a.id(), keep).unwrap(),
            "<a href=\"?a=1&amp;b=&lt;2>\" data-empty=\"\" empty=\"\"/>"
        );
    }

    #[test]
    fn test_whitespace_collapse_and_pre() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let div = doc.create_element(&mut arena, "div").unwrap();
        let pre = doc.create_element(&mut arena, "pre").unwrap();
        let outer1 = doc.create_text_node(&mut arena, "\n\t").unwrap();
        let inner = doc.create_text_node(&mut arena, "\n\t\ttest\n\t").unwrap();
        let outer2 = doc.create_text_node(&mut arena, "\n").unwrap();
        div.append_child(&mut arena, outer1).unwrap();
        div.append_child(&mut arena, pre).unwrap();
        pre.append_child(&mut arena, inner).unwrap();
        div.append_child(&mut arena, outer2).unwrap();

        assert_eq!(
            serialize(&arena, div.id(), SerializerConfig::default()).unwrap(),
            "<div> <pre>\n\t\ttest\n\t</pre> </div>"
        );

        let keep = SerializerConfig {
            preserve_white_space: true,
            ..SerializerConfig::default()
        };
        assert_eq!(
            serialize(&arena, div.id(), keep).unwrap(),
            "<div>\n\t<pre>\n\t\ttest\n\t</pre>\n</div>"
        );
    }

    #[test]
    fn test_text_entities() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let t = doc.create_text_node(&mut arena, "a < b & \"c\" > d").unwrap();

        assert_eq!(
            serialize(&arena, t.id(), SerializerConfig::default()).unwrap(),
            "a &lt; b &amp; \"c\" > d"
        );

        let numeric = SerializerConfig::from_json(r#"{"entity":{}}"#).unwrap();
        assert_eq!(
            serialize(&arena, t.id(), numeric).unwrap(),
            "a &#60; b &#38; \"c\" > d"
        );
    }

    #[test]
    fn test_comments() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let c = doc.create_comment(&mut arena, "text").unwrap();

        assert_eq!(serialize(&arena, c.id(), SerializerConfig::default()).unwrap(), "");

        let keep = SerializerConfig {
            preserve_comment: true,
            ..SerializerConfig::default()
        };
        assert_eq!(serialize(&arena, c.id(), keep).unwrap(), "<!--text-->");

        let filtered = SerializerConfig::default().with_comment_filter(|data| data.starts_with('t'));
        assert_eq!(serialize(&arena, c.id(), filtered).unwrap(), "<!--text-->");
        let rejected = SerializerConfig {
            preserve_comment: true,
            ..SerializerConfig::default()
        }
        .with_comment_filter(|_| false);
        assert_eq!(serialize(&arena, c.id(), rejected).unwrap(), "");
    }

    #[test]
    fn test_doctype_output_and_inference() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let dt = doc
            .create_document_type(&mut arena, "html", None, Some("about:legacy-compat"))
            .unwrap();
        let html = doc.create_element(&mut arena, "html").unwrap();
        let input = doc.create_element(&mut arena, "input").unwrap();
        input.set_attribute(&mut arena, "checked", "checked").unwrap();
        doc.append_child(&mut arena, dt).unwrap();
        doc.append_child(&mut arena, html).unwrap();
        html.append_child(&mut arena, input).unwrap();

        assert_eq!(
            serialize(&arena, doc.id(), SerializerConfig::default()).unwrap(),
            "<!DOCTYPE html SYSTEM \"about:legacy-compat\"><html><input checked></html>"
        );

        let legacy = doc
            .create_document_type(
                &mut arena,
                "HTML",
                Some("-//W3C//DTD HTML 4.01//EN"),
                Some("http://www.w3.org/TR/html4/strict.dtd"),
            )
            .unwrap();
        assert_eq!(
            serialize(&arena, legacy.id(), SerializerConfig::default()).unwrap(),
            "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">"
        );

        let dotted = doc
            .create_document_type(&mut arena, "x", None, Some("."))
            .unwrap();
        assert_eq!(
            serialize(&arena, dotted.id(), SerializerConfig::default()).unwrap(),
            "<!DOCTYPE x>"
        );
    }

    #[test]
    fn test_inference_is_order_dependent() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let before = doc.create_element(&mut arena, "br").unwrap();
        let dt = doc.create_document_type(&mut arena, "html", None, None).unwrap();
        let after = doc.create_element(&mut arena, "br").unwrap();
        let fragment = doc.create_document_fragment(&mut arena).unwrap();
        for id in [before.id(), dt.id(), after.id()] {
            arena.append(fragment.id(), id).unwrap();
        }

        assert_eq!(
            serialize(&arena, fragment.id(), SerializerConfig::default()).unwrap(),
            "<br/><!DOCTYPE html><br>"
        );
    }

    #[test]
    fn test_processing_instruction_and_cdata() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let pi = doc
            .create_processing_instruction(&mut arena, "xml-stylesheet", "href=\"a.css\"")
            .unwrap();
        let cdata = doc.create_cdata_section(&mut arena, "<b>&</b>").unwrap();
        let er = doc.create_entity_reference(&mut arena, "nbsp").unwrap();
        let root = doc.create_element(&mut arena, "root").unwrap();
        doc.append_child(&mut arena, pi).unwrap();
        doc.append_child(&mut arena, root).unwrap();
        root.append_child(&mut arena, cdata).unwrap();
        root.append_child(&mut arena, er).unwrap();

        assert_eq!(
            serialize(&arena, doc.id(), SerializerConfig::default()).unwrap(),
            "<?xml-stylesheet href=\"a.css\"?><root><![CDATA[<b>&</b>]]>&nbsp;</root>"
        );
    }

    #[test]
    fn test_namespaced_output() {
        let mut arena = DomArena::new();
        let doc = arena.new_document(None).unwrap();
        let root = doc.create_element(&mut arena, "root").unwrap();
        root.set_attribute(&mut arena, "xmlns:lab", "/lab").unwrap();
        doc.append_child(&mut arena, root).unwrap();
        let node = doc
            .create_element_ns(&mut arena, Some("/other"), "lab:node")
            .unwrap();
        let repeat = doc.create_element(&mut arena, "lab:repeat").unwrap();
        repeat.set_attribute(&mut arena, "xmlns:lab", "/lab").unwrap();
        root.append_child(&mut arena, node).unwrap();
        root.append_child(&mut arena, repeat).unwrap();

        assert_eq!(
            serialize(&arena, doc.id(), xml()).unwrap(),
            "<root xmlns:lab=\"/lab\"><lab:node xmlns:lab=\"/other\"/><lab:repeat xmlns:lab=\"/lab\"/></root>"
        );

        let trimmed = SerializerConfig {
            omit_redundant_namespaces: true,
            ..xml()
        };
        assert_eq!(
            serialize(&arena, doc.id(), trimmed).unwrap(),
            "<root xmlns:lab=\"/lab\"><lab:node xmlns:lab=\"/other\"/><lab:repeat/></root>"
        );
    }

    #[test]
    fn test_config_from_json() {
        let config = SerializerConfig::from_json(
            r#"{"format":"html","preserveWhiteSpace":true,"removeEmptyAttributes":false}"#,
        )
        .unwrap();
        assert_eq!(config.format, Some(Format::Html));
        assert!(config.preserve_white_space);
        assert!(!config.remove_empty_attributes);
        assert!(!config.preserve_comment);
    }
}
