use super::element::{elements_by_tag_name, elements_by_tag_name_ns};
use super::{
    Attr, CharacterData, Document, DocumentFragment, DocumentType, Element, Node, NodeList,
    NodeRef, ProcessingInstruction, Text,
};
use crate::arena::DomArena;
use crate::error::Result;
use crate::namespace::validate_qualified_name;
use crate::types::{DoctypeIds, NodeId, NodeInit, NodeType, Payload, XMLNS_NAMESPACE};
use tracing::warn;

impl DomArena {
    /// Create a document and return its view
    pub fn new_document(&mut self, base_uri: Option<&str>) -> Result<Document> {
        self.create_document(base_uri).map(Document)
    }
}

impl Document {
    fn create_owned(
        self,
        arena: &mut DomArena,
        kind: NodeType,
        name: &str,
        init: NodeInit,
    ) -> Result<NodeId> {
        let node_id = arena.create(kind, name, init)?;
        arena.assign_owner(node_id, Some(self.0))?;
        Ok(node_id)
    }

    pub fn create_element(self, arena: &mut DomArena, tag_name: &str) -> Result<Element> {
        self.create_owned(arena, NodeType::Element, tag_name, NodeInit::Empty)
            .map(Element)
    }

    pub fn create_text_node(self, arena: &mut DomArena, data: &str) -> Result<Text> {
        self.create_owned(arena, NodeType::Text, "", data.into())
            .map(Text)
    }

    pub fn create_comment(self, arena: &mut DomArena, data: &str) -> Result<CharacterData> {
        self.create_owned(arena, NodeType::Comment, "", data.into())
            .map(CharacterData)
    }

    pub fn create_cdata_section(self, arena: &mut DomArena, data: &str) -> Result<Text> {
        self.create_owned(arena, NodeType::CdataSection, "", data.into())
            .map(Text)
    }

    pub fn create_processing_instruction(
        self,
        arena: &mut DomArena,
        target: &str,
        data: &str,
    ) -> Result<ProcessingInstruction> {
        self.create_owned(arena, NodeType::ProcessingInstruction, target, data.into())
            .map(ProcessingInstruction)
    }

    pub fn create_attribute(self, arena: &mut DomArena, name: &str) -> Result<Attr> {
        self.create_owned(arena, NodeType::Attribute, name, NodeInit::Empty)
            .map(Attr)
    }

    pub fn create_entity_reference(self, arena: &mut DomArena, name: &str) -> Result<NodeRef> {
        self.create_owned(arena, NodeType::EntityReference, name, NodeInit::Empty)
            .map(NodeRef)
    }

    pub fn create_document_fragment(self, arena: &mut DomArena) -> Result<DocumentFragment> {
        self.create_owned(arena, NodeType::DocumentFragment, "", NodeInit::Empty)
            .map(DocumentFragment)
    }

    pub fn create_document_type(
        self,
        arena: &mut DomArena,
        name: &str,
        public_id: Option<&str>,
        system_id: Option<&str>,
    ) -> Result<DocumentType> {
        let ids = DoctypeIds::new(public_id, system_id);
        self.create_owned(arena, NodeType::DocumentType, name, NodeInit::DocumentType(ids))
            .map(DocumentType)
    }

    /// Namespaced element; a prefixed name carries its own declaration
    pub fn create_element_ns(
        self,
        arena: &mut DomArena,
        namespace_uri: Option<&str>,
        qualified_name: &str,
    ) -> Result<Element> {
        let (prefix, _) = validate_qualified_name(namespace_uri, qualified_name)?;
        let namespace_uri = namespace_uri.filter(|uri| !uri.is_empty());

        let element_id =
            self.create_owned(arena, NodeType::Element, qualified_name, NodeInit::Empty)?;
        arena.get_mut(element_id)?.namespace_uri = namespace_uri.map(String::from);

        if let (Some(prefix), Some(uri)) = (prefix, namespace_uri) {
            if prefix != "xml" && prefix != "xmlns" && !arena.ns(element_id)?.contains_key(prefix) {
                let declaration = format!("xmlns:{}", prefix);
                let decl_id =
                    self.create_owned(arena, NodeType::Attribute, &declaration, uri.into())?;
                arena.get_mut(decl_id)?.namespace_uri = Some(XMLNS_NAMESPACE.to_string());
                arena.append(element_id, decl_id)?;
            }
        }

        Ok(Element(element_id))
    }

    pub fn create_attribute_ns(
        self,
        arena: &mut DomArena,
        namespace_uri: Option<&str>,
        qualified_name: &str,
    ) -> Result<Attr> {
        validate_qualified_name(namespace_uri, qualified_name)?;
        let attr_id =
            self.create_owned(arena, NodeType::Attribute, qualified_name, NodeInit::Empty)?;
        arena.get_mut(attr_id)?.namespace_uri =
            namespace_uri.filter(|uri| !uri.is_empty()).map(String::from);
        Ok(Attr(attr_id))
    }

    /// First element child
    pub fn document_element(self, arena: &DomArena) -> Result<Option<Element>> {
        for &child_id in arena.children(self.0)? {
            if arena.node_type(child_id)? == NodeType::Element {
                return Ok(Some(Element(child_id)));
            }
        }
        Ok(None)
    }

    pub fn doctype(self, arena: &DomArena) -> Result<Option<DocumentType>> {
        for &child_id in arena.children(self.0)? {
            if arena.node_type(child_id)? == NodeType::DocumentType {
                return Ok(Some(DocumentType(child_id)));
            }
        }
        Ok(None)
    }

    pub fn document_uri(self, arena: &DomArena) -> Result<&str> {
        match &arena.get(self.0)?.payload {
            Payload::Document { base_uri } => Ok(base_uri.as_str()),
            _ => Ok(""),
        }
    }

    /// Elements named `name` (`*` for all), fixed at call time
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

    /// The element whose `id` attribute equals `id`
    ///
    /// `None` when no element, or more than one, carries it.
    pub fn get_element_by_id(self, arena: &DomArena, id: &str) -> Result<Option<Element>> {
        let mut found = None;
        let mut count = 0usize;

        for element in elements_by_tag_name(arena, self.0, "*")?.elements(arena)? {
            if element.get_attribute(arena, "id")? == Some(id) {
                found = Some(element);
                count += 1;
            }
        }

        if count > 1 {
            warn!("{} elements share id \"{}\"", count, id);
            return Ok(None);
        }
        Ok(found)
    }

    pub fn import_node(self, arena: &mut DomArena, node: impl Node, deep: bool) -> Result<NodeRef> {
        arena.import_node(self.0, node.into(), deep).map(NodeRef)
    }

    pub fn adopt_node<N: Node>(self, arena: &mut DomArena, node: N) -> Result<N> {
        arena.adopt_node(self.0, node.into())?;
        Ok(node)
    }

    pub fn normalize_document(self, arena: &mut DomArena) -> Result<()> {
        arena.normalize(self.0)
    }
}
