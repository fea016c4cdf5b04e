//! Character data editing
//!
//! Offsets and counts are in chars. An offset past the end fails with
//! `IndexSize`; a count running past the end is clamped.

use super::{CharacterData, DocumentType, Node, ProcessingInstruction, Text};
use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeInit, NodeType};
use crate::utils::char_range;

/// Operations of Text, Comment and CDATA section nodes
pub trait CharacterDataOps: Node {
    fn data(self, arena: &DomArena) -> Result<&str> {
        Ok(arena.get(self.into())?.data().unwrap_or_default())
    }

    fn set_data(self, arena: &mut DomArena, data: &str) -> Result<()> {
        self.set_node_value(arena, data)
    }

    fn length(self, arena: &DomArena) -> Result<usize> {
        Ok(self.data(arena)?.chars().count())
    }

    fn substring_data(self, arena: &DomArena, offset: usize, count: usize) -> Result<String> {
        let data = self.data(arena)?;
        check_offset(data, offset)?;
        let (start, end) = char_range(data, offset, count);
        Ok(data[start..end].to_string())
    }

    fn append_data(self, arena: &mut DomArena, data: &str) -> Result<()> {
        edit(arena, self.into(), |current| {
            current.push_str(data);
            Ok(())
        })
    }

    fn insert_data(self, arena: &mut DomArena, offset: usize, data: &str) -> Result<()> {
        self.replace_data(arena, offset, 0, data)
    }

    fn delete_data(self, arena: &mut DomArena, offset: usize, count: usize) -> Result<()> {
        self.replace_data(arena, offset, count, "")
    }

    fn replace_data(
        self,
        arena: &mut DomArena,
        offset: usize,
        count: usize,
        data: &str,
    ) -> Result<()> {
        edit(arena, self.into(), |current| {
            check_offset(current, offset)?;
            let (start, end) = char_range(current, offset, count);
            current.replace_range(start..end, data);
            Ok(())
        })
    }
}

impl CharacterDataOps for CharacterData {}
impl CharacterDataOps for Text {}

fn check_offset(data: &str, offset: usize) -> Result<()> {
    let length = data.chars().count();
    if offset > length {
        return Err(DomError::IndexSize { offset, length });
    }
    Ok(())
}

fn edit<F>(arena: &mut DomArena, node_id: NodeId, apply: F) -> Result<()>
where
    F: FnOnce(&mut String) -> Result<()>,
{
    let node = arena.get_mut(node_id)?;
    let kind = node.node_type;
    match node.data_mut() {
        Some(data) => apply(data),
        None => Err(DomError::wrong_kind("CharacterData", kind)),
    }
}

impl Text {
    /// Cut the text at `offset`; the tail becomes the next sibling
    pub fn split_text(self, arena: &mut DomArena, offset: usize) -> Result<Text> {
        let node = arena.get(self.0)?;
        let kind = node.node_type;
        let owner = node.owner_id;
        let parent = node.parent_id;
        let data = node.data().unwrap_or_default();
        check_offset(data, offset)?;

        let (start, _) = char_range(data, offset, 0);
        let tail = data[start..].to_string();

        let tail_id = arena.create(kind, "", NodeInit::Data(tail))?;
        arena.assign_owner(tail_id, owner)?;
        if let Some(data) = arena.get_mut(self.0)?.data_mut() {
            data.truncate(start);
        }

        if let Some(parent_id) = parent {
            let index = arena.index(parent_id, self.0)?.ok_or(DomError::NotFound)?;
            arena
                .get_mut(parent_id)?
                .children_ids
                .insert(index + 1, tail_id);
            arena.bind(tail_id, parent_id)?;
        }

        Ok(Text(tail_id))
    }

    /// Text nodes directly adjacent to this one, in order, including it
    fn logical_run(self, arena: &DomArena) -> Result<Vec<NodeId>> {
        let Some(parent_id) = arena.parent(self.0)? else {
            return Ok(vec![self.0]);
        };
        let siblings = arena.children(parent_id)?;
        let pos = siblings
            .iter()
            .position(|id| *id == self.0)
            .ok_or(DomError::NotFound)?;

        let is_text = |id: &NodeId| {
            arena
                .node_type(*id)
                .map(|kind| matches!(kind, NodeType::Text | NodeType::CdataSection))
                .unwrap_or(false)
        };

        let mut start = pos;
        while start > 0 && is_text(&siblings[start - 1]) {
            start -= 1;
        }
        let mut end = pos + 1;
        while end < siblings.len() && is_text(&siblings[end]) {
            end += 1;
        }

        Ok(siblings[start..end].to_vec())
    }

    pub fn whole_text(self, arena: &DomArena) -> Result<String> {
        let mut text = String::new();
        for id in self.logical_run(arena)? {
            text.push_str(arena.get(id)?.data().unwrap_or_default());
        }
        Ok(text)
    }

    /// Replace the whole logical run with `content`, kept in this node
    ///
    /// Returns `None` when `content` is empty and the node was removed.
    pub fn replace_whole_text(self, arena: &mut DomArena, content: &str) -> Result<Option<Text>> {
        let run = self.logical_run(arena)?;
        let parent = arena.parent(self.0)?;

        if let Some(parent_id) = parent {
            for id in run.into_iter().filter(|id| *id != self.0) {
                arena.remove_child(parent_id, id)?;
            }
        }

        if content.is_empty() {
            if let Some(parent_id) = parent {
                arena.remove_child(parent_id, self.0)?;
            }
            return Ok(None);
        }

        self.set_data(arena, content)?;
        Ok(Some(self))
    }

    pub fn is_element_content_whitespace(self, arena: &DomArena) -> Result<bool> {
        Ok(self.data(arena)?.chars().all(char::is_whitespace))
    }
}

impl ProcessingInstruction {
    pub fn target(self, arena: &DomArena) -> Result<&str> {
        self.node_name(arena)
    }

    pub fn data(self, arena: &DomArena) -> Result<&str> {
        Ok(arena.get(self.0)?.data().unwrap_or_default())
    }

    pub fn set_data(self, arena: &mut DomArena, data: &str) -> Result<()> {
        self.set_node_value(arena, data)
    }
}

impl DocumentType {
    pub fn name(self, arena: &DomArena) -> Result<&str> {
        self.node_name(arena)
    }

    pub fn public_id(self, arena: &DomArena) -> Result<&str> {
        Ok(arena
            .get(self.0)?
            .doctype_ids()
            .and_then(|ids| ids.public_id.as_deref())
            .unwrap_or_default())
    }

    pub fn system_id(self, arena: &DomArena) -> Result<&str> {
        Ok(arena
            .get(self.0)?
            .doctype_ids()
            .and_then(|ids| ids.system_id.as_deref())
            .unwrap_or_default())
    }

    pub fn internal_subset(self, arena: &DomArena) -> Result<&str> {
        Ok(arena
            .get(self.0)?
            .doctype_ids()
            .and_then(|ids| ids.internal_subset.as_deref())
            .unwrap_or_default())
    }
}
