//! Utility functions for DOM processing

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::{NodeId, NodeType};

/// Split `prefix:local` at the first colon
pub fn split_qualified_name(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Collapse every whitespace run into a single space
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out
}

/// Concatenated Text and CDATA descendants of a node, in document order
pub fn get_text_content(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let mut text = String::new();

    arena.traverse_df(node_id, |node| {
        if matches!(node.node_type, NodeType::Text | NodeType::CdataSection) {
            if let Some(data) = node.data() {
                text.push_str(data);
            }
        }
        Ok(())
    })?;

    Ok(text)
}

/// Byte range of `count` chars starting at char `offset`, clamped to the end
pub(crate) fn char_range(text: &str, offset: usize, count: usize) -> (usize, usize) {
    let byte_at = |n: usize| {
        text.char_indices()
            .nth(n)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len())
    };
    let start = byte_at(offset);
    let end = byte_at(offset.saturating_add(count));
    (start, end)
}
