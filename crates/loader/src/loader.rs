//! quick-xml driven tree construction
//!
//! XML mode relies on quick-xml's own well-formedness checks. HTML mode
//! relaxes them: void elements close themselves, an end tag closes every
//! element opened after its match, stray end tags are dropped, attributes
//! may be bare or unquoted and unknown entity references stay literal.

use crate::error::{LoadError, Result};
use crate::options::{LoadOptions, Syntax};
use dom::serializer::VOID_ELEMENTS;
use dom::{Document, DomArena, DomConfig, NameMatching, TreeBuilder, TreeSink};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::str::from_utf8;
use tracing::{debug, trace};

/// Parses text and feeds the events to a [`TreeSink`]
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    fn is_html(&self) -> bool {
        self.options.syntax == Syntax::Html
    }

    /// Parse `source` into a new document of `arena`
    pub fn load_str(&self, arena: &mut DomArena, source: &str) -> Result<Document> {
        let mut builder = TreeBuilder::new(arena, self.options.base_uri.as_deref())?;
        self.load_into(&mut builder, source)?;
        Ok(builder.finish())
    }

    /// Parse `source` into any sink
    pub fn load_into<S: TreeSink>(&self, sink: &mut S, source: &str) -> Result<()> {
        let html = self.is_html();
        let mut reader = Reader::from_str(source);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = !html;
        config.allow_unmatched_ends = html;

        // open element names, HTML mode only
        let mut open: Vec<String> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = self.tag_name(&e)?;
                    sink.open_element(&name, self.attributes(&e)?)?;
                    if !html {
                        continue;
                    }
                    if is_void(&name) {
                        sink.close_element()?;
                    } else {
                        open.push(name);
                    }
                }
                Event::Empty(e) => {
                    let name = self.tag_name(&e)?;
                    sink.open_element(&name, self.attributes(&e)?)?;
                    sink.close_element()?;
                }
                Event::End(e) => {
                    if !html {
                        sink.close_element()?;
                        continue;
                    }
                    let name = from_utf8(e.name().into_inner())?;
                    match open.iter().rposition(|n| n.eq_ignore_ascii_case(name)) {
                        Some(pos) => {
                            for _ in pos..open.len() {
                                sink.close_element()?;
                            }
                            open.truncate(pos);
                        }
                        None => debug!("ignoring unmatched </{}>", name),
                    }
                }
                Event::Text(e) => {
                    let text = self.unescape(from_utf8(&e)?)?;
                    if !text.is_empty() {
                        sink.text(&text)?;
                    }
                }
                Event::CData(e) => sink.cdata(from_utf8(&e)?)?,
                Event::Comment(e) => sink.comment(from_utf8(&e)?)?,
                Event::Decl(_) => trace!("xml declaration consumed"),
                Event::PI(e) => {
                    let target = from_utf8(e.target())?;
                    let data = from_utf8(e.content())?;
                    sink.processing_instruction(target, data.trim())?;
                }
                Event::DocType(e) => {
                    let (name, public_id, system_id) = parse_doctype(from_utf8(&e)?);
                    sink.doctype(name, public_id, system_id)?;
                }
                Event::Eof => break,
            }
        }

        if !open.is_empty() {
            debug!("{} element(s) left open at end of input", open.len());
        }
        Ok(())
    }

    fn tag_name(&self, e: &BytesStart) -> Result<String> {
        let name = from_utf8(e.name().into_inner())?;
        if self.options.validate_tag_names && !is_valid_tag_name(name) {
            return Err(LoadError::InvalidToken(name.to_string()));
        }
        Ok(name.to_string())
    }

    /// Attributes in source order; in HTML mode the first duplicate wins
    fn attributes(&self, e: &BytesStart) -> Result<IndexMap<String, String>> {
        let html = self.is_html();
        let mut attributes = if html {
            e.html_attributes()
        } else {
            e.attributes()
        };

        let mut map = IndexMap::new();
        for attr in attributes.with_checks(!html) {
            let attr = attr?;
            let key = from_utf8(attr.key.as_ref())?;
            let value = self.unescape(from_utf8(&attr.value)?)?;
            map.entry(key.to_string())
                .or_insert_with(|| value.into_owned());
        }
        Ok(map)
    }

    fn unescape<'s>(&self, raw: &'s str) -> Result<Cow<'s, str>> {
        match self.options.syntax {
            Syntax::Xml => Ok(quick_xml::escape::unescape(raw)?),
            Syntax::Html => Ok(unescape_lenient(raw)),
        }
    }
}

/// Parse XML into a fresh arena with exact name matching
pub fn parse_xml(source: &str) -> Result<(DomArena, Document)> {
    let mut arena = DomArena::with_config(DomConfig {
        name_matching: NameMatching::Exact,
        ..DomConfig::default()
    });
    let doc = Loader::new(LoadOptions::xml()).load_str(&mut arena, source)?;
    Ok((arena, doc))
}

/// Parse HTML-ish markup into a fresh arena
pub fn parse_html(source: &str) -> Result<(DomArena, Document)> {
    let mut arena = DomArena::new();
    let doc = Loader::new(LoadOptions::html()).load_str(&mut arena, source)?;
    Ok((arena, doc))
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '.' | '-'))
}

/// Resolve the references quick-xml knows, keep the rest as written
fn unescape_lenient(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match tail.find(';') {
            Some(end) if end > 1 && !tail[1..end].contains(['&', '<', ' ']) => {
                let reference = &tail[..=end];
                match quick_xml::escape::unescape(reference) {
                    Ok(resolved) => out.push_str(&resolved),
                    Err(_) => out.push_str(reference),
                }
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Next quoted literal: `(content, remainder)`
fn quoted(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &text[1..];
    let end = body.find(quote)?;
    Some((&body[..end], &body[end + 1..]))
}

/// Split a doctype body into `(name, publicId, systemId)`
///
/// Keywords are case-insensitive; `LOCAL` and unknown keywords give no ids.
fn parse_doctype(raw: &str) -> (&str, Option<&str>, Option<&str>) {
    let raw = raw.trim();
    let name_end = raw
        .find(|c: char| c.is_whitespace() || c == '[')
        .unwrap_or(raw.len());
    let name = &raw[..name_end];

    let rest = raw[name_end..].trim_start();
    let keyword_end = rest
        .find(|c: char| c.is_whitespace() || c == '"' || c == '\'')
        .unwrap_or(rest.len());
    let keyword = &rest[..keyword_end];
    let first = quoted(&rest[keyword_end..]);

    if keyword.eq_ignore_ascii_case("public") {
        let system_id = first.and_then(|(_, after)| quoted(after)).map(|(id, _)| id);
        (name, first.map(|(id, _)| id), system_id)
    } else if keyword.eq_ignore_ascii_case("system") {
        (name, None, first.map(|(id, _)| id))
    } else {
        (name, None, None)
    }
}
