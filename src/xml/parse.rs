//! Event-driven tree builder on top of `quick-xml`.
//!
//! `quick-xml` only produces a stream of events; this module folds that
//! stream into a [`Document`]. How malformed input is treated depends on
//! [`ParseMode`]:
//!
//! | Problem                        | Lenient                         | Strict |
//! |--------------------------------|---------------------------------|--------|
//! | `</b>` while `<a>` is open     | close back to `<b>` or ignore   | error  |
//! | element left open at EOF       | closed implicitly               | error  |
//! | unknown entity `&foo;`         | kept verbatim                   | error  |
//! | text outside the root element  | kept as a top-level text node   | error  |
//! | zero or several root elements  | accepted                        | error  |
//! | reader syntax error            | stop, keep the tree built so far| error  |
//!
//! Every tolerated problem is recorded as a [`ParseIssue`] on the document.

use std::borrow::Cow;

use quick_xml::{
    Reader,
    escape::resolve_predefined_entity,
    events::{BytesStart, Event},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::node::{Attribute, Document, Element, Node};
use crate::debug;

// ============================================================================
// Types
// ============================================================================

/// How strictly malformed XML is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Tolerate what can be tolerated and record it as an issue.
    #[default]
    Lenient,
    /// Reject any malformed input.
    Strict,
}

impl ParseMode {
    #[inline]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// A problem tolerated in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    /// Byte offset into the input.
    pub position: u64,
    pub message: String,
}

/// Malformed XML that could not be (or, in strict mode, was not) tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed XML at byte {position}: {message}")]
pub struct XmlError {
    pub position: u64,
    pub message: String,
}

impl XmlError {
    fn new(position: u64, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse XML text into a [`Document`].
///
/// Never returns a partially built tree as an error value: either the whole
/// input was folded into a document (possibly with issues, in lenient mode)
/// or an [`XmlError`] is returned.
pub fn parse(xml: &str, mode: ParseMode) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.check_end_names = mode.is_strict();
    config.allow_unmatched_ends = !mode.is_strict();

    let mut builder = TreeBuilder::new(mode);

    loop {
        let position = reader.buffer_position() as u64;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) => {
                builder.tolerate(reader.error_position() as u64, err.to_string())?;
                break;
            }
        };

        match event {
            Event::Decl(_) => {}
            Event::Start(start) => {
                let element = builder.element(&reader, &start, position)?;
                builder.open(element);
            }
            Event::Empty(start) => {
                let element = builder.element(&reader, &start, position)?;
                builder.push(Node::Element(element));
            }
            Event::End(end) => {
                let name = decode(&reader, end.name().as_ref(), position)?.into_owned();
                builder.close(&name, position)?;
            }
            Event::Text(text) => {
                let text = decode(&reader, &text, position)?;
                builder.text(&text, position)?;
            }
            Event::GeneralRef(reference) => {
                let name = decode(&reader, &reference, position)?;
                if let Ok(Some(ch)) = reference.resolve_char_ref() {
                    builder.text(ch.encode_utf8(&mut [0; 4]), position)?;
                } else if let Some(resolved) = resolve_predefined_entity(&name) {
                    builder.text(resolved, position)?;
                } else {
                    builder.tolerate(position, format!("unknown entity `&{name};`"))?;
                    builder.text(&format!("&{name};"), position)?;
                }
            }
            Event::CData(data) => {
                let data = decode(&reader, &data, position)?;
                builder.push(Node::CData(data.into_owned()));
            }
            Event::Comment(comment) => {
                let comment = decode(&reader, &comment, position)?;
                builder.push(Node::Comment(comment.into_owned()));
            }
            Event::PI(pi) => {
                let pi = decode(&reader, &pi, position)?;
                builder.push(Node::ProcessingInstruction(pi.into_owned()));
            }
            Event::DocType(doctype) => {
                let doctype = decode(&reader, &doctype, position)?;
                builder.push(Node::DocType(doctype.trim().to_string()));
            }
            Event::Eof => break,
        }
    }

    let end = reader.buffer_position() as u64;
    builder.finish(end)
}

fn decode<'b>(
    reader: &Reader<&[u8]>,
    bytes: &'b [u8],
    position: u64,
) -> Result<Cow<'b, str>, XmlError> {
    reader
        .decoder()
        .decode(bytes)
        .map_err(|err| XmlError::new(position, err.to_string()))
}

// ============================================================================
// Tree builder
// ============================================================================

struct TreeBuilder {
    mode: ParseMode,
    /// Currently open elements, innermost last.
    stack: Vec<Element>,
    /// Finished top-level nodes.
    nodes: Vec<Node>,
    issues: Vec<ParseIssue>,
}

impl TreeBuilder {
    fn new(mode: ParseMode) -> Self {
        Self {
            mode,
            stack: Vec::new(),
            nodes: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Record a problem, or fail outright in strict mode.
    fn tolerate(&mut self, position: u64, message: impl Into<String>) -> Result<(), XmlError> {
        let message = message.into();
        if self.mode.is_strict() {
            return Err(XmlError::new(position, message));
        }
        debug!("parse"; "tolerated at byte {}: {}", position, message);
        self.issues.push(ParseIssue { position, message });
        Ok(())
    }

    fn element(
        &mut self,
        reader: &Reader<&[u8]>,
        start: &BytesStart<'_>,
        position: u64,
    ) -> Result<Element, XmlError> {
        let name = decode(reader, start.name().as_ref(), position)?.into_owned();
        let mut element = Element::new(name);

        for attr in start.attributes().with_checks(self.mode.is_strict()) {
            let attr = match attr {
                Ok(attr) => attr,
                Err(err) => {
                    self.tolerate(position, err.to_string())?;
                    break;
                }
            };

            let name = decode(reader, attr.key.as_ref(), position)?.into_owned();
            let value = match attr.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(err) => {
                    self.tolerate(position, format!("attribute `{name}`: {err}"))?;
                    decode(reader, &attr.value, position)?.into_owned()
                }
            };
            element.attributes.push(Attribute { name, value });
        }

        Ok(element)
    }

    /// Append a finished node to the innermost open element, or to the top level.
    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.nodes.push(node),
        }
    }

    fn open(&mut self, element: Element) {
        self.stack.push(element);
    }

    fn close(&mut self, name: &str, position: u64) -> Result<(), XmlError> {
        let Some(index) = self.stack.iter().rposition(|el| el.name == name) else {
            return self.tolerate(position, format!("unmatched end tag `</{name}>`"));
        };

        while self.stack.len() > index + 1 {
            if let Some(inner) = self.stack.pop() {
                self.tolerate(
                    position,
                    format!("element `{}` closed implicitly by `</{name}>`", inner.name),
                )?;
                self.push(Node::Element(inner));
            }
        }
        if let Some(element) = self.stack.pop() {
            self.push(Node::Element(element));
        }
        Ok(())
    }

    /// Append character data, merging with a preceding text node.
    ///
    /// Entity references arrive as separate events, so `a &amp; b` is three
    /// events that must end up as one text node.
    fn text(&mut self, text: &str, position: u64) -> Result<(), XmlError> {
        if self.stack.is_empty() {
            if text.trim().is_empty() {
                return Ok(());
            }
            self.tolerate(position, "text outside the root element")?;
        }

        let siblings = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.nodes,
        };
        match siblings.last_mut() {
            Some(Node::Text(previous)) => previous.push_str(text),
            _ => siblings.push(Node::Text(text.to_string())),
        }
        Ok(())
    }

    fn finish(mut self, position: u64) -> Result<Document, XmlError> {
        while let Some(element) = self.stack.pop() {
            self.tolerate(position, format!("element `{}` is never closed", element.name))?;
            self.push(Node::Element(element));
        }

        match self.nodes.iter().filter_map(Node::as_element).count() {
            0 => self.tolerate(position, "document has no root element")?,
            1 => {}
            n => self.tolerate(position, format!("document has {n} root elements"))?,
        }

        Ok(Document {
            nodes: self.nodes,
            issues: self.issues,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
