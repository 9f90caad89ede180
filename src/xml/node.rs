//! Document tree types and read-only queries.

use std::fmt;

use quick_xml::escape::{escape, partial_escape};
use serde::Serialize;

use super::parse::ParseIssue;

// ============================================================================
// Document
// ============================================================================

/// A parsed XML document.
///
/// Top-level nodes are kept in source order, so a document may carry
/// comments or processing instructions around the root element. In lenient
/// mode a document can also have no root at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Top-level nodes (the XML declaration is not kept).
    pub nodes: Vec<Node>,
    /// Problems tolerated while parsing in lenient mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ParseIssue>,
}

impl Document {
    /// The first top-level element.
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// Top-level elements. Well-formed documents have exactly one.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.nodes.iter().filter_map(Node::as_element)
    }

    /// Resolve a slash-separated path whose first segment names the root.
    ///
    /// ```ignore
    /// doc.select("ti:app/ios/plist");
    /// ```
    pub fn select(&self, path: &str) -> Option<&Element> {
        let path = path.trim_matches('/');
        let (head, rest) = path.split_once('/').unwrap_or((path, ""));
        let root = self.root().filter(|root| root.name == head)?;
        if rest.is_empty() {
            Some(root)
        } else {
            root.find(rest)
        }
    }

    /// Whether the parser had to tolerate malformed input.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Node
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Node {
    Element(Element),
    /// Character data with entities already resolved.
    Text(String),
    CData(String),
    Comment(String),
    /// Raw content of `<? ... ?>`, target included.
    ProcessingInstruction(String),
    /// Raw content of `<!DOCTYPE ...>`.
    DocType(String),
}

impl Node {
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text carried by this node (text and CDATA only).
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::CData(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(element) => write!(f, "{element}"),
            Self::Text(text) => f.write_str(&partial_escape(text.as_str())),
            Self::CData(text) => write!(f, "<![CDATA[{text}]]>"),
            Self::Comment(text) => write!(f, "<!--{text}-->"),
            Self::ProcessingInstruction(text) => write!(f, "<?{text}?>"),
            Self::DocType(text) => write!(f, "<!DOCTYPE {text}>"),
        }
    }
}

// ============================================================================
// Element
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    /// Qualified name as written (`ti:app`).
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Name without namespace prefix (`app` for `ti:app`).
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Namespace prefix, if any (`ti` for `ti:app`).
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.name == name)
    }

    /// All child elements with the given qualified name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |el| el.name == name)
    }

    /// Descend through child elements by a slash-separated path of names.
    ///
    /// Each segment picks the first matching child. Empty segments are
    /// skipped, so `"ios//plist"` and `"/ios/plist/"` are the same path.
    pub fn find(&self, path: &str) -> Option<&Element> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |current, segment| current.child(segment))
    }

    /// Concatenated text of direct text and CDATA children.
    pub fn text(&self) -> String {
        self.children.iter().filter_map(Node::as_text).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attr in &self.attributes {
            write!(f, " {}=\"{}\"", attr.name, escape(attr.value.as_str()))?;
        }
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.name)
    }
}

// ============================================================================
// Tests
// ============================================================================
