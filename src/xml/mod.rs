//! In-memory XML document tree.
//!
//! ```text
//! xml/
//! ├── node.rs    # Document / Node / Element + queries
//! └── parse.rs   # quick-xml event stream -> Document
//! ```

mod node;
mod parse;

pub use node::{Attribute, Document, Element, Node};
pub use parse::{ParseIssue, ParseMode, XmlError, parse};
