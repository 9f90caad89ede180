//! Locate, load and parse a project's `tiapp.xml`.
//!
//! The file is searched for from the working directory upward, read, and
//! folded into an in-memory XML [`Document`] owned by a [`TiApp`] handle.
//!
//! ```no_run
//! use tiapp::TiApp;
//!
//! let tiapp = TiApp::new(None)?;
//! if let Some(id) = tiapp.document().and_then(|doc| doc.select("ti:app/id")) {
//!     println!("app id: {}", id.text());
//! }
//! # Ok::<(), tiapp::ConfigError>(())
//! ```
//!
//! | Module   | Purpose                                          |
//! |----------|--------------------------------------------------|
//! | `config` | `TiApp` handle, upward discovery, errors, options |
//! | `xml`    | Document tree and the `quick-xml` tree builder   |
//! | `logger` | `log!` / `debug!` macros                         |

pub mod config;
pub mod logger;
mod utils;
pub mod xml;

pub use config::{
    ConfigError, ErrorKind, LoadOptions, Platform, TIAPP_XML, TiApp, find, find_from,
};
pub use xml::{Document, Element, Node, ParseMode, XmlError};
