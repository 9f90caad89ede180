//! Project configuration handle for `tiapp.xml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── locate.rs      # Upward directory walk (find / find_from)
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ErrorKind
//! │   └── options    # LoadOptions
//! └── mod.rs         # TiApp (this file)
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! TiApp::new(Some(p)) ──────────────► load(p) ──► read ──► parse
//! TiApp::new(None) ──► find() ─┬─ Some(p) ──► load(p) ──► read ──► parse
//!                              └─ None ────► empty handle (no path, no document)
//!
//! load(None)  re-runs discovery; it never reuses the stored path
//! parse(xml)  replaces the document only on success
//! ```

pub mod locate;
pub mod types;

pub use locate::{Platform, TIAPP_XML, find, find_from};
pub use types::{ConfigError, ErrorKind, LoadOptions};

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    debug,
    utils::hash,
    xml::{self, Document},
};

// ============================================================================
// TiApp
// ============================================================================

/// A resolved `tiapp.xml` and its parsed document.
///
/// The path is only ever replaced by a successful [`load`](Self::load); the
/// document only by a successful [`parse`](Self::parse). A failed call
/// leaves both exactly as they were.
#[derive(Debug, Clone, Default)]
pub struct TiApp {
    path: Option<PathBuf>,
    document: Option<Document>,
    options: LoadOptions,
    /// Hash of the text behind `document`, for [`refresh`](Self::refresh).
    content_hash: Option<u64>,
}

impl TiApp {
    /// Open `path`, or discover `tiapp.xml` upward from the working directory.
    ///
    /// Discovery finding nothing is not an error: the handle is returned
    /// empty and can be populated by a later [`load`](Self::load).
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::with_options(path, LoadOptions::default())
    }

    /// Like [`new`](Self::new) with explicit discovery and parse options.
    pub fn with_options(path: Option<&Path>, options: LoadOptions) -> Result<Self, ConfigError> {
        let mut tiapp = Self {
            options,
            ..Self::default()
        };

        let resolved = match path {
            Some(path) => Some(checked_path(path)?.to_path_buf()),
            None => tiapp.discover(),
        };

        match resolved {
            Some(path) => {
                tiapp.load(Some(&path))?;
            }
            None => debug!("load"; "no {} found, handle left empty", tiapp.options.file_name),
        }
        Ok(tiapp)
    }

    /// Path of the loaded file.
    #[inline]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Parsed document, present after the first successful parse.
    #[inline]
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    #[inline]
    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Consume the handle, keeping only the document.
    pub fn into_document(self) -> Option<Document> {
        self.document
    }

    /// Run discovery with this handle's options.
    ///
    /// Reads nothing and changes nothing.
    #[inline]
    pub fn discover(&self) -> Option<PathBuf> {
        self.options.discover()
    }

    /// Read and parse `path`, or a freshly discovered file when `None`.
    ///
    /// On success the stored path and document are both replaced. A missing
    /// file (or nothing discovered) fails with [`ConfigError::NotFound`]
    /// carrying the attempted path.
    pub fn load(&mut self, path: Option<&Path>) -> Result<&mut Self, ConfigError> {
        let candidate = match path {
            Some(path) => Some(checked_path(path)?.to_path_buf()),
            None => self.discover(),
        };

        let path = match candidate {
            Some(path) if path.exists() => path,
            other => return Err(ConfigError::NotFound(other)),
        };

        let content = read_text(&path)?;
        self.parse(&content)?;
        debug!("load"; "loaded {}", path.display());
        self.path = Some(path);
        Ok(self)
    }

    /// Parse `xml` and replace the document.
    ///
    /// Empty input is rejected before parsing. Malformed input is handled
    /// per [`LoadOptions::parse_mode`]; in the default lenient mode the
    /// document may carry [`issues`](Document::issues) instead of failing.
    pub fn parse(&mut self, xml: &str) -> Result<&mut Self, ConfigError> {
        if xml.is_empty() {
            return Err(ConfigError::invalid_argument(
                "xml",
                xml,
                "must be a non-empty string",
            ));
        }

        let document = xml::parse(xml, self.options.parse_mode)?;
        debug!(
            "parse";
            "root <{}>, {} issue(s)",
            document.root().map_or("?", |root| root.name.as_str()),
            document.issues.len()
        );
        self.document = Some(document);
        self.content_hash = Some(hash::compute(xml.as_bytes()));
        Ok(self)
    }

    /// Re-run discovery and reload if the file moved or its content changed.
    ///
    /// Returns `Ok(true)` if the document was replaced, `Ok(false)` if the
    /// same file still holds the same content.
    pub fn refresh(&mut self) -> Result<bool, ConfigError> {
        let Some(path) = self.discover() else {
            return Err(ConfigError::NotFound(None));
        };

        if self.path.as_deref() == Some(path.as_path()) {
            let content = read_text(&path)?;
            if self.content_hash == Some(hash::compute(content.as_bytes())) {
                return Ok(false);
            }
        }

        self.load(Some(&path))?;
        Ok(true)
    }
}

/// Reject the one path value static typing lets through: an empty one.
fn checked_path(path: &Path) -> Result<&Path, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::invalid_argument(
            "path",
            "",
            "must be a non-empty path",
        ));
    }
    Ok(path)
}

/// Read a whole file as text, decoding invalid UTF-8 lossily.
fn read_text(path: &Path) -> Result<String, ConfigError> {
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::ParseMode;
    use tempfile::TempDir;

    const APP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ti:app xmlns:ti="http://ti.appcelerator.org">
    <id>com.example.app</id>
</ti:app>
"#;

    /// Project at `root/a/tiapp.xml`, working directory at `root/a/b/c`.
    fn project(xml: &str) -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let deep = temp.path().join("a").join("b").join("c");
        fs::create_dir_all(&deep).unwrap();
        let file = temp.path().join("a").join(TIAPP_XML);
        fs::write(&file, xml).unwrap();
        (temp, file, deep)
    }

    fn root_name(tiapp: &TiApp) -> Option<String> {
        tiapp.document()?.root().map(|root| root.name.clone())
    }

    #[test]
    fn test_new_discovers_and_loads() {
        let (_temp, file, deep) = project(APP);
        let options = LoadOptions::default().with_search_from(&deep);

        let tiapp = TiApp::with_options(None, options).unwrap();

        assert_eq!(tiapp.path(), Some(file.as_path()));
        assert_eq!(root_name(&tiapp).as_deref(), Some("ti:app"));
    }

    #[test]
    fn test_new_without_match_is_empty() {
        let temp = TempDir::new().unwrap();
        let options = LoadOptions::default()
            .with_file_name("tiapp-handle-test-absent.xml")
            .with_search_from(temp.path());

        let tiapp = TiApp::with_options(None, options).unwrap();

        assert!(tiapp.path().is_none());
        assert!(tiapp.document().is_none());
    }

    #[test]
    fn test_new_with_explicit_path() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("custom.xml");
        fs::write(&file, "<x/>").unwrap();

        let tiapp = TiApp::new(Some(&file)).unwrap();

        assert_eq!(tiapp.path(), Some(file.as_path()));
        let doc = tiapp.document().unwrap();
        assert_eq!(doc.root().unwrap().name, "x");
        assert_eq!(doc.to_string(), "<x/>");
    }

    #[test]
    fn test_new_with_missing_path_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join(TIAPP_XML);

        let err = TiApp::new(Some(&missing)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.path(), Some(missing.as_path()));
    }

    #[test]
    fn test_directory_path_is_io_error() {
        let temp = TempDir::new().unwrap();

        let err = TiApp::new(Some(temp.path())).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.path(), Some(temp.path()));

        let (_temp, file, deep) = project(APP);
        let mut tiapp = TiApp::new(Some(&file)).unwrap();
        let err = tiapp.load(Some(&deep)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(tiapp.path(), Some(file.as_path()));
    }

    #[test]
    fn test_empty_path_is_invalid_argument() {
        let err = TiApp::new(Some(Path::new(""))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let mut tiapp = TiApp::default();
        let err = tiapp.load(Some(Path::new(""))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_load_missing_keeps_previous_state() {
        let (temp, file, _deep) = project(APP);
        let mut tiapp = TiApp::new(Some(&file)).unwrap();
        let before = tiapp.document().cloned();

        let missing = temp.path().join("missing.xml");
        let err = tiapp.load(Some(&missing)).unwrap_err();

        assert!(matches!(&err, ConfigError::NotFound(Some(p)) if p == &missing));
        assert_eq!(tiapp.path(), Some(file.as_path()));
        assert_eq!(tiapp.document().cloned(), before);
    }

    #[test]
    fn test_load_without_path_rediscovers() {
        let (temp, file, deep) = project(APP);
        let other = temp.path().join("other.xml");
        fs::write(&other, "<other/>").unwrap();

        let options = LoadOptions::default().with_search_from(&deep);
        let mut tiapp = TiApp::with_options(Some(&other), options).unwrap();
        assert_eq!(root_name(&tiapp).as_deref(), Some("other"));

        tiapp.load(None).unwrap();

        assert_eq!(tiapp.path(), Some(file.as_path()));
        assert_eq!(root_name(&tiapp).as_deref(), Some("ti:app"));
    }

    #[test]
    fn test_load_without_discovery_result_is_not_found() {
        let temp = TempDir::new().unwrap();
        let options = LoadOptions::default()
            .with_file_name("tiapp-handle-test-absent.xml")
            .with_search_from(temp.path());
        let mut tiapp = TiApp::with_options(None, options).unwrap();

        let err = tiapp.load(None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(None)));
    }

    #[test]
    fn test_repeated_load_is_idempotent() {
        let (_temp, file, _deep) = project(APP);
        let mut tiapp = TiApp::new(Some(&file)).unwrap();

        let first = tiapp.load(Some(&file)).unwrap().document().cloned();
        let second = tiapp.load(Some(&file)).unwrap().document().cloned();

        assert_eq!(first, second);
        assert_eq!(first.unwrap().root().unwrap().elements().count(), 1);
    }

    #[test]
    fn test_stored_path_is_a_snapshot() {
        let (_temp, file, _deep) = project(APP);
        let other = file.with_file_name("other.xml");
        fs::write(&other, "<other/>").unwrap();
        let mut tiapp = TiApp::new(Some(&file)).unwrap();

        let mut copy = tiapp.path().unwrap().to_path_buf();
        copy.set_file_name("other.xml");

        assert_eq!(tiapp.path(), Some(file.as_path()));
        tiapp.load(Some(&copy)).unwrap();
        assert_eq!(tiapp.path(), Some(other.as_path()));
        assert_eq!(root_name(&tiapp).as_deref(), Some("other"));
    }

    #[test]
    fn test_parse_is_chainable() {
        let mut tiapp = TiApp::default();
        let name = tiapp
            .parse("<a/>")
            .and_then(|t| t.parse("<b/>"))
            .map(|t| root_name(t))
            .unwrap();
        assert_eq!(name.as_deref(), Some("b"));
        assert!(tiapp.path().is_none());
    }

    #[test]
    fn test_parse_rejects_empty_and_keeps_document() {
        let mut tiapp = TiApp::default();
        tiapp.parse("<x/>").unwrap();

        let err = tiapp.parse("").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(root_name(&tiapp).as_deref(), Some("x"));
    }

    #[test]
    fn test_strict_parse_failure_keeps_document() {
        let mut tiapp = TiApp {
            options: LoadOptions::default().with_parse_mode(ParseMode::Strict),
            ..TiApp::default()
        };
        tiapp.parse("<x/>").unwrap();

        let err = tiapp.parse("<a><b></a>").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(root_name(&tiapp).as_deref(), Some("x"));
    }

    #[test]
    fn test_lenient_parse_passes_malformed_through() {
        let mut tiapp = TiApp::default();
        tiapp.parse("<a><b></a>").unwrap();

        let doc = tiapp.document().unwrap();
        assert_eq!(doc.root().unwrap().name, "a");
        assert!(doc.has_issues());
    }

    #[test]
    fn test_load_with_invalid_utf8_is_lossy() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join(TIAPP_XML);
        fs::write(&file, b"<x>caf\xe9</x>").unwrap();

        let tiapp = TiApp::new(Some(&file)).unwrap();

        assert_eq!(
            tiapp.document().unwrap().root().unwrap().text(),
            "caf\u{FFFD}"
        );
    }

    #[test]
    fn test_refresh_detects_changes() {
        let (_temp, file, deep) = project(APP);
        let options = LoadOptions::default().with_search_from(&deep);
        let mut tiapp = TiApp::with_options(None, options).unwrap();

        assert!(!tiapp.refresh().unwrap());

        fs::write(&file, "<changed/>").unwrap();
        assert!(tiapp.refresh().unwrap());
        assert_eq!(root_name(&tiapp).as_deref(), Some("changed"));
    }

    #[test]
    fn test_refresh_picks_up_nearer_file() {
        let (_temp, _file, deep) = project(APP);
        let options = LoadOptions::default().with_search_from(&deep);
        let mut tiapp = TiApp::with_options(None, options).unwrap();

        let nearer = deep.join(TIAPP_XML);
        fs::write(&nearer, APP).unwrap();

        assert!(tiapp.refresh().unwrap());
        assert_eq!(tiapp.path(), Some(nearer.as_path()));
    }
}
