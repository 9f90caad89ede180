//! Options controlling discovery and parsing.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::locate::{TIAPP_XML, find_from};
use crate::debug;
use crate::xml::ParseMode;

/// How a [`TiApp`](crate::TiApp) finds and parses its file.
///
/// ```ignore
/// let options = LoadOptions::default()
///     .with_search_from("/path/to/project/Resources")
///     .with_parse_mode(ParseMode::Strict);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadOptions {
    /// File name searched for during discovery.
    pub file_name: String,

    /// Directory discovery starts from. `None` means the working directory,
    /// read afresh on every discovery.
    pub search_from: Option<PathBuf>,

    pub parse_mode: ParseMode,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            file_name: TIAPP_XML.to_string(),
            search_from: None,
            parse_mode: ParseMode::default(),
        }
    }
}

impl LoadOptions {
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn with_search_from(mut self, dir: impl AsRef<Path>) -> Self {
        self.search_from = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }

    pub fn strict(self) -> Self {
        self.with_parse_mode(ParseMode::Strict)
    }

    /// Search upward for `file_name` from `search_from` (or the working
    /// directory). Reads nothing.
    pub fn discover(&self) -> Option<PathBuf> {
        let found = match &self.search_from {
            Some(dir) => find_from(dir, &self.file_name),
            None => find_from(&std::env::current_dir().ok()?, &self.file_name),
        };
        debug!("find"; "discovered {:?}", found);
        found
    }
}
