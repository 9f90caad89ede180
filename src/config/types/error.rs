//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use crate::xml::XmlError;

// ============================================================================
// ConfigError
// ============================================================================

/// Errors raised while locating, loading or parsing `tiapp.xml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A caller passed an unusable argument. Raised before any I/O.
    #[error("invalid argument `{name}`: {reason} (got {value:?})")]
    InvalidArgument {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// No path was supplied or discovered, or the path does not exist.
    #[error("{}", not_found_message(.0))]
    NotFound(Option<PathBuf>),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file")]
    Parse(#[from] XmlError),
}

fn not_found_message(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("config file not found at `{}`", path.display()),
        None => "config file not found in the search directory or any parent".to_string(),
    }
}

/// Coarse classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad call.
    InvalidArgument,
    /// Environment problem: nothing to load.
    NotFound,
    /// Environment problem: the file exists but could not be read.
    Io,
    /// Data problem.
    Parse,
}

impl ConfigError {
    pub(crate) fn invalid_argument(
        name: &'static str,
        value: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidArgument {
            name,
            value: value.into(),
            reason,
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Io(..) => ErrorKind::Io,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }

    /// The path attempted by a failed load, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::NotFound(path) => path.as_deref(),
            Self::Io(path, _) => Some(path),
            _ => None,
        }
    }
}
