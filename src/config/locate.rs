//! Upward search for `tiapp.xml`.
//!
//! The working directory is split into segments and candidates are probed
//! from the deepest directory up to the filesystem root:
//!
//! ```text
//! /home/user/app/Resources/images/   ← cwd
//! /home/user/app/Resources/images/tiapp.xml
//! /home/user/app/Resources/tiapp.xml
//! /home/user/app/tiapp.xml           ← found!
//! ```
//!
//! [`segments`], [`candidate`] and [`candidates`] describe the probe order as
//! plain strings so platform formatting can be tested without touching the
//! filesystem. [`find_from`] walks the same order over real paths.

use std::path::{Path, PathBuf};

use crate::debug;

/// Fixed name of the project configuration file.
pub const TIAPP_XML: &str = "tiapp.xml";

// ============================================================================
// Platform
// ============================================================================

/// How absolute paths are rooted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Separator-rooted (`/home/user`).
    Unix,
    /// Drive-letter-rooted (`C:\Users`).
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub const fn current() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Unix }
    }

    pub const fn separator(self) -> char {
        match self {
            Self::Unix => '/',
            Self::Windows => '\\',
        }
    }
}

// ============================================================================
// Pure path building
// ============================================================================

/// Split a directory into its non-empty segments.
///
/// The empty leading segment of a Unix absolute path and any trailing
/// separator are dropped, so `/a/b/` yields `["a", "b"]` and `/` yields `[]`.
pub fn segments(dir: &str, platform: Platform) -> Vec<&str> {
    dir.split(platform.separator())
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Build the candidate path for a directory given by its leading segments.
///
/// Unix candidates are prefixed with the separator; Windows candidates
/// already start with their drive segment.
///
/// ```ignore
/// candidate(Platform::Unix, &["a", "b"], "tiapp.xml")    -> "/a/b/tiapp.xml"
/// candidate(Platform::Unix, &[], "tiapp.xml")            -> "/tiapp.xml"
/// candidate(Platform::Windows, &["C:", "a"], "tiapp.xml") -> "C:\a\tiapp.xml"
/// ```
pub fn candidate(platform: Platform, segments: &[&str], file_name: &str) -> String {
    let sep = platform.separator();
    let mut path = String::new();

    if platform == Platform::Unix {
        path.push(sep);
    }
    for segment in segments {
        path.push_str(segment);
        path.push(sep);
    }
    path.push_str(file_name);
    path
}

/// All candidates for `dir`, deepest first, ending at the filesystem root.
pub fn candidates(dir: &str, file_name: &str, platform: Platform) -> Vec<String> {
    let segments = segments(dir, platform);
    // Unix probes the bare root ("/tiapp.xml") as well; on Windows the
    // shortest prefix is already the drive root.
    let shallowest = match platform {
        Platform::Unix => 0,
        Platform::Windows => 1.min(segments.len()),
    };

    (shallowest..=segments.len())
        .rev()
        .map(|k| candidate(platform, &segments[..k], file_name))
        .collect()
}

// ============================================================================
// Filesystem probing
// ============================================================================

/// Find `tiapp.xml` at or above the process working directory.
///
/// Returns `None` when no ancestor contains the file, or when the working
/// directory cannot be determined.
pub fn find() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_from(&cwd, TIAPP_XML)
}

/// Find `file_name` at or above `dir`.
///
/// A relative `dir` is resolved against the working directory first. The
/// walk goes over real [`Path`] ancestors, so non-UTF-8 names and UNC roots
/// survive. Only regular files match (symlinks are followed); a directory
/// that happens to carry the file name is skipped.
pub fn find_from(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let dir = std::path::absolute(dir).ok()?;

    dir.ancestors()
        .map(|ancestor| ancestor.join(file_name))
        .inspect(|path| debug!("locate"; "probing {}", path.display()))
        .find(|path| path.is_file())
}

// ============================================================================
// Tests
// ============================================================================
