//! Configuration utility types.
//!
//! | Module    | Purpose                                  |
//! |-----------|------------------------------------------|
//! | `error`   | `ConfigError` and its `ErrorKind`        |
//! | `options` | `LoadOptions` (file name, start, mode)   |

mod error;
mod options;

pub use error::{ConfigError, ErrorKind};
pub use options::LoadOptions;
