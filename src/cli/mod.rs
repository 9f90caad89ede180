//! Command-line interface module.

mod args;
pub mod find;
pub mod show;

pub use args::{Cli, Commands, ShowArgs};
