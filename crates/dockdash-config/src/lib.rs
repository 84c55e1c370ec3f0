//! Configuration loading for dockdash
//!
//! Reads the global configuration (`~/.config/dockdash/config.toml`).
//! Every field has a default, so a missing file is not an error.

mod error;
mod global;

pub use error::*;
pub use global::*;
