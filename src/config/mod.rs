// src/config/mod.rs

//! Run configuration loaded from TOML.
//!
//! - [`model`] maps the file layout onto `serde` types.
//! - [`validate`] turns a raw file into a checked [`ConfigFile`].
//! - [`loader`] reads files from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, ExecutorSection, RawConfigFile, SummarySection};
