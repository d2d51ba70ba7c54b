//! amo-publish core - configuration and caller input handling
//!
//! This crate loads and validates the tool's configuration and turns raw
//! flag values into the typed requests the store crate submits.

pub mod config;
pub mod error;
pub mod inputs;

pub use config::{load_config, load_config_or_default, validate_config, Config};
pub use error::{ConfigError, PublishError, Result};
pub use inputs::{
    parse_compatibility, parse_release_notes, require_package_extension,
    require_source_extension, resolve_file,
};
