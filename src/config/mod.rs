//! Configuration loading, parsing, and validation for kitup.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//! - Effective per-run settings in [`run`]
//!
//! # Example
//!
//! ```
//! use kitup::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let kitup_dir = temp.path().join(".kitup");
//! fs::create_dir_all(&kitup_dir).unwrap();
//! fs::write(kitup_dir.join("config.yml"), "settings:\n  builtin: false\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert!(!config.settings.builtin);
//! ```
//!
//! # Configuration File Location
//!
//! `.kitup/config.yml` in the project root, or any file passed with
//! `--config`. Every field has a default, so the file is optional.

pub mod loader;
pub mod run;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_root, load_config, load_config_file, parse_config, project_config_path,
    CONFIG_DIR, CONFIG_FILE,
};
pub use run::RunConfiguration;
pub use schema::{KitupConfig, Settings};
pub use validator::{validate, validate_config, ValidationError};
