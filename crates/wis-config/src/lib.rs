// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for WIS.
//!
//! Settings are read from layered TOML files and `WIS_*` environment
//! variables, rejected on unknown keys, then checked semantically. Every
//! problem found is returned at once as a miette diagnostic.
//!
//! # Usage
//!
//! ```no_run
//! use wis_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("watching {} folder(s)", config.folders.len());
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, ConfigSources, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::WisConfig;

/// Loads the standard hierarchy plus `WIS_*` overrides and validates the result.
pub fn load_and_validate() -> Result<WisConfig, Vec<ConfigError>> {
    checked(loader::load_config(), ConfigSources::standard)
}

/// Loads one explicit file plus `WIS_*` overrides and validates the result.
pub fn load_and_validate_path(path: &Path) -> Result<WisConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || ConfigSources::file(path))
}

/// Loads TOML text (no files, no env) and validates the result.
pub fn load_and_validate_str(toml_content: &str) -> Result<WisConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        ConfigSources::inline(toml_content)
    })
}

/// Validates a loaded config, or turns the load failure into diagnostics.
/// Sources are only read back when there is something to point into.
fn checked(
    loaded: Result<WisConfig, figment::Error>,
    sources: impl FnOnce() -> ConfigSources,
) -> Result<WisConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| ConfigError::from_figment(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
