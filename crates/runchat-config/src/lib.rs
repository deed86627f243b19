//! runchat configuration system.
//!
//! Provides TOML-based configuration with validation, plus credentials
//! from the environment. All config sections use defaults so partial
//! configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use runchat_config::{load_config, Credentials};
//!
//! let config = load_config(None).expect("failed to load config");
//! let creds = Credentials::from_env().expect("missing credentials");
//! println!("{} via {}", config.assistant.model, creds.endpoint);
//! ```

pub mod env;
pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use env::{Credentials, SearchCredentials};
pub use schema::RunchatConfig;

use std::path::Path;

use runchat_common::ConfigError;

/// Load and validate the config.
///
/// With `path`, that file must exist. Without it, the platform default path
/// is used and created with a commented template when absent.
pub fn load_config(path: Option<&Path>) -> Result<RunchatConfig, ConfigError> {
    let config = match path {
        Some(path) => toml_loader::load_from_path(path)?,
        None => toml_loader::load_default()?,
    };
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &RunchatConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
