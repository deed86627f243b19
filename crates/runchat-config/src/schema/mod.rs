//! Configuration schema types for runchat.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Secrets are never part of the file schema; see [`crate::env`].

mod assistant;
mod polling;
mod system;

pub use assistant::*;
pub use polling::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for runchat.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunchatConfig {
    pub assistant: AssistantConfig,
    pub polling: PollingConfig,
    pub weather: WeatherConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}
