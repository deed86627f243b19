//! Run polling configuration.

use serde::{Deserialize, Serialize};

/// How often a remote run is refreshed, and how long to wait at most.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between two status refreshes, in milliseconds.
    pub interval_ms: u64,
    /// Upper bound for one run, in seconds.
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            timeout_secs: 120,
        }
    }
}
