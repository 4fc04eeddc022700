//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Instrumentation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InstrumentConfig {
    /// Whether handler instrumentation is applied at setup.
    pub enabled: bool,

    /// Handoff budget per handler, in milliseconds.
    pub budget_ms: u64,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            budget_ms: 5_000,
        }
    }
}

impl InstrumentConfig {
    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }
}
