//! Base plugin recording when the runtime came up.

use std::time::SystemTime;

use courier_plugins::Plugin;

/// Lifecycle-only plugin that other built-ins depend on.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    started_at: SystemTime,
}

impl CorePlugin {
    /// Creates the plugin, stamping the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started_at: SystemTime::now(),
        }
    }

    /// Time the plugin was activated.
    #[must_use]
    pub const fn started_at(&self) -> SystemTime {
        self.started_at
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for CorePlugin {}
