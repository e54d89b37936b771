//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::codec::STATE_RUNNING;

/// Scheduler configuration.
///
/// Deserializes from partial documents; missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Run [`crate::validation::validate_input`] before building the formula.
    pub validate_input: bool,
    /// Label of the task-state atom asserted for scheduled tests.
    pub running_label: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            validate_input: false,
            running_label: STATE_RUNNING.to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables input validation.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_input = enabled;
        self
    }

    /// Sets the running-state label.
    pub fn with_running_label(mut self, label: impl Into<String>) -> Self {
        self.running_label = label.into();
        self
    }
}
