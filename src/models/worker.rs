//! Worker model.
//!
//! A worker is a machine instance that can run tests. It is identified
//! by `(name, instance)` and offers a list of capability classes.

use serde::{Deserialize, Serialize};

use super::Test;

/// A worker machine that can run tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Worker {
    /// Worker name (shared by all instances of the same machine).
    pub name: String,
    /// Instance number, disambiguates workers sharing a name.
    pub instance: u32,
    /// Capability classes offered by this worker.
    ///
    /// Duplicates are allowed; matching treats the list as a set.
    pub capabilities: Vec<String>,
}

impl Worker {
    /// Creates a worker with instance 0 and no capabilities.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instance: 0,
            capabilities: Vec::new(),
        }
    }

    /// Sets the instance number.
    pub fn with_instance(mut self, instance: u32) -> Self {
        self.instance = instance;
        self
    }

    /// Adds a capability class.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Appends a capability class.
    pub fn add_capability(&mut self, capability: impl Into<String>) {
        self.capabilities.push(capability.into());
    }

    /// Whether this worker offers the given capability class.
    pub fn provides_capability(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }

    /// Whether this worker can run `test`.
    ///
    /// True iff at least one capability is shared with the test's
    /// requirements. A test without requirements is satisfied by nobody.
    pub fn satisfies(&self, test: &Test) -> bool {
        self.capabilities
            .iter()
            .any(|c| test.requires_capability(c))
    }

    /// Whether `other` denotes the same worker (name and instance).
    #[inline]
    pub fn same_identity(&self, other: &Worker) -> bool {
        self.name == other.name && self.instance == other.instance
    }
}
