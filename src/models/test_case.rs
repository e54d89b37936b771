//! Test (job) model.
//!
//! A test is a unit of work that must run on exactly one worker offering
//! at least one of its required capability classes. `parent` and
//! `parallel` are carried through encoding but are not scheduling
//! constraints.

use serde::{Deserialize, Serialize};

/// A test (job) to be scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Test {
    /// Unique test name within a run.
    pub name: String,
    /// Capability classes accepted by this test (any one suffices).
    pub required_capabilities: Vec<String>,
    /// Name of the parent test, if any.
    pub parent: Option<String>,
    /// Names of tests in the same parallel group.
    pub parallel: Vec<String>,
}

impl Test {
    /// Creates a test with no requirements.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_capabilities: Vec::new(),
            parent: None,
            parallel: Vec::new(),
        }
    }

    /// Adds a required capability class.
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.required_capabilities.push(capability.into());
        self
    }

    /// Sets the parent test.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Adds a test to the parallel group.
    pub fn with_parallel(mut self, test: impl Into<String>) -> Self {
        self.parallel.push(test.into());
        self
    }

    /// Appends a required capability class.
    pub fn add_capability(&mut self, capability: impl Into<String>) {
        self.required_capabilities.push(capability.into());
    }

    /// Sets the parent test.
    pub fn set_parent(&mut self, parent: impl Into<String>) {
        self.parent = Some(parent.into());
    }

    /// Appends a test to the parallel group.
    pub fn add_parallel(&mut self, test: impl Into<String>) {
        self.parallel.push(test.into());
    }

    /// Whether this test accepts the given capability class.
    pub fn requires_capability(&self, capability: &str) -> bool {
        self.required_capabilities.iter().any(|c| c == capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_builder() {
        let t = Test::new("t1")
            .with_capability("qemu32")
            .with_capability("qemu64")
            .with_parent("t0")
            .with_parallel("t2");

        assert_eq!(t.name, "t1");
        assert_eq!(t.required_capabilities, vec!["qemu32", "qemu64"]);
        assert_eq!(t.parent.as_deref(), Some("t0"));
        assert_eq!(t.parallel, vec!["t2"]);
        assert!(t.requires_capability("qemu64"));
        assert!(!t.requires_capability("aarch64"));
    }

    #[test]
    fn test_mutators() {
        let mut t = Test::new("t1");
        t.add_capability("wc");
        t.set_parent("p");
        t.add_parallel("t3");

        assert!(t.requires_capability("wc"));
        assert_eq!(t.parent.as_deref(), Some("p"));
        assert_eq!(t.parallel.len(), 1);
    }
}
