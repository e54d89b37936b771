//! Worker and test collections.
//!
//! Collections are owned by the caller and handed to the scheduler; there
//! is no process-wide registry of entities.

use serde::{Deserialize, Serialize};

use super::{Test, Worker};

/// Ordered set of workers available for a scheduling round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerCollection {
    /// Workers in insertion order.
    pub workers: Vec<Worker>,
}

impl WorkerCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a worker named `name`, inserts it and returns a handle to it.
    pub fn new_worker(&mut self, name: impl Into<String>) -> &mut Worker {
        self.workers.push(Worker::new(name));
        let last = self.workers.len() - 1;
        &mut self.workers[last]
    }

    /// Inserts a worker.
    pub fn add_worker(&mut self, worker: Worker) {
        self.workers.push(worker);
    }

    /// Adds a worker (builder style).
    pub fn with_worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    /// Finds a worker by name and instance.
    pub fn get(&self, name: &str, instance: u32) -> Option<&Worker> {
        self.workers
            .iter()
            .find(|w| w.name == name && w.instance == instance)
    }

    /// Iterates over workers.
    pub fn iter(&self) -> std::slice::Iter<'_, Worker> {
        self.workers.iter()
    }

    /// Number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}

/// Ordered set of tests to schedule in a round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCollection {
    /// Tests in insertion order.
    pub tests: Vec<Test>,
}

impl TestCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a test named `name`, inserts it and returns a handle to it.
    pub fn new_test(&mut self, name: impl Into<String>) -> &mut Test {
        self.tests.push(Test::new(name));
        let last = self.tests.len() - 1;
        &mut self.tests[last]
    }

    /// Inserts a test.
    pub fn add_test(&mut self, test: Test) {
        self.tests.push(test);
    }

    /// Adds a test (builder style).
    pub fn with_test(mut self, test: Test) -> Self {
        self.tests.push(test);
        self
    }

    /// Finds a test by name.
    pub fn get(&self, name: &str) -> Option<&Test> {
        self.tests.iter().find(|t| t.name == name)
    }

    /// Iterates over tests.
    pub fn iter(&self) -> std::slice::Iter<'_, Test> {
        self.tests.iter()
    }

    /// Number of tests.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
