//! SAT-backed assignment of tests to worker machines.
//!
//! Expresses "run every test on exactly one capable worker, one test per
//! worker" as a Boolean formula over named atoms, hands it to a SAT solver
//! and decodes the satisfying model back into typed assignments. Supports
//! re-solving against the assignments committed by a previous round.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Worker`, `Test`, `Assignment`, `State`, collections
//! - **`codec`**: Bijective atom naming for workers, tests, assignments and task states
//! - **`formula`**: AND/OR/NOT formula and the builder compiling collections into it
//! - **`solver`**: Solver contract and the bundled `varisat` backend
//! - **`scheduler`**: Orchestrates build → solve → decode
//! - **`validation`**: Input integrity checks (duplicates, reserved characters, references)
//! - **`config`**: Scheduler configuration
//!
//! # Example
//!
//! ```
//! use sat_schedule::models::{Test, TestCollection, Worker, WorkerCollection};
//! use sat_schedule::Scheduler;
//!
//! let workers = WorkerCollection::new()
//!     .with_worker(Worker::new("worker1").with_instance(1).with_capability("qemu64"))
//!     .with_worker(Worker::new("worker2").with_instance(1).with_capability("qemu32"));
//! let tests = TestCollection::new()
//!     .with_test(Test::new("t1").with_capability("qemu32"))
//!     .with_test(Test::new("t2").with_capability("qemu64"));
//!
//! let mut scheduler = Scheduler::new(workers, tests);
//! for a in scheduler.schedule_decode().unwrap().iter().filter(|a| a.value) {
//!     println!("Test: {} Assigned to worker: {}", a.test.name, a.worker.name);
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod formula;
pub mod models;
pub mod scheduler;
pub mod solver;
pub mod validation;

pub use config::SchedulerConfig;
pub use error::{DecodeError, Result, ScheduleError};
pub use scheduler::{Scheduler, Solution};
pub use solver::{Model, Solver, VarisatSolver};
