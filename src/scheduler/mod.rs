//! SAT-driven scheduler.
//!
//! Owns a round's workers, tests and prior state, and drives
//! formula building → solving → decoding.
//!
//! # Rounds
//!
//! The assignments returned by one round become the initial state of the
//! next. They are locked as `Old` facts, and the new `Current` binding of
//! a test may not reuse the worker it was committed to.

mod sat_scheduler;

pub use sat_scheduler::{Scheduler, Solution};
