//! Scheduling domain models.
//!
//! Workers offer capability classes, tests require them, and assignments
//! bind one to the other within a scheduling epoch.
//!
//! # Lifecycle of an assignment
//!
//! | Round | Epoch | Role |
//! |-------|-------|------|
//! | n | `Current` | freshly solved binding |
//! | n+1 | `Old` | caller-supplied, locked as an axiom |
//! | n+1 | `Current` | new binding solved against it |

mod assignment;
mod collection;
mod test_case;
mod worker;

pub use assignment::{Assignment, State};
pub use collection::{TestCollection, WorkerCollection};
pub use test_case::Test;
pub use worker::Worker;
