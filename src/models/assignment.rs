//! Assignment model.
//!
//! An assignment binds a test to a worker within a scheduling epoch.
//! Assignments are produced fresh from each solved model; they are the
//! unit the codec names formula atoms after.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Test, Worker};
use crate::codec;

/// Scheduling epoch of an assignment.
///
/// `Old` marks a binding committed in a previous round and locked as an
/// axiom; `Current` marks a binding computed by the running solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Committed by a previous scheduling round.
    Old,
    /// Computed by the current scheduling round.
    Current,
}

impl State {
    /// Wire label used inside encoded atoms.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Old => "old",
            State::Current => "current",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "old" => Ok(State::Old),
            "current" => Ok(State::Current),
            other => Err(format!("unknown state '{other}'")),
        }
    }
}

/// A (test, worker, state) relation and whether it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned test.
    pub test: Test,
    /// Worker the test is bound to.
    pub worker: Worker,
    /// Epoch of the binding.
    pub state: State,
    /// Whether the relation holds in the solved model.
    pub value: bool,
}

impl Assignment {
    /// Creates a new assignment.
    pub fn new(test: Test, worker: Worker, state: State, value: bool) -> Self {
        Self {
            test,
            worker,
            state,
            value,
        }
    }

    /// Returns a copy relabeled to `state`.
    pub fn with_state(mut self, state: State) -> Self {
        self.state = state;
        self
    }

    /// Encoded atom name of this assignment.
    pub fn encode(&self) -> String {
        codec::encode_assignment(self)
    }

    /// Whether this assignment binds the same test and worker as `other`,
    /// regardless of epoch and value.
    pub fn same_binding(&self, other: &Assignment) -> bool {
        self.test.name == other.test.name && self.worker.same_identity(&other.worker)
    }
}
