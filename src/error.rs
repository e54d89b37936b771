//! Error types.

use std::num::ParseIntError;

use thiserror::Error;

use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// A string that does not follow the atom grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Wrong number of separator-delimited fields.
    #[error("malformed encoding '{input}': expected {expected} fields, found {found}")]
    FieldCount {
        input: String,
        expected: usize,
        found: usize,
    },

    /// A required field is absent.
    #[error("malformed encoding '{input}': missing {field}")]
    MissingField { input: String, field: &'static str },

    /// The worker instance is not a non-negative integer.
    #[error("malformed encoding '{input}': invalid instance")]
    InvalidInstance {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// The state field is not a known epoch label.
    #[error("malformed encoding '{input}': unknown state '{state}'")]
    UnknownState { input: String, state: String },
}

impl DecodeError {
    /// The offending input.
    pub fn input(&self) -> &str {
        match self {
            DecodeError::FieldCount { input, .. }
            | DecodeError::MissingField { input, .. }
            | DecodeError::InvalidInstance { input, .. }
            | DecodeError::UnknownState { input, .. } => input,
        }
    }
}

/// Scheduling failure.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// An encoded atom could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The solver proved that no assignment satisfies the constraints.
    #[error("no feasible schedule for {tests} test(s) on {workers} worker(s)")]
    NoFeasibleSchedule { tests: usize, workers: usize },

    /// The solver backend failed without reaching a verdict.
    #[error("solver failure: {0}")]
    Solver(String),

    /// Pre-flight input validation rejected the collections.
    #[error("invalid input: {}", summarize(.0))]
    InvalidInput(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    messages.join("; ")
}

impl ScheduleError {
    /// Whether this is the definitive "no valid assignment" outcome.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, ScheduleError::NoFeasibleSchedule { .. })
    }
}
