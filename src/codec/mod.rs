//! Atom codec.
//!
//! Encodes workers, tests, assignments and task states into flat strings
//! used as SAT atom names, and decodes them back. The strings double as a
//! human-readable wire format, so the grammar is fixed:
//!
//! | Entity | Grammar |
//! |--------|---------|
//! | Worker | `name:instance#cap1,cap2` |
//! | Test | `name#cap1,cap2#parent#par1,par2` |
//! | Assignment | `test@worker@state` |
//! | Task state | `test!label` |
//!
//! Names must not contain any separator character. The codec does not
//! check this; see [`crate::validation`].
//!
//! # Example
//!
//! ```
//! use sat_schedule::codec;
//! use sat_schedule::models::{Assignment, State, Test, Worker};
//!
//! let a = Assignment::new(
//!     Test::new("lunch").with_capability("developer"),
//!     Worker::new("mudler").with_capability("developer"),
//!     State::Current,
//!     true,
//! );
//! assert_eq!(a.encode(), "lunch#developer##@mudler:0#developer@current");
//!
//! let back = codec::decode_assignment(&a.encode()).unwrap();
//! assert_eq!(back.test.name, "lunch");
//! ```

use tracing::trace;

use crate::error::DecodeError;
use crate::models::{Assignment, State, Test, Worker};
use crate::solver::Model;

/// Separates test, worker and state in an assignment atom.
pub const ASSIGN_SEP: char = '@';
/// Separates a test from its state label in a task-state atom.
pub const STATE_SEP: char = '!';
/// Separates a worker's name/instance block from its capabilities.
pub const WORKER_SEP: char = '#';
/// Separates a worker's name from its instance number.
pub const WORKER_INST_SEP: char = ':';
/// Separates capability classes.
pub const CLASS_SEP: char = ',';
/// Separates the fields of a test.
pub const TEST_SEP: char = '#';
/// Separates tests of a parallel group.
pub const PARALLEL_SEP: char = ',';

/// All characters reserved by the grammar.
pub const RESERVED: [char; 5] = [ASSIGN_SEP, STATE_SEP, WORKER_SEP, WORKER_INST_SEP, CLASS_SEP];

/// Label of the task-state atom asserted for every scheduled test.
pub const STATE_RUNNING: &str = "running";

const TEST_FIELDS: usize = 4;
const ASSIGNMENT_FIELDS: usize = 3;

/// Encodes a worker as `name:instance#cap1,cap2`.
pub fn encode_worker(worker: &Worker) -> String {
    format!(
        "{}{}{}{}{}",
        worker.name,
        WORKER_INST_SEP,
        worker.instance,
        WORKER_SEP,
        join(&worker.capabilities, CLASS_SEP)
    )
}

/// Encodes a test as `name#caps#parent#parallel`.
pub fn encode_test(test: &Test) -> String {
    format!(
        "{}{sep}{}{sep}{}{sep}{}",
        test.name,
        join(&test.required_capabilities, CLASS_SEP),
        test.parent.as_deref().unwrap_or(""),
        join(&test.parallel, PARALLEL_SEP),
        sep = TEST_SEP
    )
}

/// Encodes an assignment as `test@worker@state`.
pub fn encode_assignment(assignment: &Assignment) -> String {
    assignment_atom(&assignment.test, &assignment.worker, assignment.state)
}

/// Atom name for "`test` is bound to `worker` in epoch `state`".
pub fn assignment_atom(test: &Test, worker: &Worker, state: State) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        encode_test(test),
        encode_worker(worker),
        state.as_str(),
        sep = ASSIGN_SEP
    )
}

/// Atom name for "`test` is in task state `label`".
pub fn task_state_atom(test: &Test, label: &str) -> String {
    format!("{}{}{}", encode_test(test), STATE_SEP, label)
}

/// Decodes a worker from `name:instance#cap1,cap2`.
///
/// # Errors
/// [`DecodeError`] if either separator is missing or the instance is not
/// a non-negative integer.
pub fn decode_worker(s: &str) -> Result<Worker, DecodeError> {
    let (name_instance, classes) =
        s.split_once(WORKER_SEP)
            .ok_or_else(|| DecodeError::MissingField {
                input: s.to_string(),
                field: "capabilities",
            })?;

    let (name, instance) =
        name_instance
            .split_once(WORKER_INST_SEP)
            .ok_or_else(|| DecodeError::MissingField {
                input: s.to_string(),
                field: "instance",
            })?;

    let instance = instance
        .parse::<u32>()
        .map_err(|source| DecodeError::InvalidInstance {
            input: s.to_string(),
            source,
        })?;

    Ok(Worker {
        name: name.to_string(),
        instance,
        capabilities: split(classes, CLASS_SEP),
    })
}

/// Decodes a test from `name#caps#parent#parallel`.
///
/// A string without the full four-field form decodes to a test carrying
/// only its name; this short form is valid.
pub fn decode_test(s: &str) -> Test {
    let fields: Vec<&str> = s.split(TEST_SEP).collect();
    let mut test = Test::new(fields[0]);

    if fields.len() >= TEST_FIELDS {
        test.required_capabilities = split(fields[1], CLASS_SEP);
        test.parent = (!fields[2].is_empty()).then(|| fields[2].to_string());
        test.parallel = split(fields[3], PARALLEL_SEP);
    }

    test
}

/// Decodes an assignment from `test@worker@state`.
///
/// The result always has `value = true`; [`decode_model`] overwrites it
/// from the solved truth table.
///
/// # Errors
/// [`DecodeError`] unless the string has exactly three fields with a
/// decodable worker and a known state.
pub fn decode_assignment(s: &str) -> Result<Assignment, DecodeError> {
    let fields: Vec<&str> = s.split(ASSIGN_SEP).collect();
    if fields.len() != ASSIGNMENT_FIELDS {
        return Err(DecodeError::FieldCount {
            input: s.to_string(),
            expected: ASSIGNMENT_FIELDS,
            found: fields.len(),
        });
    }

    let test = decode_test(fields[0]);
    let worker = decode_worker(fields[1])?;
    let state = fields[2]
        .parse::<State>()
        .map_err(|_| DecodeError::UnknownState {
            input: s.to_string(),
            state: fields[2].to_string(),
        })?;

    Ok(Assignment::new(test, worker, state, true))
}

/// Decodes the `Current` assignments of a solved model.
///
/// Atoms that are not assignments (worker, test and task-state atoms)
/// are skipped. `Old` assignments are the committed schedule the model
/// was solved against and are excluded as well.
pub fn decode_model(model: &Model) -> Vec<Assignment> {
    let mut assignments = Vec::new();

    for (atom, &value) in model {
        match decode_assignment(atom) {
            Ok(mut a) => {
                if a.state == State::Current {
                    a.value = value;
                    assignments.push(a);
                }
            }
            Err(err) => trace!(atom = %atom, error = %err, "skipping auxiliary atom"),
        }
    }

    assignments
}

/// Stateless decoder, for callers that prefer a value to free functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Decoder {
    /// Creates a decoder.
    pub fn new() -> Self {
        Self
    }

    /// See [`decode_assignment`].
    pub fn decode_assignment(&self, s: &str) -> Result<Assignment, DecodeError> {
        decode_assignment(s)
    }

    /// See [`decode_model`].
    pub fn decode_model(&self, model: &Model) -> Vec<Assignment> {
        decode_model(model)
    }
}

fn join(items: &[String], sep: char) -> String {
    let mut buf = [0u8; 4];
    items.join(sep.encode_utf8(&mut buf))
}

fn split(s: &str, sep: char) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(sep).map(str::to_string).collect()
}
