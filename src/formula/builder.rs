//! Compiles worker/test collections into a scheduling formula.
//!
//! # Algorithm
//!
//! For each test `t`, every worker `w` that satisfies `t` contributes the
//! term
//!
//! ```text
//! w ∧ t ∧ state(t, running) ∧ (t,w,current) ∧ ¬(t,w,old)
//!   ∧ ⋀_{t2≠t} ¬(t2,w,current) ∧ ⋀_{w2≠w} ¬(t,w2,current)
//! ```
//!
//! The disjunction of these terms must hold for every test, so each test
//! lands on exactly one capable worker and that worker takes no other
//! current test. A test with no capable worker yields an empty disjunction and
//! makes the whole formula unsatisfiable.
//!
//! Prior assignments are relabeled `Old` and conjoined as unit facts.
//!
//! # Complexity
//! O(n · m · (n + m)) atoms where n = tests, m = workers.

use tracing::{debug, warn};

use super::Formula;
use crate::codec::{self, STATE_RUNNING};
use crate::models::{Assignment, State, TestCollection, WorkerCollection};

/// Builds the scheduling formula from borrowed collections.
///
/// # Example
/// ```
/// use sat_schedule::formula::FormulaBuilder;
/// use sat_schedule::models::{Test, TestCollection, Worker, WorkerCollection};
///
/// let workers = WorkerCollection::new().with_worker(Worker::new("w1").with_capability("x"));
/// let tests = TestCollection::new().with_test(Test::new("t1").with_capability("x"));
///
/// let formula = FormulaBuilder::new(&workers, &tests).build();
/// assert!(formula.atoms().contains("t1#x##@w1:0#x@current"));
/// ```
#[derive(Debug, Clone)]
pub struct FormulaBuilder<'a> {
    workers: &'a WorkerCollection,
    tests: &'a TestCollection,
    initial_state: &'a [Assignment],
    running_label: &'a str,
}

impl<'a> FormulaBuilder<'a> {
    /// Creates a builder without prior state.
    pub fn new(workers: &'a WorkerCollection, tests: &'a TestCollection) -> Self {
        Self {
            workers,
            tests,
            initial_state: &[],
            running_label: STATE_RUNNING,
        }
    }

    /// Sets the previously committed assignments.
    pub fn with_initial_state(mut self, initial_state: &'a [Assignment]) -> Self {
        self.initial_state = initial_state;
        self
    }

    /// Sets the label of the task-state atom.
    pub fn with_running_label(mut self, label: &'a str) -> Self {
        self.running_label = label;
        self
    }

    /// Builds the formula.
    pub fn build(&self) -> Formula {
        let mut conjuncts = Vec::with_capacity(self.tests.len() + self.initial_state.len());

        for test in self.tests.iter() {
            let terms: Vec<Formula> = self
                .workers
                .iter()
                .filter(|w| w.satisfies(test))
                .map(|worker| {
                    let mut term = vec![
                        Formula::var(codec::encode_worker(worker)),
                        Formula::var(codec::encode_test(test)),
                        Formula::var(codec::task_state_atom(test, self.running_label)),
                        Formula::var(codec::assignment_atom(test, worker, State::Current)),
                        Formula::not(Formula::var(codec::assignment_atom(
                            test,
                            worker,
                            State::Old,
                        ))),
                    ];

                    // Accepting `test` means rejecting every other test
                    for other in self.tests.iter().filter(|t2| t2.name != test.name) {
                        term.push(Formula::not(Formula::var(codec::assignment_atom(
                            other,
                            worker,
                            State::Current,
                        ))));
                    }

                    // ... and no other worker takes `test`
                    for other in self.workers.iter().filter(|w2| !w2.same_identity(worker)) {
                        term.push(Formula::not(Formula::var(codec::assignment_atom(
                            test,
                            other,
                            State::Current,
                        ))));
                    }

                    Formula::and(term)
                })
                .collect();

            if terms.is_empty() {
                warn!(test = %test.name, "no worker satisfies test");
            } else {
                debug!(test = %test.name, candidates = terms.len(), "encoded test");
            }

            conjuncts.push(Formula::or(terms));
        }

        for prior in self.initial_state {
            let atom = codec::assignment_atom(&prior.test, &prior.worker, State::Old);
            conjuncts.push(Formula::literal(atom, prior.value));
        }

        debug!(
            tests = self.tests.len(),
            workers = self.workers.len(),
            prior = self.initial_state.len(),
            "built scheduling formula"
        );

        Formula::and(conjuncts)
    }
}
