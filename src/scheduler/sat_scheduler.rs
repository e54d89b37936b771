//! SAT-driven scheduler.
//!
//! # Algorithm
//!
//! 1. Optionally validate the collections.
//! 2. Compile workers, tests and the prior state into a [`Formula`].
//! 3. Hand the formula to the injected [`Solver`].
//! 4. Decode the `Current` assignments of the returned model.
//!
//! An unsatisfiable formula is the definitive "no valid assignment"
//! outcome and is reported as [`ScheduleError::NoFeasibleSchedule`].

use tracing::{debug, info};

use crate::codec;
use crate::config::SchedulerConfig;
use crate::error::{Result, ScheduleError};
use crate::formula::{Formula, FormulaBuilder};
use crate::models::{Assignment, TestCollection, WorkerCollection};
use crate::solver::{Model, Solver, VarisatSolver};
use crate::validation::validate_input;

/// A solved model together with the formula it satisfies.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Truth value of every atom in `formula`.
    pub model: Model,
    /// The formula that was solved.
    pub formula: Formula,
}

impl Solution {
    /// Decoded `Current` assignments of the model.
    pub fn assignments(&self) -> Vec<Assignment> {
        codec::decode_model(&self.model)
    }
}

/// Assigns tests to workers by solving a SAT formula.
///
/// The scheduler owns one round's collections and the assignments
/// committed by the previous round. Calls are synchronous; a scheduler is
/// not meant to be shared across threads while a round is in flight.
///
/// # Example
///
/// ```
/// use sat_schedule::models::{Test, TestCollection, Worker, WorkerCollection};
/// use sat_schedule::scheduler::Scheduler;
///
/// let mut workers = WorkerCollection::new();
/// workers.new_worker("mudler").add_capability("developer");
/// workers.new_worker("mudler_away");
///
/// let mut tests = TestCollection::new();
/// tests.new_test("lunch").add_capability("developer");
///
/// let mut scheduler = Scheduler::new(workers, tests);
/// let assignments = scheduler.schedule_decode().unwrap();
///
/// let bound: Vec<_> = assignments.iter().filter(|a| a.value).collect();
/// assert_eq!(bound.len(), 1);
/// assert_eq!(bound[0].worker.name, "mudler");
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler<S = VarisatSolver> {
    workers: WorkerCollection,
    tests: TestCollection,
    initial_state: Vec<Assignment>,
    config: SchedulerConfig,
    solver: S,
}

impl Scheduler<VarisatSolver> {
    /// Creates a scheduler using the bundled varisat backend.
    pub fn new(workers: WorkerCollection, tests: TestCollection) -> Self {
        Self::with_solver(workers, tests, VarisatSolver::new())
    }
}

impl<S: Solver> Scheduler<S> {
    /// Creates a scheduler with a custom solver.
    pub fn with_solver(workers: WorkerCollection, tests: TestCollection, solver: S) -> Self {
        Self {
            workers,
            tests,
            initial_state: Vec::new(),
            config: SchedulerConfig::default(),
            solver,
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the assignments committed by the previous round.
    pub fn with_initial_state(mut self, initial_state: Vec<Assignment>) -> Self {
        self.initial_state = initial_state;
        self
    }

    /// Replaces the assignments committed by the previous round.
    ///
    /// Pass the output of [`Scheduler::schedule_decode`] to advance one round.
    pub fn set_initial_state(&mut self, initial_state: Vec<Assignment>) {
        self.initial_state = initial_state;
    }

    /// Prior-round assignments.
    pub fn initial_state(&self) -> &[Assignment] {
        &self.initial_state
    }

    /// Workers of this round.
    pub fn workers(&self) -> &WorkerCollection {
        &self.workers
    }

    /// Mutable access to the workers of this round.
    pub fn workers_mut(&mut self) -> &mut WorkerCollection {
        &mut self.workers
    }

    /// Tests of this round.
    pub fn tests(&self) -> &TestCollection {
        &self.tests
    }

    /// Mutable access to the tests of this round.
    pub fn tests_mut(&mut self) -> &mut TestCollection {
        &mut self.tests
    }

    /// Active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Builds the scheduling formula for the current collections and prior state.
    pub fn build_formula(&self) -> Formula {
        FormulaBuilder::new(&self.workers, &self.tests)
            .with_initial_state(&self.initial_state)
            .with_running_label(&self.config.running_label)
            .build()
    }

    /// Solves `formula` with the injected solver.
    ///
    /// # Errors
    /// [`ScheduleError::NoFeasibleSchedule`] if the formula is unsatisfiable;
    /// solver failures are propagated.
    pub fn solve(&mut self, formula: &Formula) -> Result<Model> {
        debug!(solver = self.solver.name(), "invoking solver");
        self.solver
            .solve(formula)?
            .ok_or(ScheduleError::NoFeasibleSchedule {
                tests: self.tests.len(),
                workers: self.workers.len(),
            })
    }

    /// Builds and solves the formula.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidInput`] if validation is enabled and fails,
    /// otherwise see [`Scheduler::solve`].
    pub fn schedule(&mut self) -> Result<Solution> {
        if self.config.validate_input {
            validate_input(&self.workers, &self.tests).map_err(ScheduleError::InvalidInput)?;
        }

        let formula = self.build_formula();
        let model = self.solve(&formula)?;
        Ok(Solution { model, formula })
    }

    /// Schedules and decodes the `Current` assignments.
    ///
    /// Every returned assignment carries its solved truth value; bound
    /// tests are those with `value == true`.
    pub fn schedule_decode(&mut self) -> Result<Vec<Assignment>> {
        let assignments = self.schedule()?.assignments();
        info!(
            tests = self.tests.len(),
            bound = assignments.iter().filter(|a| a.value).count(),
            "schedule solved"
        );
        Ok(assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{State, Test, Worker};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn bound(assignments: &[Assignment]) -> Vec<&Assignment> {
        assignments.iter().filter(|a| a.value).collect()
    }

    fn developer_workers() -> WorkerCollection {
        let mut workers = WorkerCollection::new();
        workers.new_worker("mudler").add_capability("developer");
        workers.new_worker("mudler_away");
        workers
    }

    #[test]
    fn test_schedule_single_capable_worker() {
        let mut tests = TestCollection::new();
        tests.new_test("lunch").add_capability("developer");

        let mut s = Scheduler::new(developer_workers(), tests);
        let solution = s.schedule().unwrap();
        assert!(solution.formula.eval(&solution.model));

        let ass = s.schedule_decode().unwrap();
        assert!(!ass.is_empty(), "no new assignment");
        assert!(ass.iter().all(|a| a.state == State::Current));
        for a in &ass {
            if a.worker.name == "mudler" {
                assert!(a.value, "lunch should run on mudler");
            } else {
                assert!(!a.value, "unexpected binding {}", a.encode());
            }
        }
    }

    #[test]
    fn test_competing_tests_are_infeasible() {
        // Both tests need the only developer; exclusivity forbids double-booking
        let mut tests = TestCollection::new();
        tests.new_test("lunch").add_capability("developer");
        tests.new_test("hiking").add_capability("developer");

        let err = Scheduler::new(developer_workers(), tests)
            .schedule_decode()
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::NoFeasibleSchedule { tests: 2, workers: 2 }
        ));
    }

    #[test]
    fn test_no_workers_is_infeasible() {
        let tests = TestCollection::new().with_test(Test::new("lunch"));
        let err = Scheduler::new(WorkerCollection::new(), tests)
            .schedule_decode()
            .unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn test_test_without_requirements_is_infeasible() {
        let mut tests = TestCollection::new();
        tests.new_test("lunch").add_capability("developer");
        tests.new_test("hiking");

        let err = Scheduler::new(developer_workers(), tests)
            .schedule_decode()
            .unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn test_two_tests_two_workers() {
        let workers = WorkerCollection::new()
            .with_worker(
                Worker::new("worker1")
                    .with_instance(1)
                    .with_capability("qemu64")
                    .with_capability("qemu32"),
            )
            .with_worker(
                Worker::new("worker3")
                    .with_instance(1)
                    .with_capability("qemu32"),
            );
        let tests = TestCollection::new()
            .with_test(Test::new("t1").with_capability("qemu64"))
            .with_test(Test::new("t3").with_capability("qemu32"));

        let ass = Scheduler::new(workers, tests).schedule_decode().unwrap();
        let bound = bound(&ass);
        assert_eq!(bound.len(), 2);

        // t1 can only run on worker1, which pushes t3 onto worker3
        let t1 = bound.iter().find(|a| a.test.name == "t1").unwrap();
        let t3 = bound.iter().find(|a| a.test.name == "t3").unwrap();
        assert_eq!(t1.worker.name, "worker1");
        assert_eq!(t3.worker.name, "worker3");
    }

    #[test]
    fn test_initial_state_locks_only_worker() {
        let mut tests = TestCollection::new();
        tests.new_test("lunch").add_capability("developer");

        let mut s = Scheduler::new(developer_workers(), tests);
        let ass = s.schedule_decode().unwrap();

        // The only capable worker is locked by the committed binding
        s.set_initial_state(ass);
        let err = s.schedule_decode().unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn test_rounds_through_accessors() {
        let mut s = Scheduler::new(WorkerCollection::new(), TestCollection::new())
            .with_config(SchedulerConfig::new().with_validation(true));
        assert!(s.config().validate_input);
        assert!(s.initial_state().is_empty());

        s.workers_mut().new_worker("w1").add_capability("developer");
        s.workers_mut().new_worker("w2").add_capability("developer");
        s.tests_mut().new_test("t1").add_capability("developer");
        assert_eq!(s.workers().len(), 2);
        assert_eq!(s.tests().len(), 1);

        let first = s.schedule_decode().unwrap();
        s.set_initial_state(first.clone());
        assert_eq!(s.initial_state(), first.as_slice());

        let first_worker = bound(&first)[0].worker.name.clone();

        // Adding a test mid-round is picked up by the next solve
        s.tests_mut().new_test("t2").add_capability("developer");
        let second = s.schedule_decode().unwrap();
        let second = bound(&second);
        assert_eq!(second.len(), 2);

        // t1 leaves its committed worker, t2 takes it
        let t1 = second.iter().find(|a| a.test.name == "t1").unwrap();
        let t2 = second.iter().find(|a| a.test.name == "t2").unwrap();
        assert_ne!(t1.worker.name, first_worker);
        assert_eq!(t2.worker.name, first_worker);
    }

    #[test]
    fn test_initial_state_rebinds_elsewhere() {
        let workers = WorkerCollection::new()
            .with_worker(Worker::new("w1").with_capability("developer"))
            .with_worker(Worker::new("w2").with_capability("developer"));
        let tests = TestCollection::new().with_test(Test::new("t1").with_capability("developer"));

        let mut s = Scheduler::new(workers, tests);
        let first = s.schedule_decode().unwrap();
        let first_bound = bound(&first);
        assert_eq!(first_bound.len(), 1);
        let previous = first_bound[0].worker.name.clone();

        s.set_initial_state(first.clone());
        let solution = s.schedule().unwrap();

        // The committed pairing is an old axiom in the model ...
        let old_atom = first_bound[0].clone().with_state(State::Old).encode();
        assert_eq!(solution.model.get(&old_atom), Some(&true));

        // ... and never surfaces in the decoded result
        let second = solution.assignments();
        assert!(second.iter().all(|a| a.state == State::Current));
        let second_bound = bound(&second);
        assert_eq!(second_bound.len(), 1);
        assert_ne!(second_bound[0].worker.name, previous);
    }

    #[test]
    fn test_validation_rejects_reserved_names() {
        let workers = WorkerCollection::new().with_worker(Worker::new("w@1").with_capability("x"));
        let tests = TestCollection::new().with_test(Test::new("t1").with_capability("x"));

        let mut s = Scheduler::new(workers, tests)
            .with_config(SchedulerConfig::new().with_validation(true));
        assert!(matches!(s.schedule(), Err(ScheduleError::InvalidInput(_))));
    }

    #[test]
    fn test_running_label_from_config() {
        let workers = WorkerCollection::new().with_worker(Worker::new("w1").with_capability("x"));
        let tests = TestCollection::new().with_test(Test::new("t1").with_capability("x"));

        let mut s = Scheduler::new(workers, tests)
            .with_config(SchedulerConfig::new().with_running_label("busy"));
        let solution = s.schedule().unwrap();
        assert_eq!(solution.model.get("t1#x##!busy"), Some(&true));
    }

    // Stub backends

    struct CannedSolver(Option<Model>);

    impl Solver for CannedSolver {
        fn solve(&mut self, _formula: &Formula) -> Result<Option<Model>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSolver;

    impl Solver for FailingSolver {
        fn solve(&mut self, _formula: &Formula) -> Result<Option<Model>> {
            Err(ScheduleError::Solver("interrupted".into()))
        }
    }

    fn lunch_pair() -> (WorkerCollection, TestCollection) {
        let workers =
            WorkerCollection::new().with_worker(Worker::new("mudler").with_capability("developer"));
        let tests =
            TestCollection::new().with_test(Test::new("lunch").with_capability("developer"));
        (workers, tests)
    }

    #[test]
    fn test_stub_solver_model_is_decoded() {
        let (workers, tests) = lunch_pair();
        let model = Model::from([
            ("lunch#developer##@mudler:0#developer@current".to_string(), true),
            ("lunch#developer##@mudler:0#developer@old".to_string(), true),
            ("mudler:0#developer".to_string(), true),
            ("lunch#developer##!running".to_string(), true),
        ]);

        let mut s = Scheduler::with_solver(workers, tests, CannedSolver(Some(model)));
        let ass = s.schedule_decode().unwrap();
        assert_eq!(ass.len(), 1);
        assert_eq!(ass[0].state, State::Current);
        assert!(ass[0].value);
    }

    #[test]
    fn test_stub_solver_unsat() {
        let (workers, tests) = lunch_pair();
        let mut s = Scheduler::with_solver(workers, tests, CannedSolver(None));
        assert!(s.schedule_decode().unwrap_err().is_infeasible());
    }

    #[test]
    fn test_solver_failure_propagates() {
        let (workers, tests) = lunch_pair();
        let mut s = Scheduler::with_solver(workers, tests, FailingSolver);
        assert!(matches!(s.schedule(), Err(ScheduleError::Solver(_))));
    }

    #[test]
    fn test_boxed_solver() {
        let (workers, tests) = lunch_pair();
        let solver: Box<dyn Solver> = Box::new(VarisatSolver::new());
        let mut s = Scheduler::with_solver(workers, tests, solver);
        assert_eq!(bound(&s.schedule_decode().unwrap()).len(), 1);
    }

    // Randomized invariants

    const CAPS: [&str; 3] = ["a", "b", "c"];

    fn random_round(rng: &mut StdRng) -> (WorkerCollection, TestCollection) {
        let mut workers = WorkerCollection::new();
        for i in 0..rng.random_range(0..=4usize) {
            let w = workers.new_worker(format!("w{i}"));
            for cap in CAPS {
                if rng.random_bool(0.4) {
                    w.add_capability(cap);
                }
            }
        }

        let mut tests = TestCollection::new();
        for i in 0..rng.random_range(1..=4usize) {
            let t = tests.new_test(format!("t{i}"));
            for cap in CAPS {
                if rng.random_bool(0.4) {
                    t.add_capability(cap);
                }
            }
        }
        (workers, tests)
    }

    /// Whether tests can be matched to distinct capable workers.
    fn has_matching(tests: &[Test], workers: &[Worker], used: &mut Vec<bool>) -> bool {
        let Some((first, rest)) = tests.split_first() else {
            return true;
        };
        for (i, w) in workers.iter().enumerate() {
            if !used[i] && w.satisfies(first) {
                used[i] = true;
                let ok = has_matching(rest, workers, used);
                used[i] = false;
                if ok {
                    return true;
                }
            }
        }
        false
    }

    #[test]
    fn test_random_rounds_respect_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let (workers, tests) = random_round(&mut rng);
            let feasible = has_matching(
                &tests.tests,
                &workers.workers,
                &mut vec![false; workers.len()],
            );

            let result = Scheduler::new(workers.clone(), tests.clone()).schedule_decode();
            let ass = match result {
                Ok(ass) => ass,
                Err(err) => {
                    assert!(err.is_infeasible());
                    assert!(!feasible, "solver missed a valid matching");
                    continue;
                }
            };
            assert!(feasible, "solver found an impossible matching");

            let bound = bound(&ass);
            for t in tests.iter() {
                let on: Vec<_> = bound.iter().filter(|a| a.test.name == t.name).collect();
                assert_eq!(on.len(), 1, "test {} bound {} times", t.name, on.len());
                assert!(on[0].worker.satisfies(t));
            }
            for w in workers.iter() {
                let load = bound.iter().filter(|a| a.worker.same_identity(w)).count();
                assert!(load <= 1, "worker {} holds {load} tests", w.name);
            }
        }
    }
}
