//! Solver contract.
//!
//! The scheduler treats SAT solving as an injected capability: given a
//! [`Formula`], return a truth value for every atom in it, or report that
//! none exists. [`VarisatSolver`] is the bundled backend; tests and
//! callers may plug in anything else implementing [`Solver`].

mod varisat_backend;

pub use varisat_backend::VarisatSolver;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::formula::Formula;

/// A truth assignment keyed by atom name.
///
/// Ordered so decoding yields assignments in a stable order.
pub type Model = BTreeMap<String, bool>;

/// A SAT solver over named-atom formulas.
pub trait Solver {
    /// Solves `formula`.
    ///
    /// Returns `Ok(Some(model))` with a value for every atom of the
    /// formula when satisfiable, `Ok(None)` when unsatisfiable.
    ///
    /// # Errors
    /// [`crate::ScheduleError::Solver`] if the backend fails without a verdict.
    fn solve(&mut self, formula: &Formula) -> Result<Option<Model>>;

    /// Backend name, for logging.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn solve(&mut self, formula: &Formula) -> Result<Option<Model>> {
        (**self).solve(formula)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve(&mut self, formula: &Formula) -> Result<Option<Model>> {
        (**self).solve(formula)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
