//! Scheduling formula.
//!
//! [`Formula`] is a plain AND/OR/NOT tree over named atoms, the only thing
//! a [`crate::solver::Solver`] consumes. [`FormulaBuilder`] compiles the
//! domain collections into one.

mod builder;
mod expr;

pub use builder::FormulaBuilder;
pub use expr::Formula;
