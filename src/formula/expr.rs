//! Boolean formula over named atoms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::solver::Model;

/// A Boolean formula built from named atoms with AND, OR and NOT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formula {
    /// Constant true.
    True,
    /// Constant false.
    False,
    /// Named atom.
    Var(String),
    /// Negation.
    Not(Box<Formula>),
    /// Conjunction. Empty is true.
    And(Vec<Formula>),
    /// Disjunction. Empty is false.
    Or(Vec<Formula>),
}

impl Formula {
    /// Atom named `name`.
    pub fn var(name: impl Into<String>) -> Self {
        Formula::Var(name.into())
    }

    /// Negation of `f`.
    #[allow(clippy::should_implement_trait)]
    pub fn not(f: Formula) -> Self {
        Formula::Not(Box::new(f))
    }

    /// Conjunction of `subs`.
    pub fn and(subs: Vec<Formula>) -> Self {
        Formula::And(subs)
    }

    /// Disjunction of `subs`.
    pub fn or(subs: Vec<Formula>) -> Self {
        Formula::Or(subs)
    }

    /// Atom asserted with `value`: the atom itself or its negation.
    pub fn literal(name: impl Into<String>, value: bool) -> Self {
        if value {
            Formula::var(name)
        } else {
            Formula::not(Formula::var(name))
        }
    }

    /// Names of all atoms appearing in the formula, sorted.
    pub fn atoms(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Formula::True | Formula::False => {}
            Formula::Var(name) => {
                out.insert(name.as_str());
            }
            Formula::Not(f) => f.collect_atoms(out),
            Formula::And(subs) | Formula::Or(subs) => {
                for s in subs {
                    s.collect_atoms(out);
                }
            }
        }
    }

    /// Evaluates the formula under `model`. Missing atoms count as false.
    pub fn eval(&self, model: &Model) -> bool {
        match self {
            Formula::True => true,
            Formula::False => false,
            Formula::Var(name) => model.get(name).copied().unwrap_or(false),
            Formula::Not(f) => !f.eval(model),
            Formula::And(subs) => subs.iter().all(|s| s.eval(model)),
            Formula::Or(subs) => subs.iter().any(|s| s.eval(model)),
        }
    }

    /// Folds constants, removes double negation and flattens nested
    /// conjunctions and disjunctions.
    ///
    /// The result is `True`, `False`, or a formula free of constants.
    pub fn simplify(self) -> Formula {
        match self {
            Formula::True | Formula::False | Formula::Var(_) => self,
            Formula::Not(f) => match f.simplify() {
                Formula::True => Formula::False,
                Formula::False => Formula::True,
                Formula::Not(inner) => *inner,
                other => Formula::not(other),
            },
            Formula::And(subs) => {
                let mut flat = Vec::with_capacity(subs.len());
                for s in subs {
                    match s.simplify() {
                        Formula::True => {}
                        Formula::False => return Formula::False,
                        Formula::And(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                match flat.len() {
                    0 => Formula::True,
                    1 => flat.pop().unwrap_or(Formula::True),
                    _ => Formula::And(flat),
                }
            }
            Formula::Or(subs) => {
                let mut flat = Vec::with_capacity(subs.len());
                for s in subs {
                    match s.simplify() {
                        Formula::False => {}
                        Formula::True => return Formula::True,
                        Formula::Or(inner) => flat.extend(inner),
                        other => flat.push(other),
                    }
                }
                match flat.len() {
                    0 => Formula::False,
                    1 => flat.pop().unwrap_or(Formula::False),
                    _ => Formula::Or(flat),
                }
            }
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, op: &str, subs: &[Formula]) -> fmt::Result {
            write!(f, "{op}(")?;
            for (i, s) in subs.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{s}")?;
            }
            f.write_str(")")
        }

        match self {
            Formula::True => f.write_str("⊤"),
            Formula::False => f.write_str("⊥"),
            Formula::Var(name) => write!(f, "\"{name}\""),
            Formula::Not(inner) => write!(f, "not({inner})"),
            Formula::And(subs) => list(f, "and", subs),
            Formula::Or(subs) => list(f, "or", subs),
        }
    }
}
