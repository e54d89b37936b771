//! `varisat` backend.
//!
//! The formula is constant-folded, Tseitin-encoded into CNF (one fresh
//! variable per AND/OR node) and handed to varisat. Atoms folded away by
//! simplification are reported as false.

use std::collections::BTreeMap;

use tracing::debug;
use varisat::{CnfFormula, ExtendFormula, Lit, Var};

use super::{Model, Solver};
use crate::error::{Result, ScheduleError};
use crate::formula::Formula;

/// CDCL solver backed by the `varisat` crate.
#[derive(Debug, Clone, Default)]
pub struct VarisatSolver {
    last_vars: usize,
    last_clauses: usize,
}

impl VarisatSolver {
    /// Creates a solver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of CNF variables in the last solved formula.
    pub fn last_var_count(&self) -> usize {
        self.last_vars
    }

    /// Number of CNF clauses in the last solved formula.
    pub fn last_clause_count(&self) -> usize {
        self.last_clauses
    }
}

impl Solver for VarisatSolver {
    fn solve(&mut self, formula: &Formula) -> Result<Option<Model>> {
        let atoms: Vec<String> = formula.atoms().into_iter().map(String::from).collect();

        let mut encoder = Tseitin::new();
        match formula.clone().simplify() {
            Formula::True => {
                self.last_vars = 0;
                self.last_clauses = 0;
                return Ok(Some(atoms.into_iter().map(|a| (a, false)).collect()));
            }
            Formula::False => {
                self.last_vars = 0;
                self.last_clauses = 0;
                return Ok(None);
            }
            simplified => {
                let root = encoder.encode(&simplified);
                encoder.cnf.add_clause(&[root]);
            }
        }

        self.last_vars = encoder.cnf.var_count();
        self.last_clauses = encoder.cnf.len();
        debug!(
            atoms = atoms.len(),
            vars = self.last_vars,
            clauses = self.last_clauses,
            "solving cnf"
        );

        let mut sat = varisat::Solver::new();
        sat.add_formula(&encoder.cnf);
        let satisfiable = sat
            .solve()
            .map_err(|err| ScheduleError::Solver(format!("{err:?}")))?;
        if !satisfiable {
            return Ok(None);
        }

        let lits = sat
            .model()
            .ok_or_else(|| ScheduleError::Solver("satisfiable but no model".into()))?;
        let mut values = vec![false; self.last_vars];
        for lit in lits {
            if let Some(slot) = values.get_mut(lit.var().index()) {
                *slot = lit.is_positive();
            }
        }

        let model = atoms
            .into_iter()
            .map(|atom| {
                let value = encoder
                    .atoms
                    .get(&atom)
                    .map(|var| values[var.index()])
                    .unwrap_or(false);
                (atom, value)
            })
            .collect();

        Ok(Some(model))
    }

    fn name(&self) -> &'static str {
        "varisat"
    }
}

struct Tseitin {
    cnf: CnfFormula,
    atoms: BTreeMap<String, Var>,
}

impl Tseitin {
    fn new() -> Self {
        Self {
            cnf: CnfFormula::new(),
            atoms: BTreeMap::new(),
        }
    }

    fn atom(&mut self, name: &str) -> Lit {
        if let Some(var) = self.atoms.get(name) {
            return var.positive();
        }
        let var = self.cnf.new_var();
        self.atoms.insert(name.to_string(), var);
        var.positive()
    }

    /// Returns a literal equivalent to `f`.
    fn encode(&mut self, f: &Formula) -> Lit {
        match f {
            Formula::Var(name) => self.atom(name),
            Formula::Not(inner) => !self.encode(inner),
            Formula::True => {
                let lit = self.cnf.new_lit();
                self.cnf.add_clause(&[lit]);
                lit
            }
            Formula::False => {
                let lit = self.cnf.new_lit();
                self.cnf.add_clause(&[!lit]);
                lit
            }
            Formula::And(subs) => {
                let lits: Vec<Lit> = subs.iter().map(|s| self.encode(s)).collect();
                let gate = self.cnf.new_lit();
                // gate -> l_i
                for &l in &lits {
                    self.cnf.add_clause(&[!gate, l]);
                }
                // (l_1 & .. & l_n) -> gate
                let mut clause: Vec<Lit> = lits.iter().map(|&l| !l).collect();
                clause.push(gate);
                self.cnf.add_clause(&clause);
                gate
            }
            Formula::Or(subs) => {
                let lits: Vec<Lit> = subs.iter().map(|s| self.encode(s)).collect();
                let gate = self.cnf.new_lit();
                // l_i -> gate
                for &l in &lits {
                    self.cnf.add_clause(&[gate, !l]);
                }
                // gate -> (l_1 | .. | l_n)
                let mut clause = lits;
                clause.push(!gate);
                self.cnf.add_clause(&clause);
                gate
            }
        }
    }
}
