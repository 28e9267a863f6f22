pub mod assignment;
pub mod dpll;
pub mod formula;
pub mod propagate;
pub mod trail;

use std::collections::TryReserveError;

use log::debug;
use thiserror::Error;

use crate::cnf::cnf::{Cnf, Lit};
use assignment::Assignment;
use formula::Formula;

#[derive(Debug, Error)]
pub enum SolveError {
    /// Copying branch state failed to allocate. Never reported as unsatisfiable.
    #[error("out of memory while copying branch state: {0}")]
    ResourceExhausted(#[from] TryReserveError),

    #[error("clause {clause}: atom {atom} outside 1..={num_atoms}")]
    AtomOutOfRange {
        clause: usize,
        atom: u32,
        num_atoms: u32,
    },

    #[error("assignment covers {assignment} atoms but formula has {formula}")]
    DimensionMismatch { formula: usize, assignment: usize },

    #[error("initial assignment must be blank")]
    AssignmentNotBlank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Recursive search; every branch works on its own copy of the state.
    Clone,
    /// Iterative search over one state with an undo trail.
    #[default]
    Trail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptions {
    pub strategy: Strategy,
    pub pure_literals: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            pure_literals: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub decisions: usize,
    pub propagations: usize,
    pub conflicts: usize,
    pub pure_eliminations: usize,
    pub max_depth: usize,
}

/// A total assignment. Atoms the search left open are completed as false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    values: Vec<bool>,
}

impl Model {
    pub fn from_assignment(assignment: &Assignment) -> Self {
        let values = assignment
            .as_slice()
            .iter()
            .map(|v| v.unwrap_or(false))
            .collect();
        Self { values }
    }

    pub fn num_atoms(&self) -> usize {
        self.values.len() - 1
    }

    pub fn value(&self, atom: u32) -> bool {
        self.values.get(atom as usize).copied().unwrap_or(false)
    }

    /// Values indexed by atom; slot 0 is unused.
    pub fn values(&self) -> &[bool] {
        &self.values
    }

    pub fn literals(&self) -> Vec<Lit> {
        (1..self.values.len())
            .map(|i| Lit::new(i as u32, self.values[i]))
            .collect()
    }

    pub fn satisfies(&self, cnf: &Cnf) -> bool {
        cnf.eval(&self.values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Satisfiable(Model),
    Unsatisfiable,
}

impl Verdict {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Satisfiable(_))
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            Verdict::Satisfiable(m) => Some(m),
            Verdict::Unsatisfiable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub verdict: Verdict,
    pub stats: SolveStats,
}

/// Engine entry point. Takes ownership of the formula and a blank assignment
/// of matching size.
pub fn solve_with(
    formula: Formula,
    assignment: Assignment,
    options: &SolveOptions,
) -> Result<Report, SolveError> {
    if assignment.num_atoms() != formula.num_atoms() {
        return Err(SolveError::DimensionMismatch {
            formula: formula.num_atoms(),
            assignment: assignment.num_atoms(),
        });
    }
    if !assignment.is_blank() {
        return Err(SolveError::AssignmentNotBlank);
    }

    let mut stats = SolveStats::default();
    let settled = match options.strategy {
        Strategy::Clone => dpll::search(formula, assignment, options, &mut stats)?,
        Strategy::Trail => trail::search(formula, assignment, options, &mut stats),
    };
    debug!(
        "search finished: sat={} decisions={} propagations={} conflicts={}",
        settled.is_some(),
        stats.decisions,
        stats.propagations,
        stats.conflicts
    );

    let verdict = match settled {
        Some(assignment) => Verdict::Satisfiable(Model::from_assignment(&assignment)),
        None => Verdict::Unsatisfiable,
    };
    Ok(Report { verdict, stats })
}

pub fn solve_cnf(cnf: &Cnf, options: &SolveOptions) -> Result<Report, SolveError> {
    let formula = Formula::from_cnf(cnf)?;
    let assignment = Assignment::new(formula.num_atoms());
    solve_with(formula, assignment, options)
}

pub fn solve(cnf: &Cnf) -> Result<Verdict, SolveError> {
    Ok(solve_cnf(cnf, &SolveOptions::default())?.verdict)
}

pub fn is_sat(cnf: &Cnf) -> Result<bool, SolveError> {
    Ok(solve(cnf)?.is_sat())
}

pub fn solve_model(cnf: &Cnf) -> Result<Option<Model>, SolveError> {
    match solve(cnf)? {
        Verdict::Satisfiable(m) => Ok(Some(m)),
        Verdict::Unsatisfiable => Ok(None),
    }
}
