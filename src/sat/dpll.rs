//! Recursive DPLL. Each branch receives a full private copy of the formula
//! and assignment; on success the settled slots of the copy are merged back
//! into the parent's assignment and the copy is dropped.

use log::debug;

use super::assignment::Assignment;
use super::formula::{Formula, Journal};
use super::propagate::{Propagation, eliminate_pure, propagate, unit_propagate};
use super::{SolveError, SolveOptions, SolveStats};
use crate::cnf::cnf::Lit;

/// Unit propagation to fixpoint, then one pure-literal pass.
pub(crate) fn simplify<J: Journal>(
    formula: &mut Formula,
    assignment: &mut Assignment,
    journal: &mut J,
    options: &SolveOptions,
    stats: &mut SolveStats,
) -> Propagation {
    match unit_propagate(formula, assignment, journal, stats) {
        Propagation::Progress => {}
        done => return done,
    }
    if options.pure_literals {
        stats.pure_eliminations += eliminate_pure(formula, assignment, journal);
    }
    if formula.is_satisfied_fully() {
        Propagation::Satisfied
    } else {
        Propagation::Progress
    }
}

/// Commits `atom = value` as a decision at `depth` and propagates it.
pub(crate) fn decide<J: Journal>(
    formula: &mut Formula,
    assignment: &mut Assignment,
    journal: &mut J,
    atom: u32,
    value: bool,
    depth: usize,
    stats: &mut SolveStats,
) -> Propagation {
    debug!("decide atom={} value={} depth={}", atom, value, depth);
    stats.decisions += 1;
    stats.max_depth = stats.max_depth.max(depth);
    if assignment.set(atom, value) {
        journal.atom_assigned(atom);
    }
    stats.propagations += 1;
    let out = propagate(formula, assignment, Lit::new(atom, value), journal);
    if out == Propagation::Conflict {
        stats.conflicts += 1;
    }
    out
}

struct State {
    formula: Formula,
    assignment: Assignment,
}

impl State {
    fn try_clone(&self) -> Result<Self, SolveError> {
        Ok(Self {
            formula: self.formula.try_clone()?,
            assignment: self.assignment.try_clone()?,
        })
    }
}

struct Search<'a> {
    options: &'a SolveOptions,
    stats: &'a mut SolveStats,
}

impl Search<'_> {
    fn run(&mut self, state: &mut State, depth: usize) -> Result<bool, SolveError> {
        match simplify(
            &mut state.formula,
            &mut state.assignment,
            &mut (),
            self.options,
            self.stats,
        ) {
            Propagation::Conflict => return Ok(false),
            Propagation::Satisfied => return Ok(true),
            Propagation::Progress => {}
        }

        // every atom fixed yet clauses remain
        let Some(atom) = state.assignment.first_unassigned() else {
            return Ok(false);
        };

        for value in [true, false] {
            if self.branch(state, atom, value, depth + 1)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn branch(
        &mut self,
        state: &mut State,
        atom: u32,
        value: bool,
        depth: usize,
    ) -> Result<bool, SolveError> {
        let mut child = state.try_clone()?;
        let found = match decide(
            &mut child.formula,
            &mut child.assignment,
            &mut (),
            atom,
            value,
            depth,
            self.stats,
        ) {
            Propagation::Satisfied => true,
            Propagation::Conflict => false,
            Propagation::Progress => self.run(&mut child, depth)?,
        };
        if found {
            state.assignment.reconcile_from(&child.assignment);
        }
        Ok(found)
    }
}

/// Runs the search on an owned pair. Returns the settled assignment when the
/// formula is satisfiable.
pub(crate) fn search(
    formula: Formula,
    assignment: Assignment,
    options: &SolveOptions,
    stats: &mut SolveStats,
) -> Result<Option<Assignment>, SolveError> {
    let mut state = State {
        formula,
        assignment,
    };
    let mut search = Search { options, stats };
    if search.run(&mut state, 0)? {
        Ok(Some(state.assignment))
    } else {
        Ok(None)
    }
}
