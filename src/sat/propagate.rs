use log::trace;

use super::assignment::Assignment;
use super::formula::{Formula, Journal, Polarity};
use super::SolveStats;
use crate::cnf::cnf::Lit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Progress,
    Conflict,
    /// Every clause is retired.
    Satisfied,
}

/// Makes `lit` true: clauses containing it retire, clauses containing its
/// negation lose that literal. A slot already holding the opposite value, or
/// a clause losing its last literal, is a conflict.
pub fn propagate<J: Journal>(
    formula: &mut Formula,
    assignment: &mut Assignment,
    lit: Lit,
    journal: &mut J,
) -> Propagation {
    trace!("propagate {}", lit);
    match assignment.get(lit.var) {
        Some(v) if v != lit.sign => return Propagation::Conflict,
        Some(_) => {}
        None => {
            assignment.set(lit.var, lit.sign);
            journal.atom_assigned(lit.var);
        }
    }

    for row in 0..formula.num_clauses() {
        match formula.cell(row, lit.var) {
            None => {}
            Some(sign) if sign == lit.sign => formula.retire_with(row, journal),
            Some(_) => {
                if formula.clear_cell_with(row, lit.var, journal) {
                    trace!("clause {} falsified", row);
                    return Propagation::Conflict;
                }
            }
        }
    }

    if formula.is_satisfied_fully() {
        Propagation::Satisfied
    } else {
        Propagation::Progress
    }
}

/// Propagates unit clauses until none remain. The scan restarts from the
/// first clause after every step so the lowest-indexed unit always wins.
/// A formula already holding an empty clause reports, and counts, its
/// conflict again on every call.
pub fn unit_propagate<J: Journal>(
    formula: &mut Formula,
    assignment: &mut Assignment,
    journal: &mut J,
    stats: &mut SolveStats,
) -> Propagation {
    // only reachable from empty clauses in the input
    if formula.first_conflict().is_some() {
        stats.conflicts += 1;
        return Propagation::Conflict;
    }
    loop {
        if formula.is_satisfied_fully() {
            return Propagation::Satisfied;
        }
        let Some(lit) = formula.first_unit() else {
            return Propagation::Progress;
        };
        stats.propagations += 1;
        match propagate(formula, assignment, lit, journal) {
            Propagation::Progress => {}
            Propagation::Conflict => {
                stats.conflicts += 1;
                return Propagation::Conflict;
            }
            Propagation::Satisfied => return Propagation::Satisfied,
        }
    }
}

/// One pass in atom order. Each pure atom takes its polarity in the
/// assignment and every clause it occurs in is retired. Returns the number
/// of atoms eliminated.
pub fn eliminate_pure<J: Journal>(
    formula: &mut Formula,
    assignment: &mut Assignment,
    journal: &mut J,
) -> usize {
    let mut eliminated = 0usize;
    for atom in 1..=formula.num_atoms() as u32 {
        if !assignment.is_unassigned(atom) {
            continue;
        }
        let Polarity::Pure(sign) = formula.polarity(atom) else {
            continue;
        };
        trace!("pure literal {}", Lit::new(atom, sign));
        assignment.set(atom, sign);
        journal.atom_assigned(atom);
        for row in 0..formula.num_clauses() {
            if formula.cell(row, atom).is_some() {
                formula.retire_with(row, journal);
            }
        }
        eliminated += 1;
    }
    eliminated
}
