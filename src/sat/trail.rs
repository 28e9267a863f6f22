//! Iterative DPLL over a single state. Every cell cleared, clause retired and
//! atom assigned is logged; backtracking rewinds the log to the mark taken
//! when the decision was made. Decisions, propagation order and the returned
//! model match the recursive search exactly.

use super::assignment::Assignment;
use super::dpll::{decide, simplify};
use super::formula::{Formula, Journal};
use super::propagate::Propagation;
use super::{SolveOptions, SolveStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Undo {
    Cell { row: usize, atom: u32, sign: bool },
    Retired { row: usize },
    Assigned { atom: u32 },
}

#[derive(Debug, Default)]
pub struct Trail {
    entries: Vec<Undo>,
}

impl Journal for Trail {
    fn cell_cleared(&mut self, row: usize, atom: u32, sign: bool) {
        self.entries.push(Undo::Cell { row, atom, sign });
    }

    fn row_retired(&mut self, row: usize) {
        self.entries.push(Undo::Retired { row });
    }

    fn atom_assigned(&mut self, atom: u32) {
        self.entries.push(Undo::Assigned { atom });
    }
}

impl Trail {
    pub fn mark(&self) -> usize {
        self.entries.len()
    }

    /// Undoes every entry recorded after `mark`, newest first.
    pub fn rewind(&mut self, formula: &mut Formula, assignment: &mut Assignment, mark: usize) {
        for entry in self.entries.drain(mark..).rev() {
            match entry {
                Undo::Cell { row, atom, sign } => formula.restore_cell(row, atom, sign),
                Undo::Retired { row } => formula.unretire(row),
                Undo::Assigned { atom } => assignment.clear(atom),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    atom: u32,
    mark: usize,
    /// Value currently being tried; `true` is always tried first.
    value: bool,
}

pub(crate) fn search(
    mut formula: Formula,
    mut assignment: Assignment,
    options: &SolveOptions,
    stats: &mut SolveStats,
) -> Option<Assignment> {
    let mut trail = Trail::default();
    let mut frames = Vec::<Frame>::new();

    loop {
        let simplified = simplify(&mut formula, &mut assignment, &mut trail, options, stats);
        let mut advanced = match simplified {
            Propagation::Satisfied => return Some(assignment),
            Propagation::Conflict => false,
            Propagation::Progress => match assignment.first_unassigned() {
                None => false,
                Some(atom) => {
                    frames.push(Frame {
                        atom,
                        mark: trail.mark(),
                        value: true,
                    });
                    let depth = frames.len();
                    match decide(
                        &mut formula,
                        &mut assignment,
                        &mut trail,
                        atom,
                        true,
                        depth,
                        stats,
                    ) {
                        Propagation::Satisfied => return Some(assignment),
                        Propagation::Conflict => false,
                        Propagation::Progress => true,
                    }
                }
            },
        };

        // backtrack to the newest decision whose false branch is untried
        while !advanced {
            // no decision left to flip: unsatisfiable
            let frame = frames.last_mut()?;
            trail.rewind(&mut formula, &mut assignment, frame.mark);
            if !frame.value {
                frames.pop();
                continue;
            }
            frame.value = false;
            let atom = frame.atom;
            let depth = frames.len();
            advanced = match decide(
                &mut formula,
                &mut assignment,
                &mut trail,
                atom,
                false,
                depth,
                stats,
            ) {
                Propagation::Satisfied => return Some(assignment),
                Propagation::Conflict => false,
                Propagation::Progress => true,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Trail;
    use crate::cnf::cnf::{Cnf, Lit};
    use crate::sat::assignment::Assignment;
    use crate::sat::formula::Formula;
    use crate::sat::propagate::{Propagation, eliminate_pure, propagate};

    #[test]
    fn rewind_restores_formula_and_assignment() {
        let mut cnf = Cnf::new(3);
        cnf.add_clause(vec![Lit::new(1, true), Lit::new(2, true)]);
        cnf.add_clause(vec![Lit::new(1, false), Lit::new(3, true)]);
        cnf.add_clause(vec![Lit::new(2, false), Lit::new(3, false)]);
        let mut formula = Formula::from_cnf(&cnf).expect("build");
        let mut assignment = Assignment::new(3);
        let before = (formula.clone(), assignment.clone());

        let mut trail = Trail::default();
        let mark = trail.mark();
        let out = propagate(&mut formula, &mut assignment, Lit::new(1, false), &mut trail);
        assert_eq!(out, Propagation::Progress);
        eliminate_pure(&mut formula, &mut assignment, &mut trail);
        assert_ne!(formula, before.0);

        trail.rewind(&mut formula, &mut assignment, mark);
        assert_eq!(trail.mark(), mark);
        assert_eq!(formula, before.0);
        assert_eq!(assignment, before.1);
    }

    #[test]
    fn rewind_after_conflict() {
        let mut cnf = Cnf::new(2);
        cnf.add_clause(vec![Lit::new(1, true), Lit::new(2, true)]);
        cnf.add_clause(vec![Lit::new(1, true)]);
        let mut formula = Formula::from_cnf(&cnf).expect("build");
        let mut assignment = Assignment::new(2);
        let before = formula.clone();

        let mut trail = Trail::default();
        let out = propagate(&mut formula, &mut assignment, Lit::new(1, false), &mut trail);
        assert_eq!(out, Propagation::Conflict);
        trail.rewind(&mut formula, &mut assignment, 0);
        assert_eq!(formula, before);
        assert!(assignment.is_blank());
    }
}
