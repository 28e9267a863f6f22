//! Clause × atom matrix with a live-clause counter.
//!
//! Each row is a clause, each column an atom. A cell is `None` when the atom
//! does not (or no longer) occur in the clause, otherwise it holds the sign of
//! the occurrence. A row is retired once it is known satisfied; retired rows
//! are all `None` and no longer counted as live. A live row whose cells are
//! all `None` is a conflict.

use std::collections::TryReserveError;

use crate::cnf::cnf::{Cnf, Lit};
use crate::sat::SolveError;

/// Receives every mutation made to a formula or assignment so it can be undone.
pub trait Journal {
    fn cell_cleared(&mut self, row: usize, atom: u32, sign: bool);
    fn row_retired(&mut self, row: usize);
    fn atom_assigned(&mut self, atom: u32);
}

/// Mutations are not recorded. Used where branches own a private copy.
impl Journal for () {
    fn cell_cleared(&mut self, _row: usize, _atom: u32, _sign: bool) {}
    fn row_retired(&mut self, _row: usize) {}
    fn atom_assigned(&mut self, _atom: u32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Absent,
    Pure(bool),
    Mixed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    num_atoms: usize,
    cells: Vec<Option<bool>>,
    width: Vec<u32>,
    retired: Vec<bool>,
    live: usize,
}

impl Formula {
    /// Builds the matrix. Repeated literals fold into one cell; a clause with
    /// both polarities of an atom is retired immediately and not counted live.
    pub fn from_cnf(cnf: &Cnf) -> Result<Self, SolveError> {
        let num_atoms = cnf.num_vars as usize;
        let rows = cnf.clauses.len();
        let mut cells = Vec::new();
        cells.try_reserve_exact(rows.saturating_mul(num_atoms))?;
        cells.resize(rows * num_atoms, None);

        let mut formula = Self {
            num_atoms,
            cells,
            width: vec![0; rows],
            retired: vec![false; rows],
            live: 0,
        };

        for (row, clause) in cnf.clauses.iter().enumerate() {
            let mut tautology = false;
            for &lit in clause {
                if lit.var == 0 || lit.var as usize > num_atoms {
                    return Err(SolveError::AtomOutOfRange {
                        clause: row,
                        atom: lit.var,
                        num_atoms: cnf.num_vars,
                    });
                }
                let idx = formula.index(row, lit.var);
                match formula.cells[idx] {
                    None => {
                        formula.cells[idx] = Some(lit.sign);
                        formula.width[row] += 1;
                    }
                    Some(sign) if sign == lit.sign => {}
                    Some(_) => tautology = true,
                }
            }
            if tautology {
                let start = formula.index(row, 1);
                formula.cells[start..start + num_atoms].fill(None);
                formula.width[row] = 0;
                formula.retired[row] = true;
            } else {
                formula.live += 1;
            }
        }
        Ok(formula)
    }

    fn index(&self, row: usize, atom: u32) -> usize {
        row * self.num_atoms + (atom as usize - 1)
    }

    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    pub fn num_clauses(&self) -> usize {
        self.width.len()
    }

    pub fn live_clauses(&self) -> usize {
        self.live
    }

    pub fn cell(&self, row: usize, atom: u32) -> Option<bool> {
        self.cells[self.index(row, atom)]
    }

    pub fn clause_width(&self, row: usize) -> usize {
        self.width[row] as usize
    }

    pub fn is_retired(&self, row: usize) -> bool {
        self.retired[row]
    }

    /// Surviving literals of a row in atom order.
    pub fn literals(&self, row: usize) -> Vec<Lit> {
        (1..=self.num_atoms as u32)
            .filter_map(|atom| self.cell(row, atom).map(|sign| Lit::new(atom, sign)))
            .collect()
    }

    pub fn is_satisfied_fully(&self) -> bool {
        self.live == 0
    }

    pub fn clause_is_empty(&self, row: usize) -> bool {
        self.width[row] == 0
    }

    /// Empty but never retired: every literal was falsified.
    pub fn is_conflicting(&self, row: usize) -> bool {
        self.width[row] == 0 && !self.retired[row]
    }

    pub fn first_conflict(&self) -> Option<usize> {
        (0..self.num_clauses()).find(|&row| self.is_conflicting(row))
    }

    /// Lowest-indexed live clause with exactly one surviving literal.
    pub fn first_unit(&self) -> Option<Lit> {
        let row = (0..self.num_clauses())
            .find(|&row| self.width[row] == 1 && !self.retired[row])?;
        (1..=self.num_atoms as u32)
            .find_map(|atom| self.cell(row, atom).map(|sign| Lit::new(atom, sign)))
    }

    /// Occurrence signs of `atom` across all surviving cells.
    pub fn polarity(&self, atom: u32) -> Polarity {
        let mut seen = Polarity::Absent;
        for row in 0..self.num_clauses() {
            match (seen, self.cell(row, atom)) {
                (_, None) => {}
                (Polarity::Absent, Some(sign)) => seen = Polarity::Pure(sign),
                (Polarity::Pure(prev), Some(sign)) if prev != sign => return Polarity::Mixed,
                _ => {}
            }
        }
        seen
    }

    pub fn retire(&mut self, row: usize) {
        self.retire_with(row, &mut ());
    }

    /// Clears the row. Only a row that still held literals is counted off the
    /// live total, so retiring an empty row twice is a no-op.
    pub fn retire_with<J: Journal>(&mut self, row: usize, journal: &mut J) {
        if self.width[row] == 0 {
            return;
        }
        for atom in 1..=self.num_atoms as u32 {
            let idx = self.index(row, atom);
            if let Some(sign) = self.cells[idx].take() {
                journal.cell_cleared(row, atom, sign);
            }
        }
        self.width[row] = 0;
        self.retired[row] = true;
        self.live -= 1;
        journal.row_retired(row);
    }

    /// Removes one falsified literal. Returns true if the row is now empty.
    pub(crate) fn clear_cell_with<J: Journal>(
        &mut self,
        row: usize,
        atom: u32,
        journal: &mut J,
    ) -> bool {
        let idx = self.index(row, atom);
        if let Some(sign) = self.cells[idx].take() {
            self.width[row] -= 1;
            journal.cell_cleared(row, atom, sign);
        }
        self.width[row] == 0
    }

    pub(crate) fn restore_cell(&mut self, row: usize, atom: u32, sign: bool) {
        let idx = self.index(row, atom);
        debug_assert!(self.cells[idx].is_none());
        self.cells[idx] = Some(sign);
        self.width[row] += 1;
    }

    pub(crate) fn unretire(&mut self, row: usize) {
        debug_assert!(self.retired[row]);
        self.retired[row] = false;
        self.live += 1;
    }

    pub fn try_clone(&self) -> Result<Self, TryReserveError> {
        Ok(Self {
            num_atoms: self.num_atoms,
            cells: try_copy(&self.cells)?,
            width: try_copy(&self.width)?,
            retired: try_copy(&self.retired)?,
            live: self.live,
        })
    }
}

fn try_copy<T: Copy>(src: &[T]) -> Result<Vec<T>, TryReserveError> {
    let mut out = Vec::new();
    out.try_reserve_exact(src.len())?;
    out.extend_from_slice(src);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{Formula, Polarity};
    use crate::cnf::cnf::{Cnf, Lit};

    fn cnf(num_vars: u32, clauses: &[&[i64]]) -> Cnf {
        let mut out = Cnf::new(num_vars);
        for clause in clauses {
            out.add_clause(clause.iter().filter_map(|&v| Lit::from_dimacs(v)).collect());
        }
        out
    }

    #[test]
    fn duplicates_fold_and_tautologies_retire() {
        let f = Formula::from_cnf(&cnf(3, &[&[1, 1, -2], &[2, -2, 3], &[3]])).expect("build");
        assert_eq!(f.num_clauses(), 3);
        assert_eq!(f.live_clauses(), 2);
        assert_eq!(f.clause_width(0), 2);
        assert_eq!(f.literals(0), vec![Lit::new(1, true), Lit::new(2, false)]);
        assert!(f.is_retired(1));
        assert!(f.clause_is_empty(1));
        assert!(!f.is_conflicting(1));
    }

    #[test]
    fn retire_counts_once() {
        let mut f = Formula::from_cnf(&cnf(2, &[&[1, 2], &[-1]])).expect("build");
        f.retire(0);
        assert_eq!(f.live_clauses(), 1);
        assert!(f.clause_is_empty(0));
        f.retire(0);
        assert_eq!(f.live_clauses(), 1);
        f.retire(1);
        assert!(f.is_satisfied_fully());
    }

    #[test]
    fn empty_input_clause_is_a_live_conflict() {
        let f = Formula::from_cnf(&cnf(1, &[&[1], &[]])).expect("build");
        assert_eq!(f.live_clauses(), 2);
        assert_eq!(f.first_conflict(), Some(1));
    }

    #[test]
    fn unit_scan_and_polarity() {
        let f = Formula::from_cnf(&cnf(3, &[&[1, 2], &[-3], &[2]])).expect("build");
        assert_eq!(f.first_unit(), Some(Lit::new(3, false)));
        assert_eq!(f.polarity(1), Polarity::Pure(true));
        assert_eq!(f.polarity(3), Polarity::Pure(false));
        let g = Formula::from_cnf(&cnf(2, &[&[1], &[-1, 2]])).expect("build");
        assert_eq!(g.polarity(1), Polarity::Mixed);
        let h = Formula::from_cnf(&cnf(2, &[&[1, -1]])).expect("build");
        assert_eq!(h.polarity(1), Polarity::Absent);
    }
}
