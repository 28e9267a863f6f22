pub mod dpll_backend;
pub mod varisat;

use anyhow::{Result, bail};

use crate::cnf::cnf::Cnf;
use crate::sat::SolveOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveResult {
    Sat,
    Unsat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub solve_calls: usize,
    pub decisions: usize,
    pub conflicts: usize,
}

/// A complete decision procedure for one formula at a time.
pub trait SatBackend {
    fn solve(&mut self, cnf: &Cnf) -> Result<SolveResult>;
    fn model_value(&self, var: u32) -> Option<bool>;
    fn stats(&self) -> SolverStats;
    fn backend_name(&self) -> &'static str;
}

pub fn backend_by_name(name: &str, options: SolveOptions) -> Result<Box<dyn SatBackend>> {
    match name {
        "dpll" => Ok(Box::new(dpll_backend::DpllBackend::with_options(options))),
        "varisat" => Ok(Box::new(varisat::VarisatBackend::new())),
        _ => bail!("unknown backend '{}', expected dpll|varisat", name),
    }
}

/// Solves with both backends and fails if their verdicts differ.
pub fn cross_check(cnf: &Cnf, options: SolveOptions) -> Result<SolveResult> {
    let mut primary = dpll_backend::DpllBackend::with_options(options);
    let mut reference = varisat::VarisatBackend::new();
    let ours = primary.solve(cnf)?;
    let theirs = reference.solve(cnf)?;
    if ours != theirs {
        bail!(
            "verdict mismatch: {}={:?} {}={:?}",
            primary.backend_name(),
            ours,
            reference.backend_name(),
            theirs
        );
    }
    Ok(ours)
}
