use anyhow::{Context, Result, anyhow};
use varisat::ExtendFormula;

use crate::cnf::cnf::{Cnf, Lit};
use crate::solver::{SatBackend, SolveResult, SolverStats};

/// Reference backend used to cross-check verdicts. Builds a fresh solver
/// for every formula.
#[derive(Debug, Default)]
pub struct VarisatBackend {
    last_model: Option<Vec<Option<bool>>>,
    stats: SolverStats,
}

impl VarisatBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_lit(vars: &[varisat::Var], lit: Lit) -> Option<varisat::Lit> {
    if lit.var == 0 {
        return None;
    }
    let var = vars.get(lit.var as usize - 1).copied()?;
    Some(varisat::Lit::from_var(var, lit.sign))
}

impl SatBackend for VarisatBackend {
    fn solve(&mut self, cnf: &Cnf) -> Result<SolveResult> {
        self.stats.solve_calls += 1;
        self.last_model = None;

        let mut inner = varisat::Solver::new();
        let vars = (0..cnf.num_vars)
            .map(|_| inner.new_var())
            .collect::<Vec<_>>();
        for clause in &cnf.clauses {
            let lits = clause
                .iter()
                .map(|&lit| to_lit(&vars, lit))
                .collect::<Option<Vec<_>>>()
                .with_context(|| format!("literal outside 1..={}", cnf.num_vars))?;
            inner.add_clause(&lits);
        }

        let sat = inner
            .solve()
            .map_err(|e| anyhow!("varisat failed: {:?}", e))?;
        if !sat {
            return Ok(SolveResult::Unsat);
        }
        let mut values = vec![None; cnf.num_vars as usize + 1];
        for lit in inner.model().unwrap_or_default() {
            values[lit.var().index() + 1] = Some(lit.is_positive());
        }
        self.last_model = Some(values);
        Ok(SolveResult::Sat)
    }

    fn model_value(&self, var: u32) -> Option<bool> {
        self.last_model.as_ref()?.get(var as usize).copied().flatten()
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn backend_name(&self) -> &'static str {
        "varisat"
    }
}
