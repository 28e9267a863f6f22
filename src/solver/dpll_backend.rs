use anyhow::Result;

use crate::cnf::cnf::Cnf;
use crate::sat::{Model, SolveOptions, Verdict, solve_cnf};
use crate::solver::{SatBackend, SolveResult, SolverStats};

#[derive(Debug, Clone)]
pub struct DpllBackend {
    options: SolveOptions,
    last_model: Option<Model>,
    stats: SolverStats,
}

impl DpllBackend {
    pub fn new() -> Self {
        Self::with_options(SolveOptions::default())
    }

    pub fn with_options(options: SolveOptions) -> Self {
        Self {
            options,
            last_model: None,
            stats: SolverStats::default(),
        }
    }

    pub fn last_model(&self) -> Option<&Model> {
        self.last_model.as_ref()
    }
}

impl Default for DpllBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SatBackend for DpllBackend {
    fn solve(&mut self, cnf: &Cnf) -> Result<SolveResult> {
        self.stats.solve_calls += 1;
        let report = solve_cnf(cnf, &self.options)?;
        self.stats.decisions += report.stats.decisions;
        self.stats.conflicts += report.stats.conflicts;
        match report.verdict {
            Verdict::Satisfiable(model) => {
                self.last_model = Some(model);
                Ok(SolveResult::Sat)
            }
            Verdict::Unsatisfiable => {
                self.last_model = None;
                Ok(SolveResult::Unsat)
            }
        }
    }

    fn model_value(&self, var: u32) -> Option<bool> {
        let model = self.last_model.as_ref()?;
        if var == 0 || var as usize > model.num_atoms() {
            return None;
        }
        Some(model.value(var))
    }

    fn stats(&self) -> SolverStats {
        self.stats
    }

    fn backend_name(&self) -> &'static str {
        "dpll"
    }
}
