use std::fmt;

/// A signed reference to a 1-based atom. `sign == true` is the positive literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    pub var: u32,
    pub sign: bool,
}

impl Lit {
    pub fn new(var: u32, sign: bool) -> Self {
        Self { var, sign }
    }

    pub fn neg(self) -> Self {
        Self {
            var: self.var,
            sign: !self.sign,
        }
    }

    /// Reads a nonzero DIMACS integer. Returns `None` for `0`.
    pub fn from_dimacs(value: i64) -> Option<Self> {
        if value == 0 {
            return None;
        }
        let var = u32::try_from(value.unsigned_abs()).ok()?;
        Some(Self::new(var, value > 0))
    }

    pub fn to_dimacs(self) -> i64 {
        let v = self.var as i64;
        if self.sign { v } else { -v }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

/// A formula as written in the input: clauses in file order, literals as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    pub num_vars: u32,
    pub clauses: Vec<Vec<Lit>>,
}

impl Cnf {
    pub fn new(num_vars: u32) -> Self {
        Self {
            num_vars,
            clauses: Vec::new(),
        }
    }

    pub fn add_clause(&mut self, clause: Vec<Lit>) {
        self.clauses.push(clause);
    }

    pub fn max_clause_width(&self) -> usize {
        self.clauses.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_tautology(clause: &[Lit]) -> bool {
        clause
            .iter()
            .any(|&lit| clause.iter().any(|&other| other == lit.neg()))
    }

    pub fn num_tautologies(&self) -> usize {
        self.clauses.iter().filter(|c| Self::is_tautology(c)).count()
    }

    /// Evaluates under a total assignment indexed by atom (slot 0 unused).
    pub fn eval(&self, values: &[bool]) -> bool {
        self.clauses.iter().all(|clause| {
            clause.iter().any(|lit| {
                values
                    .get(lit.var as usize)
                    .is_some_and(|&v| v == lit.sign)
            })
        })
    }
}
