use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{info, warn};
use thiserror::Error;

use super::cnf::{Cnf, Lit};

#[derive(Debug, Error)]
pub enum DimacsError {
    #[error("failed to read cnf input: {0}")]
    Io(#[from] io::Error),

    #[error("missing 'p cnf <atoms> <clauses>' header before clause data")]
    MissingHeader,

    #[error("line {line}: malformed header, expected 'p cnf <atoms> <clauses>'")]
    MalformedHeader { line: usize },

    #[error("line {line}: header dimensions must be positive")]
    NonPositiveDimension { line: usize },

    #[error("line {line}: second 'p' header")]
    DuplicateHeader { line: usize },

    #[error("line {line}: invalid token '{token}'")]
    InvalidToken { line: usize, token: String },

    #[error("line {line}: literal {literal} outside atom range 1..={num_atoms}")]
    LiteralOutOfRange {
        line: usize,
        literal: i64,
        num_atoms: u32,
    },

    #[error("last clause is not terminated by 0")]
    UnterminatedClause,
}

/// Upper bound on the clause vector presized from the header count.
const MAX_PRESIZE: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    num_atoms: u32,
    num_clauses: usize,
}

pub fn load_cnf<P: AsRef<Path>>(path: P) -> Result<Cnf, DimacsError> {
    let file = File::open(path)?;
    parse_dimacs_reader(BufReader::new(file))
}

pub fn parse_dimacs_str(s: &str) -> Result<Cnf, DimacsError> {
    parse_dimacs_reader(io::Cursor::new(s.as_bytes()))
}

pub fn parse_dimacs_reader<R: BufRead>(r: R) -> Result<Cnf, DimacsError> {
    let mut header: Option<Header> = None;
    let mut clauses = Vec::<Vec<Lit>>::new();
    let mut current = Vec::<Lit>::new();

    for (idx, line) in r.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let clean = line.trim();
        if clean.is_empty() || clean.starts_with('c') {
            continue;
        }
        // SATLIB end-of-data marker
        if clean.starts_with('%') {
            break;
        }
        if clean.starts_with('p') {
            if header.is_some() {
                return Err(DimacsError::DuplicateHeader { line: line_no });
            }
            let parsed = parse_header(clean, line_no)?;
            clauses.reserve(parsed.num_clauses.min(MAX_PRESIZE));
            header = Some(parsed);
            continue;
        }

        let Some(h) = header else {
            return Err(DimacsError::MissingHeader);
        };
        for token in clean.split_whitespace() {
            let value = token
                .parse::<i64>()
                .map_err(|_| DimacsError::InvalidToken {
                    line: line_no,
                    token: token.to_owned(),
                })?;
            if value == 0 {
                clauses.push(std::mem::take(&mut current));
                continue;
            }
            let lit = Lit::from_dimacs(value)
                .filter(|lit| lit.var <= h.num_atoms)
                .ok_or(DimacsError::LiteralOutOfRange {
                    line: line_no,
                    literal: value,
                    num_atoms: h.num_atoms,
                })?;
            current.push(lit);
        }
    }

    let header = header.ok_or(DimacsError::MissingHeader)?;
    if !current.is_empty() {
        return Err(DimacsError::UnterminatedClause);
    }
    if clauses.len() != header.num_clauses {
        warn!(
            "header declares {} clauses, read {}",
            header.num_clauses,
            clauses.len()
        );
    }
    info!(
        "parsed cnf: atoms={} clauses={}",
        header.num_atoms,
        clauses.len()
    );

    Ok(Cnf {
        num_vars: header.num_atoms,
        clauses,
    })
}

fn parse_header(line: &str, line_no: usize) -> Result<Header, DimacsError> {
    let parts = line.split_whitespace().collect::<Vec<_>>();
    if parts.len() != 4 || parts[0] != "p" || parts[1] != "cnf" {
        return Err(DimacsError::MalformedHeader { line: line_no });
    }
    let atoms = parse_dimension(parts[2], line_no)?;
    let clauses = parse_dimension(parts[3], line_no)?;
    let num_atoms =
        u32::try_from(atoms).map_err(|_| DimacsError::MalformedHeader { line: line_no })?;
    let num_clauses =
        usize::try_from(clauses).map_err(|_| DimacsError::MalformedHeader { line: line_no })?;
    Ok(Header {
        num_atoms,
        num_clauses,
    })
}

fn parse_dimension(token: &str, line_no: usize) -> Result<i64, DimacsError> {
    let value = token
        .parse::<i64>()
        .map_err(|_| DimacsError::MalformedHeader { line: line_no })?;
    if value <= 0 {
        return Err(DimacsError::NonPositiveDimension { line: line_no });
    }
    Ok(value)
}

pub fn to_dimacs(cnf: &Cnf) -> String {
    let mut out = String::new();
    out.push_str(&format!("p cnf {} {}\n", cnf.num_vars, cnf.clauses.len()));
    for clause in &cnf.clauses {
        for &lit in clause {
            out.push_str(&format!("{} ", lit.to_dimacs()));
        }
        out.push_str("0\n");
    }
    out
}
