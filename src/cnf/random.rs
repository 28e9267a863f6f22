use anyhow::{Result, bail};
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::cnf::{Cnf, Lit};

/// Uniform random k-CNF. Satisfiability is not controlled.
pub fn generate_random(num_vars: u32, num_clauses: usize, k: usize, seed: u64) -> Result<Cnf> {
    check_shape(num_vars, k)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut cnf = Cnf::new(num_vars);
    for _ in 0..num_clauses {
        cnf.add_clause(random_clause(num_vars, k, &mut rng));
    }
    Ok(cnf)
}

/// Random k-CNF with a hidden witness: every clause has at least one literal
/// the witness makes true. The witness is indexed by atom, slot 0 unused.
pub fn generate_planted(
    num_vars: u32,
    num_clauses: usize,
    k: usize,
    seed: u64,
) -> Result<(Cnf, Vec<bool>)> {
    check_shape(num_vars, k)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut witness = vec![false; num_vars as usize + 1];
    for slot in witness.iter_mut().skip(1) {
        *slot = rng.random::<bool>();
    }

    let mut cnf = Cnf::new(num_vars);
    for _ in 0..num_clauses {
        let mut clause = random_clause(num_vars, k, &mut rng);
        let satisfied = clause
            .iter()
            .any(|lit| witness[lit.var as usize] == lit.sign);
        if !satisfied {
            let idx = rng.random_range(0..clause.len());
            clause[idx] = clause[idx].neg();
        }
        cnf.add_clause(clause);
    }
    Ok((cnf, witness))
}

fn check_shape(num_vars: u32, k: usize) -> Result<()> {
    if num_vars == 0 {
        bail!("need at least one variable");
    }
    if k == 0 || k > num_vars as usize {
        bail!("clause width k must be in 1..={}, got {}", num_vars, k);
    }
    Ok(())
}

fn random_clause(num_vars: u32, k: usize, rng: &mut ChaCha8Rng) -> Vec<Lit> {
    sample(rng, num_vars as usize, k)
        .into_iter()
        .map(|idx| Lit::new(idx as u32 + 1, rng.random::<bool>()))
        .collect()
}
