#[allow(clippy::module_inception)]
pub mod cnf;
pub mod dimacs;
pub mod random;
