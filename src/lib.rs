pub mod cnf;
pub mod sat;
pub mod solver;
