use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::info;

use dpllsat::cnf::cnf::{Cnf, Lit};
use dpllsat::cnf::dimacs::{load_cnf, to_dimacs};
use dpllsat::cnf::random::{generate_planted, generate_random};
use dpllsat::sat::formula::Formula;
use dpllsat::sat::{SolveOptions, Strategy};
use dpllsat::solver::{SolveResult, backend_by_name, cross_check};

const EXIT_SAT: u8 = 10;
const EXIT_UNSAT: u8 = 20;

#[derive(Debug, Parser)]
#[command(name = "dpllsat")]
#[command(about = "DPLL satisfiability checker for DIMACS CNF")]
struct Cli {
    /// -v info, -vv debug, -vvv trace; RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    Solve {
        path: String,
        #[arg(long, default_value = "trail")]
        strategy: String,
        #[arg(long, default_value = "dpll")]
        backend: String,
        #[arg(long)]
        no_pure: bool,
        #[arg(long)]
        cross_check: bool,
        #[arg(long)]
        stats: bool,
    },
    Check {
        path: String,
    },
    Gen {
        #[arg(long)]
        vars: u32,
        #[arg(long)]
        clauses: usize,
        #[arg(long, default_value_t = 3)]
        k: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long)]
        out: String,
        #[arg(long)]
        witness: Option<String>,
        /// Skip planting; the result may be unsatisfiable
        #[arg(long)]
        unplanted: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Cmd::Solve {
            path,
            strategy,
            backend,
            no_pure,
            cross_check,
            stats,
        } => solve_cmd(&path, &strategy, &backend, !no_pure, cross_check, stats),
        Cmd::Check { path } => {
            check_cmd(&path)?;
            Ok(ExitCode::SUCCESS)
        }
        Cmd::Gen {
            vars,
            clauses,
            k,
            seed,
            out,
            witness,
            unplanted,
        } => {
            gen_cmd(vars, clauses, k, seed, &out, witness.as_deref(), unplanted)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn parse_strategy(name: &str) -> Result<Strategy> {
    match name {
        "clone" => Ok(Strategy::Clone),
        "trail" => Ok(Strategy::Trail),
        _ => bail!("unknown strategy '{}', expected clone|trail", name),
    }
}

fn load(path: &str) -> Result<Cnf> {
    load_cnf(path).with_context(|| format!("failed to load {}", path))
}

fn solve_cmd(
    path: &str,
    strategy: &str,
    backend: &str,
    pure_literals: bool,
    check_with_reference: bool,
    show_stats: bool,
) -> Result<ExitCode> {
    let cnf = load(path)?;
    let options = SolveOptions {
        strategy: parse_strategy(strategy)?,
        pure_literals,
    };

    let mut solver = backend_by_name(backend, options)?;
    let result = solver.solve(&cnf)?;
    info!("{} finished: {:?}", solver.backend_name(), result);

    if check_with_reference {
        let agreed = cross_check(&cnf, options)?;
        if agreed != result {
            bail!("cross-check disagrees with {}", solver.backend_name());
        }
        println!("c cross-check ok");
    }
    if show_stats {
        let s = solver.stats();
        println!(
            "c backend={} solve_calls={} decisions={} conflicts={}",
            solver.backend_name(),
            s.solve_calls,
            s.decisions,
            s.conflicts
        );
    }

    match result {
        SolveResult::Unsat => {
            println!("s UNSATISFIABLE");
            Ok(ExitCode::from(EXIT_UNSAT))
        }
        SolveResult::Sat => {
            let mut values = vec![false; cnf.num_vars as usize + 1];
            for var in 1..=cnf.num_vars {
                values[var as usize] = solver.model_value(var).unwrap_or(false);
            }
            if !cnf.eval(&values) {
                bail!("model does not satisfy the input clauses");
            }
            println!("s SATISFIABLE");
            println!("{}", model_line(&values));
            Ok(ExitCode::from(EXIT_SAT))
        }
    }
}

fn model_line(values: &[bool]) -> String {
    let mut line = String::from("v");
    for (var, &value) in values.iter().enumerate().skip(1) {
        line.push_str(&format!(" {}", Lit::new(var as u32, value)));
    }
    line.push_str(" 0");
    line
}

fn check_cmd(path: &str) -> Result<()> {
    let cnf = load(path)?;
    let formula = Formula::from_cnf(&cnf)?;
    let empty = cnf.clauses.iter().filter(|c| c.is_empty()).count();
    println!(
        "atoms={} clauses={} live={} tautologies={} empty={} max_width={}",
        cnf.num_vars,
        cnf.clauses.len(),
        formula.live_clauses(),
        cnf.num_tautologies(),
        empty,
        cnf.max_clause_width()
    );
    Ok(())
}

fn gen_cmd(
    vars: u32,
    clauses: usize,
    k: usize,
    seed: u64,
    out: &str,
    witness_out: Option<&str>,
    unplanted: bool,
) -> Result<()> {
    if unplanted && witness_out.is_some() {
        bail!("--witness needs a planted formula");
    }
    let (cnf, witness) = if unplanted {
        (generate_random(vars, clauses, k, seed)?, None)
    } else {
        let (cnf, witness) = generate_planted(vars, clauses, k, seed)?;
        (cnf, Some(witness))
    };
    std::fs::write(out, to_dimacs(&cnf)).with_context(|| format!("failed to write {}", out))?;

    if let (Some(path), Some(witness)) = (witness_out, witness) {
        std::fs::write(path, format!("{}\n", model_line(&witness)))
            .with_context(|| format!("failed to write {}", path))?;
    }
    println!(
        "GEN: wrote {} | vars={} clauses={} k={} planted={}",
        out,
        vars,
        cnf.clauses.len(),
        k,
        !unplanted
    );
    Ok(())
}
