use dpllsat::cnf::dimacs::parse_dimacs_str;
use dpllsat::sat::{SolveOptions, Strategy, Verdict, solve_cnf};

fn both_strategies() -> [SolveOptions; 2] {
    [
        SolveOptions {
            strategy: Strategy::Clone,
            pure_literals: true,
        },
        SolveOptions {
            strategy: Strategy::Trail,
            pure_literals: true,
        },
    ]
}

#[test]
fn single_binary_clause_is_sat() {
    let cnf = parse_dimacs_str("p cnf 2 1\n1 2 0\n").expect("parse");
    for opts in both_strategies() {
        let report = solve_cnf(&cnf, &opts).expect("solve");
        let model = report.verdict.model().expect("sat");
        assert!(model.value(1) || model.value(2));
        assert!(model.satisfies(&cnf));
    }
}

#[test]
fn contradictory_units_are_unsat() {
    let cnf = parse_dimacs_str("p cnf 1 2\n1 0\n-1 0\n").expect("parse");
    for opts in both_strategies() {
        let report = solve_cnf(&cnf, &opts).expect("solve");
        assert_eq!(report.verdict, Verdict::Unsatisfiable);
        assert_eq!(report.stats.decisions, 0);
    }
}

#[test]
fn unit_chain_refutes_without_branching() {
    // ¬p2 forces p2=false, then p1 from the first clause and ¬p1 from the second
    let cnf = parse_dimacs_str("p cnf 2 3\n1 2 0\n-1 2 0\n-2 0\n").expect("parse");
    let with_unit = parse_dimacs_str("p cnf 2 4\n1 2 0\n-1 2 0\n-2 0\n1 0\n").expect("parse");
    for opts in both_strategies() {
        for input in [&cnf, &with_unit] {
            let report = solve_cnf(input, &opts).expect("solve");
            assert_eq!(report.verdict, Verdict::Unsatisfiable);
            assert_eq!(report.stats.decisions, 0);
            assert!(report.stats.conflicts >= 1);
        }
    }
}

#[test]
fn unit_chain_forces_both_false() {
    // ¬p2 forces p2=false, then ¬p1 ∨ p2 forces p1=false
    let cnf = parse_dimacs_str("p cnf 2 2\n-1 2 0\n-2 0\n").expect("parse");
    for opts in both_strategies() {
        let report = solve_cnf(&cnf, &opts).expect("solve");
        let model = report.verdict.model().expect("sat");
        assert!(!model.value(1));
        assert!(!model.value(2));
        assert_eq!(report.stats.decisions, 0);
        assert_eq!(report.stats.propagations, 2);
    }
}

#[test]
fn pure_atom_is_eliminated_without_branching() {
    // p3 only occurs positively; p1 and p2 occur in both polarities
    let src = "\
p cnf 3 4
1 2 3 0
-1 3 0
-2 -1 0
2 1 0
";
    let cnf = parse_dimacs_str(src).expect("parse");
    for opts in both_strategies() {
        let report = solve_cnf(&cnf, &opts).expect("solve");
        let model = report.verdict.model().expect("sat");
        assert!(model.satisfies(&cnf));
        assert!(model.value(3));
        assert!(report.stats.pure_eliminations >= 1);
    }
}

#[test]
fn pure_atom_alone_settles_formula() {
    let cnf = parse_dimacs_str("p cnf 3 2\n1 3 0\n-2 3 0\n").expect("parse");
    let report = solve_cnf(&cnf, &SolveOptions::default()).expect("solve");
    let model = report.verdict.model().expect("sat");
    assert!(model.satisfies(&cnf));
    assert_eq!(report.stats.decisions, 0);
}

#[test]
fn empty_clause_is_unsat_regardless_of_rest() {
    let cnf = parse_dimacs_str("p cnf 3 3\n1 2 0\n0\n-3 0\n").expect("parse");
    for opts in both_strategies() {
        let report = solve_cnf(&cnf, &opts).expect("solve");
        assert_eq!(report.verdict, Verdict::Unsatisfiable);
        assert_eq!(report.stats.decisions, 0);
    }
}

#[test]
fn all_tautologies_is_sat() {
    let cnf = parse_dimacs_str("p cnf 2 2\n1 -1 0\n2 -2 1 0\n").expect("parse");
    let report = solve_cnf(&cnf, &SolveOptions::default()).expect("solve");
    assert!(report.verdict.is_sat());
    assert_eq!(report.stats.decisions, 0);
}

#[test]
fn pigeonhole_three_into_two_is_unsat() {
    // p(i,j): pigeon i in hole j, atom = 2*(i-1) + j
    let src = "\
p cnf 6 9
1 2 0
3 4 0
5 6 0
-1 -3 0
-1 -5 0
-3 -5 0
-2 -4 0
-2 -6 0
-4 -6 0
";
    let cnf = parse_dimacs_str(src).expect("parse");
    for opts in both_strategies() {
        let report = solve_cnf(&cnf, &opts).expect("solve");
        assert_eq!(report.verdict, Verdict::Unsatisfiable);
        assert!(report.stats.decisions > 0);
    }
}
