//! End-to-end tests: build a model, solve it with the built-in backend and
//! report the result.

use linprog_model::{
    Category, LinearExpression, ModelError, Problem, ReportError, Sense, VariableFamily, write_summary,
    write_table,
};
use linprog_solver::SolutionStatus;
use proptest::prelude::*;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-6;

#[test]
fn simple_minimization() {
    // minimize 3x - 5y subject to y <= x, x >= 0, y <= 5 (integer)
    let mut problem = Problem::minimize("Simple Minimization");
    let x = problem.add_variable("x", Some(0.0), None, Category::Continuous).unwrap();
    let y = problem.add_variable("y", None, Some(5.0), Category::Integer).unwrap();
    let objective = LinearExpression::term(&x, 3.0).sub(&LinearExpression::term(&y, 5.0));
    problem.set_objective(Sense::Minimize, objective).unwrap();
    problem
        .add_constraint(LinearExpression::from(&y).less_or_equal_expr(&LinearExpression::from(&x)))
        .unwrap();

    let status = problem.solve().unwrap();

    assert_eq!(status, SolutionStatus::Optimal);
    // y is pushed to its upper bound and x follows it
    assert!((problem.objective_value().unwrap() + 10.0).abs() < TOL);
    assert!((problem.value(&x).unwrap() - 5.0).abs() < TOL);
    assert_eq!(problem.value(&y), Some(5.0));
}

#[test]
fn maximize_utility() {
    let names = [1, 2, 3, 4];
    let costs = [0.05, 0.02, 0.07, 0.09];
    let utilities = [10.0, 8.0, 15.0, 20.0];

    let mut problem = Problem::maximize("Maximize Utility");
    let vars = problem
        .add_variable_family("X", names, Some(0.0), Some(20.0), Category::Continuous)
        .unwrap();
    problem
        .set_objective(Sense::Maximize, LinearExpression::dot(vars.variables(), utilities))
        .unwrap();
    problem
        .add_constraint(LinearExpression::dot(vars.variables(), costs).less_or_equal(1.0))
        .unwrap();

    let status = problem.solve().unwrap();

    assert_eq!(status, SolutionStatus::Optimal);
    let objective = problem.objective_value().unwrap();
    assert!(objective >= 0.0);
    // X_2 fills up first (best utility per cost), X_4 takes the rest
    assert!((objective - (160.0 + 20.0 * 0.6 / 0.09)).abs() < 1e-4, "obj = {}", objective);
    for var in vars.variables() {
        let value = problem.value(var).unwrap();
        assert!((-TOL..=20.0 + TOL).contains(&value), "{} = {}", var.name(), value);
    }
    assert!((problem.value(vars.get(&2).unwrap()).unwrap() - 20.0).abs() < TOL);
}

#[test]
fn unbounded_model_reports_status() {
    let mut problem = Problem::maximize("unbounded");
    let x = problem.add_variable("x", Some(0.0), None, Category::Continuous).unwrap();
    problem.set_objective(Sense::Maximize, LinearExpression::from(&x)).unwrap();

    assert_eq!(problem.solve().unwrap(), SolutionStatus::Unbounded);

    let mut out = Vec::new();
    write_summary(&problem, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Optimization status: Unbounded"));
    assert!(text.contains("Final value of the objective: undefined"));
}

fn schedule() -> (Problem, VariableFamily<(&'static str, u32)>) {
    let appliances = ["washer", "dryer"];
    let steps = [0u32, 1, 2];
    let mut problem = Problem::minimize("schedule");
    let keys = appliances
        .iter()
        .flat_map(|&a| steps.iter().map(move |&t| (a, t)));
    let on = problem
        .add_variable_family("on", keys, None, None, Category::Binary)
        .unwrap();
    let prices = [3.0, 1.0, 2.0];
    let objective = steps.iter().fold(LinearExpression::new(), |expr, &t| {
        appliances.iter().fold(expr, |expr, &a| {
            expr.with_term(on.get(&(a, t)).unwrap(), prices[t as usize])
        })
    });
    problem.set_objective(Sense::Minimize, objective).unwrap();
    for a in appliances {
        let runs = LinearExpression::sum(steps.iter().map(|&t| on.get(&(a, t)).unwrap()));
        problem.add_named_constraint(&format!("run_{}", a), runs.equal_to(1.0)).unwrap();
    }
    for t in steps {
        let load = LinearExpression::sum(appliances.iter().map(|&a| on.get(&(a, t)).unwrap()));
        problem.add_named_constraint(&format!("one_at_{}", t), load.less_or_equal(1.0)).unwrap();
    }
    (problem, on)
}

#[test]
fn table_over_appliances_and_steps() {
    let (mut problem, on) = schedule();
    assert_eq!(problem.solve().unwrap(), SolutionStatus::Optimal);
    // the two cheapest steps are used, one appliance each
    assert!((problem.objective_value().unwrap() - 3.0).abs() < TOL);

    let mut out = Vec::new();
    write_table(&problem, &on, &[0, 1, 2], &["washer", "dryer"], &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "  washer dryer");
    assert!(lines[1].starts_with("0 "));
    let step0: Vec<&str> = lines[1].split_whitespace().skip(1).collect();
    assert_eq!(step0, vec!["0", "0"]);
    let busy: usize = lines[2..]
        .iter()
        .map(|line| line.split_whitespace().skip(1).filter(|cell| *cell == "1").count())
        .sum();
    assert_eq!(busy, 2);
}

#[test]
fn table_with_no_rows_prints_header_only() {
    let (mut problem, on) = schedule();
    problem.solve().unwrap();

    let mut out = Vec::new();
    write_table::<_, &str, u32>(&problem, &on, &[], &["washer", "dryer"], &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, " washer dryer\n");
}

#[test]
fn table_with_missing_pair_fails() {
    let (mut problem, on) = schedule();
    problem.solve().unwrap();

    let mut out = Vec::new();
    let result = write_table(&problem, &on, &[0, 7], &["washer"], &mut out);

    assert!(matches!(result, Err(ReportError::KeyNotFound(key)) if key == "(washer_7)"));
    assert!(out.is_empty());
}

#[test]
fn table_before_solve_fails() {
    let (problem, on) = schedule();

    let mut out = Vec::new();
    let result = write_table(&problem, &on, &[0], &["washer"], &mut out);

    assert!(matches!(result, Err(ReportError::MissingValue(name)) if name == "on_washer_0"));
}

#[test]
fn lp_export_lists_binaries() {
    let (problem, _) = schedule();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schedule.lp");
    problem.write_lp(std::fs::File::create(&path).unwrap()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("\\* schedule *\\\nMinimize\n"));
    assert!(text.contains("run_washer: 1 on_washer_0 + 1 on_washer_1 + 1 on_washer_2 = 1"));
    assert!(text.contains("Binaries\n on_washer_0\n"));
    assert_eq!(text, problem.to_lp_string());
}

proptest! {
    #[test]
    fn valid_bounds_are_kept(lo in -1e6f64..1e6, width in 0.0f64..1e6) {
        let hi = lo + width;
        let mut problem = Problem::minimize("prop");
        let var = problem.add_variable("v", Some(lo), Some(hi), Category::Continuous).unwrap();
        prop_assert_eq!(var.lower_bound(), Some(lo));
        prop_assert_eq!(var.upper_bound(), Some(hi));
    }

    #[test]
    fn inverted_bounds_are_rejected(lo in -1e6f64..1e6, gap in 1e-3f64..1e6) {
        let mut problem = Problem::minimize("prop");
        let result = problem.add_variable("v", Some(lo), Some(lo - gap), Category::Integer);
        prop_assert!(matches!(result, Err(ModelError::InvalidBounds { .. })), "expected InvalidBounds, got {:?}", result);
    }
}
