//! Backend that shells out to the COIN-OR `cbc` executable.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::lp_format::write_lp;
use crate::problem::LpProblem;
use crate::solution::{Solution, SolutionStatus};

#[derive(Debug, Clone, Default)]
pub struct CbcBackend {
    /// Overrides `SolverConfig::cbc_command` when set
    command: Option<PathBuf>,
}

impl CbcBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = Some(command.into());
        self
    }

    fn command<'a>(&'a self, config: &'a SolverConfig) -> &'a Path {
        self.command
            .as_deref()
            .unwrap_or_else(|| Path::new(&config.cbc_command))
    }

    fn arguments(&self, lp_file: &Path, solution_file: &Path, config: &SolverConfig) -> Vec<String> {
        let mut args = vec![lp_file.display().to_string()];
        if let Some(seconds) = config.time_limit_seconds {
            args.push("sec".to_string());
            args.push(seconds.to_string());
        }
        args.extend([
            "solve".to_string(),
            "solution".to_string(),
            solution_file.display().to_string(),
        ]);
        args
    }
}

impl Backend for CbcBackend {
    fn name(&self) -> &str {
        "cbc"
    }

    fn solve(&self, problem: &LpProblem, config: &SolverConfig) -> Result<Solution, SolverError> {
        problem.check_dimensions().map_err(SolverError::InvalidProblem)?;

        let dir = tempfile::Builder::new().prefix("linprog_cbc").tempdir()?;
        let lp_file = dir.path().join("problem.lp");
        let solution_file = dir.path().join("solution.txt");
        write_lp(problem, std::fs::File::create(&lp_file)?)?;

        let command = self.command(config);
        debug!(command = %command.display(), lp_file = %lp_file.display(), "running cbc");
        let output = Command::new(command)
            .args(self.arguments(&lp_file, &solution_file, config))
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    SolverError::Unavailable(format!("cannot run {}: {}", command.display(), e))
                }
                _ => SolverError::Io(e),
            })?;

        if !output.status.success() {
            return Err(SolverError::Failed(format!(
                "{} exited with {}: {}",
                command.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let file = std::fs::File::open(&solution_file).map_err(|e| {
            warn!(error = %e, "cbc produced no solution file");
            SolverError::MalformedOutput(format!("missing solution file: {}", e))
        })?;
        let solution = read_solution(file, problem)?;
        info!(problem = %problem.name, status = %solution.status, "cbc backend finished");
        Ok(solution)
    }
}

/// Parses a CBC solution file.
///
/// CBC only lists non-zero variables, so every other variable defaults to 0.
pub(crate) fn read_solution<R: Read>(reader: R, problem: &LpProblem) -> Result<Solution, SolverError> {
    let mut lines = BufReader::new(reader).lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| SolverError::MalformedOutput("empty solution file".to_string()))?;
    let status = match header.split_whitespace().next() {
        Some("Optimal") => SolutionStatus::Optimal,
        // "Infeasible" or "Integer infeasible"
        Some("Infeasible") | Some("Integer") => SolutionStatus::Infeasible,
        Some("Unbounded") => SolutionStatus::Unbounded,
        // "Stopped on time", "Stopped on iterations", ...
        Some("Stopped") => SolutionStatus::Undefined,
        _ => {
            return Err(SolverError::MalformedOutput(format!(
                "unrecognized status line: {}",
                header
            )));
        }
    };

    if status != SolutionStatus::Optimal {
        return Ok(match status {
            SolutionStatus::Infeasible => Solution::infeasible(),
            SolutionStatus::Unbounded => Solution::unbounded(),
            _ => Solution::undefined(),
        });
    }

    let index: HashMap<&str, usize> = problem
        .variables
        .iter()
        .enumerate()
        .map(|(j, v)| (v.name.as_str(), j))
        .collect();
    let mut values = vec![0.0; problem.num_variables()];

    for line in lines {
        let line = line?;
        let mut fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        // infeasible rows are flagged with a leading "**"
        if fields[0] == "**" {
            fields.remove(0);
        }
        if fields.len() != 4 {
            return Err(SolverError::MalformedOutput(format!("unexpected line: {}", line)));
        }
        let value: f64 = fields[2]
            .parse()
            .map_err(|_| SolverError::MalformedOutput(format!("bad value in line: {}", line)))?;
        match index.get(fields[1]) {
            Some(&j) => values[j] = value,
            None => debug!(name = fields[1], "ignoring unknown column in cbc output"),
        }
    }

    let objective_value = problem.evaluate_objective(&values);
    Ok(Solution::optimal(values, objective_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpVariable;

    fn problem() -> LpProblem {
        let mut problem = LpProblem::new(
            "cbc",
            vec![
                LpVariable::continuous("x", 0.0, f64::INFINITY),
                LpVariable::integer("y", f64::NEG_INFINITY, 5.0),
                LpVariable::continuous("z", 0.0, f64::INFINITY),
            ],
        );
        problem.set_objective(vec![3.0, -5.0, 1.0], true);
        problem
    }

    #[test]
    fn test_read_optimal_solution() {
        let output = "Optimal - objective value -10.00000000\n      0 x                      5                       0\n      1 y                      5                      -5\n";

        let solution = read_solution(output.as_bytes(), &problem()).unwrap();

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.values, vec![5.0, 5.0, 0.0]);
        assert_eq!(solution.objective_value, -10.0);
    }

    #[test]
    fn test_read_flagged_line() {
        let output = "Optimal - objective value 1\n** 2 z 1 0\n";

        let solution = read_solution(output.as_bytes(), &problem()).unwrap();

        assert_eq!(solution.values[2], 1.0);
    }

    #[test]
    fn test_read_statuses() {
        let cases = [
            ("Infeasible - objective value 0", SolutionStatus::Infeasible),
            ("Integer infeasible - objective value 0", SolutionStatus::Infeasible),
            ("Unbounded - objective value 0", SolutionStatus::Unbounded),
            ("Stopped on time - objective value 0", SolutionStatus::Undefined),
        ];
        for (header, expected) in cases {
            let solution = read_solution(header.as_bytes(), &problem()).unwrap();
            assert_eq!(solution.status, expected, "{}", header);
        }
    }

    #[test]
    fn test_read_garbage_is_malformed() {
        let result = read_solution("Segmentation fault".as_bytes(), &problem());
        assert!(matches!(result, Err(SolverError::MalformedOutput(_))));

        let result = read_solution("".as_bytes(), &problem());
        assert!(matches!(result, Err(SolverError::MalformedOutput(_))));
    }

    #[test]
    fn test_missing_executable_is_unavailable() {
        let backend = CbcBackend::new().with_command("/nonexistent/linprog-cbc");

        let result = backend.solve(&problem(), &SolverConfig::default());

        assert!(matches!(result, Err(SolverError::Unavailable(_))));
    }

    #[test]
    fn test_arguments_include_time_limit() {
        let backend = CbcBackend::new();
        let config = SolverConfig::default().with_time_limit(30.0);

        let args = backend.arguments(Path::new("p.lp"), Path::new("s.txt"), &config);

        assert_eq!(args, vec!["p.lp", "sec", "30", "solve", "solution", "s.txt"]);
    }
}
