//! Built-in backend: simplex relaxations inside a depth-first
//! branch-and-bound search for integer variables.

use std::time::Instant;

use tracing::{debug, info, trace};

use crate::backend::Backend;
use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::problem::LpProblem;
use crate::simplex::{LpStatus, Simplex};
use crate::solution::{Solution, SolutionStatus};
use crate::standard::StandardForm;

/// Simplex backend with branch-and-bound for integer variables
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplexBackend;

impl SimplexBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for SimplexBackend {
    fn name(&self) -> &str {
        "simplex"
    }

    fn solve(&self, problem: &LpProblem, config: &SolverConfig) -> Result<Solution, SolverError> {
        problem.check_dimensions().map_err(SolverError::InvalidProblem)?;
        let solution = BranchAndBound::new(problem, config).run();
        info!(
            problem = %problem.name,
            status = %solution.status,
            iterations = solution.iterations,
            nodes = solution.nodes,
            "simplex backend finished"
        );
        Ok(solution)
    }
}

/// A subproblem: the original problem with tightened bounds
struct Node {
    bounds: Vec<(f64, f64)>,
    depth: usize,
}

struct Incumbent {
    values: Vec<f64>,
    objective: f64,
}

struct BranchAndBound<'a> {
    problem: &'a LpProblem,
    config: &'a SolverConfig,
    simplex: Simplex,
    started: Instant,
    iterations: usize,
    nodes: usize,
}

enum Stop {
    Finished,
    Unbounded,
    Limit,
}

impl<'a> BranchAndBound<'a> {
    fn new(problem: &'a LpProblem, config: &'a SolverConfig) -> Self {
        Self {
            problem,
            config,
            simplex: Simplex::new(config),
            started: Instant::now(),
            iterations: 0,
            nodes: 0,
        }
    }

    fn run(mut self) -> Solution {
        let root = Node {
            bounds: self.problem.variables.iter().map(|v| (v.lower, v.upper)).collect(),
            depth: 0,
        };

        let mut incumbent: Option<Incumbent> = None;
        let stop = self.search(root, &mut incumbent);

        let solution = match (stop, incumbent) {
            (Stop::Unbounded, _) => Solution::unbounded(),
            (Stop::Finished, Some(best)) => Solution::optimal(best.values, best.objective),
            (Stop::Finished, None) => Solution::infeasible(),
            (Stop::Limit, Some(best)) => Solution {
                status: SolutionStatus::Undefined,
                values: best.values,
                objective_value: best.objective,
                iterations: 0,
                nodes: 0,
            },
            (Stop::Limit, None) => Solution::undefined(),
        };
        solution.with_counts(self.iterations, self.nodes)
    }

    fn search(&mut self, root: Node, incumbent: &mut Option<Incumbent>) -> Stop {
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if self.nodes >= self.config.max_nodes || self.out_of_time() {
                debug!(nodes = self.nodes, "branch-and-bound limit reached");
                return Stop::Limit;
            }
            self.nodes += 1;

            let form = StandardForm::lower(self.problem, &node.bounds);
            let outcome = self.simplex.solve(&form);
            self.iterations += outcome.iterations;

            match outcome.status {
                LpStatus::Optimal => {}
                LpStatus::Infeasible => {
                    trace!(depth = node.depth, "node infeasible");
                    continue;
                }
                LpStatus::Unbounded => return Stop::Unbounded,
                LpStatus::IterationLimit => return Stop::Limit,
            }

            let values = form.recover(&outcome.columns);
            let objective = self.problem.evaluate_objective(&values);

            if let Some(best) = incumbent {
                if !self.improves(objective, best.objective) {
                    trace!(depth = node.depth, objective, "node pruned by bound");
                    continue;
                }
            }

            let Some((j, value)) = self.most_fractional(&values) else {
                debug!(depth = node.depth, objective, "new incumbent");
                *incumbent = Some(Incumbent {
                    values: self.rounded(values),
                    objective,
                });
                continue;
            };

            let (lower, upper) = node.bounds[j];
            let (down, up) = (value.floor(), value.ceil());

            // Pushed first, explored last
            if up <= upper {
                let mut bounds = node.bounds.clone();
                bounds[j] = (up, upper);
                stack.push(Node {
                    bounds,
                    depth: node.depth + 1,
                });
            }
            if down >= lower {
                let mut bounds = node.bounds;
                bounds[j] = (lower, down);
                stack.push(Node {
                    bounds,
                    depth: node.depth + 1,
                });
            }
        }

        Stop::Finished
    }

    /// Whether `candidate` beats `best` by more than the tolerance
    fn improves(&self, candidate: f64, best: f64) -> bool {
        let margin = self.config.tolerance.sqrt() * (1.0 + best.abs());
        if self.problem.objective.minimize {
            candidate < best - margin
        } else {
            candidate > best + margin
        }
    }

    fn most_fractional(&self, values: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64, f64)> = None;
        for (j, (var, &value)) in self.problem.variables.iter().zip(values).enumerate() {
            if !var.integer {
                continue;
            }
            let distance = (value - value.round()).abs();
            if distance <= self.config.integrality_tolerance {
                continue;
            }
            if best.is_none_or(|(_, _, d)| distance > d) {
                best = Some((j, value, distance));
            }
        }
        best.map(|(j, value, _)| (j, value))
    }

    fn rounded(&self, mut values: Vec<f64>) -> Vec<f64> {
        for (var, value) in self.problem.variables.iter().zip(values.iter_mut()) {
            if var.integer {
                *value = value.round();
            }
        }
        values
    }

    fn out_of_time(&self) -> bool {
        self.config
            .time_limit()
            .is_some_and(|limit| self.started.elapsed() >= limit)
    }
}
