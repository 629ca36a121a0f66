use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::problem::LpProblem;
use crate::solution::Solution;

/// A solver that can take an [`LpProblem`] and report a [`Solution`].
///
/// Infeasible and unbounded problems are reported through
/// [`Solution::status`]; `Err` is reserved for failures to run the solver
/// at all.
pub trait Backend: std::fmt::Debug {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    fn solve(&self, problem: &LpProblem, config: &SolverConfig) -> Result<Solution, SolverError>;
}
