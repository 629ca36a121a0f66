use serde::Serialize;

/// The result of solving an LP problem
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status
    pub status: SolutionStatus,
    /// Values for each variable; empty unless the solver found a point
    pub values: Vec<f64>,
    /// Objective value at `values` (constant included)
    pub objective_value: f64,
    /// Simplex pivots performed across all nodes
    pub iterations: usize,
    /// Branch-and-bound nodes explored
    pub nodes: usize,
}

/// Outcome classification reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SolutionStatus {
    /// An optimal solution was found
    Optimal,
    /// The problem is infeasible (no solution exists)
    Infeasible,
    /// The problem is unbounded
    Unbounded,
    /// No solve has been attempted
    NotSolved,
    /// The solver stopped without a conclusive answer
    Undefined,
}

impl SolutionStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolutionStatus::Optimal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolutionStatus::Optimal => "Optimal",
            SolutionStatus::Infeasible => "Infeasible",
            SolutionStatus::Unbounded => "Unbounded",
            SolutionStatus::NotSolved => "Not Solved",
            SolutionStatus::Undefined => "Undefined",
        }
    }

    /// Numeric status code: 1 optimal, 0 not solved, -1 infeasible,
    /// -2 unbounded, -3 undefined.
    pub fn code(self) -> i32 {
        match self {
            SolutionStatus::Optimal => 1,
            SolutionStatus::NotSolved => 0,
            SolutionStatus::Infeasible => -1,
            SolutionStatus::Unbounded => -2,
            SolutionStatus::Undefined => -3,
        }
    }
}

impl std::fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Solution {
    pub fn optimal(values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status: SolutionStatus::Optimal,
            values,
            objective_value,
            iterations: 0,
            nodes: 0,
        }
    }

    pub fn infeasible() -> Self {
        Self::without_point(SolutionStatus::Infeasible, f64::INFINITY)
    }

    pub fn unbounded() -> Self {
        Self::without_point(SolutionStatus::Unbounded, f64::NEG_INFINITY)
    }

    pub fn undefined() -> Self {
        Self::without_point(SolutionStatus::Undefined, f64::NAN)
    }

    fn without_point(status: SolutionStatus, objective_value: f64) -> Self {
        Self {
            status,
            values: Vec::new(),
            objective_value,
            iterations: 0,
            nodes: 0,
        }
    }

    pub(crate) fn with_counts(mut self, iterations: usize, nodes: usize) -> Self {
        self.iterations = iterations;
        self.nodes = nodes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SolutionStatus::Optimal.code(), 1);
        assert_eq!(SolutionStatus::NotSolved.code(), 0);
        assert_eq!(SolutionStatus::Infeasible.code(), -1);
        assert_eq!(SolutionStatus::Unbounded.code(), -2);
        assert_eq!(SolutionStatus::Undefined.code(), -3);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolutionStatus::Optimal.to_string(), "Optimal");
        assert_eq!(SolutionStatus::NotSolved.to_string(), "Not Solved");
    }

    #[test]
    fn test_constructors_leave_values_empty() {
        assert!(Solution::infeasible().values.is_empty());
        assert!(Solution::unbounded().values.is_empty());
        assert!(Solution::undefined().objective_value.is_nan());
    }
}
