use tracing::trace;

use crate::config::SolverConfig;
use crate::problem::ConstraintOp;
use crate::standard::StandardForm;

/// Consecutive degenerate pivots tolerated before switching to Bland's rule
const DEGENERATE_STREAK: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    IterationLimit,
}

/// Result of one LP relaxation, in standard-form columns
#[derive(Debug, Clone)]
pub(crate) struct LpOutcome {
    pub status: LpStatus,
    pub columns: Vec<f64>,
    pub iterations: usize,
}

/// Two-phase dense tableau simplex over a [`StandardForm`].
pub(crate) struct Simplex {
    /// Maximum iterations per phase before giving up
    max_iterations: usize,
    /// Tolerance for floating point comparisons
    tolerance: f64,
}

impl Simplex {
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }

    pub fn solve(&self, form: &StandardForm) -> LpOutcome {
        let mut tableau = self.build_tableau(form);
        let mut iterations = 0;

        // Phase 1: Find initial basic feasible solution
        if tableau.n_artificial > 0 {
            match self.phase1(&mut tableau, &mut iterations) {
                PhaseResult::Done => {}
                // Phase 1 is bounded by zero, so an unbounded ray means no feasible basis
                PhaseResult::Infeasible | PhaseResult::Unbounded => {
                    return self.outcome(LpStatus::Infeasible, None, iterations);
                }
                PhaseResult::IterationLimit => return self.outcome(LpStatus::IterationLimit, None, iterations),
            }
        }

        // Phase 2: Optimize
        let status = match self.phase2(&mut tableau, &mut iterations) {
            PhaseResult::Done => LpStatus::Optimal,
            PhaseResult::Unbounded => return self.outcome(LpStatus::Unbounded, None, iterations),
            PhaseResult::IterationLimit => LpStatus::IterationLimit,
            PhaseResult::Infeasible => return self.outcome(LpStatus::Infeasible, None, iterations),
        };

        self.outcome(status, Some(&tableau), iterations)
    }

    fn outcome(&self, status: LpStatus, tableau: Option<&Tableau>, iterations: usize) -> LpOutcome {
        let columns = tableau.map(|t| t.column_values()).unwrap_or_default();
        trace!(?status, iterations, "simplex finished");
        LpOutcome {
            status,
            columns,
            iterations,
        }
    }

    fn build_tableau(&self, form: &StandardForm) -> Tableau {
        let n_vars = form.n_cols;
        let n_constraints = form.rows.len();

        // Normalize every row to a non-negative RHS first
        let rows: Vec<(Vec<f64>, ConstraintOp, f64)> = form
            .rows
            .iter()
            .map(|row| {
                if row.rhs < 0.0 {
                    let coefficients = row.coefficients.iter().map(|a| -a).collect();
                    (coefficients, row.op.flipped(), -row.rhs)
                } else {
                    (row.coefficients.clone(), row.op, row.rhs)
                }
            })
            .collect();

        // Count slack and artificial variables needed
        let mut n_slack = 0;
        let mut n_artificial = 0;
        for (_, op, _) in &rows {
            match op {
                ConstraintOp::Le => n_slack += 1,
                ConstraintOp::Ge => {
                    n_slack += 1; // surplus
                    n_artificial += 1;
                }
                ConstraintOp::Eq => n_artificial += 1,
            }
        }

        let total_cols = n_vars + n_slack + n_artificial + 1; // +1 for RHS
        let total_rows = n_constraints + 1; // +1 for objective

        let mut tableau = Tableau {
            data: vec![vec![0.0; total_cols]; total_rows],
            basic_vars: vec![0; n_constraints],
            n_vars,
            n_slack,
            n_artificial,
        };

        let mut slack_idx = n_vars;
        let mut artificial_idx = n_vars + n_slack;

        for (i, (coefficients, op, rhs)) in rows.into_iter().enumerate() {
            tableau.data[i][..n_vars].copy_from_slice(&coefficients);
            tableau.data[i][total_cols - 1] = rhs;

            match op {
                ConstraintOp::Le => {
                    tableau.data[i][slack_idx] = 1.0;
                    tableau.basic_vars[i] = slack_idx;
                    slack_idx += 1;
                }
                ConstraintOp::Ge => {
                    tableau.data[i][slack_idx] = -1.0; // surplus
                    slack_idx += 1;
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
                ConstraintOp::Eq => {
                    tableau.data[i][artificial_idx] = 1.0;
                    tableau.basic_vars[i] = artificial_idx;
                    artificial_idx += 1;
                }
            }
        }

        // Objective row (last row) holds reduced costs of a maximization
        tableau.data[n_constraints][..n_vars].copy_from_slice(&form.objective);

        tableau
    }

    fn phase1(&self, tableau: &mut Tableau, iterations: &mut usize) -> PhaseResult {
        let n_constraints = tableau.data.len() - 1;
        let n_cols = tableau.data[0].len();
        let art_start = tableau.art_start();

        let orig_obj = tableau.data[n_constraints].clone();

        // Maximize -sum(artificials)
        tableau.data[n_constraints].iter_mut().for_each(|v| *v = 0.0);
        for j in art_start..(art_start + tableau.n_artificial) {
            tableau.data[n_constraints][j] = -1.0;
        }

        // Price out the basic artificials
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] += tableau.data[i][j];
                }
            }
        }

        match self.iterate(tableau, n_cols - 1, iterations) {
            PhaseResult::Done => {}
            other => return other,
        }

        let rhs_col = n_cols - 1;
        for i in 0..n_constraints {
            if tableau.basic_vars[i] >= art_start && tableau.data[i][rhs_col].abs() > self.tolerance.sqrt() {
                return PhaseResult::Infeasible;
            }
        }

        self.drive_out_artificials(tableau);

        // Restore original objective and adjust for basic variables
        tableau.data[n_constraints] = orig_obj;
        for i in 0..n_constraints {
            let basic = tableau.basic_vars[i];
            let ratio = tableau.data[n_constraints][basic];
            if ratio.abs() > self.tolerance {
                for j in 0..n_cols {
                    tableau.data[n_constraints][j] -= ratio * tableau.data[i][j];
                }
            }
        }

        PhaseResult::Done
    }

    /// Pivots zero-level artificials out of the basis. Rows where that is
    /// impossible are redundant and keep their artificial at zero.
    fn drive_out_artificials(&self, tableau: &mut Tableau) {
        let art_start = tableau.art_start();
        for i in 0..tableau.basic_vars.len() {
            if tableau.basic_vars[i] < art_start {
                continue;
            }
            if let Some(col) = (0..art_start).find(|&j| tableau.data[i][j].abs() > self.tolerance) {
                self.pivot(tableau, i, col);
            }
        }
    }

    fn phase2(&self, tableau: &mut Tableau, iterations: &mut usize) -> PhaseResult {
        // Artificial columns never re-enter
        let exclude_from = tableau.art_start();
        self.iterate(tableau, exclude_from, iterations)
    }

    fn iterate(&self, tableau: &mut Tableau, n_candidates: usize, iterations: &mut usize) -> PhaseResult {
        let mut degenerate = 0;
        for _ in 0..self.max_iterations {
            let bland = degenerate >= DEGENERATE_STREAK;
            let Some(pivot_col) = self.find_pivot_column(tableau, n_candidates, bland) else {
                return PhaseResult::Done;
            };
            let Some(pivot_row) = self.find_pivot_row(tableau, pivot_col, bland) else {
                return PhaseResult::Unbounded;
            };
            if tableau.data[pivot_row][tableau.rhs_col()].abs() <= self.tolerance {
                degenerate += 1;
            } else {
                degenerate = 0;
            }
            self.pivot(tableau, pivot_row, pivot_col);
            *iterations += 1;
        }
        PhaseResult::IterationLimit
    }

    /// Most positive reduced cost among the first `n_candidates` columns, or
    /// the first positive one under Bland's rule.
    fn find_pivot_column(&self, tableau: &Tableau, n_candidates: usize, bland: bool) -> Option<usize> {
        let obj_row = &tableau.data[tableau.data.len() - 1];

        if bland {
            return (0..n_candidates).find(|&j| obj_row[j] > self.tolerance);
        }

        let mut max_val = self.tolerance;
        let mut max_col = None;
        for (j, &value) in obj_row.iter().enumerate().take(n_candidates) {
            if value > max_val {
                max_val = value;
                max_col = Some(j);
            }
        }
        max_col
    }

    fn find_pivot_row(&self, tableau: &Tableau, col: usize, bland: bool) -> Option<usize> {
        let n_constraints = tableau.data.len() - 1;
        let rhs_col = tableau.rhs_col();

        let mut min_ratio = f64::INFINITY;
        let mut min_row: Option<usize> = None;

        for i in 0..n_constraints {
            let val = tableau.data[i][col];
            if val > self.tolerance {
                let ratio = tableau.data[i][rhs_col] / val;
                let better = ratio < min_ratio - self.tolerance
                    || (bland
                        && (ratio - min_ratio).abs() <= self.tolerance
                        && min_row.is_some_and(|r| tableau.basic_vars[i] < tableau.basic_vars[r]));
                if better {
                    min_ratio = ratio;
                    min_row = Some(i);
                }
            }
        }

        min_row
    }

    fn pivot(&self, tableau: &mut Tableau, row: usize, col: usize) {
        let n_rows = tableau.data.len();

        tableau.basic_vars[row] = col;

        let pivot_val = tableau.data[row][col];
        for v in tableau.data[row].iter_mut() {
            *v /= pivot_val;
        }

        let pivot_row = tableau.data[row].clone();
        for i in 0..n_rows {
            if i != row {
                let factor = tableau.data[i][col];
                if factor != 0.0 {
                    for (v, p) in tableau.data[i].iter_mut().zip(&pivot_row) {
                        *v -= factor * p;
                    }
                }
            }
        }
    }
}

struct Tableau {
    data: Vec<Vec<f64>>,
    basic_vars: Vec<usize>,
    n_vars: usize,
    n_slack: usize,
    n_artificial: usize,
}

impl Tableau {
    fn art_start(&self) -> usize {
        self.n_vars + self.n_slack
    }

    fn rhs_col(&self) -> usize {
        self.data[0].len() - 1
    }

    fn column_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.n_vars];
        if self.data.len() > 1 {
            let rhs_col = self.rhs_col();
            for (i, &basic) in self.basic_vars.iter().enumerate() {
                if basic < self.n_vars {
                    values[basic] = self.data[i][rhs_col];
                }
            }
        }
        values
    }
}

enum PhaseResult {
    Done,
    Unbounded,
    Infeasible,
    IterationLimit,
}
