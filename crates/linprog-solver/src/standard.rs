//! Lowering of bounded variables into the non-negative form the simplex
//! tableau works on.

use crate::problem::{ConstraintOp, LpProblem};

/// How an original variable is expressed through standard-form columns
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnMap {
    /// x = offset + col
    Shifted { col: usize, offset: f64 },
    /// x = offset - col
    Reflected { col: usize, offset: f64 },
    /// x = pos - neg
    Free { pos: usize, neg: usize },
}

#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub coefficients: Vec<f64>,
    pub op: ConstraintOp,
    pub rhs: f64,
}

/// Problem with every column non-negative and every bound turned into a row.
#[derive(Debug, Clone)]
pub(crate) struct StandardForm {
    pub n_cols: usize,
    /// Objective coefficients, always in maximization sense
    pub objective: Vec<f64>,
    pub rows: Vec<Row>,
    mapping: Vec<ColumnMap>,
}

impl StandardForm {
    /// Lowers `problem`, overriding variable bounds with `bounds` when given.
    pub fn lower(problem: &LpProblem, bounds: &[(f64, f64)]) -> Self {
        let mut mapping = Vec::with_capacity(problem.num_variables());
        let mut n_cols = 0;
        let mut bound_rows: Vec<(usize, f64)> = Vec::new();

        for (j, var) in problem.variables.iter().enumerate() {
            let (lower, upper) = bounds.get(j).copied().unwrap_or((var.lower, var.upper));
            let map = if lower.is_finite() {
                if upper.is_finite() {
                    bound_rows.push((n_cols, upper - lower));
                }
                ColumnMap::Shifted { col: n_cols, offset: lower }
            } else if upper.is_finite() {
                ColumnMap::Reflected { col: n_cols, offset: upper }
            } else {
                n_cols += 1;
                ColumnMap::Free { pos: n_cols - 1, neg: n_cols }
            };
            n_cols += 1;
            mapping.push(map);
        }

        let sign = if problem.objective.minimize { -1.0 } else { 1.0 };
        let mut objective = vec![0.0; n_cols];
        for (map, &c) in mapping.iter().zip(&problem.objective.coefficients) {
            spread(map, sign * c, &mut objective);
        }

        let mut rows = Vec::with_capacity(problem.num_constraints() + bound_rows.len());
        for constraint in &problem.constraints {
            let mut coefficients = vec![0.0; n_cols];
            let mut rhs = constraint.rhs;
            for (map, &a) in mapping.iter().zip(&constraint.coefficients) {
                rhs -= spread(map, a, &mut coefficients);
            }
            rows.push(Row {
                coefficients,
                op: constraint.op,
                rhs,
            });
        }
        for (col, width) in bound_rows {
            let mut coefficients = vec![0.0; n_cols];
            coefficients[col] = 1.0;
            rows.push(Row {
                coefficients,
                op: ConstraintOp::Le,
                rhs: width,
            });
        }

        Self {
            n_cols,
            objective,
            rows,
            mapping,
        }
    }

    /// Maps standard-form column values back onto the original variables.
    pub fn recover(&self, columns: &[f64]) -> Vec<f64> {
        self.mapping
            .iter()
            .map(|map| match *map {
                ColumnMap::Shifted { col, offset } => offset + columns[col],
                ColumnMap::Reflected { col, offset } => offset - columns[col],
                ColumnMap::Free { pos, neg } => columns[pos] - columns[neg],
            })
            .collect()
    }
}

/// Adds `a * x` to `row` and returns the constant part of `a * x`.
fn spread(map: &ColumnMap, a: f64, row: &mut [f64]) -> f64 {
    match *map {
        ColumnMap::Shifted { col, offset } => {
            row[col] += a;
            a * offset
        }
        ColumnMap::Reflected { col, offset } => {
            row[col] -= a;
            a * offset
        }
        ColumnMap::Free { pos, neg } => {
            row[pos] += a;
            row[neg] -= a;
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::LpVariable;

    #[test]
    fn test_lower_shift_reflect_and_split() {
        let mut problem = LpProblem::new(
            "lowering",
            vec![
                LpVariable::continuous("a", 2.0, 5.0),
                LpVariable::continuous("b", f64::NEG_INFINITY, 4.0),
                LpVariable::continuous("c", f64::NEG_INFINITY, f64::INFINITY),
            ],
        );
        problem.set_objective(vec![1.0, 1.0, 1.0], true);
        problem.add_constraint("row", vec![1.0, 2.0, 3.0], ConstraintOp::Le, 10.0);

        let form = StandardForm::lower(&problem, &[]);

        assert_eq!(form.n_cols, 4);
        // minimization is negated into maximization
        assert_eq!(form.objective, vec![-1.0, 1.0, -1.0, 1.0]);
        // 10 - 1*2 - 2*4
        assert_eq!(form.rows[0].rhs, 0.0);
        assert_eq!(form.rows[0].coefficients, vec![1.0, -2.0, 3.0, -3.0]);
        // upper bound of `a` becomes a row of width 3
        assert_eq!(form.rows.len(), 2);
        assert_eq!(form.rows[1].rhs, 3.0);

        let values = form.recover(&[1.0, 0.5, 0.0, 2.0]);
        assert_eq!(values, vec![3.0, 3.5, -2.0]);
    }

    #[test]
    fn test_bound_override() {
        let problem = LpProblem::new("override", vec![LpVariable::integer("x", 0.0, 10.0)]);

        let form = StandardForm::lower(&problem, &[(3.0, 3.0)]);

        assert_eq!(form.rows.len(), 1);
        assert_eq!(form.rows[0].rhs, 0.0);
        assert_eq!(form.recover(&[0.0]), vec![3.0]);
    }
}
