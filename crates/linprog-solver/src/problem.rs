/// A linear (or mixed-integer) program in backend-neutral form.
///
/// Coefficient vectors are dense and indexed like `variables`.
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Problem name, used for diagnostics and exported files
    pub name: String,
    /// Decision variables
    pub variables: Vec<LpVariable>,
    /// Objective function
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LpVariable {
    pub name: String,
    /// `f64::NEG_INFINITY` when unbounded below
    pub lower: f64,
    /// `f64::INFINITY` when unbounded above
    pub upper: f64,
    /// Whether the variable must take an integral value
    pub integer: bool,
}

#[derive(Debug, Clone)]
pub struct Objective {
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Constant offset added to the objective value
    pub constant: f64,
    /// Whether to minimize or maximize
    pub minimize: bool,
}

#[derive(Debug, Clone)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
    /// Equal (=)
    Eq,
}

impl ConstraintOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Ge => ">=",
            ConstraintOp::Eq => "=",
        }
    }

    /// The operator obtained by multiplying both sides by -1
    pub fn flipped(self) -> Self {
        match self {
            ConstraintOp::Le => ConstraintOp::Ge,
            ConstraintOp::Ge => ConstraintOp::Le,
            ConstraintOp::Eq => ConstraintOp::Eq,
        }
    }
}

impl LpVariable {
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            integer: false,
        }
    }

    pub fn integer(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            integer: true,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.integer && self.lower == 0.0 && self.upper == 1.0
    }
}

impl LpProblem {
    pub fn new(name: impl Into<String>, variables: Vec<LpVariable>) -> Self {
        let n = variables.len();
        Self {
            name: name.into(),
            variables,
            objective: Objective {
                coefficients: vec![0.0; n],
                constant: 0.0,
                minimize: true,
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: Vec<f64>, minimize: bool) {
        self.objective = Objective {
            coefficients,
            constant: 0.0,
            minimize,
        };
    }

    pub fn set_objective_constant(&mut self, constant: f64) {
        self.objective.constant = constant;
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn has_integers(&self) -> bool {
        self.variables.iter().any(|v| v.integer)
    }

    /// Objective value (constant included) at the given point
    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective
            .coefficients
            .iter()
            .zip(values)
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.objective.constant
    }

    /// Checks that every coefficient vector matches the variable count
    pub(crate) fn check_dimensions(&self) -> Result<(), String> {
        let n = self.num_variables();
        if self.objective.coefficients.len() != n {
            return Err(format!(
                "objective has {} coefficients for {} variables",
                self.objective.coefficients.len(),
                n
            ));
        }
        for c in &self.constraints {
            if c.coefficients.len() != n {
                return Err(format!(
                    "constraint {} has {} coefficients for {} variables",
                    c.name,
                    c.coefficients.len(),
                    n
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_objective_includes_constant() {
        let mut problem = LpProblem::new(
            "eval",
            vec![
                LpVariable::continuous("x", 0.0, f64::INFINITY),
                LpVariable::continuous("y", 0.0, f64::INFINITY),
            ],
        );
        problem.set_objective(vec![2.0, -1.0], true);
        problem.set_objective_constant(4.0);

        assert_eq!(problem.evaluate_objective(&[3.0, 1.0]), 9.0);
    }

    #[test]
    fn test_check_dimensions_reports_mismatch() {
        let mut problem = LpProblem::new("dims", vec![LpVariable::continuous("x", 0.0, 1.0)]);
        problem.add_constraint("bad", vec![1.0, 1.0], ConstraintOp::Le, 1.0);

        let err = problem.check_dimensions().unwrap_err();
        assert!(err.contains("bad"));
    }

    #[test]
    fn test_binary_detection() {
        assert!(LpVariable::integer("b", 0.0, 1.0).is_binary());
        assert!(!LpVariable::integer("i", 0.0, 2.0).is_binary());
        assert!(!LpVariable::continuous("c", 0.0, 1.0).is_binary());
    }
}
