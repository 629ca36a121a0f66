use std::collections::HashMap;
use std::hash::Hash;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use linprog_solver::{
    Backend, LpProblem, LpVariable, SimplexBackend, SolutionStatus, SolverConfig, SolverError,
};
use tracing::{debug, info, warn};

use crate::error::ModelError;
use crate::expr::{Constraint, LinearExpression};
use crate::family::{IndexLabel, VariableFamily};
use crate::variable::{Category, Variable, VariableId, sanitize_name};

static NEXT_PROBLEM: AtomicU64 = AtomicU64::new(1);

/// Optimization direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

#[derive(Debug, Clone)]
pub struct NamedConstraint {
    pub name: String,
    pub constraint: Constraint,
}

/// An optimization problem under construction, and its latest solve result.
///
/// A new problem solves with [`SimplexBackend`]; use [`Problem::set_backend`]
/// or [`Problem::solve_with`] for another backend.
#[derive(Debug)]
pub struct Problem {
    token: u64,
    name: String,
    sense: Sense,
    variables: Vec<Variable>,
    names: HashMap<String, usize>,
    objective: LinearExpression,
    objective_set: bool,
    constraints: Vec<NamedConstraint>,
    config: SolverConfig,
    backend: Option<Box<dyn Backend>>,
    status: SolutionStatus,
    values: Option<Vec<f64>>,
    objective_value: Option<f64>,
}

impl Problem {
    pub fn new(name: impl Into<String>, sense: Sense) -> Self {
        Self {
            token: NEXT_PROBLEM.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            sense,
            variables: Vec::new(),
            names: HashMap::new(),
            objective: LinearExpression::new(),
            objective_set: false,
            constraints: Vec::new(),
            config: SolverConfig::default(),
            backend: Some(Box::new(SimplexBackend::new())),
            status: SolutionStatus::NotSolved,
            values: None,
            objective_value: None,
        }
    }

    pub fn minimize(name: impl Into<String>) -> Self {
        Self::new(name, Sense::Minimize)
    }

    pub fn maximize(name: impl Into<String>) -> Self {
        Self::new(name, Sense::Maximize)
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    pub fn set_backend(&mut self, backend: impl Backend + 'static) {
        self.backend = Some(Box::new(backend));
    }

    /// Removes the backend; [`Problem::solve`] then fails with
    /// [`ModelError::SolverUnavailable`].
    pub fn clear_backend(&mut self) {
        self.backend = None;
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    /// Creates a decision variable.
    ///
    /// `None` bounds are unbounded. Bounds are validated for every
    /// category, then binary variables get bounds [0, 1]. Characters
    /// rejected by LP file readers are replaced by `_` in the name.
    pub fn add_variable(
        &mut self,
        name: &str,
        lower: Option<f64>,
        upper: Option<f64>,
        category: Category,
    ) -> Result<Variable, ModelError> {
        let name = sanitize_name(name);
        let (lower, upper) = match (category, check_bounds(&name, lower, upper)?) {
            (Category::Binary, _) => (Some(0.0), Some(1.0)),
            (_, bounds) => bounds,
        };
        if self.names.contains_key(&name) {
            return Err(ModelError::DuplicateVariable(name));
        }

        let var = Variable {
            id: VariableId {
                problem: self.token,
                index: self.variables.len(),
            },
            name: name.clone(),
            lower,
            upper,
            category,
        };
        self.names.insert(name, self.variables.len());
        self.variables.push(var.clone());
        Ok(var)
    }

    /// Creates one variable per index element, named `prefix_label`.
    pub fn add_variable_family<K, I>(
        &mut self,
        prefix: &str,
        indices: I,
        lower: Option<f64>,
        upper: Option<f64>,
        category: Category,
    ) -> Result<VariableFamily<K>, ModelError>
    where
        K: IndexLabel + Eq + Hash + Clone,
        I: IntoIterator<Item = K>,
    {
        let indices = indices.into_iter();
        let mut family = VariableFamily::with_capacity(indices.size_hint().0);
        for key in indices {
            let name = format!("{}_{}", prefix, key.label());
            let var = self.add_variable(&name, lower, upper, category)?;
            family.insert(key, var);
        }
        Ok(family)
    }

    /// Records the objective. A second call replaces the first.
    pub fn set_objective(&mut self, sense: Sense, expression: LinearExpression) -> Result<(), ModelError> {
        self.check_expression(&expression, "objective")?;
        if self.objective_set {
            debug!(problem = %self.name, "replacing objective");
        }
        self.sense = sense;
        self.objective = expression;
        self.objective_set = true;
        Ok(())
    }

    /// Appends a constraint named `_C<n>`, where n is its 1-based position.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ModelError> {
        let name = format!("_C{}", self.constraints.len() + 1);
        self.add_named_constraint(&name, constraint)
    }

    pub fn add_named_constraint(&mut self, name: &str, constraint: Constraint) -> Result<(), ModelError> {
        let name = sanitize_name(name);
        self.check_expression(constraint.expression(), &name)?;
        // the constant is moved across, so a finite bound can still overflow
        if !constraint.bound().is_finite() || !constraint.rhs().is_finite() {
            return Err(ModelError::NonFiniteCoefficient(format!("{} bound", name)));
        }
        self.constraints.push(NamedConstraint { name, constraint });
        Ok(())
    }

    /// Solves with the configured backend.
    ///
    /// Infeasible and unbounded problems are reported through the returned
    /// status. Only a missing or unreachable backend is an error.
    pub fn solve(&mut self) -> Result<SolutionStatus, ModelError> {
        let Some(backend) = self.backend.take() else {
            self.clear_result();
            return Err(ModelError::SolverUnavailable("no backend configured".to_string()));
        };
        let result = self.solve_with(backend.as_ref());
        self.backend = Some(backend);
        result
    }

    pub fn solve_with(&mut self, backend: &dyn Backend) -> Result<SolutionStatus, ModelError> {
        let lp = self.to_lp_problem();
        info!(
            problem = %self.name,
            backend = backend.name(),
            variables = lp.num_variables(),
            constraints = lp.num_constraints(),
            "solving"
        );
        self.clear_result();

        match backend.solve(&lp, &self.config) {
            Ok(solution) => {
                self.status = solution.status;
                if solution.status.is_optimal() {
                    self.values = Some(solution.values);
                    self.objective_value = Some(solution.objective_value);
                }
            }
            Err(SolverError::Unavailable(msg)) => return Err(ModelError::SolverUnavailable(msg)),
            Err(e) => {
                warn!(problem = %self.name, backend = backend.name(), error = %e, "backend failed");
                self.status = SolutionStatus::Undefined;
            }
        }
        Ok(self.status)
    }

    fn clear_result(&mut self) {
        self.status = SolutionStatus::NotSolved;
        self.values = None;
        self.objective_value = None;
    }

    /// Lowers the problem into the backend-neutral form.
    pub fn to_lp_problem(&self) -> LpProblem {
        let n = self.variables.len();
        let variables = self
            .variables
            .iter()
            .map(|v| LpVariable {
                name: v.name.clone(),
                lower: v.lower.unwrap_or(f64::NEG_INFINITY),
                upper: v.upper.unwrap_or(f64::INFINITY),
                integer: v.category.is_integer(),
            })
            .collect();

        let mut lp = LpProblem::new(self.name.clone(), variables);
        lp.set_objective(dense(&self.objective, n), self.sense == Sense::Minimize);
        lp.set_objective_constant(self.objective.constant_term());
        for c in &self.constraints {
            let constraint = &c.constraint;
            lp.add_constraint(
                c.name.clone(),
                dense(constraint.expression(), n),
                constraint.relation().op(),
                constraint.rhs(),
            );
        }
        lp
    }

    /// Writes the problem in the CPLEX `.lp` format.
    pub fn write_lp<W: Write>(&self, writer: W) -> Result<(), ModelError> {
        linprog_solver::lp_format::write_lp(&self.to_lp_problem(), writer)?;
        Ok(())
    }

    pub fn to_lp_string(&self) -> String {
        linprog_solver::lp_format::display_lp(&self.to_lp_problem()).to_string()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn objective(&self) -> &LinearExpression {
        &self.objective
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.names.get(name).map(|&i| &self.variables[i])
    }

    pub fn constraints(&self) -> &[NamedConstraint] {
        &self.constraints
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn status(&self) -> SolutionStatus {
        self.status
    }

    /// Objective value of the last solve; `None` unless it was optimal
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Solved value of `var`; `None` before an optimal solve or for a
    /// variable of another problem
    pub fn value(&self, var: &Variable) -> Option<f64> {
        if var.id.problem != self.token {
            return None;
        }
        self.values.as_ref()?.get(var.id.index).copied()
    }

    /// Value of `expression` at the solved point
    pub fn evaluate(&self, expression: &LinearExpression) -> Option<f64> {
        let values = self.values.as_ref()?;
        let mut total = expression.constant_term();
        for (id, c) in expression.terms() {
            if id.problem != self.token {
                return None;
            }
            total += c * values.get(id.index)?;
        }
        Some(total)
    }

    fn check_expression(&self, expression: &LinearExpression, context: &str) -> Result<(), ModelError> {
        if !expression.constant_term().is_finite() {
            return Err(ModelError::NonFiniteCoefficient(format!("{} constant", context)));
        }
        for (id, c) in expression.terms() {
            if id.problem != self.token || id.index >= self.variables.len() {
                return Err(ModelError::ForeignVariable(format!(
                    "#{} referenced by {}",
                    id.index, context
                )));
            }
            if !c.is_finite() {
                return Err(ModelError::NonFiniteCoefficient(format!(
                    "{} (variable {})",
                    context, self.variables[id.index].name
                )));
            }
        }
        Ok(())
    }
}

fn check_bounds(
    name: &str,
    lower: Option<f64>,
    upper: Option<f64>,
) -> Result<(Option<f64>, Option<f64>), ModelError> {
    let invalid = || ModelError::InvalidBounds {
        name: name.to_string(),
        lower: lower.unwrap_or(f64::NEG_INFINITY),
        upper: upper.unwrap_or(f64::INFINITY),
    };
    let lo = lower.unwrap_or(f64::NEG_INFINITY);
    let hi = upper.unwrap_or(f64::INFINITY);
    // also rejects NaN, +inf lower bounds and -inf upper bounds
    if !(lo <= hi) || lo == f64::INFINITY || hi == f64::NEG_INFINITY {
        return Err(invalid());
    }
    Ok((lower.filter(|l| l.is_finite()), upper.filter(|u| u.is_finite())))
}

fn dense(expression: &LinearExpression, n: usize) -> Vec<f64> {
    let mut coefficients = vec![0.0; n];
    for (id, c) in expression.terms() {
        coefficients[id.index] += c;
    }
    coefficients
}
