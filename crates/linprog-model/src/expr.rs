//! Linear expressions and constraints.
//!
//! Expressions are plain values: every combinator returns a new expression
//! and nothing is registered with a problem until it is passed to
//! [`Problem::set_objective`](crate::Problem::set_objective) or
//! [`Problem::add_constraint`](crate::Problem::add_constraint).

use std::collections::BTreeMap;

use linprog_solver::ConstraintOp;

use crate::variable::{Variable, VariableId};

/// A weighted sum of variables plus a constant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    terms: BTreeMap<VariableId, f64>,
    constant: f64,
}

impl LinearExpression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    /// `coefficient * var`
    pub fn term(var: &Variable, coefficient: f64) -> Self {
        Self::new().with_term(var, coefficient)
    }

    /// Sum of the variables, each with coefficient 1
    pub fn sum<'a>(vars: impl IntoIterator<Item = &'a Variable>) -> Self {
        vars.into_iter().fold(Self::new(), |expr, var| expr.with_term(var, 1.0))
    }

    /// Dot product of variables and coefficients, paired in iteration order.
    /// Extra items on either side are ignored.
    pub fn dot<'a>(
        vars: impl IntoIterator<Item = &'a Variable>,
        coefficients: impl IntoIterator<Item = f64>,
    ) -> Self {
        vars.into_iter()
            .zip(coefficients)
            .fold(Self::new(), |expr, (var, c)| expr.with_term(var, c))
    }

    /// Adds `coefficient * var`, accumulating onto an existing term
    pub fn with_term(mut self, var: &Variable, coefficient: f64) -> Self {
        *self.terms.entry(var.id).or_insert(0.0) += coefficient;
        self
    }

    pub fn with_constant(mut self, value: f64) -> Self {
        self.constant += value;
        self
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            terms: self.terms.iter().map(|(&id, &c)| (id, c * factor)).collect(),
            constant: self.constant * factor,
        }
    }

    pub fn add(&self, other: &LinearExpression) -> Self {
        let mut result = self.clone();
        for (&id, &c) in &other.terms {
            *result.terms.entry(id).or_insert(0.0) += c;
        }
        result.constant += other.constant;
        result
    }

    pub fn sub(&self, other: &LinearExpression) -> Self {
        self.add(&other.scale(-1.0))
    }

    pub fn coefficient(&self, var: &Variable) -> f64 {
        self.terms.get(&var.id).copied().unwrap_or(0.0)
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    /// Terms ordered by variable creation order
    pub fn terms(&self) -> impl Iterator<Item = (VariableId, f64)> + '_ {
        self.terms.iter().map(|(&id, &c)| (id, c))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn compare(self, relation: Relation, bound: f64) -> Constraint {
        Constraint {
            expression: self,
            relation,
            bound,
        }
    }

    pub fn less_or_equal(self, bound: f64) -> Constraint {
        self.compare(Relation::LessOrEqual, bound)
    }

    pub fn greater_or_equal(self, bound: f64) -> Constraint {
        self.compare(Relation::GreaterOrEqual, bound)
    }

    pub fn equal_to(self, bound: f64) -> Constraint {
        self.compare(Relation::Equal, bound)
    }

    /// `self <= other`, stated as `self - other <= 0`
    pub fn less_or_equal_expr(&self, other: &LinearExpression) -> Constraint {
        self.sub(other).less_or_equal(0.0)
    }

    /// `self >= other`, stated as `self - other >= 0`
    pub fn greater_or_equal_expr(&self, other: &LinearExpression) -> Constraint {
        self.sub(other).greater_or_equal(0.0)
    }

    /// `self = other`, stated as `self - other = 0`
    pub fn equal_to_expr(&self, other: &LinearExpression) -> Constraint {
        self.sub(other).equal_to(0.0)
    }
}

impl From<&Variable> for LinearExpression {
    fn from(var: &Variable) -> Self {
        Self::term(var, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessOrEqual,
    GreaterOrEqual,
    Equal,
}

impl Relation {
    pub fn symbol(self) -> &'static str {
        self.op().symbol()
    }

    pub(crate) fn op(self) -> ConstraintOp {
        match self {
            Relation::LessOrEqual => ConstraintOp::Le,
            Relation::GreaterOrEqual => ConstraintOp::Ge,
            Relation::Equal => ConstraintOp::Eq,
        }
    }
}

/// `expression <relation> bound`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    expression: LinearExpression,
    relation: Relation,
    bound: f64,
}

impl Constraint {
    pub fn expression(&self) -> &LinearExpression {
        &self.expression
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Right-hand side once the expression's constant is moved across
    pub fn rhs(&self) -> f64 {
        self.bound - self.expression.constant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Category;

    fn var(index: usize, name: &str) -> Variable {
        Variable {
            id: VariableId { problem: 0, index },
            name: name.to_string(),
            lower: None,
            upper: None,
            category: Category::Continuous,
        }
    }

    #[test]
    fn test_combination() {
        let x = var(0, "x");
        let y = var(1, "y");

        // 3x - 5y
        let expr = LinearExpression::term(&x, 3.0).sub(&LinearExpression::term(&y, 5.0));

        assert_eq!(expr.coefficient(&x), 3.0);
        assert_eq!(expr.coefficient(&y), -5.0);
        assert_eq!(expr.constant_term(), 0.0);
    }

    #[test]
    fn test_repeated_terms_accumulate() {
        let x = var(0, "x");

        let expr = LinearExpression::sum([&x, &x]).with_term(&x, 0.5);

        assert_eq!(expr.coefficient(&x), 2.5);
        assert_eq!(expr.terms().count(), 1);
    }

    #[test]
    fn test_dot_pairs_in_order() {
        let vars = [var(0, "a"), var(1, "b"), var(2, "c")];

        let expr = LinearExpression::dot(&vars, [1.0, 2.0]);

        assert_eq!(expr.coefficient(&vars[0]), 1.0);
        assert_eq!(expr.coefficient(&vars[1]), 2.0);
        assert_eq!(expr.coefficient(&vars[2]), 0.0);
    }

    #[test]
    fn test_scale_leaves_original_untouched() {
        let x = var(0, "x");
        let expr = LinearExpression::from(&x).with_constant(2.0);

        let scaled = expr.scale(-3.0);

        assert_eq!(scaled.coefficient(&x), -3.0);
        assert_eq!(scaled.constant_term(), -6.0);
        assert_eq!(expr.coefficient(&x), 1.0);
    }

    #[test]
    fn test_expression_comparison_moves_everything_left() {
        let x = var(0, "x");
        let y = var(1, "y");

        // y <= x
        let c = LinearExpression::from(&y).less_or_equal_expr(&LinearExpression::from(&x));

        assert_eq!(c.relation(), Relation::LessOrEqual);
        assert_eq!(c.bound(), 0.0);
        assert_eq!(c.expression().coefficient(&x), -1.0);
        assert_eq!(c.expression().coefficient(&y), 1.0);
    }

    #[test]
    fn test_rhs_absorbs_constant() {
        let x = var(0, "x");

        let c = LinearExpression::from(&x).with_constant(4.0).equal_to(10.0);

        assert_eq!(c.rhs(), 6.0);
        assert_eq!(c.relation().symbol(), "=");
    }
}
