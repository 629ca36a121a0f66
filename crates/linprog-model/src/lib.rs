//! Building and reporting linear programs.
//!
//! ```
//! use linprog_model::{Category, LinearExpression, Problem, Sense};
//! use linprog_solver::SolutionStatus;
//!
//! let mut problem = Problem::minimize("doc");
//! let x = problem.add_variable("x", Some(1.0), None, Category::Continuous).unwrap();
//! problem.set_objective(Sense::Minimize, LinearExpression::term(&x, 2.0)).unwrap();
//!
//! assert_eq!(problem.solve().unwrap(), SolutionStatus::Optimal);
//! assert_eq!(problem.value(&x), Some(1.0));
//! ```

mod error;
mod expr;
mod family;
mod problem;
pub mod report;
mod variable;

pub use error::{ModelError, ReportError};
pub use expr::{Constraint, LinearExpression, Relation};
pub use family::{IndexLabel, VariableFamily};
pub use problem::{NamedConstraint, Problem, Sense};
pub use report::{SolveReport, print_summary, print_table, write_json, write_summary, write_table};
pub use variable::{Category, Variable, VariableId};
