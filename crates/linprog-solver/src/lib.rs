mod backend;
mod branch;
mod cbc;
mod config;
mod error;
pub mod lp_format;
mod problem;
mod simplex;
mod solution;
mod standard;

pub use backend::Backend;
pub use branch::SimplexBackend;
pub use cbc::CbcBackend;
pub use config::SolverConfig;
pub use error::{ConfigError, SolverError};
pub use problem::{Constraint, ConstraintOp, LpProblem, LpVariable, Objective};
pub use solution::{Solution, SolutionStatus};
