use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid bounds for {name}: lower bound {lower} exceeds upper bound {upper}")]
    InvalidBounds { name: String, lower: f64, upper: f64 },
    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),
    #[error("Variable {0} does not belong to this problem")]
    ForeignVariable(String),
    #[error("Non-finite coefficient in {0}")]
    NonFiniteCoefficient(String),
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No variable for index {0}")]
    KeyNotFound(String),
    #[error("Variable {0} has no solved value")]
    MissingValue(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
