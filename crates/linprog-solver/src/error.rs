use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Solver unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Solver failed: {0}")]
    Failed(String),
    #[error("Malformed solver output: {0}")]
    MalformedOutput(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
