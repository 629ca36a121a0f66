//! Solver configuration.
//!
//! Configuration can be built in code or loaded from TOML:
//!
//! ```
//! use linprog_solver::SolverConfig;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     max_iterations = 5000
//!     time_limit_seconds = 2.5
//! "#).unwrap();
//!
//! assert_eq!(config.max_iterations, 5000);
//! assert_eq!(config.time_limit_seconds, Some(2.5));
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Limits and tolerances shared by all backends.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Simplex pivots allowed per phase of each LP relaxation
    pub max_iterations: usize,
    /// Tolerance for floating point comparisons
    pub tolerance: f64,
    /// Distance from an integer below which a value counts as integral
    pub integrality_tolerance: f64,
    /// Branch-and-bound nodes allowed before giving up
    pub max_nodes: usize,
    /// Wall-clock limit for a whole solve. `None` means no limit.
    pub time_limit_seconds: Option<f64>,
    /// Executable used by the CBC backend
    pub cbc_command: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10000,
            tolerance: 1e-9,
            integrality_tolerance: 1e-6,
            max_nodes: 100_000,
            time_limit_seconds: None,
            cbc_command: "cbc".to_string(),
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn with_integrality_tolerance(mut self, tol: f64) -> Self {
        self.integrality_tolerance = tol;
        self
    }

    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    pub fn with_cbc_command(mut self, command: impl Into<String>) -> Self {
        self.cbc_command = command.into();
        self
    }

    /// Wall-clock limit as a `Duration`. Values that no `Duration` can hold
    /// (negative, NaN, or too large) mean no limit.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_seconds
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            )));
        }
        if !(self.integrality_tolerance > 0.0 && self.integrality_tolerance < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "integrality_tolerance must be in (0, 0.5), got {}",
                self.integrality_tolerance
            )));
        }
        if self.max_iterations == 0 || self.max_nodes == 0 {
            return Err(ConfigError::Invalid(
                "max_iterations and max_nodes must be positive".to_string(),
            ));
        }
        if let Some(limit) = self.time_limit_seconds {
            if Duration::try_from_secs_f64(limit).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "time_limit_seconds must be a non-negative number of seconds, got {}",
                    limit
                )));
            }
        }
        if self.cbc_command.trim().is_empty() {
            return Err(ConfigError::Invalid("cbc_command is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_iterations, 10000);
        assert_eq!(config.time_limit(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SolverConfig::from_toml_str("max_nodes = 42").unwrap();
        assert_eq!(config.max_nodes, 42);
        assert_eq!(config.cbc_command, "cbc");
        assert_eq!(config.tolerance, 1e-9);
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        let result = SolverConfig::from_toml_str("tolerance = -1.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = SolverConfig::from_toml_str("max_nodes = \"many\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_builder_pattern() {
        let config = SolverConfig::new()
            .with_max_iterations(10)
            .with_max_nodes(5)
            .with_time_limit(1.5)
            .with_cbc_command("/opt/cbc/bin/cbc");

        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.max_nodes, 5);
        assert_eq!(config.time_limit(), Some(Duration::from_millis(1500)));
        assert_eq!(config.cbc_command, "/opt/cbc/bin/cbc");
    }

    #[test]
    fn test_huge_time_limit_rejected() {
        let result = SolverConfig::from_toml_str("time_limit_seconds = 1e300");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = SolverConfig::from_toml_str("time_limit_seconds = -2.0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unrepresentable_time_limit_means_no_limit() {
        assert_eq!(SolverConfig::new().with_time_limit(1e300).time_limit(), None);
        assert_eq!(SolverConfig::new().with_time_limit(-1.0).time_limit(), None);
        assert_eq!(SolverConfig::new().with_time_limit(f64::NAN).time_limit(), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solver.toml");
        std::fs::write(&path, "integrality_tolerance = 0.001\n").unwrap();

        let config = SolverConfig::load(&path).unwrap();
        assert_eq!(config.integrality_tolerance, 0.001);
    }
}
