//! Configuration for the calculator engine and its interest-rate solver.
//!
//! Both structs deserialize from partial input: any field left out takes
//! its default, so a config file only needs to name what it changes.
//!
//! # Example
//!
//! ```
//! use tvm_core::{CalculatorConfig, SolverConfig};
//!
//! let config = CalculatorConfig {
//!     decimal_places: 4,
//!     solver: SolverConfig {
//!         bisection_fallback: true,
//!         ..SolverConfig::default()
//!     },
//! };
//!
//! assert_eq!(config.validate(), Ok(()));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest display precision accepted by [`CalculatorConfig::validate`].
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Fixed number of decimals used for readouts and arithmetic results.
    ///
    /// Defaults to 2, the calculator's factory display format.
    pub decimal_places: u32,

    /// Parameters of the I/Y root-finder.
    pub solver: SolverConfig,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            solver: SolverConfig::default(),
        }
    }
}

impl CalculatorConfig {
    /// Checks every field, including the nested solver parameters.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ConfigError::InvalidDecimalPlaces(self.decimal_places));
        }
        self.solver.validate()
    }
}

/// Parameters of the Newton iteration used to solve for I/Y.
///
/// Rates here are per-period fractions (`0.1` is 10%), not percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Starting rate for the iteration.
    pub initial_guess: f64,

    /// Step of the forward-difference derivative estimate.
    pub derivative_step: f64,

    /// Convergence threshold on `|f(i)|`.
    pub tolerance: f64,

    /// Iteration cap before reporting no convergence.
    pub max_iterations: u32,

    /// Rate the iteration restarts from when an iterate reaches `i <= -1`.
    pub reset_guess: f64,

    /// Retry with bracketed bisection when Newton does not converge.
    pub bisection_fallback: bool,

    /// Upper end of the rate interval searched by the bisection fallback.
    pub bisection_upper_bound: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.1,
            derivative_step: 1e-4,
            tolerance: 1e-7,
            max_iterations: 1000,
            reset_guess: 0.001,
            bisection_fallback: false,
            bisection_upper_bound: 10.0,
        }
    }
}

impl SolverConfig {
    /// Validates the solver parameters.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }
        if !(self.derivative_step.is_finite() && self.derivative_step > 0.0) {
            return Err(ConfigError::InvalidDerivativeStep(self.derivative_step));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(self.max_iterations));
        }
        for guess in [self.initial_guess, self.reset_guess] {
            if !(guess.is_finite() && guess > -1.0) {
                return Err(ConfigError::InvalidGuess(guess));
            }
        }
        if !(self.bisection_upper_bound.is_finite() && self.bisection_upper_bound > -1.0) {
            return Err(ConfigError::InvalidUpperBound(self.bisection_upper_bound));
        }
        Ok(())
    }
}
