//! Error types shared by the keypad engine and the TVM solver.

use thiserror::Error;

/// Errors produced while evaluating a key press.
///
/// Every variant is recovered by the dispatcher and rendered into the
/// display; none of them ends the session. The `Display` text is what the
/// user sees.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    /// A value required as a number is missing, malformed or not finite.
    #[error("Error: invalid input")]
    InvalidInput,

    /// Compute was requested without exactly four known TVM values.
    #[error("Error: need 4 of 5 values")]
    InsufficientVariables,

    /// A closed-form denominator, or the solver's derivative, evaluated to zero.
    #[error("Error: zero denominator")]
    DegenerateDenominator,

    /// A logarithm argument was zero or negative.
    #[error("Error: no real solution")]
    NoRealSolution,

    /// The interest-rate solver exhausted its iteration budget.
    #[error("Error: no convergence")]
    NoConvergence,

    /// Plain arithmetic division by zero.
    #[error("Error: division by zero")]
    DivisionByZero,
}

/// Errors raised when validating a [`CalculatorConfig`](crate::CalculatorConfig).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Display precision is limited to what `Decimal` rounding can represent sensibly.
    #[error("decimal places must be at most 10, got {0}")]
    InvalidDecimalPlaces(u32),

    /// The convergence tolerance must be positive and finite.
    #[error("solver tolerance must be positive, got {0}")]
    InvalidTolerance(f64),

    /// The finite-difference step must be positive and finite.
    #[error("derivative step must be positive, got {0}")]
    InvalidDerivativeStep(f64),

    /// At least one iteration is required.
    #[error("max iterations must be at least 1, got {0}")]
    InvalidMaxIterations(u32),

    /// Rate guesses must keep `1 + i` positive.
    #[error("rate guess must be greater than -1, got {0}")]
    InvalidGuess(f64),

    /// The bisection bracket's upper end must lie above -1.
    #[error("bisection upper bound must be greater than -1, got {0}")]
    InvalidUpperBound(f64),
}

/// Error returned when a text token does not name a calculator key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown key '{0}'")]
pub struct KeyParseError(pub String);
