//! Time-value-of-money worksheet calculations.
//!
//! This module solves the annual-rate, end-of-period payment TVM equation
//! for any one of its five variables given the other four.
//!
//! # Sign Convention
//!
//! Cash received is positive and cash paid out is negative, so a deposit of
//! 1000 is entered as `PV = -1000` and grows into a positive `FV`.
//!
//! # Formulas
//!
//! With `i = I/Y / 100` and `x = (1+i)^N`:
//!
//! | Target | Formula (i ≠ 0) | i = 0 |
//! |--------|-----------------|-------|
//! | FV     | `-PV·x - PMT·(x-1)/i` | `-PV - PMT·N` |
//! | PV     | `[-FV - PMT·(x-1)/i] / x` | `-FV - PMT·N` |
//! | PMT    | `[-FV - PV·x] / [(x-1)/i]` | `(-FV - PV) / N` |
//! | N      | `ln[(PMT/i - FV) / (PV + PMT/i)] / ln(1+i)` | `(-PV - FV) / PMT` |
//! | I/Y    | root of `PV·x + PMT·(x-1)/i + FV` | see [`RateSolver`] |
//!
//! With `PMT = 0`, N reduces to `ln(-FV/PV) / ln(1+i)`.
//!
//! # Example
//!
//! ```
//! use tvm_core::calculations::TvmSolver;
//! use tvm_core::{SolverConfig, TvmValues, TvmVariable};
//!
//! let config = SolverConfig::default();
//! let values = TvmValues::new()
//!     .with(TvmVariable::N, 10.0)
//!     .with(TvmVariable::InterestRate, 5.0)
//!     .with(TvmVariable::PresentValue, -1000.0)
//!     .with(TvmVariable::Payment, 0.0);
//!
//! let fv = TvmSolver::new(&config)
//!     .solve(TvmVariable::FutureValue, &values)
//!     .unwrap();
//!
//! assert!((fv - 1628.89).abs() < 0.01);
//! ```

use tracing::debug;

use super::rate_solver::RateSolver;
use crate::config::SolverConfig;
use crate::error::CalcError;
use crate::models::{TvmValues, TvmVariable};

/// Number of known values a compute requires.
pub const REQUIRED_KNOWN: usize = 4;

/// Inputs to a single compute, with unset slots read as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TvmInputs {
    n: f64,
    rate: f64,
    pv: f64,
    pmt: f64,
    fv: f64,
}

impl TvmInputs {
    fn from_values(values: &TvmValues) -> Self {
        Self {
            n: values.get_or_zero(TvmVariable::N),
            rate: values.get_or_zero(TvmVariable::InterestRate) / 100.0,
            pv: values.get_or_zero(TvmVariable::PresentValue),
            pmt: values.get_or_zero(TvmVariable::Payment),
            fv: values.get_or_zero(TvmVariable::FutureValue),
        }
    }

    /// `(1+i)^N`.
    fn growth(&self) -> f64 {
        (1.0 + self.rate).powf(self.n)
    }

    /// `((1+i)^N - 1) / i`, the future value of a unit payment stream.
    fn annuity_factor(&self) -> f64 {
        (self.growth() - 1.0) / self.rate
    }
}

/// Solver for the five TVM variables.
#[derive(Debug, Clone)]
pub struct TvmSolver<'a> {
    config: &'a SolverConfig,
}

impl<'a> TvmSolver<'a> {
    pub fn new(config: &'a SolverConfig) -> Self {
        Self { config }
    }

    /// Computes `target` from the other four slots of `values`.
    ///
    /// The four inputs are always the slots other than `target`; if `target`
    /// itself holds a value while another slot is unset, that unset input
    /// reads as zero.
    ///
    /// # Errors
    ///
    /// - [`CalcError::InsufficientVariables`] unless exactly four slots are set
    /// - [`CalcError::InvalidInput`] if a set value is NaN or infinite
    /// - [`CalcError::DegenerateDenominator`] if a denominator is zero
    /// - [`CalcError::NoRealSolution`] if a logarithm argument is not positive
    /// - [`CalcError::NoConvergence`] if the rate solver gives up
    pub fn solve(
        &self,
        target: TvmVariable,
        values: &TvmValues,
    ) -> Result<f64, CalcError> {
        if values.known_count() != REQUIRED_KNOWN {
            return Err(CalcError::InsufficientVariables);
        }
        if values.has_non_finite() {
            return Err(CalcError::InvalidInput);
        }

        let inputs = TvmInputs::from_values(values);
        let result = match target {
            TvmVariable::FutureValue => self.future_value(&inputs),
            TvmVariable::PresentValue => self.present_value(&inputs),
            TvmVariable::Payment => self.payment(&inputs),
            TvmVariable::N => self.periods(&inputs),
            TvmVariable::InterestRate => RateSolver::new(self.config).solve(
                inputs.n,
                inputs.pv,
                inputs.pmt,
                inputs.fv,
            ),
        }?;

        if !result.is_finite() {
            return Err(CalcError::DegenerateDenominator);
        }
        debug!(target = %target, result, "computed TVM variable");
        Ok(result)
    }

    /// FV = -PV·x - PMT·(x-1)/i
    fn future_value(
        &self,
        inputs: &TvmInputs,
    ) -> Result<f64, CalcError> {
        if inputs.rate == 0.0 {
            return Ok(-inputs.pv - inputs.pmt * inputs.n);
        }
        Ok(-inputs.pv * inputs.growth() - inputs.pmt * inputs.annuity_factor())
    }

    /// PV = [-FV - PMT·(x-1)/i] / x
    fn present_value(
        &self,
        inputs: &TvmInputs,
    ) -> Result<f64, CalcError> {
        if inputs.rate == 0.0 {
            return Ok(-inputs.fv - inputs.pmt * inputs.n);
        }
        let growth = inputs.growth();
        if growth == 0.0 {
            return Err(CalcError::DegenerateDenominator);
        }
        Ok((-inputs.fv - inputs.pmt * inputs.annuity_factor()) / growth)
    }

    /// PMT = [-FV - PV·x] / [(x-1)/i]
    fn payment(
        &self,
        inputs: &TvmInputs,
    ) -> Result<f64, CalcError> {
        if inputs.rate == 0.0 {
            if inputs.n == 0.0 {
                return Err(CalcError::DegenerateDenominator);
            }
            return Ok((-inputs.fv - inputs.pv) / inputs.n);
        }
        let factor = inputs.annuity_factor();
        if factor == 0.0 {
            return Err(CalcError::DegenerateDenominator);
        }
        Ok((-inputs.fv - inputs.pv * inputs.growth()) / factor)
    }

    /// N from the logarithmic closed form, or the linear form at i = 0.
    fn periods(
        &self,
        inputs: &TvmInputs,
    ) -> Result<f64, CalcError> {
        let TvmInputs {
            rate, pv, pmt, fv, ..
        } = *inputs;

        if pmt == 0.0 {
            if pv == 0.0 {
                return Err(CalcError::DegenerateDenominator);
            }
            return log_ratio(-fv / pv, rate);
        }

        if rate == 0.0 {
            return Ok((-pv - fv) / pmt);
        }

        let payment_value = pmt / rate;
        let denominator = pv + payment_value;
        if denominator == 0.0 {
            return Err(CalcError::DegenerateDenominator);
        }
        log_ratio((payment_value - fv) / denominator, rate)
    }
}

/// `ln(ratio) / ln(1+i)`, rejecting non-positive log arguments.
fn log_ratio(
    ratio: f64,
    rate: f64,
) -> Result<f64, CalcError> {
    if ratio <= 0.0 || 1.0 + rate <= 0.0 {
        return Err(CalcError::NoRealSolution);
    }
    let log_growth = (1.0 + rate).ln();
    if log_growth == 0.0 {
        return Err(CalcError::DegenerateDenominator);
    }
    Ok(ratio.ln() / log_growth)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const EPSILON: f64 = 1e-6;

    fn solve(
        target: TvmVariable,
        values: &TvmValues,
    ) -> Result<f64, CalcError> {
        let config = SolverConfig::default();
        TvmSolver::new(&config).solve(target, values)
    }

    fn savings_plan() -> TvmValues {
        TvmValues::new()
            .with(TvmVariable::N, 10.0)
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, -50.0)
    }

    fn assert_close(
        actual: f64,
        expected: f64,
    ) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    // =========================================================================
    // precondition tests
    // =========================================================================

    #[test]
    fn solve_rejects_three_known_values() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 10.0)
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, -1000.0);

        assert_eq!(
            solve(TvmVariable::FutureValue, &values),
            Err(CalcError::InsufficientVariables)
        );
    }

    #[test]
    fn solve_rejects_five_known_values() {
        let values = savings_plan().with(TvmVariable::FutureValue, 0.0);

        assert_eq!(
            solve(TvmVariable::FutureValue, &values),
            Err(CalcError::InsufficientVariables)
        );
    }

    #[test]
    fn solve_rejects_non_finite_inputs() {
        let values = savings_plan().with(TvmVariable::Payment, f64::INFINITY);

        assert_eq!(
            solve(TvmVariable::FutureValue, &values),
            Err(CalcError::InvalidInput)
        );
    }

    #[test]
    fn solve_reads_unset_input_as_zero_when_target_is_set() {
        // FV is unset but PV is requested: FV is read as zero.
        let values = savings_plan();

        let pv = solve(TvmVariable::PresentValue, &values).unwrap();

        let expected = 50.0 * (1.05_f64.powi(10) - 1.0) / 0.05 / 1.05_f64.powi(10);
        assert_close(pv, expected);
    }

    // =========================================================================
    // FV tests
    // =========================================================================

    #[test]
    fn future_value_of_lump_sum() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 10.0)
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, 0.0);

        let fv = solve(TvmVariable::FutureValue, &values).unwrap();

        assert!((fv - 1628.89).abs() < 0.01, "fv = {fv}");
    }

    #[test]
    fn future_value_at_zero_rate_is_linear() {
        let values = savings_plan().with(TvmVariable::InterestRate, 0.0);

        assert_eq!(solve(TvmVariable::FutureValue, &values), Ok(1500.0));
    }

    #[test]
    fn future_value_approaches_zero_rate_limit() {
        let limit = 1500.0;
        let mut previous_gap = f64::INFINITY;

        for rate in [1.0, 0.1, 0.01, 0.001, 0.0001] {
            let values = savings_plan().with(TvmVariable::InterestRate, rate);
            let gap = (solve(TvmVariable::FutureValue, &values).unwrap() - limit).abs();

            assert!(gap < previous_gap, "gap {gap} did not shrink at {rate}%");
            previous_gap = gap;
        }
        assert!(previous_gap < 0.1);
    }

    // =========================================================================
    // PV tests
    // =========================================================================

    #[test]
    fn present_value_discounts_future_value() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 10.0)
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::Payment, 0.0)
            .with(TvmVariable::FutureValue, 1628.894626777442);

        let pv = solve(TvmVariable::PresentValue, &values).unwrap();

        assert_close(pv, -1000.0);
    }

    #[test]
    fn present_value_at_zero_rate() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 10.0)
            .with(TvmVariable::InterestRate, 0.0)
            .with(TvmVariable::Payment, -50.0)
            .with(TvmVariable::FutureValue, 1500.0);

        assert_eq!(solve(TvmVariable::PresentValue, &values), Ok(-1000.0));
    }

    // =========================================================================
    // PMT tests
    // =========================================================================

    #[test]
    fn payment_round_trips_through_future_value() {
        let plan = savings_plan();
        let fv = solve(TvmVariable::FutureValue, &plan).unwrap();
        let values = TvmValues::new()
            .with(TvmVariable::N, 10.0)
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::FutureValue, fv);

        let pmt = solve(TvmVariable::Payment, &values).unwrap();

        assert_close(pmt, -50.0);
    }

    #[test]
    fn payment_at_zero_rate_with_zero_periods_is_degenerate() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 0.0)
            .with(TvmVariable::InterestRate, 0.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::FutureValue, 1000.0);

        assert_eq!(
            solve(TvmVariable::Payment, &values),
            Err(CalcError::DegenerateDenominator)
        );
    }

    #[test]
    fn payment_with_zero_periods_is_degenerate() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 0.0)
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::FutureValue, 1000.0);

        assert_eq!(
            solve(TvmVariable::Payment, &values),
            Err(CalcError::DegenerateDenominator)
        );
    }

    #[test]
    fn payment_amortizes_loan() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 12.0)
            .with(TvmVariable::InterestRate, 1.0)
            .with(TvmVariable::PresentValue, 1000.0)
            .with(TvmVariable::FutureValue, 0.0);

        let pmt = solve(TvmVariable::Payment, &values).unwrap();

        assert!((pmt + 88.85).abs() < 0.01, "pmt = {pmt}");
    }

    // =========================================================================
    // N tests
    // =========================================================================

    #[test]
    fn periods_for_lump_sum_growth() {
        let values = TvmValues::new()
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, 0.0)
            .with(TvmVariable::FutureValue, 1628.894626777442);

        let n = solve(TvmVariable::N, &values).unwrap();

        assert_close(n, 10.0);
    }

    #[test]
    fn periods_round_trip_with_payments() {
        let plan = savings_plan();
        let fv = solve(TvmVariable::FutureValue, &plan).unwrap();
        let values = TvmValues::new()
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, -50.0)
            .with(TvmVariable::FutureValue, fv);

        let n = solve(TvmVariable::N, &values).unwrap();

        assert_close(n, 10.0);
    }

    #[test]
    fn periods_at_zero_rate_is_linear() {
        let values = TvmValues::new()
            .with(TvmVariable::InterestRate, 0.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, -50.0)
            .with(TvmVariable::FutureValue, 1500.0);

        assert_eq!(solve(TvmVariable::N, &values), Ok(10.0));
    }

    #[test]
    fn periods_without_payment_requires_present_value() {
        let values = TvmValues::new()
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, 0.0)
            .with(TvmVariable::Payment, 0.0)
            .with(TvmVariable::FutureValue, 1000.0);

        assert_eq!(
            solve(TvmVariable::N, &values),
            Err(CalcError::DegenerateDenominator)
        );
    }

    #[test]
    fn periods_with_same_signed_values_has_no_real_solution() {
        let values = TvmValues::new()
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, 1000.0)
            .with(TvmVariable::Payment, 0.0)
            .with(TvmVariable::FutureValue, 1000.0);

        assert_eq!(
            solve(TvmVariable::N, &values),
            Err(CalcError::NoRealSolution)
        );
    }

    #[test]
    fn periods_with_payments_and_negative_log_argument_has_no_real_solution() {
        // (PMT/i - FV) / (PV + PMT/i) = (-1000 + 5000) / (-1000 - 1000) = -2
        let values = TvmValues::new()
            .with(TvmVariable::InterestRate, 5.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, -50.0)
            .with(TvmVariable::FutureValue, -5000.0);

        assert_eq!(
            solve(TvmVariable::N, &values),
            Err(CalcError::NoRealSolution)
        );
    }

    #[test]
    fn periods_with_zero_rate_and_no_payment_is_degenerate() {
        let values = TvmValues::new()
            .with(TvmVariable::InterestRate, 0.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, 0.0)
            .with(TvmVariable::FutureValue, 1000.0);

        assert_eq!(
            solve(TvmVariable::N, &values),
            Err(CalcError::DegenerateDenominator)
        );
    }

    #[test]
    fn periods_with_cancelling_denominator_is_degenerate() {
        // PV + PMT/i = -1000 + 500/0.5 = 0
        let values = TvmValues::new()
            .with(TvmVariable::InterestRate, 50.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, 500.0)
            .with(TvmVariable::FutureValue, 100.0);

        assert_eq!(
            solve(TvmVariable::N, &values),
            Err(CalcError::DegenerateDenominator)
        );
    }

    // =========================================================================
    // I/Y tests
    // =========================================================================

    #[test]
    fn interest_rate_recovers_lump_sum_rate() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 10.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, 0.0)
            .with(TvmVariable::FutureValue, 1628.894626777442);

        let rate = solve(TvmVariable::InterestRate, &values).unwrap();

        assert_close(rate, 5.0);
    }

    #[test]
    fn interest_rate_solution_zeroes_future_value() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 12.0)
            .with(TvmVariable::PresentValue, 1000.0)
            .with(TvmVariable::Payment, -100.0)
            .with(TvmVariable::FutureValue, 0.0);

        let rate = solve(TvmVariable::InterestRate, &values).unwrap();

        let check = TvmValues::new()
            .with(TvmVariable::N, 12.0)
            .with(TvmVariable::InterestRate, rate)
            .with(TvmVariable::PresentValue, 1000.0)
            .with(TvmVariable::Payment, -100.0);
        let fv = solve(TvmVariable::FutureValue, &check).unwrap();
        assert!(fv.abs() < 1e-6, "fv = {fv}");
    }

    #[test]
    fn interest_rate_without_real_root_does_not_converge() {
        let values = TvmValues::new()
            .with(TvmVariable::N, 12.0)
            .with(TvmVariable::PresentValue, -1000.0)
            .with(TvmVariable::Payment, -100.0)
            .with(TvmVariable::FutureValue, 0.0);

        assert_eq!(
            solve(TvmVariable::InterestRate, &values),
            Err(CalcError::NoConvergence)
        );
    }
}
