//! Numerical solver for the periodic interest rate.
//!
//! The rate has no closed form, so it is found as the root of the TVM
//! balance function
//!
//! ```text
//! f(i) = PV·(1+i)^N + PMT·((1+i)^N - 1)/i + FV        (i ≠ 0)
//! f(0) = PV + PMT·N + FV
//! ```
//!
//! using Newton's method with a forward-difference slope. Only an exact
//! `f(0) = 0` returns a zero rate without iterating. The iteration is
//! not guaranteed to converge; an optional bracketed bisection pass can be
//! enabled through [`SolverConfig::bisection_fallback`].
//!
//! # Example
//!
//! ```
//! use tvm_core::SolverConfig;
//! use tvm_core::calculations::RateSolver;
//!
//! let config = SolverConfig::default();
//! let solver = RateSolver::new(&config);
//!
//! // Borrow 1000, repay 100 a period for 12 periods.
//! let rate = solver.solve(12.0, 1000.0, -100.0, 0.0).unwrap();
//! assert!((rate - 2.92).abs() < 0.01);
//! ```

use tracing::debug;

use crate::config::SolverConfig;
use crate::error::CalcError;

/// Number of grid cells scanned when looking for a sign change to bisect.
const BRACKET_SCAN_STEPS: u32 = 2000;

/// Smallest rate examined by the bisection scan; `i = -1` itself is excluded.
const BRACKET_LOWER_BOUND: f64 = -1.0 + 1e-6;

/// Evaluates the TVM balance `f(i)` for a per-period rate `rate`.
///
/// A balance of zero means the five values are consistent at that rate.
pub fn tvm_balance(
    rate: f64,
    n: f64,
    pv: f64,
    pmt: f64,
    fv: f64,
) -> f64 {
    if rate == 0.0 {
        return pv + pmt * n + fv;
    }
    let growth = (1.0 + rate).powf(n);
    pv * growth + pmt * ((growth - 1.0) / rate) + fv
}

/// Solves for I/Y given the other four TVM values.
#[derive(Debug, Clone)]
pub struct RateSolver<'a> {
    config: &'a SolverConfig,
}

impl<'a> RateSolver<'a> {
    pub fn new(config: &'a SolverConfig) -> Self {
        Self { config }
    }

    /// Returns the interest rate as a percentage (`5.0` for 5%).
    ///
    /// # Errors
    ///
    /// - [`CalcError::DegenerateDenominator`] if the slope estimate is exactly zero
    /// - [`CalcError::NoConvergence`] if the iteration cap is reached
    pub fn solve(
        &self,
        n: f64,
        pv: f64,
        pmt: f64,
        fv: f64,
    ) -> Result<f64, CalcError> {
        let balance = |rate: f64| tvm_balance(rate, n, pv, pmt, fv);

        if balance(0.0) == 0.0 {
            return Ok(0.0);
        }

        let rate = match self.newton(&balance) {
            Err(CalcError::NoConvergence) if self.config.bisection_fallback => {
                debug!("newton iteration did not converge; trying bisection");
                self.bisection(&balance)?
            }
            other => other?,
        };
        Ok(rate * 100.0)
    }

    /// Newton iteration from the configured initial guess.
    ///
    /// Iterates that leave the domain (`i <= -1`) or become non-finite
    /// restart from [`SolverConfig::reset_guess`].
    fn newton(
        &self,
        balance: &impl Fn(f64) -> f64,
    ) -> Result<f64, CalcError> {
        let step = self.config.derivative_step;
        let mut rate = self.config.initial_guess;

        for iteration in 0..self.config.max_iterations {
            let value = balance(rate);
            if value.abs() < self.config.tolerance {
                debug!(iteration, rate, "rate solver converged");
                return Ok(rate);
            }

            let slope = (balance(rate + step) - value) / step;
            if slope == 0.0 {
                return Err(CalcError::DegenerateDenominator);
            }

            let next = rate - value / slope;
            rate = if next <= -1.0 || !next.is_finite() {
                debug!(iteration, next, "rate iterate left the domain; restarting");
                self.config.reset_guess
            } else {
                next
            };
        }

        Err(CalcError::NoConvergence)
    }

    /// Scans `(-1, upper_bound]` for a sign change and bisects it.
    fn bisection(
        &self,
        balance: &impl Fn(f64) -> f64,
    ) -> Result<f64, CalcError> {
        let (mut low, mut high) = self.bracket(balance).ok_or(CalcError::NoConvergence)?;
        let mut f_low = balance(low);

        for _ in 0..self.config.max_iterations {
            let mid = 0.5 * (low + high);
            let f_mid = balance(mid);
            if f_mid.abs() < self.config.tolerance {
                debug!(rate = mid, "bisection converged");
                return Ok(mid);
            }
            if (f_mid < 0.0) == (f_low < 0.0) {
                low = mid;
                f_low = f_mid;
            } else {
                high = mid;
            }
            if high - low <= f64::EPSILON * mid.abs().max(1.0) {
                break;
            }
        }

        Err(CalcError::NoConvergence)
    }

    /// Finds the first grid cell whose endpoints have finite balances of opposite sign.
    fn bracket(
        &self,
        balance: &impl Fn(f64) -> f64,
    ) -> Option<(f64, f64)> {
        let upper = self.config.bisection_upper_bound;
        let width = (upper - BRACKET_LOWER_BOUND) / f64::from(BRACKET_SCAN_STEPS);

        let mut prev = BRACKET_LOWER_BOUND;
        let mut f_prev = balance(prev);
        for step in 1..=BRACKET_SCAN_STEPS {
            let next = BRACKET_LOWER_BOUND + width * f64::from(step);
            let f_next = balance(next);
            if f_prev.is_finite() && f_next.is_finite() && (f_prev < 0.0) != (f_next < 0.0) {
                return Some((prev, next));
            }
            prev = next;
            f_prev = f_next;
        }
        None
    }
}
