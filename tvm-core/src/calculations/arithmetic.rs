use crate::error::CalcError;
use crate::models::Operator;

/// Applies a plain-calculator operator.
///
/// # Errors
///
/// Returns [`CalcError::DivisionByZero`] for a zero divisor and
/// [`CalcError::InvalidInput`] when the result overflows to a non-finite value.
pub fn apply(
    op: Operator,
    lhs: f64,
    rhs: f64,
) -> Result<f64, CalcError> {
    let result = match op {
        Operator::Add => lhs + rhs,
        Operator::Subtract => lhs - rhs,
        Operator::Multiply => lhs * rhs,
        Operator::Divide => {
            if rhs == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            lhs / rhs
        }
    };
    if result.is_finite() {
        Ok(result)
    } else {
        Err(CalcError::InvalidInput)
    }
}
