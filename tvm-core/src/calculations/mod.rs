//! Calculation logic behind the keypad: plain arithmetic, the closed-form
//! TVM formulas and the interest-rate root-finder.

pub mod arithmetic;
pub mod common;
pub mod rate_solver;
pub mod tvm;

pub use rate_solver::{RateSolver, tvm_balance};
pub use tvm::TvmSolver;
