//! Time-value-of-money calculator engine.
//!
//! A [`Calculator`] receives keypad presses one at a time and keeps the
//! display, pending arithmetic and the five TVM worksheet variables
//! (`N`, `I/Y`, `PV`, `PMT`, `FV`). Pressing `CPT` followed by a variable
//! key solves for that variable from the other four.

pub mod calculations;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;

pub use config::{CalculatorConfig, SolverConfig};
pub use engine::{Calculator, CalculatorState, DisplayMode, Indicator};
pub use error::{CalcError, ConfigError, KeyParseError};
pub use models::*;
