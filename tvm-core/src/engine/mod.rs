//! The keypad engine: session state, dispatch and display.

mod calculator;
mod display;

pub use calculator::{Calculator, CalculatorState};
pub use display::{DisplayMode, Indicator};
