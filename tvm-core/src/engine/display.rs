use crate::calculations::common::format_fixed;
use crate::error::CalcError;
use crate::models::TvmVariable;

/// Short status texts that replace the number on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// CPT was pressed; the next variable key solves for that variable.
    ComputeArmed,
    /// The TVM worksheet was cleared. Shown until the presentation layer
    /// dismisses it or another key replaces it.
    TvmCleared,
}

impl Indicator {
    pub fn text(&self) -> &'static str {
        match self {
            Self::ComputeArmed => "CPT",
            Self::TvmCleared => "TVM CLEARED",
        }
    }
}

/// What the display currently shows.
///
/// Actions that depend on the display (sign toggle, store) match on this
/// tag instead of inspecting rendered text.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayMode {
    /// Digits as typed, or the initial `"0"`.
    Digits(String),
    /// `NAME = value` after a store or a compute.
    VariableReadout(TvmVariable, f64),
    /// An arithmetic result.
    Result(f64),
    Error(CalcError),
    Indicator(Indicator),
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self::Digits("0".to_string())
    }
}

impl DisplayMode {
    /// Renders the display text; numbers use `decimal_places` fixed decimals.
    pub fn render(
        &self,
        decimal_places: u32,
    ) -> String {
        match self {
            Self::Digits(digits) => digits.clone(),
            Self::VariableReadout(var, value) => {
                format!("{} = {}", var.label(), format_fixed(*value, decimal_places))
            }
            Self::Result(value) => format_fixed(*value, decimal_places),
            Self::Error(err) => err.to_string(),
            Self::Indicator(indicator) => indicator.text().to_string(),
        }
    }

    /// The number shown, if the display holds one.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Digits(digits) => digits.parse().ok(),
            Self::VariableReadout(_, value) | Self::Result(value) => Some(*value),
            Self::Error(_) | Self::Indicator(_) => None,
        }
    }
}
