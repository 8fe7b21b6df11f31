use serde::{Deserialize, Serialize};

use super::TvmVariable;
use crate::calculations::common::format_fixed;

/// The five TVM worksheet slots.
///
/// An unset slot is `None`, which is distinct from a stored zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TvmValues {
    slots: [Option<f64>; 5],
}

impl TvmValues {
    /// Creates a worksheet with every slot unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value, if any.
    pub fn get(
        &self,
        var: TvmVariable,
    ) -> Option<f64> {
        self.slots[var.index()]
    }

    /// Returns the stored value, reading an unset slot as zero.
    pub fn get_or_zero(
        &self,
        var: TvmVariable,
    ) -> f64 {
        self.get(var).unwrap_or(0.0)
    }

    /// Stores `value` in the slot for `var`.
    pub fn set(
        &mut self,
        var: TvmVariable,
        value: f64,
    ) {
        self.slots[var.index()] = Some(value);
    }

    /// Builder-style [`set`](Self::set), handy for assembling inputs.
    pub fn with(
        mut self,
        var: TvmVariable,
        value: f64,
    ) -> Self {
        self.set(var, value);
        self
    }

    /// Unsets every slot.
    pub fn clear(&mut self) {
        self.slots = [None; 5];
    }

    /// Number of slots holding a value.
    pub fn known_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when any stored value is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.slots.iter().flatten().any(|v| !v.is_finite())
    }

    /// Renders the assigned-values panel, one `NAME: value` line per slot
    /// in keypad order, with `-` marking unset slots.
    pub fn preview(
        &self,
        decimal_places: u32,
    ) -> String {
        TvmVariable::ALL
            .iter()
            .map(|var| {
                let value = self
                    .get(*var)
                    .map(|v| format_fixed(v, decimal_places))
                    .unwrap_or_else(|| "-".to_string());
                format!("{}: {}", var.label(), value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
