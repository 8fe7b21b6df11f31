use std::fmt;

use serde::{Deserialize, Serialize};

/// The five time-value-of-money worksheet variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TvmVariable {
    /// Number of periods.
    N,
    /// Interest rate per period, as a percentage.
    InterestRate,
    /// Present value.
    PresentValue,
    /// Payment per period, paid at the end of each period.
    Payment,
    /// Future value.
    FutureValue,
}

impl TvmVariable {
    /// All variables in keypad order.
    pub const ALL: [TvmVariable; 5] = [
        Self::N,
        Self::InterestRate,
        Self::PresentValue,
        Self::Payment,
        Self::FutureValue,
    ];

    /// The key legend, as used in readouts (`"I/Y = 5.00"`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::InterestRate => "I/Y",
            Self::PresentValue => "PV",
            Self::Payment => "PMT",
            Self::FutureValue => "FV",
        }
    }

    /// Parses a key legend. Accepts `IY` as a slash-free spelling of `I/Y`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "N" => Some(Self::N),
            "I/Y" | "IY" => Some(Self::InterestRate),
            "PV" => Some(Self::PresentValue),
            "PMT" => Some(Self::Payment),
            "FV" => Some(Self::FutureValue),
            _ => None,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::N => 0,
            Self::InterestRate => 1,
            Self::PresentValue => 2,
            Self::Payment => 3,
            Self::FutureValue => 4,
        }
    }
}

impl fmt::Display for TvmVariable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
