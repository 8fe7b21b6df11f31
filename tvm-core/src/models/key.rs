use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TvmVariable;
use crate::error::KeyParseError;

/// The four arithmetic operators of the plain calculator mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }
}

/// A single key on the calculator keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyId {
    /// A decimal digit, `0..=9`. Larger values are ignored by the engine.
    Digit(u8),
    DecimalPoint,
    Operator(Operator),
    Equals,
    Enter,
    SignToggle,
    /// `CLR`: resets the calculator; with 2nd active, clears the TVM worksheet.
    ClearAll,
    SecondFunction,
    Compute,
    Variable(TvmVariable),
    /// Deletes the last typed character of the entry in progress.
    Backspace,
    /// Discards the entry in progress without touching pending arithmetic.
    ClearEntry,
}

impl FromStr for KeyId {
    type Err = KeyParseError;

    /// Parses a keypad legend such as `7`, `+/-`, `CPT` or `I/Y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if let [b @ b'0'..=b'9'] = token.as_bytes() {
            return Ok(Self::Digit(b - b'0'));
        }
        if let Some(var) = TvmVariable::parse(token) {
            return Ok(Self::Variable(var));
        }
        let key = match token.to_ascii_uppercase().as_str() {
            "." => Self::DecimalPoint,
            "+" => Self::Operator(Operator::Add),
            "-" => Self::Operator(Operator::Subtract),
            "*" | "X" => Self::Operator(Operator::Multiply),
            "/" => Self::Operator(Operator::Divide),
            "=" => Self::Equals,
            "ENTER" => Self::Enter,
            "+/-" => Self::SignToggle,
            "CLR" | "AC" => Self::ClearAll,
            "2ND" => Self::SecondFunction,
            "CPT" => Self::Compute,
            "DEL" | "BS" => Self::Backspace,
            "CE" => Self::ClearEntry,
            _ => return Err(KeyParseError(token.to_string())),
        };
        Ok(key)
    }
}

impl fmt::Display for KeyId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{d}"),
            Self::DecimalPoint => f.write_str("."),
            Self::Operator(op) => write!(f, "{}", op.symbol()),
            Self::Equals => f.write_str("="),
            Self::Enter => f.write_str("ENTER"),
            Self::SignToggle => f.write_str("+/-"),
            Self::ClearAll => f.write_str("CLR"),
            Self::SecondFunction => f.write_str("2ND"),
            Self::Compute => f.write_str("CPT"),
            Self::Variable(var) => write!(f, "{var}"),
            Self::Backspace => f.write_str("DEL"),
            Self::ClearEntry => f.write_str("CE"),
        }
    }
}

/// Parses a whitespace-separated key sequence, e.g. `"1 0 N 5 I/Y CPT FV"`.
///
/// # Errors
///
/// Returns [`KeyParseError`] naming the first unknown token.
pub fn parse_key_sequence(input: &str) -> Result<Vec<KeyId>, KeyParseError> {
    input.split_whitespace().map(str::parse).collect()
}
