//! Keypad state machine of the TVM calculator.
//!
//! # Dispatch Order
//!
//! Each key is interpreted by the first rule that claims it:
//!
//! | Modifier | Key | Effect |
//! |----------|-----|--------|
//! | compute armed | TVM variable | solve for that variable |
//! | 2nd active | `CLR` | clear the TVM worksheet |
//! | 2nd active | `2ND` | cancel the modifier |
//! | none | any | primary meaning |
//!
//! Modifiers are consumed by the next key whether or not they claim it; an
//! unclaimed key falls through to its primary meaning.
//!
//! # Example
//!
//! ```
//! use tvm_core::{Calculator, CalculatorConfig, parse_key_sequence};
//!
//! let mut calc = Calculator::new(CalculatorConfig::default());
//! for key in parse_key_sequence("1 0 N 5 I/Y 1 0 0 0 +/- PV 0 PMT CPT FV").unwrap() {
//!     calc.handle_key(key);
//! }
//!
//! assert_eq!(calc.display_text(), "FV = 1628.89");
//! ```

use tracing::{debug, warn};

use super::display::{DisplayMode, Indicator};
use crate::calculations::TvmSolver;
use crate::calculations::arithmetic;
use crate::config::CalculatorConfig;
use crate::error::CalcError;
use crate::models::{KeyId, Operator, TvmValues, TvmVariable};

/// Complete mutable state of one calculator session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorState {
    /// What the display shows.
    pub display: DisplayMode,

    /// The literal being typed; `None` when no entry is in progress.
    pub current_entry: Option<String>,

    /// Operator waiting for its second operand.
    pub pending_operator: Option<Operator>,

    /// Left operand captured when the pending operator was pressed.
    pub first_operand: Option<f64>,

    /// Set right after an operator key, until the next digit.
    pub awaiting_second_operand: bool,

    /// The 2nd modifier is on.
    pub second_function_active: bool,

    /// CPT was pressed; the next variable key triggers a solve.
    pub compute_armed: bool,

    /// The five TVM worksheet slots.
    pub variables: TvmValues,
}

/// A calculator session: configuration plus state, driven one key at a time.
#[derive(Debug, Clone)]
pub struct Calculator {
    config: CalculatorConfig,
    state: CalculatorState,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}

impl Calculator {
    /// Starts a session with every variable unset and `"0"` on the display.
    pub fn new(config: CalculatorConfig) -> Self {
        Self::from_state(config, CalculatorState::default())
    }

    /// Resumes a session from an explicit state.
    pub fn from_state(
        config: CalculatorConfig,
        state: CalculatorState,
    ) -> Self {
        Self { config, state }
    }

    /// Consumes the session, returning its state.
    pub fn into_state(self) -> CalculatorState {
        self.state
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn display(&self) -> &DisplayMode {
        &self.state.display
    }

    /// The rendered display; never empty.
    pub fn display_text(&self) -> String {
        self.state.display.render(self.config.decimal_places)
    }

    pub fn variable(
        &self,
        var: TvmVariable,
    ) -> Option<f64> {
        self.state.variables.get(var)
    }

    pub fn variables(&self) -> &TvmValues {
        &self.state.variables
    }

    pub fn is_second_function_active(&self) -> bool {
        self.state.second_function_active
    }

    pub fn is_compute_armed(&self) -> bool {
        self.state.compute_armed
    }

    /// True while the "TVM cleared" notice is on screen.
    pub fn has_notice(&self) -> bool {
        self.state.display == DisplayMode::Indicator(Indicator::TvmCleared)
    }

    /// Reverts a notice that is still on screen to the default display.
    ///
    /// Returns `false`, changing nothing, if another action already replaced it.
    pub fn dismiss_notice(&mut self) -> bool {
        if !self.has_notice() {
            return false;
        }
        self.state.display = DisplayMode::default();
        true
    }

    /// Handles one key press to completion.
    ///
    /// Errors never escape: they are shown on the display and the session
    /// keeps accepting keys.
    pub fn handle_key(
        &mut self,
        key: KeyId,
    ) {
        self.dispatch(key);
        debug!(key = %key, display = %self.display_text(), "key handled");
    }

    fn dispatch(
        &mut self,
        key: KeyId,
    ) {
        if self.state.compute_armed {
            self.state.compute_armed = false;
            if let KeyId::Variable(var) = key {
                self.compute(var);
                return;
            }
        }

        if self.state.second_function_active {
            self.state.second_function_active = false;
            match key {
                KeyId::ClearAll => {
                    self.clear_tvm();
                    return;
                }
                KeyId::SecondFunction => return,
                _ => {}
            }
        }

        match key {
            KeyId::Digit(digit) => self.input_digit(digit),
            KeyId::DecimalPoint => self.input_decimal_point(),
            KeyId::Operator(op) => self.handle_operator(op),
            KeyId::Equals | KeyId::Enter => self.evaluate(),
            KeyId::SignToggle => self.toggle_sign(),
            KeyId::ClearAll => self.reset(),
            KeyId::SecondFunction => self.state.second_function_active = true,
            KeyId::Compute => self.arm_compute(),
            KeyId::Variable(var) => self.store(var),
            KeyId::Backspace => self.backspace(),
            KeyId::ClearEntry => self.clear_entry(),
        }
    }

    // -------------------------------------------------------------------------
    // Digit entry
    // -------------------------------------------------------------------------

    fn input_digit(
        &mut self,
        digit: u8,
    ) {
        let Some(c) = char::from_digit(u32::from(digit), 10) else {
            warn!(digit, "ignoring out-of-range digit key");
            return;
        };
        let entry = self.begin_entry();
        if entry.as_str() == "0" {
            entry.clear();
        } else if entry.as_str() == "-0" {
            entry.truncate(1);
        }
        entry.push(c);
        self.show_entry();
    }

    fn input_decimal_point(&mut self) {
        let entry = self.begin_entry();
        if !entry.contains('.') {
            entry.push('.');
        }
        self.show_entry();
    }

    /// Returns the entry in progress, starting a fresh `"0"` when none is
    /// in progress or an operator was just pressed.
    fn begin_entry(&mut self) -> &mut String {
        if self.state.awaiting_second_operand {
            self.state.awaiting_second_operand = false;
            self.state.current_entry = None;
        }
        self.state
            .current_entry
            .get_or_insert_with(|| "0".to_string())
    }

    fn show_entry(&mut self) {
        let digits = self
            .state
            .current_entry
            .clone()
            .unwrap_or_else(|| "0".to_string());
        self.state.display = DisplayMode::Digits(digits);
    }

    fn backspace(&mut self) {
        let Some(entry) = self.state.current_entry.as_mut() else {
            return;
        };
        entry.pop();
        if entry.is_empty() || entry.as_str() == "-" {
            *entry = "0".to_string();
        }
        self.show_entry();
    }

    fn clear_entry(&mut self) {
        self.state.current_entry = None;
        self.state.display = DisplayMode::default();
    }

    /// The number an operator, equals or store would act on.
    fn current_value(&self) -> Result<f64, CalcError> {
        let value = match &self.state.current_entry {
            Some(entry) => entry.parse::<f64>().ok(),
            None => self.state.display.value(),
        };
        value
            .filter(|v| v.is_finite())
            .ok_or(CalcError::InvalidInput)
    }

    // -------------------------------------------------------------------------
    // Arithmetic
    // -------------------------------------------------------------------------

    fn handle_operator(
        &mut self,
        op: Operator,
    ) {
        if self.state.pending_operator.is_some() && self.state.awaiting_second_operand {
            self.state.pending_operator = Some(op);
            return;
        }

        let value = match self.current_value() {
            Ok(value) => value,
            Err(err) => return self.show_error(err),
        };

        match (self.state.first_operand, self.state.pending_operator) {
            (Some(first), Some(pending)) => match arithmetic::apply(pending, first, value) {
                Ok(result) => {
                    self.state.display = DisplayMode::Result(result);
                    self.state.first_operand = Some(result);
                }
                Err(err) => return self.fail_arithmetic(err),
            },
            _ => self.state.first_operand = Some(value),
        }

        self.state.current_entry = None;
        self.state.awaiting_second_operand = true;
        self.state.pending_operator = Some(op);
    }

    fn evaluate(&mut self) {
        let (Some(first), Some(op)) = (self.state.first_operand, self.state.pending_operator)
        else {
            return;
        };
        let value = match self.current_value() {
            Ok(value) => value,
            Err(err) => return self.show_error(err),
        };

        match arithmetic::apply(op, first, value) {
            Ok(result) => {
                self.clear_arithmetic();
                self.state.current_entry = None;
                self.state.display = DisplayMode::Result(result);
            }
            Err(err) => self.fail_arithmetic(err),
        }
    }

    fn clear_arithmetic(&mut self) {
        self.state.pending_operator = None;
        self.state.first_operand = None;
        self.state.awaiting_second_operand = false;
    }

    fn fail_arithmetic(
        &mut self,
        err: CalcError,
    ) {
        self.clear_arithmetic();
        self.show_error(err);
    }

    fn show_error(
        &mut self,
        err: CalcError,
    ) {
        warn!(error = %err, "key rejected");
        self.state.current_entry = None;
        self.state.display = DisplayMode::Error(err);
    }

    // -------------------------------------------------------------------------
    // Sign toggle, reset
    // -------------------------------------------------------------------------

    fn toggle_sign(&mut self) {
        if let Some(entry) = self.state.current_entry.as_mut() {
            if entry.starts_with('-') {
                entry.remove(0);
            } else if entry.parse::<f64>().is_ok_and(|v| v != 0.0) {
                entry.insert(0, '-');
            }
            self.show_entry();
            return;
        }

        match self.state.display.clone() {
            DisplayMode::VariableReadout(var, value) => {
                let negated = if value == 0.0 { 0.0 } else { -value };
                self.state.variables.set(var, negated);
                self.state.display = DisplayMode::VariableReadout(var, negated);
            }
            DisplayMode::Result(value) => self.start_entry_from(-value),
            DisplayMode::Digits(digits) => {
                if let Some(value) = digits.parse::<f64>().ok().filter(|v| *v != 0.0) {
                    self.start_entry_from(-value);
                }
            }
            DisplayMode::Error(_) | DisplayMode::Indicator(_) => {}
        }
    }

    /// Makes `value` the entry in progress without touching the awaiting flag.
    fn start_entry_from(
        &mut self,
        value: f64,
    ) {
        self.state.current_entry = Some(value.to_string());
        self.show_entry();
    }

    fn reset(&mut self) {
        self.state = CalculatorState::default();
    }

    // -------------------------------------------------------------------------
    // TVM worksheet
    // -------------------------------------------------------------------------

    fn arm_compute(&mut self) {
        self.state.current_entry = None;
        self.state.compute_armed = true;
        self.state.display = DisplayMode::Indicator(Indicator::ComputeArmed);
    }

    fn clear_tvm(&mut self) {
        self.state.variables.clear();
        self.state.current_entry = None;
        self.state.display = DisplayMode::Indicator(Indicator::TvmCleared);
        debug!("TVM worksheet cleared");
    }

    fn store(
        &mut self,
        var: TvmVariable,
    ) {
        let value = match (&self.state.current_entry, &self.state.display) {
            (Some(entry), _) => entry.parse::<f64>().ok(),
            (None, DisplayMode::Digits(digits)) => digits.parse::<f64>().ok(),
            (None, DisplayMode::Result(value)) => Some(*value),
            (None, _) => None,
        };
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return self.show_error(CalcError::InvalidInput);
        };

        self.state.variables.set(var, value);
        self.show_readout(var, value);
        debug!(variable = %var, value, "stored TVM variable");
    }

    fn compute(
        &mut self,
        target: TvmVariable,
    ) {
        let result = TvmSolver::new(&self.config.solver).solve(target, &self.state.variables);
        match result {
            Ok(value) => {
                self.state.variables.set(target, value);
                self.show_readout(target, value);
            }
            Err(err) => {
                warn!(target = %target, error = %err, "compute failed");
                self.show_error(err);
            }
        }
    }

    fn show_readout(
        &mut self,
        var: TvmVariable,
        value: f64,
    ) {
        self.state.current_entry = None;
        self.state.awaiting_second_operand = false;
        self.state.display = DisplayMode::VariableReadout(var, value);
    }
}
