//! An interactive calculator session with a timed notice.
//!
//! The engine is synchronous; the only background work is the timer that
//! reverts the "TVM CLEARED" notice. Each key press aborts a pending timer
//! and, if the key left a notice on screen, schedules a new one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use tvm_core::{Calculator, CalculatorConfig, KeyId, KeyParseError, parse_key_sequence};

/// A calculator shared with its notice timer.
pub struct Session {
    calculator: Arc<Mutex<Calculator>>,
    notice_delay: Duration,
    notice_timer: Option<JoinHandle<()>>,
    dismissals: mpsc::UnboundedSender<String>,
}

impl Session {
    /// Creates a session and the channel on which the display text is
    /// published whenever a notice times out.
    ///
    /// Key presses must happen inside a Tokio runtime.
    pub fn new(
        config: CalculatorConfig,
        notice_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (dismissals, rx) = mpsc::unbounded_channel();
        let session = Self {
            calculator: Arc::new(Mutex::new(Calculator::new(config))),
            notice_delay,
            notice_timer: None,
            dismissals,
        };
        (session, rx)
    }

    fn calculator(&self) -> MutexGuard<'_, Calculator> {
        lock(&self.calculator)
    }

    /// Current display text.
    pub fn display_text(&self) -> String {
        self.calculator().display_text()
    }

    /// The TVM slots, one `NAME: value` line each.
    pub fn preview(&self) -> String {
        let calc = self.calculator();
        calc.variables().preview(calc.config().decimal_places)
    }

    /// Applies one key and returns the display text it produced.
    pub fn press(
        &mut self,
        key: KeyId,
    ) -> String {
        if let Some(timer) = self.notice_timer.take() {
            timer.abort();
        }

        let (text, has_notice) = {
            let mut calc = self.calculator();
            calc.handle_key(key);
            (calc.display_text(), calc.has_notice())
        };

        if has_notice {
            self.schedule_dismissal();
        }
        text
    }

    /// Parses a whitespace-separated key line and applies every key.
    ///
    /// Returns the display text after each key. Nothing is applied if any
    /// token is unknown.
    pub fn press_line(
        &mut self,
        line: &str,
    ) -> Result<Vec<String>, KeyParseError> {
        let keys = parse_key_sequence(line)?;
        Ok(keys.into_iter().map(|key| self.press(key)).collect())
    }

    fn schedule_dismissal(&mut self) {
        let calculator = Arc::clone(&self.calculator);
        let dismissals = self.dismissals.clone();
        let delay = self.notice_delay;

        self.notice_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let text = {
                let mut calc = lock(&calculator);
                if !calc.dismiss_notice() {
                    return;
                }
                calc.display_text()
            };
            debug!(display = %text, "notice dismissed");
            let _ = dismissals.send(text);
        }));
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(timer) = self.notice_timer.take() {
            timer.abort();
        }
    }
}

fn lock(calculator: &Mutex<Calculator>) -> MutexGuard<'_, Calculator> {
    calculator.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a `--keys` script, returning the lines to print: every intermediate
/// display with `steps`, otherwise only the final one.
pub fn run_script(
    session: &mut Session,
    keys: &str,
    steps: bool,
) -> Result<Vec<String>> {
    let mut displays = session
        .press_line(keys)
        .with_context(|| format!("Failed to parse key script: {keys}"))?;

    if steps {
        return Ok(displays);
    }
    Ok(vec![displays.pop().unwrap_or_else(|| session.display_text())])
}
