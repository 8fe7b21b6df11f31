//! Settings file for the `tvm-calc` binary.
//!
//! ```toml
//! [calculator]
//! decimal_places = 2
//!
//! [calculator.solver]
//! bisection_fallback = true
//!
//! [cli]
//! notice_delay_ms = 1500
//! log_level = "debug"
//! log_file = "tvm-calc.log"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tvm_core::CalculatorConfig;

/// Default display time of the "TVM CLEARED" notice.
pub const DEFAULT_NOTICE_DELAY_MS: u64 = 1500;

/// Everything read from the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calculator: CalculatorConfig,
    pub cli: CliConfig,
}

/// Presentation-layer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// How long a transient notice stays up before reverting to `0`.
    pub notice_delay_ms: u64,

    /// `EnvFilter` directive used when neither `--log-level` nor `RUST_LOG` is set.
    pub log_level: Option<String>,

    /// Log records are also appended here when set.
    pub log_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            notice_delay_ms: DEFAULT_NOTICE_DELAY_MS,
            log_level: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Parses and validates settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse settings")?;
        config
            .calculator
            .validate()
            .context("Invalid [calculator] settings")?;
        Ok(config)
    }

    /// Reads settings from `path`; a missing file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}
