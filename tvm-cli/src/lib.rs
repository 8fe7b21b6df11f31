//! Terminal front end for the TVM calculator engine.
//!
//! Owns everything the engine leaves to its presentation layer: the notice
//! timer, settings file, logging setup and the line-oriented prompt.

pub mod config;
pub mod logging;
pub mod repl;
pub mod session;

pub use config::{AppConfig, CliConfig};
pub use session::{Session, run_script};
