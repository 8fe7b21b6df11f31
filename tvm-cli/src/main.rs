use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use tvm_cli::repl::{self, Command};
use tvm_cli::{AppConfig, Session, logging, run_script};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Financial calculator with a time-value-of-money worksheet.
///
/// Reads key tokens such as `1 0 N 5 I/Y 1 0 0 0 +/- PV 0 PMT CPT FV`
/// either from `--keys` or line by line from standard input.
#[derive(Debug, Parser)]
#[command(name = "tvm-calc")]
#[command(version, about, long_about = None)]
struct Args {
    /// Key tokens to apply, separated by whitespace. Starts the prompt when omitted.
    #[arg(short, long)]
    keys: Option<String>,

    /// With --keys, print the display after every key instead of only the last.
    #[arg(long, default_value_t = false)]
    steps: bool,

    /// TOML settings file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter directive (e.g. `debug` or `tvm_core=trace`); overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<String>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let filter = logging::resolve_filter(
        args.log_level.as_deref(),
        config.cli.log_level.as_deref(),
    )?;
    logging::init_logging(filter, config.cli.log_file.as_deref())?;
    debug!(?config, "settings loaded");

    let (mut session, dismissals) = Session::new(
        config.calculator,
        Duration::from_millis(config.cli.notice_delay_ms),
    );

    match &args.keys {
        Some(keys) => {
            for line in run_script(&mut session, keys, args.steps)? {
                println!("{line}");
            }
            Ok(())
        }
        None => run_prompt(&mut session, dismissals).await,
    }
}

/// Reads commands from stdin until `:quit` or end of input.
async fn run_prompt(
    session: &mut Session,
    mut dismissals: mpsc::UnboundedReceiver<String>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", session.display_text());
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match repl::parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Keys(keys)) => {
                        for key in keys {
                            session.press(key);
                        }
                        println!("{}", session.display_text());
                    }
                    Ok(Command::Vars) => println!("{}", session.preview()),
                    Ok(Command::Help) => println!("{}", repl::HELP),
                    Ok(Command::Show) => println!("{}", session.display_text()),
                    Err(err) => eprintln!("{err}"),
                }
                prompt()?;
            }
            Some(text) = dismissals.recv() => {
                println!();
                println!("{text}");
                prompt()?;
            }
        }
    }

    info!("session ended");
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}
