//! `--keys` scripts run through the library entry points.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tvm_cli::{AppConfig, Session, run_script};

const FUTURE_VALUE_KEYS: &str = "1 0 N 5 I/Y 1 0 0 0 +/- PV 0 PMT CPT FV";

fn session_from(toml: &str) -> Session {
    let config = AppConfig::from_toml_str(toml).expect("valid settings");
    let (session, _dismissals) = Session::new(
        config.calculator,
        Duration::from_millis(config.cli.notice_delay_ms),
    );
    session
}

#[tokio::test]
async fn future_value_script() {
    let mut session = session_from("");

    let lines = run_script(&mut session, FUTURE_VALUE_KEYS, false).unwrap();

    assert_eq!(lines, vec!["FV = 1628.89"]);
}

#[tokio::test]
async fn steps_show_every_display() {
    let mut session = session_from("");

    let lines = run_script(&mut session, "5 / 0 = 2nd CPT", true).unwrap();

    assert_eq!(
        lines,
        vec![
            "5",
            "5",
            "0",
            "Error: division by zero",
            "Error: division by zero",
            "CPT",
        ]
    );
}

#[tokio::test]
async fn precision_comes_from_settings() {
    let mut session = session_from("[calculator]\ndecimal_places = 4\n");

    let lines = run_script(&mut session, FUTURE_VALUE_KEYS, false).unwrap();

    assert_eq!(lines, vec!["FV = 1628.8946"]);
}

#[tokio::test]
async fn bad_token_fails_the_script() {
    let mut session = session_from("");

    let err = run_script(&mut session, "1 0 Q", false).unwrap_err();

    assert!(format!("{err:#}").contains("unknown key 'Q'"), "{err:#}");
}
