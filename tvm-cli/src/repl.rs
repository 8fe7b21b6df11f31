//! Line commands understood by the interactive prompt.

use thiserror::Error;
use tvm_core::{KeyId, KeyParseError, parse_key_sequence};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Keys to press, in order.
    Keys(Vec<KeyId>),
    /// `:vars`: print the TVM slots.
    Vars,
    /// `:quit` or `:q`.
    Quit,
    /// `:help`.
    Help,
    /// A blank line: reprint the display.
    Show,
}

pub const HELP: &str = "\
keys:     0-9 . + - * / = ENTER +/- CLR 2ND CPT N I/Y PV PMT FV DEL CE
commands: :vars  :help  :quit";

/// Errors for lines that are neither a command nor a key sequence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error(transparent)]
    Key(#[from] KeyParseError),
}

/// Parses a line typed at the prompt.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Show);
    }
    if let Some(name) = line.strip_prefix(':') {
        return match name.to_ascii_lowercase().as_str() {
            "vars" | "v" => Ok(Command::Vars),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            "help" | "h" => Ok(Command::Help),
            _ => Err(CommandError::UnknownCommand(line.to_string())),
        };
    }
    Ok(Command::Keys(parse_key_sequence(line)?))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tvm_core::TvmVariable;

    use super::*;

    #[test]
    fn blank_line_reprints_display() {
        assert_eq!(parse_command("   "), Ok(Command::Show));
    }

    #[test]
    fn colon_commands_are_case_insensitive() {
        assert_eq!(parse_command(":VARS"), Ok(Command::Vars));
        assert_eq!(parse_command(" :q "), Ok(Command::Quit));
        assert_eq!(parse_command(":help"), Ok(Command::Help));
    }

    #[test]
    fn other_lines_are_key_sequences() {
        assert_eq!(
            parse_command("5 PV"),
            Ok(Command::Keys(vec![
                KeyId::Digit(5),
                KeyId::Variable(TvmVariable::PresentValue),
            ]))
        );
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            parse_command(":frobnicate"),
            Err(CommandError::UnknownCommand(":frobnicate".to_string()))
        );
    }

    #[test]
    fn unknown_key_is_reported() {
        let err = parse_command("1 + banana").unwrap_err();

        assert_eq!(err.to_string(), "unknown key 'banana'");
    }
}
