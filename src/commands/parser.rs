//! Line parser
//!
//! Splits a line on whitespace, matches the command name case-insensitively
//! and checks the argument count.

use super::Command;
use bytes::Bytes;
use std::fmt;

/// Interpreter input errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command name not recognised
    UnknownCommand(String),

    /// Known command with the wrong number of arguments
    WrongArity { command: &'static str, expected: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownCommand(name) => {
                write!(f, "INVALID OPERATION ({}) - Type 'END' to exit", name.to_lowercase())
            }
            ParseError::WrongArity { command, expected } => {
                write!(
                    f,
                    "INVALID ARGUMENTS ({}) - expected {}",
                    command.to_lowercase(),
                    expected
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub(super) fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let mut tokens = line.split_whitespace();

    let name = match tokens.next() {
        Some(name) => name,
        None => return Ok(None),
    };

    let args: Vec<Bytes> = tokens
        .map(|token| Bytes::copy_from_slice(token.as_bytes()))
        .collect();

    let command = match name.to_uppercase().as_str() {
        "SET" => {
            let [key, value] = take_args::<2>("SET", args)?;
            Command::Set { key, value }
        }
        "GET" => {
            let [key] = take_args::<1>("GET", args)?;
            Command::Get { key }
        }
        "UNSET" => {
            let [key] = take_args::<1>("UNSET", args)?;
            Command::Unset { key }
        }
        "NUMEQUALTO" => {
            let [value] = take_args::<1>("NUMEQUALTO", args)?;
            Command::NumEqualTo { value }
        }
        "BEGIN" => {
            take_args::<0>("BEGIN", args)?;
            Command::Begin
        }
        "ROLLBACK" => {
            take_args::<0>("ROLLBACK", args)?;
            Command::Rollback
        }
        "COMMIT" => {
            take_args::<0>("COMMIT", args)?;
            Command::Commit
        }
        "END" => {
            take_args::<0>("END", args)?;
            Command::End
        }
        _ => return Err(ParseError::UnknownCommand(name.to_string())),
    };

    Ok(Some(command))
}

/// Require exactly `N` arguments
fn take_args<const N: usize>(
    command: &'static str,
    args: Vec<Bytes>,
) -> Result<[Bytes; N], ParseError> {
    args.try_into()
        .map_err(|_| ParseError::WrongArity { command, expected: N })
}
