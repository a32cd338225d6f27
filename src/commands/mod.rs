//! Command definitions
//!
//! Every command the interpreter understands is a variant of `Command`.
//! Parsing a line into a `Command` lives in `parser`; executing it is the
//! dispatcher's job.

mod parser;

pub use parser::ParseError;

use bytes::Bytes;

/// A parsed interpreter command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// SET key value
    Set { key: Bytes, value: Bytes },

    /// GET key
    Get { key: Bytes },

    /// UNSET key
    Unset { key: Bytes },

    /// NUMEQUALTO value
    NumEqualTo { value: Bytes },

    /// BEGIN
    Begin,

    /// ROLLBACK
    Rollback,

    /// COMMIT
    Commit,

    /// END - stop the session
    End,
}

impl Command {
    /// Parse one input line
    ///
    /// Returns `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        parser::parse_line(line)
    }

    /// Get the command name (for logging)
    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Unset { .. } => "UNSET",
            Command::NumEqualTo { .. } => "NUMEQUALTO",
            Command::Begin => "BEGIN",
            Command::Rollback => "ROLLBACK",
            Command::Commit => "COMMIT",
            Command::End => "END",
        }
    }

    /// Whether the command changes stored data or transaction depth
    pub fn is_write(&self) -> bool {
        !matches!(self, Command::Get { .. } | Command::NumEqualTo { .. } | Command::End)
    }
}
