//! Command dispatcher
//!
//! Routes parsed commands to the transaction engine and turns the results
//! into replies. This keeps the session loop unaware of engine details.

use crate::commands::Command;
use crate::protocol::{Reply, INVALID_COMMIT, INVALID_ROLLBACK};
use crate::store::{StackStats, TransactionStack};
use tracing::{debug, info, warn};

/// Command dispatcher
///
/// Owns the transaction engine for the lifetime of a session.
pub struct Dispatcher {
    /// The transaction engine
    stack: TransactionStack,

    /// Log every command at info level
    echo: bool,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a dispatcher whose committed layer has room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Dispatcher {
            stack: TransactionStack::with_capacity(capacity),
            echo: false,
        }
    }

    /// Log every dispatched command at info level
    pub fn set_echo(&mut self, echo: bool) {
        self.echo = echo;
    }

    /// Execute a command against the engine
    pub fn dispatch(&mut self, command: Command) -> Reply {
        if self.echo {
            info!(command = command.name(), depth = self.stack.depth(), "executing");
        } else {
            debug!(command = command.name(), write = command.is_write(), "dispatching");
        }

        match command {
            Command::Set { key, value } => {
                self.stack.set(key, value);
                Reply::Silent
            }
            Command::Get { key } => match self.stack.get(&key) {
                Some(value) => Reply::Value(value.clone()),
                None => Reply::Null,
            },
            Command::Unset { key } => {
                self.stack.unset(key);
                Reply::Silent
            }
            Command::NumEqualTo { value } => Reply::Integer(self.stack.num_equal_to(&value)),
            Command::Begin => {
                self.stack.begin();
                debug!(depth = self.stack.depth(), "transaction opened");
                Reply::Silent
            }
            Command::Rollback => match self.stack.rollback() {
                Ok(()) => Reply::Silent,
                Err(e) => {
                    warn!("Rejected ROLLBACK: {}", e);
                    Reply::error(INVALID_ROLLBACK)
                }
            },
            Command::Commit => match self.stack.commit() {
                Ok(()) => {
                    debug!(committed_keys = self.stack.stats().committed_keys, "transactions committed");
                    Reply::Silent
                }
                Err(e) => {
                    warn!("Rejected COMMIT: {}", e);
                    Reply::error(INVALID_COMMIT)
                }
            },
            // The session stops reading on END; nothing to do here
            Command::End => Reply::Silent,
        }
    }

    /// Get statistics about the engine
    pub fn stats(&self) -> StackStats {
        self.stack.stats()
    }

    /// Get reference to the engine (for testing/inspection)
    pub fn stack(&self) -> &TransactionStack {
        &self.stack
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
