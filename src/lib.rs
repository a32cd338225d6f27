//! LayerKV - An in-memory key-value store with nested transactions
//!
//! LayerKV keeps one overlay per open transaction on top of a committed base
//! layer, which makes rollback a pop and keeps value counting proportional to
//! transaction depth rather than key count:
//! - `store` holds the transaction engine and knows nothing about text
//! - `commands` and `protocol` turn lines into commands and replies into lines
//! - `dispatch` and `session` connect the two

#[cfg(test)]
#[macro_use(quickcheck)]
extern crate quickcheck_macros;

pub mod config;
pub mod store;
pub mod commands;
pub mod protocol;
pub mod dispatch;
pub mod session;

/// Re-export commonly used types
pub use config::Config;
pub use store::{Overlay, TransactionStack, TxError};
pub use commands::{Command, ParseError};
pub use protocol::Reply;
