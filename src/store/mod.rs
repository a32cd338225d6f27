//! Layered transaction engine
//!
//! Provides the in-memory data structures behind the store: one `Overlay`
//! per open transaction, stacked on top of the committed base layer.
//! This module knows nothing about command parsing or output formatting.

mod overlay;
mod stack;

pub use overlay::Overlay;
pub use stack::{StackStats, TransactionStack, TxError};
