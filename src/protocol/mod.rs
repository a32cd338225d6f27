//! Line-oriented output protocol
//!
//! Defines what a command produces and how that is written back to the
//! client, one line per reply. Independent from the engine and the parser.

mod reply;

pub use reply::{Reply, ReplyEncoder, INVALID_COMMIT, INVALID_ROLLBACK};
