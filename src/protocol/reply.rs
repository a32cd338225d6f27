//! Reply values and their text encoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

/// Message written when COMMIT is issued outside a transaction
pub const INVALID_COMMIT: &str = "INVALID COMMIT - NO TRANSACTION(S) IN PROGRESS";

/// Message written when ROLLBACK is issued outside a transaction
pub const INVALID_ROLLBACK: &str = "INVALID ROLLBACK";

/// Outcome of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The command produces no output
    Silent,

    /// A stored value
    Value(Bytes),

    /// An absent value: NULL
    Null,

    /// A count
    Integer(i64),

    /// A rejected command, reported on its own line
    Error(String),
}

impl Reply {
    /// Create a value reply
    pub fn value(b: impl Into<Bytes>) -> Self {
        Reply::Value(b.into())
    }

    /// Create an error reply
    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    /// Whether anything will be written for this reply
    pub fn is_silent(&self) -> bool {
        matches!(self, Reply::Silent)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Silent => write!(f, "Silent"),
            Reply::Value(b) => write!(f, "Value({} bytes)", b.len()),
            Reply::Null => write!(f, "Null"),
            Reply::Integer(i) => write!(f, "Integer({})", i),
            Reply::Error(e) => write!(f, "Error({})", e),
        }
    }
}

/// Reply encoder
pub struct ReplyEncoder;

impl ReplyEncoder {
    /// Append the text form of `reply` to `buf`
    ///
    /// Values are written as-is, so arbitrary bytes round-trip untouched.
    pub fn encode_to(buf: &mut BytesMut, reply: &Reply) {
        match reply {
            Reply::Silent => return,
            Reply::Value(bytes) => buf.put_slice(bytes),
            Reply::Null => buf.put_slice(b"NULL"),
            Reply::Integer(i) => buf.put_slice(i.to_string().as_bytes()),
            Reply::Error(msg) => buf.put_slice(msg.as_bytes()),
        }
        buf.put_u8(b'\n');
    }

    /// Encode `reply` into a fresh buffer
    pub fn encode(reply: &Reply) -> BytesMut {
        let mut buf = BytesMut::new();
        Self::encode_to(&mut buf, reply);
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_value() {
        assert_eq!(&ReplyEncoder::encode(&Reply::value("10"))[..], b"10\n");
    }

    #[test]
    fn test_encode_null_and_integer() {
        assert_eq!(&ReplyEncoder::encode(&Reply::Null)[..], b"NULL\n");
        assert_eq!(&ReplyEncoder::encode(&Reply::Integer(-3))[..], b"-3\n");
    }

    #[test]
    fn test_encode_silent_writes_nothing() {
        let mut buf = BytesMut::new();
        ReplyEncoder::encode_to(&mut buf, &Reply::Silent);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_encode_error() {
        let buf = ReplyEncoder::encode(&Reply::error(INVALID_ROLLBACK));
        assert_eq!(&buf[..], b"INVALID ROLLBACK\n");
    }
}
