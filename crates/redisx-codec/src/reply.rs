//! Raw replies as returned by a transport.

use std::borrow::Cow;

/// One raw reply. Decoders read it once and produce an owned result.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nil,
    /// The `+OK` status
    Okay,
    /// Any other simple status string
    Status(String),
    Int(i64),
    /// Bulk string
    Data(Vec<u8>),
    /// Flat sequence of replies
    Array(Vec<Reply>),
    /// Error reply carried inside a result (e.g. one slot of a pipeline)
    Error(String),
}

impl Reply {
    /// Text form of a scalar reply. `None` for `Nil`, `Array` and `Error`.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Reply::Okay => Some(Cow::Borrowed("OK")),
            Reply::Status(s) => Some(Cow::Borrowed(s.as_str())),
            Reply::Int(i) => Some(Cow::Owned(i.to_string())),
            Reply::Data(bytes) => Some(String::from_utf8_lossy(bytes)),
            Reply::Nil | Reply::Array(_) | Reply::Error(_) => None,
        }
    }

    /// Raw bytes of a bulk or status reply.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Reply::Data(bytes) => Some(bytes),
            Reply::Status(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Nil => "nil",
            Reply::Okay => "ok",
            Reply::Status(_) => "status",
            Reply::Int(_) => "integer",
            Reply::Data(_) => "bulk",
            Reply::Array(_) => "array",
            Reply::Error(_) => "error",
        }
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Reply::Data(value.as_bytes().to_vec())
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Reply::Data(value.into_bytes())
    }
}

impl From<i64> for Reply {
    fn from(value: i64) -> Self {
        Reply::Int(value)
    }
}

impl<T: Into<Reply>> From<Vec<T>> for Reply {
    fn from(values: Vec<T>) -> Self {
        Reply::Array(values.into_iter().map(Into::into).collect())
    }
}
