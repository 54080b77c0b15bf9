//! Codec error types.

use thiserror::Error;

/// Errors raised while encoding commands or decoding replies.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// Vector literal is missing its `[`/`]` delimiters
    #[error("Malformed vector: {0}")]
    MalformedVector(String),

    /// Component cannot be written in the requested form
    #[error("Unsupported component value at position {index}: {value}")]
    UnsupportedComponentValue { index: usize, value: String },

    /// Component token could not be parsed as a number
    #[error("Invalid vector component: {0:?}")]
    InvalidComponent(String),

    /// Command input rejected before anything was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Reply did not have the shape the command's decoder expects
    #[error("Unexpected reply for {command}: {detail}")]
    UnexpectedReply { command: String, detail: String },

    /// Store answered with an error where data was expected
    #[error("Error reply for {command}: {message}")]
    ErrorReply { command: String, message: String },
}
