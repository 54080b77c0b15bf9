//! Error types for the vector-index client.

use thiserror::Error;

use redisx_codec::CodecError;
use redisx_types::ConfigError;

/// Errors raised by a transport while sending commands.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection or protocol error from the redis driver
    #[error("Redis error: {0}")]
    Redis(redis::RedisError),

    /// The store answered with an error reply (`ERR ...`)
    #[error("Store error: {0}")]
    Server(String),

    /// Operation not available on this transport
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Transport cannot produce any more replies
    #[error("Transport closed: {0}")]
    Closed(String),
}

impl From<redis::RedisError> for TransportError {
    fn from(err: redis::RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::ResponseError | redis::ErrorKind::ExtensionError => {
                TransportError::Server(server_message(&err))
            }
            _ => TransportError::Redis(err),
        }
    }
}

/// `CODE detail`, the way the store wrote it.
fn server_message(err: &redis::RedisError) -> String {
    match (err.code(), err.detail()) {
        (Some(code), Some(detail)) => format!("{} {}", code, detail),
        (Some(code), None) => code.to_string(),
        _ => err.to_string(),
    }
}

/// Errors that can occur when using the vector-index client.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Sending the command failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Building the command or decoding its reply failed
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Invalid connection configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pipeline result handle does not match a pending result
    #[error("Missing pipeline result: {0}")]
    MissingResult(String),
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        ClientError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_reply_is_server_error() {
        let err = redis::RedisError::from((
            redis::ErrorKind::ResponseError,
            "An error was signalled by the server",
            "index idx0 already exists".to_string(),
        ));
        match TransportError::from(err) {
            TransportError::Server(message) => {
                assert!(message.contains("index idx0 already exists"), "got: {}", message)
            }
            other => panic!("Expected Server, got {:?}", other),
        }
    }

    #[test]
    fn test_io_error_stays_redis_error() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::from(redis::RedisError::from(io));
        assert!(matches!(err, TransportError::Redis(_)));
    }

    #[test]
    fn test_server_error_wraps_into_client_error() {
        let err: ClientError = TransportError::Server("ERR boom".to_string()).into();
        assert_eq!(err.to_string(), "Transport error: Store error: ERR boom");
    }
}
