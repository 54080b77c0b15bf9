//! Transports: the objects that actually send commands to a store.
//!
//! A [`Transport`] knows nothing about vector indexes. It sends a
//! [`Command`] (or a batch of them) and hands back the raw [`Reply`]. The
//! redis-backed transports cover the single-node and cluster cases; tests
//! use [`crate::mock::MockTransport`].

use redis::cluster::{ClusterClientBuilder, ClusterConnection};
use redis::{ConnectionLike, IntoConnectionInfo, Value};
use tracing::{debug, info};

use redisx_codec::{Command, Reply};

use crate::config::ConnectionConfig;
use crate::error::{ClientError, TransportError};

/// Sends commands and returns raw replies.
///
/// An error reply from the store is returned as `TransportError::Server`,
/// never as a `Reply::Error` value.
pub trait Transport {
    /// Send one command.
    fn execute(&mut self, command: &Command) -> Result<Reply, TransportError>;

    /// Send `commands` in one round trip, replies in command order.
    ///
    /// When `atomic` is set the batch runs as a MULTI/EXEC transaction.
    /// If the store rejects any command the whole batch fails with the first
    /// `TransportError::Server`; commands the store accepted stay applied.
    fn execute_batch(
        &mut self,
        commands: &[Command],
        atomic: bool,
    ) -> Result<Vec<Reply>, TransportError>;

    /// Whether commands are routed across a cluster.
    fn is_cluster(&self) -> bool {
        false
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&mut self, command: &Command) -> Result<Reply, TransportError> {
        (**self).execute(command)
    }

    fn execute_batch(
        &mut self,
        commands: &[Command],
        atomic: bool,
    ) -> Result<Vec<Reply>, TransportError> {
        (**self).execute_batch(commands, atomic)
    }

    fn is_cluster(&self) -> bool {
        (**self).is_cluster()
    }
}

/// Single-node transport over a `redis::Connection`.
pub struct RedisTransport {
    conn: redis::Connection,
}

impl RedisTransport {
    /// Open a connection to a single node.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for an unusable configuration and
    /// `ClientError::Transport` if the connection cannot be opened.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, ClientError> {
        config.validate()?;
        info!(url = %config.url(), "Connecting to redis");

        let mut info = config
            .url()
            .into_connection_info()
            .map_err(TransportError::from)?;
        info.redis.username = config.username.clone();
        info.redis.password = config.password();

        let client = redis::Client::open(info).map_err(TransportError::from)?;
        let conn = client.get_connection().map_err(TransportError::from)?;
        Ok(Self { conn })
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: redis::Connection) -> Self {
        Self { conn }
    }
}

impl Transport for RedisTransport {
    fn execute(&mut self, command: &Command) -> Result<Reply, TransportError> {
        debug!(command = command.name(), args = command.args().len(), "Sending command");
        let value: Value = to_redis_cmd(command).query(&mut self.conn)?;
        Ok(reply_from_value(value))
    }

    fn execute_batch(
        &mut self,
        commands: &[Command],
        atomic: bool,
    ) -> Result<Vec<Reply>, TransportError> {
        debug!(size = commands.len(), atomic, "Flushing pipeline");
        let mut pipe = redis::pipe();
        if atomic {
            pipe.atomic();
        }
        for command in commands {
            pipe.add_command(to_redis_cmd(command));
        }
        let values: Vec<Value> = pipe.query(&mut self.conn)?;
        Ok(values.into_iter().map(reply_from_value).collect())
    }
}

/// Cluster transport over a `redis::cluster::ClusterConnection`.
///
/// Commands are routed by the driver. Atomic batches are rejected because
/// a transaction cannot span slots.
pub struct RedisClusterTransport {
    conn: ClusterConnection,
}

impl RedisClusterTransport {
    /// Connect to a cluster through its seed nodes.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` when `db` is not 0 (clusters have a
    /// single database) and `ClientError::Transport` if the connection fails.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, ClientError> {
        config.validate()?;
        if config.db != 0 {
            return Err(ClientError::Config(format!(
                "cluster mode only supports db 0, got {}",
                config.db
            )));
        }

        let nodes = config.cluster_urls();
        info!(nodes = nodes.len(), "Connecting to redis cluster");

        let mut builder = ClusterClientBuilder::new(nodes);
        if let Some(username) = &config.username {
            builder = builder.username(username.clone());
        }
        if let Some(password) = config.password() {
            builder = builder.password(password);
        }
        if config.read_from_replicas {
            builder = builder.read_from_replicas();
        }

        let client = builder.build().map_err(TransportError::from)?;
        let conn = client.get_connection().map_err(TransportError::from)?;
        Ok(Self { conn })
    }

    /// Wrap an already open cluster connection.
    pub fn from_connection(conn: ClusterConnection) -> Self {
        Self { conn }
    }

    /// Whether the underlying connection is still usable.
    pub fn is_open(&self) -> bool {
        self.conn.is_open()
    }
}

impl Transport for RedisClusterTransport {
    fn execute(&mut self, command: &Command) -> Result<Reply, TransportError> {
        debug!(command = command.name(), args = command.args().len(), "Sending cluster command");
        let value: Value = to_redis_cmd(command).query(&mut self.conn)?;
        Ok(reply_from_value(value))
    }

    fn execute_batch(
        &mut self,
        commands: &[Command],
        atomic: bool,
    ) -> Result<Vec<Reply>, TransportError> {
        if atomic {
            return Err(TransportError::Unsupported(
                "transactions are not supported in cluster mode".to_string(),
            ));
        }
        debug!(size = commands.len(), "Flushing cluster pipeline");
        let mut pipe = redis::cluster::cluster_pipe();
        for command in commands {
            pipe.add_command(to_redis_cmd(command));
        }
        let values: Vec<Value> = pipe.query(&mut self.conn)?;
        Ok(values.into_iter().map(reply_from_value).collect())
    }

    fn is_cluster(&self) -> bool {
        true
    }
}

/// Build the driver command, every argument sent as one bulk string.
fn to_redis_cmd(command: &Command) -> redis::Cmd {
    let mut cmd = redis::cmd(command.name());
    for arg in command.args() {
        cmd.arg(&arg.to_bytes()[..]);
    }
    cmd
}

/// Convert a driver value into a [`Reply`].
///
/// RESP3 aggregates are flattened into arrays (maps become `k, v, k, v`),
/// doubles are rendered as text and booleans as 0/1.
pub fn reply_from_value(value: Value) -> Reply {
    match value {
        Value::Nil => Reply::Nil,
        Value::Okay => Reply::Okay,
        Value::Int(i) => Reply::Int(i),
        Value::BulkString(bytes) => Reply::Data(bytes),
        Value::SimpleString(s) => Reply::Status(s),
        Value::Array(items) | Value::Set(items) => {
            Reply::Array(items.into_iter().map(reply_from_value).collect())
        }
        Value::Map(pairs) => Reply::Array(
            pairs
                .into_iter()
                .flat_map(|(k, v)| [reply_from_value(k), reply_from_value(v)])
                .collect(),
        ),
        Value::Attribute { data, .. } => reply_from_value(*data),
        Value::Double(d) => Reply::Data(d.to_string().into_bytes()),
        Value::Boolean(b) => Reply::Int(i64::from(b)),
        Value::VerbatimString { text, .. } => Reply::Data(text.into_bytes()),
        Value::ServerError(err) => Reply::Error(match err.details() {
            Some(detail) => format!("{} {}", err.code(), detail),
            None => err.code().to_string(),
        }),
        // push messages and big numbers
        other => Reply::Error(format!("unsupported reply: {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_values() {
        assert_eq!(reply_from_value(Value::Nil), Reply::Nil);
        assert_eq!(reply_from_value(Value::Okay), Reply::Okay);
        assert_eq!(reply_from_value(Value::Int(3)), Reply::Int(3));
        assert_eq!(
            reply_from_value(Value::BulkString(b"[1,2]".to_vec())),
            Reply::from("[1,2]")
        );
        assert_eq!(
            reply_from_value(Value::SimpleString("OK".to_string())),
            Reply::Status("OK".to_string())
        );
        assert_eq!(reply_from_value(Value::Double(0.5)), Reply::from("0.5"));
        assert_eq!(reply_from_value(Value::Boolean(true)), Reply::Int(1));
    }

    #[test]
    fn test_server_error_value_keeps_message() {
        // redis 0.27 does not re-export `ServerError`; the parser yields
        // `Value::ServerError(ExtensionError { code: "USEARCH", detail: Some("node not found") })`.
        let value = redis::parse_redis_value(b"-USEARCH node not found\r\n").unwrap();
        assert!(matches!(value, Value::ServerError(_)));
        assert_eq!(
            reply_from_value(value),
            Reply::Error("USEARCH node not found".to_string())
        );
    }

    #[test]
    fn test_map_is_flattened() {
        let value = Value::Map(vec![(
            Value::BulkString(b"dim".to_vec()),
            Value::Int(3),
        )]);
        assert_eq!(
            reply_from_value(value),
            Reply::Array(vec![Reply::from("dim"), Reply::Int(3)])
        );
    }

    #[test]
    fn test_nested_array() {
        let value = Value::Array(vec![
            Value::BulkString(b"7".to_vec()),
            Value::Nil,
            Value::Array(vec![Value::Int(1)]),
        ]);
        assert_eq!(
            reply_from_value(value),
            Reply::Array(vec![
                Reply::from("7"),
                Reply::Nil,
                Reply::Array(vec![Reply::Int(1)])
            ])
        );
    }

    #[test]
    fn test_to_redis_cmd_packs_every_arg() {
        let command = Command::new("USEARCH.NODE.GET_ID").arg("idx0").arg(7);
        let cmd = to_redis_cmd(&command);
        assert_eq!(cmd.args_iter().count(), 3);
    }
}
