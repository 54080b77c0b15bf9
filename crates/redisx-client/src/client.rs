//! Direct execution context.

use std::sync::Arc;

use tracing::debug;

use redisx_codec::{Command, FromResponse, Response, ResponseCallbacks};

use crate::commands::CommandExecutor;
use crate::config::ConnectionConfig;
use crate::error::ClientError;
use crate::pipeline::Pipeline;
use crate::transport::{RedisClusterTransport, RedisTransport, Transport};

/// Single-node client.
pub type RedisClient = Client<RedisTransport>;

/// Cluster-aware client.
pub type RedisClusterClient = Client<RedisClusterTransport>;

/// Runs each command immediately and returns its decoded result.
///
/// All vector-index operations come from [`crate::VectorCommands`].
///
/// # Example
///
/// ```rust,no_run
/// use redisx_client::{ConnectionConfig, RedisClient, VectorCommands};
/// use redisx_types::{ExtraArgs, IndexSpec};
///
/// let mut client = RedisClient::connect(&ConnectionConfig::default())?;
/// client.create_index(&IndexSpec::new("idx0", 3))?;
/// let hits = client.search_kann("idx0", 5, &[0.1f32, 0.2, 0.3], false, &ExtraArgs::new())?;
/// println!("{} hits", hits.len());
/// # Ok::<(), redisx_client::ClientError>(())
/// ```
pub struct Client<T: Transport> {
    transport: T,
    callbacks: Arc<ResponseCallbacks>,
}

impl<T: Transport> Client<T> {
    /// Wrap a transport, decoding with the shared default registry.
    pub fn new(transport: T) -> Self {
        Self::with_callbacks(transport, ResponseCallbacks::shared())
    }

    /// Wrap a transport with a custom registry.
    pub fn with_callbacks(transport: T, callbacks: Arc<ResponseCallbacks>) -> Self {
        Self {
            transport,
            callbacks,
        }
    }

    pub fn callbacks(&self) -> &Arc<ResponseCallbacks> {
        &self.callbacks
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Whether this client routes commands across a cluster.
    pub fn is_cluster(&self) -> bool {
        self.transport.is_cluster()
    }

    /// Start a non-transactional pipeline on this client's transport.
    pub fn pipeline(&mut self) -> Pipeline<'_, T> {
        Pipeline::new(&mut self.transport, self.callbacks.clone(), false)
    }

    /// Start a MULTI/EXEC pipeline. Cluster transports reject it at `exec()`.
    pub fn transaction(&mut self) -> Pipeline<'_, T> {
        Pipeline::new(&mut self.transport, self.callbacks.clone(), true)
    }

    /// Run any command and return its untyped [`Response`].
    pub fn execute_command(&mut self, command: Command) -> Result<Response, ClientError> {
        self.execute(command)
    }
}

impl Client<RedisTransport> {
    /// Connect to a single node.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, ClientError> {
        Ok(Self::new(RedisTransport::connect(config)?))
    }
}

impl Client<RedisClusterTransport> {
    /// Connect to a cluster.
    pub fn connect_cluster(config: &ConnectionConfig) -> Result<Self, ClientError> {
        Ok(Self::new(RedisClusterTransport::connect(config)?))
    }
}

impl<T: Transport> CommandExecutor for Client<T> {
    type Reply<R> = R;

    fn execute<R: FromResponse>(&mut self, command: Command) -> Result<R, ClientError> {
        let reply = self.transport.execute(&command)?;
        debug!(command = command.name(), reply = reply.kind(), "Received reply");
        let response = self.callbacks.decode(command.name(), reply)?;
        Ok(R::from_response(command.name(), response)?)
    }
}
