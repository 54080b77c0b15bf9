//! Client library for USEARCH vector-index commands.
//!
//! This crate provides:
//! - `Transport` implementations over the `redis` driver (single node and cluster)
//! - `Client` for direct execution and `Pipeline` for batched execution
//! - `VectorCommands`, the index and node operations shared by both
//!
//! # Example
//!
//! ```rust,no_run
//! use redisx_client::{ConnectionConfig, RedisClient, VectorCommands};
//! use redisx_types::{ExtraArgs, IndexSpec};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = RedisClient::connect(&ConnectionConfig::new("localhost", 6379))?;
//!
//!     let mut pipe = client.pipeline();
//!     let created = pipe.create_index(&IndexSpec::new("idx0", 3))?;
//!     let added = pipe.add_node("idx0", "n1", &[0.1f32, 0.2, 0.3], false, &ExtraArgs::new())?;
//!     let mut results = pipe.exec()?;
//!
//!     println!("created: {}", results.take(created)?);
//!     println!("added: {}", results.take(added)?);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod mock;
pub mod pipeline;
pub mod transport;

pub use client::{Client, RedisClient, RedisClusterClient};
pub use commands::{CommandExecutor, VectorCommands};
pub use config::ConnectionConfig;
pub use error::{ClientError, TransportError};
pub use mock::MockTransport;
pub use pipeline::{Pipeline, PipelineResults, Queued};
pub use transport::{reply_from_value, RedisClusterTransport, RedisTransport, Transport};
