//! # redisx-codec
//!
//! Command building and reply decoding for the USEARCH vector-index commands.
//!
//! The crate never talks to a store. It turns typed inputs into [`Command`]
//! values and turns raw [`Reply`] values back into typed [`Response`]s:
//! - Catalog: one static entry per command (wire name, parameter layout, reply shape)
//! - Builder: validated command construction from the catalog layouts
//! - Vector: the `[c1,...,cn]` text literal used on the wire
//! - Response: per-command decoders and the shared decoder registry
//!
//! ## Usage
//!
//! ```rust
//! use redisx_codec::{builder, CmdName, Reply, Response, ResponseCallbacks};
//! use redisx_types::IndexSpec;
//!
//! let cmd = builder::create_index(&IndexSpec::new("idx0", 3)).unwrap();
//! assert_eq!(cmd.name(), CmdName::USEARCH_CREATE_INDEX);
//!
//! let callbacks = ResponseCallbacks::shared();
//! let response = callbacks.decode(cmd.name(), Reply::Okay).unwrap();
//! assert_eq!(response, Response::Status(true));
//! ```

pub mod builder;
pub mod catalog;
pub mod command;
pub mod error;
pub mod reply;
pub mod response;
pub mod vector;

pub use catalog::{CmdName, CommandSpec, Param, ReplyShape, VectorCommand, CATALOG};
pub use command::Command;
pub use error::CodecError;
pub use reply::Reply;
pub use response::{
    callback_for, FromResponse, Response, ResponseCallback, ResponseCallbacks,
};
pub use vector::TextVectorCodec;
