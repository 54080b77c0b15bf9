//! # redisx-types
//!
//! Shared domain types for redisx.
//!
//! This crate defines the data structures the codec and client agree on:
//! - Args: wire arguments and ordered extra options
//! - Index: distance metrics, quantization types and index specs
//! - Vectors: decoded vectors and encodable component types
//! - Nodes: decoded index descriptions and node matches
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use redisx_types::{DistanceMetric, IndexSpec};
//!
//! let spec = IndexSpec::new("idx0", 3).with_metric(DistanceMetric::Cosine);
//! assert_eq!(spec.m, 10);
//! ```

pub mod arg;
pub mod config;
pub mod error;
pub mod index;
pub mod node;
pub mod vector;

pub use arg::{Arg, ExtraArgs};
pub use config::{default_config_dir, ClusterSettings, Settings};
pub use error::ConfigError;
pub use index::{DistanceMetric, IndexSpec, Quantization, DEFAULT_EFCON, DEFAULT_M};
pub use node::{IndexInfo, NodeMatch};
pub use vector::{Component, Vector};
