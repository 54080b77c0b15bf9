//! CLI argument parsing for redisx.
//!
//! CLI flags override every other configuration source.

use std::str::FromStr;

use clap::{Parser, Subcommand};

use redisx_types::{DistanceMetric, Quantization, DEFAULT_EFCON, DEFAULT_M};

/// USEARCH vector-index client
///
/// Create, inspect and delete vector indexes, insert and fetch nodes, and run
/// nearest-neighbor searches against a Redis-protocol store.
#[derive(Parser, Debug)]
#[command(name = "redisx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/redisx/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Store host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Store port
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Database number (single-node only)
    #[arg(long, global = true)]
    pub db: Option<i64>,

    /// Connect in cluster mode
    #[arg(long, global = true)]
    pub cluster: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index management
    Index {
        #[command(subcommand)]
        command: IndexCommands,
    },

    /// Node management
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Find the k nearest nodes to a vector
    Search {
        /// Index name
        index: String,

        /// Query vector, e.g. "0.1,0.2,0.3" or "[0.1,0.2,0.3]"
        vector: VectorArg,

        /// Number of neighbors
        #[arg(short, long, default_value = "10")]
        k: usize,

        /// Encode the vector as bits (B1 indexes)
        #[arg(long)]
        binary: bool,

        /// Extra option passed through verbatim (repeatable)
        #[arg(long = "opt", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        opts: Vec<(String, String)>,
    },

    /// Create, inspect and delete a throwaway index
    Demo {
        /// Index name used by the demo
        #[arg(long, default_value = "redisx_demo")]
        index: String,

        /// Vector dimension
        #[arg(long, default_value = "4")]
        dim: usize,
    },

    /// Print the effective configuration (password redacted)
    Config,
}

/// Index subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum IndexCommands {
    /// Create an index
    Create {
        /// Index name
        name: String,

        /// Vector dimension
        #[arg(short, long)]
        dim: usize,

        /// Graph connectivity
        #[arg(short, long, default_value_t = DEFAULT_M)]
        m: usize,

        /// Expansion factor at construction
        #[arg(long, default_value_t = DEFAULT_EFCON)]
        efcon: usize,

        /// Distance metric (IP, L2, COS, HAMMING, ...)
        #[arg(long, default_value = "IP")]
        metric: DistanceMetric,

        /// Stored precision (F64, F32, F16, I8, B1)
        #[arg(short, long, default_value = "F32")]
        quantization: Quantization,

        /// Extra option passed through verbatim (repeatable)
        #[arg(long = "opt", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        opts: Vec<(String, String)>,
    },

    /// Describe an index
    Get {
        /// Index name
        name: String,
    },

    /// Delete an index
    Del {
        /// Index name
        name: String,
    },
}

/// Node subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum NodeCommands {
    /// Add a named node; the store assigns its id
    Add {
        index: String,
        node: String,
        vector: VectorArg,
        #[arg(long)]
        binary: bool,
        #[arg(long = "opt", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        opts: Vec<(String, String)>,
    },

    /// Add a node under an explicit id
    AddId {
        index: String,
        id: u64,
        vector: VectorArg,
        #[arg(long)]
        binary: bool,
        #[arg(long = "opt", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        opts: Vec<(String, String)>,
    },

    /// Fetch a node by name
    Get { index: String, node: String },

    /// Fetch a node by id
    GetId { index: String, id: u64 },

    /// Delete a node by name
    Del { index: String, node: String },

    /// Delete a node by id
    DelId { index: String, id: u64 },
}

/// Vector given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorArg(pub Vec<f64>);

impl FromStr for VectorArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_vector(s).map(VectorArg)
    }
}

/// Parse `1,2,3` or `[1,2,3]` into components.
pub fn parse_vector(s: &str) -> Result<Vec<f64>, String> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .unwrap_or(trimmed);
    if inner.trim().is_empty() {
        return Err("vector must have at least one component".to_string());
    }
    inner
        .split(',')
        .map(|c| {
            c.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid component: {:?}", c.trim()))
        })
        .collect()
}

/// Parse `key=value`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", s))?;
    if key.is_empty() {
        return Err(format!("empty key in {:?}", s));
    }
    Ok((key.to_string(), value.to_string()))
}
