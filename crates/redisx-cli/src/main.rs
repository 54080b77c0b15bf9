//! redisx
//!
//! Command-line client for USEARCH vector indexes.
//!
//! # Usage
//!
//! ```bash
//! redisx index create idx0 --dim 3 [--metric COS] [--opt key=value]
//! redisx node add idx0 n1 0.1,0.2,0.3
//! redisx search idx0 0.1,0.2,0.3 -k 5
//! redisx index del idx0
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/redisx/config.toml)
//! 3. Environment variables (REDISX_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use redisx_cli::{run, Cli};

fn main() -> Result<()> {
    run(Cli::parse())
}
