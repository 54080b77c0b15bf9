//! redisx CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (index, node, search, demo, config)

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, IndexCommands, NodeCommands, VectorArg};
pub use commands::{
    dispatch, handle_index, handle_node, init_logging, load_settings, run, run_demo, show_config,
    DemoSummary,
};
