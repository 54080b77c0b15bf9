//! Command implementations for the redisx CLI.
//!
//! Handles:
//! - settings: defaults -> config file -> env -> CLI flags
//! - index/node/search: one command against the store, result printed as JSON
//! - demo: create, inspect and delete a throwaway index
//! - config: print the effective settings

use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use redisx_client::{
    Client, ClientError, ConnectionConfig, RedisClient, RedisClusterClient, Transport,
    VectorCommands,
};
use redisx_types::{ExtraArgs, IndexInfo, IndexSpec, Settings};

use crate::cli::{Cli, Commands, IndexCommands, NodeCommands};

/// Entry point used by `main`.
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;
    init_logging(&settings.log_level)?;

    if let Commands::Config = cli.command {
        return show_config(&settings);
    }

    let config = ConnectionConfig::from(&settings);
    if settings.cluster.enabled {
        let mut client =
            RedisClusterClient::connect_cluster(&config).context("Failed to connect to cluster")?;
        dispatch(&mut client, cli.command)
    } else {
        let mut client = RedisClient::connect(&config)
            .with_context(|| format!("Failed to connect to {}", settings.connection_url()))?;
        dispatch(&mut client, cli.command)
    }
}

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(host) = &cli.host {
        settings.host = host.clone();
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(db) = cli.db {
        settings.db = db;
    }
    if cli.cluster {
        settings.cluster.enabled = true;
    }
    if let Some(log_level) = &cli.log_level {
        settings.log_level = log_level.clone();
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Print the effective settings as TOML with the password masked.
pub fn show_config(settings: &Settings) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&settings.redacted()).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}

/// Run one parsed command against `client`.
pub fn dispatch<T: Transport>(client: &mut Client<T>, command: Commands) -> Result<()> {
    match command {
        Commands::Index { command } => handle_index(client, command),
        Commands::Node { command } => handle_node(client, command),
        Commands::Search {
            index,
            vector,
            k,
            binary,
            opts,
        } => {
            let extra: ExtraArgs = opts.into_iter().collect();
            let hits = client
                .search_kann(&index, k, &vector.0, binary, &extra)
                .with_context(|| format!("Search on {} failed", index))?;
            print_json(&hits)
        }
        Commands::Demo { index, dim } => {
            let summary = run_demo(client, &index, dim);
            print_json(&summary)
        }
        Commands::Config => anyhow::bail!("config does not need a connection"),
    }
}

/// Handle `index` subcommands.
pub fn handle_index<T: Transport>(client: &mut Client<T>, command: IndexCommands) -> Result<()> {
    match command {
        IndexCommands::Create {
            name,
            dim,
            m,
            efcon,
            metric,
            quantization,
            opts,
        } => {
            let spec = IndexSpec::new(&name, dim)
                .with_m(m)
                .with_efcon(efcon)
                .with_metric(metric)
                .with_quantization(quantization)
                .with_extras(opts.into_iter().collect());
            let created = client
                .create_index(&spec)
                .with_context(|| format!("Failed to create index {}", name))?;
            info!(index = %name, created, "Create index");
            print_json(&created)
        }
        IndexCommands::Get { name } => {
            let info = client
                .get_index(&name)
                .with_context(|| format!("Failed to get index {}", name))?;
            print_json(&info)
        }
        IndexCommands::Del { name } => {
            let deleted = client
                .del_index(&name)
                .with_context(|| format!("Failed to delete index {}", name))?;
            info!(index = %name, deleted, "Delete index");
            print_json(&deleted)
        }
    }
}

/// Handle `node` subcommands.
pub fn handle_node<T: Transport>(client: &mut Client<T>, command: NodeCommands) -> Result<()> {
    match command {
        NodeCommands::Add {
            index,
            node,
            vector,
            binary,
            opts,
        } => {
            let extra: ExtraArgs = opts.into_iter().collect();
            let added = client
                .add_node(&index, &node, &vector.0, binary, &extra)
                .with_context(|| format!("Failed to add node {} to {}", node, index))?;
            print_json(&added)
        }
        NodeCommands::AddId {
            index,
            id,
            vector,
            binary,
            opts,
        } => {
            let extra: ExtraArgs = opts.into_iter().collect();
            let added = client
                .add_node_by_id(&index, id, &vector.0, binary, &extra)
                .with_context(|| format!("Failed to add node {} to {}", id, index))?;
            print_json(&added)
        }
        NodeCommands::Get { index, node } => {
            let nodes = client
                .get_node(&index, &node)
                .with_context(|| format!("Failed to get node {} from {}", node, index))?;
            print_json(&nodes)
        }
        NodeCommands::GetId { index, id } => {
            let nodes = client
                .get_node_by_id(&index, id)
                .with_context(|| format!("Failed to get node {} from {}", id, index))?;
            print_json(&nodes)
        }
        NodeCommands::Del { index, node } => {
            let deleted = client
                .del_node(&index, &node)
                .with_context(|| format!("Failed to delete node {} from {}", node, index))?;
            print_json(&deleted)
        }
        NodeCommands::DelId { index, id } => {
            let deleted = client
                .del_node_by_id(&index, id)
                .with_context(|| format!("Failed to delete node {} from {}", id, index))?;
            print_json(&deleted)
        }
    }
}

/// Outcome of each demo step.
#[derive(Debug, Serialize, PartialEq)]
pub struct DemoSummary {
    pub created: Option<bool>,
    pub info: Option<IndexInfo>,
    pub hits: usize,
    pub deleted: bool,
}

/// Create an index, describe it, query it with random vectors, delete it.
///
/// Every step logs its failure and falls back to an absent value so the
/// remaining steps still run.
pub fn run_demo<T: Transport>(client: &mut Client<T>, index: &str, dim: usize) -> DemoSummary {
    let mut rng = rand::rng();

    let created = client
        .create_index(&IndexSpec::new(index, dim))
        .map_err(|e| log_step("create index", &e))
        .ok();

    let info = client
        .get_index(index)
        .map_err(|e| log_step("get index", &e))
        .ok()
        .flatten();

    let mut hits = 0;
    for _ in 0..2 {
        let query: Vec<f64> = (0..dim).map(|_| rng.random::<f64>()).collect();
        match client.search_kann(index, 10, &query, false, &ExtraArgs::new()) {
            Ok(matches) => hits += matches.len(),
            Err(e) => log_step("search", &e),
        }
    }

    let deleted = client
        .del_index(index)
        .map_err(|e| log_step("delete index", &e))
        .unwrap_or(false);

    DemoSummary {
        created,
        info,
        hits,
        deleted,
    }
}

fn log_step(step: &str, err: &ClientError) {
    warn!(step, error = %err, "Demo step failed");
}

fn print_json<S: Serialize>(value: &S) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render result")?;
    println!("{}", rendered);
    Ok(())
}
