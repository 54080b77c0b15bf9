//! End-to-end test infrastructure for redisx.
//!
//! Provides [`FakeStore`], an in-memory transport that understands the
//! USEARCH command family well enough to drive the client end to end:
//! indexes are kept in maps, searches are brute force, and replies use the
//! same layouts a real store sends. Store errors come back as
//! `TransportError::Server`, and a batch containing one fails as a whole
//! after every command in it has been applied, as with the redis driver.

use std::collections::{BTreeMap, HashMap};

use redisx_client::{Client, Transport, TransportError};
use redisx_codec::{CmdName, Command, Reply, TextVectorCodec};
use redisx_types::{Arg, DistanceMetric, Quantization, Vector};

/// One node stored in a fake index.
#[derive(Debug, Clone)]
pub struct FakeNode {
    pub name: Option<String>,
    pub vector: Vec<f64>,
}

/// One fake index.
#[derive(Debug, Clone)]
pub struct FakeIndex {
    pub dim: usize,
    pub m: usize,
    pub efcon: usize,
    pub metric: DistanceMetric,
    pub quantization: Quantization,
    /// Extra options in the order they were received
    pub extra: Vec<(String, String)>,
    pub nodes: BTreeMap<u64, FakeNode>,
    names: HashMap<String, u64>,
    next_id: u64,
}

impl FakeIndex {
    fn is_binary(&self) -> bool {
        self.quantization.is_binary()
    }

    /// Components as separate tokens: bits for binary indexes, shortest
    /// decimal form otherwise (`1.0` is sent as `1`).
    fn components(&self, vector: &[f64]) -> Reply {
        let binary = self.is_binary();
        Reply::Array(
            vector
                .iter()
                .map(|c| {
                    if binary {
                        Reply::from(if *c != 0.0 { "1" } else { "0" })
                    } else {
                        Reply::from(c.to_string())
                    }
                })
                .collect(),
        )
    }

    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let l2sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
        match self.metric {
            DistanceMetric::L2 => l2sq.sqrt(),
            DistanceMetric::InnerProduct => 1.0 - dot,
            DistanceMetric::Cosine => {
                let na = a.iter().map(|x| x * x).sum::<f64>().sqrt();
                let nb = b.iter().map(|x| x * x).sum::<f64>().sqrt();
                if na == 0.0 || nb == 0.0 {
                    1.0
                } else {
                    1.0 - dot / (na * nb)
                }
            }
            DistanceMetric::Hamming => a.iter().zip(b).filter(|(x, y)| x != y).count() as f64,
            _ => l2sq,
        }
    }
}

/// In-memory store speaking the USEARCH command family.
#[derive(Debug, Default)]
pub struct FakeStore {
    indexes: BTreeMap<String, FakeIndex>,
    cluster: bool,
    commands_seen: usize,
    batches_seen: usize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that behaves like a cluster transport (no transactions).
    pub fn cluster() -> Self {
        Self {
            cluster: true,
            ..Self::default()
        }
    }

    pub fn index(&self, name: &str) -> Option<&FakeIndex> {
        self.indexes.get(name)
    }

    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    /// Commands handled so far, batched or not.
    pub fn commands_seen(&self) -> usize {
        self.commands_seen
    }

    /// Batches accepted so far.
    pub fn batches_seen(&self) -> usize {
        self.batches_seen
    }

    /// Apply one command and produce the store's reply, or its error message.
    pub fn handle(&mut self, command: &Command) -> Result<Reply, String> {
        self.commands_seen += 1;
        let args: Vec<String> = command.args().iter().map(text).collect();
        match command.name() {
            CmdName::USEARCH_CREATE_INDEX => self.create_index(&args),
            CmdName::USEARCH_GET_INDEX => self.get_index(&args),
            CmdName::USEARCH_DEL_INDEX => self.del_index(&args),
            CmdName::USEARCH_ADD_NODE => self.add_node(&args, false),
            CmdName::USEARCH_ADD_ID_NODE => self.add_node(&args, true),
            CmdName::USEARCH_GET_NODE => self.get_node(&args, false),
            CmdName::USEARCH_GET_ID_NODE => self.get_node(&args, true),
            CmdName::USEARCH_DEL_NODE => self.del_node(&args, false),
            CmdName::USEARCH_DEL_ID_NODE => self.del_node(&args, true),
            CmdName::USEARCH_SEARCH_KANN => self.search(&args),
            other => Err(format!("ERR unknown command '{}'", other)),
        }
    }

    fn create_index(&mut self, args: &[String]) -> Result<Reply, String> {
        let name = args.first().filter(|n| !n.is_empty()).ok_or("ERR missing index name")?;
        if self.indexes.contains_key(name) {
            return Err(format!("ERR index {} already exists", name));
        }

        let mut index = FakeIndex {
            dim: 0,
            m: 0,
            efcon: 0,
            metric: DistanceMetric::default(),
            quantization: Quantization::default(),
            extra: Vec::new(),
            nodes: BTreeMap::new(),
            names: HashMap::new(),
            next_id: 1,
        };
        for pair in args[1..].chunks(2) {
            let [key, value] = pair else {
                return Err("ERR odd number of options".to_string());
            };
            match key.as_str() {
                "dim" => index.dim = parse_num(value)?,
                "m" => index.m = parse_num(value)?,
                "efcon" => index.efcon = parse_num(value)?,
                "metric" => index.metric = value.parse().map_err(|_| "ERR bad metric")?,
                "quantization" => {
                    index.quantization = value.parse().map_err(|_| "ERR bad quantization")?
                }
                _ => index.extra.push((key.clone(), value.clone())),
            }
        }
        if index.dim == 0 {
            return Err("ERR dim must be positive".to_string());
        }

        self.indexes.insert(name.clone(), index);
        Ok(Reply::Okay)
    }

    fn get_index(&self, args: &[String]) -> Result<Reply, String> {
        let Some(index) = args.first().and_then(|n| self.indexes.get(n)) else {
            return Ok(Reply::Array(vec![]));
        };
        Ok(Reply::Array(vec![
            Reply::from("name"),
            Reply::from(args[0].as_str()),
            Reply::from("dimensions"),
            Reply::Int(index.dim as i64),
            Reply::from("metric"),
            Reply::from(index.metric.as_str()),
            Reply::from("quantization"),
            Reply::from(index.quantization.as_str()),
            Reply::from("connectivity"),
            Reply::Int(index.m as i64),
            Reply::from("expansion_add"),
            Reply::Int(index.efcon as i64),
            Reply::from("index_size"),
            Reply::Int(index.nodes.len() as i64),
        ]))
    }

    fn del_index(&mut self, args: &[String]) -> Result<Reply, String> {
        let name = args.first().ok_or("ERR missing index name")?;
        match self.indexes.remove(name) {
            Some(_) => Ok(Reply::Int(1)),
            None => Err(format!("ERR index {} not found", name)),
        }
    }

    fn add_node(&mut self, args: &[String], by_id: bool) -> Result<Reply, String> {
        let [index_name, key, literal, ..] = args else {
            return Err("ERR wrong number of arguments".to_string());
        };
        let index = self
            .indexes
            .get_mut(index_name)
            .ok_or_else(|| format!("ERR index {} not found", index_name))?;
        let vector = decode_literal(literal)?;
        if vector.len() != index.dim {
            return Err(format!(
                "ERR expected {} components, got {}",
                index.dim,
                vector.len()
            ));
        }

        let (id, name) = if by_id {
            (parse_num::<u64>(key)?, None)
        } else {
            if index.names.contains_key(key) {
                return Err(format!("ERR node {} already exists", key));
            }
            (index.next_id, Some(key.clone()))
        };
        if index.nodes.contains_key(&id) {
            return Err(format!("ERR node {} already exists", id));
        }

        index.next_id = index.next_id.max(id + 1);
        if let Some(name) = &name {
            index.names.insert(name.clone(), id);
        }
        index.nodes.insert(id, FakeNode { name, vector });
        Ok(Reply::Okay)
    }

    fn get_node(&self, args: &[String], by_id: bool) -> Result<Reply, String> {
        let [index_name, key, ..] = args else {
            return Err("ERR wrong number of arguments".to_string());
        };
        let index = self
            .indexes
            .get(index_name)
            .ok_or_else(|| format!("ERR index {} not found", index_name))?;
        let (id, node) = node_id(index, key, by_id)?
            .and_then(|id| index.nodes.get(&id).map(|n| (id, n)))
            .ok_or_else(|| format!("ERR node {} not found", key))?;
        Ok(Reply::Array(vec![
            Reply::from("id"),
            Reply::Int(id as i64),
            Reply::from("name"),
            Reply::from(node_name(index_name, id, node)),
            Reply::from("data"),
            index.components(&node.vector),
        ]))
    }

    fn del_node(&mut self, args: &[String], by_id: bool) -> Result<Reply, String> {
        let [index_name, key, ..] = args else {
            return Err("ERR wrong number of arguments".to_string());
        };
        let index = self
            .indexes
            .get_mut(index_name)
            .ok_or_else(|| format!("ERR index {} not found", index_name))?;
        let removed = node_id(index, key, by_id)?.and_then(|id| index.nodes.remove(&id));
        Ok(match removed {
            Some(node) => {
                if let Some(name) = node.name {
                    index.names.remove(&name);
                }
                Reply::Int(1)
            }
            None => Reply::Int(0),
        })
    }

    fn search(&self, args: &[String]) -> Result<Reply, String> {
        let [index_name, k, literal, ..] = args else {
            return Err("ERR wrong number of arguments".to_string());
        };
        let index = self
            .indexes
            .get(index_name)
            .ok_or_else(|| format!("ERR index {} not found", index_name))?;
        let k: usize = parse_num(k)?;
        let query = decode_literal(literal)?;
        if query.len() != index.dim {
            return Err(format!(
                "ERR expected {} components, got {}",
                index.dim,
                query.len()
            ));
        }

        let mut scored: Vec<(f64, u64)> = index
            .nodes
            .iter()
            .map(|(id, node)| (index.distance(&query, &node.vector), *id))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        scored.truncate(k);

        let mut reply = Vec::with_capacity(scored.len() + 1);
        reply.push(Reply::Int(scored.len() as i64));
        for (distance, id) in scored {
            reply.push(Reply::Array(vec![
                Reply::from("id"),
                Reply::Int(id as i64),
                Reply::from("name"),
                Reply::from(node_name(index_name, id, &index.nodes[&id])),
                Reply::from("similarity"),
                Reply::from(format!("{:.6}", distance)),
            ]));
        }
        Ok(Reply::Array(reply))
    }
}

impl Transport for FakeStore {
    fn execute(&mut self, command: &Command) -> Result<Reply, TransportError> {
        self.handle(command).map_err(TransportError::Server)
    }

    fn execute_batch(
        &mut self,
        commands: &[Command],
        atomic: bool,
    ) -> Result<Vec<Reply>, TransportError> {
        if atomic && self.cluster {
            return Err(TransportError::Unsupported(
                "transactions are not supported in cluster mode".to_string(),
            ));
        }
        self.batches_seen += 1;
        let results: Vec<_> = commands.iter().map(|c| self.handle(c)).collect();
        results
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(TransportError::Server)
    }

    fn is_cluster(&self) -> bool {
        self.cluster
    }
}

/// Direct client over a fresh single-node fake store.
pub fn fake_client() -> Client<FakeStore> {
    Client::new(FakeStore::new())
}

/// Direct client over a fresh cluster fake store.
pub fn fake_cluster_client() -> Client<FakeStore> {
    Client::new(FakeStore::cluster())
}

/// Deterministic float vectors for tests.
pub fn random_vectors(seed: u64, count: usize, dim: usize) -> Vec<Vec<f32>> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (0..dim).map(|_| rng.random_range(-1.0f32..1.0)).collect())
        .collect()
}

fn text(arg: &Arg) -> String {
    String::from_utf8_lossy(&arg.to_bytes()).into_owned()
}

fn parse_num<T: std::str::FromStr>(value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("ERR invalid number {:?}", value))
}

fn decode_literal(literal: &str) -> Result<Vec<f64>, String> {
    TextVectorCodec::decode(literal.as_bytes())
        .map(|v| v.to_f64())
        .map_err(|e| format!("ERR {}", e))
}

/// Store-side node name: `usearch.<index>.<name or id>`.
fn node_name(index_name: &str, id: u64, node: &FakeNode) -> String {
    match &node.name {
        Some(name) => format!("usearch.{}.{}", index_name, name),
        None => format!("usearch.{}.{}", index_name, id),
    }
}

fn node_id(index: &FakeIndex, key: &str, by_id: bool) -> Result<Option<u64>, String> {
    if by_id {
        parse_num(key).map(Some)
    } else {
        Ok(index.names.get(key).copied())
    }
}

/// Components of a decoded vector as floats, for comparisons.
pub fn as_f64(vector: &Vector) -> Vec<f64> {
    vector.to_f64()
}
