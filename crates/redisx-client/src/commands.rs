//! The vector-index command set, shared by every execution context.
//!
//! [`VectorCommands`] is written once against [`CommandExecutor`]. A direct
//! client returns decoded values; a pipeline returns [`crate::Queued`]
//! handles that resolve after `exec()`. Both build commands with the same
//! builders and decode replies with the same registry, so the results are
//! identical.

use redisx_codec::{builder, Command, FromResponse};
use redisx_types::{Component, DistanceMetric, ExtraArgs, IndexInfo, IndexSpec, NodeMatch};

use crate::error::ClientError;

/// Something that can run a [`Command`] and produce a typed result.
pub trait CommandExecutor {
    /// What a call returns: the value itself, or a handle to it.
    type Reply<T>;

    /// Run (or queue) `command`; the reply is decoded as `T`.
    fn execute<T: FromResponse>(&mut self, command: Command) -> Result<Self::Reply<T>, ClientError>;
}

/// USEARCH index and node operations.
pub trait VectorCommands: CommandExecutor {
    /// `USEARCH.INDEX.CREATE`; `true` when the store answered OK.
    fn create_index(&mut self, spec: &IndexSpec) -> Result<Self::Reply<bool>, ClientError> {
        let command = builder::create_index(spec)?;
        self.execute(command)
    }

    /// `USEARCH.INDEX.CREATE` with default tuning parameters.
    fn create_index_with(
        &mut self,
        name: &str,
        dim: usize,
        metric: DistanceMetric,
        extra: ExtraArgs,
    ) -> Result<Self::Reply<bool>, ClientError> {
        let spec = IndexSpec::new(name, dim)
            .with_metric(metric)
            .with_extras(extra);
        self.create_index(&spec)
    }

    /// `USEARCH.INDEX.GET`; `None` when the index does not exist.
    fn get_index(&mut self, name: &str) -> Result<Self::Reply<Option<IndexInfo>>, ClientError> {
        let command = builder::get_index(name)?;
        self.execute(command)
    }

    /// `USEARCH.INDEX.DEL`
    fn del_index(&mut self, name: &str) -> Result<Self::Reply<bool>, ClientError> {
        let command = builder::del_index(name)?;
        self.execute(command)
    }

    /// `USEARCH.NODE.ADD`; the store assigns the node id.
    fn add_node<C: Component>(
        &mut self,
        index: &str,
        node: &str,
        vector: &[C],
        is_binary: bool,
        extra: &ExtraArgs,
    ) -> Result<Self::Reply<bool>, ClientError> {
        let command = builder::add_node(index, node, vector, is_binary, extra)?;
        self.execute(command)
    }

    /// `USEARCH.NODE.ADD_ID`
    fn add_node_by_id<C: Component>(
        &mut self,
        index: &str,
        id: u64,
        vector: &[C],
        is_binary: bool,
        extra: &ExtraArgs,
    ) -> Result<Self::Reply<bool>, ClientError> {
        let command = builder::add_node_by_id(index, id, vector, is_binary, extra)?;
        self.execute(command)
    }

    /// `USEARCH.NODE.GET`
    fn get_node(
        &mut self,
        index: &str,
        node: &str,
    ) -> Result<Self::Reply<Vec<NodeMatch>>, ClientError> {
        let command = builder::get_node(index, node)?;
        self.execute(command)
    }

    /// `USEARCH.NODE.GET_ID`
    fn get_node_by_id(
        &mut self,
        index: &str,
        id: u64,
    ) -> Result<Self::Reply<Vec<NodeMatch>>, ClientError> {
        let command = builder::get_node_by_id(index, id)?;
        self.execute(command)
    }

    /// `USEARCH.NODE.DEL`
    fn del_node(&mut self, index: &str, node: &str) -> Result<Self::Reply<bool>, ClientError> {
        let command = builder::del_node(index, node)?;
        self.execute(command)
    }

    /// `USEARCH.NODE.DEL_ID`
    fn del_node_by_id(&mut self, index: &str, id: u64) -> Result<Self::Reply<bool>, ClientError> {
        let command = builder::del_node_by_id(index, id)?;
        self.execute(command)
    }

    /// `USEARCH.SEARCH.KANN`: the `k` nearest nodes to `vector`.
    fn search_kann<C: Component>(
        &mut self,
        index: &str,
        k: usize,
        vector: &[C],
        is_binary: bool,
        extra: &ExtraArgs,
    ) -> Result<Self::Reply<Vec<NodeMatch>>, ClientError> {
        let command = builder::search_kann(index, k, vector, is_binary, extra)?;
        self.execute(command)
    }
}

impl<E: CommandExecutor + ?Sized> VectorCommands for E {}
