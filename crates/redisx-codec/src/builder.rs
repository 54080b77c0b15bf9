//! Command builders for the vector-index commands.
//!
//! Each builder takes typed inputs, checks the few things that can be known
//! before talking to the store, and lays the values out according to the
//! command's catalog entry. Extra option pairs always follow the fixed
//! parameters, in the order the caller inserted them. Builders never do I/O.

use redisx_types::{Arg, Component, ExtraArgs, IndexSpec};

use crate::catalog::{Param, VectorCommand};
use crate::command::Command;
use crate::error::CodecError;
use crate::vector::TextVectorCodec;

/// `USEARCH.INDEX.CREATE name dim D m M efcon E metric X quantization Q [extra...]`
pub fn create_index(spec: &IndexSpec) -> Result<Command, CodecError> {
    require_name("index name", &spec.name)?;
    if spec.dim == 0 {
        return Err(CodecError::InvalidArgument(
            "dim must be a positive integer".to_string(),
        ));
    }
    assemble(
        VectorCommand::CreateIndex,
        vec![
            Arg::from(&spec.name),
            Arg::from(spec.dim),
            Arg::from(spec.m),
            Arg::from(spec.efcon),
            Arg::from(spec.metric),
            Arg::from(spec.quantization),
        ],
        &spec.extra,
    )
}

/// `USEARCH.INDEX.GET name`
pub fn get_index(name: &str) -> Result<Command, CodecError> {
    require_name("index name", name)?;
    assemble(VectorCommand::GetIndex, vec![Arg::from(name)], &ExtraArgs::new())
}

/// `USEARCH.INDEX.DEL name`
pub fn del_index(name: &str) -> Result<Command, CodecError> {
    require_name("index name", name)?;
    assemble(VectorCommand::DelIndex, vec![Arg::from(name)], &ExtraArgs::new())
}

/// `USEARCH.NODE.ADD index node [v1,...,vn] [extra...]`; the store assigns the id.
pub fn add_node<C: Component>(
    index: &str,
    node: &str,
    vector: &[C],
    is_binary: bool,
    extra: &ExtraArgs,
) -> Result<Command, CodecError> {
    require_name("index name", index)?;
    require_name("node name", node)?;
    let literal = encode_vector(vector, is_binary)?;
    assemble(
        VectorCommand::AddNode,
        vec![Arg::from(index), Arg::from(node), literal],
        extra,
    )
}

/// `USEARCH.NODE.ADD_ID index id [v1,...,vn] [extra...]`
pub fn add_node_by_id<C: Component>(
    index: &str,
    id: u64,
    vector: &[C],
    is_binary: bool,
    extra: &ExtraArgs,
) -> Result<Command, CodecError> {
    require_name("index name", index)?;
    let literal = encode_vector(vector, is_binary)?;
    assemble(
        VectorCommand::AddNodeById,
        vec![Arg::from(index), Arg::from(id), literal],
        extra,
    )
}

/// `USEARCH.NODE.GET index node`
pub fn get_node(index: &str, node: &str) -> Result<Command, CodecError> {
    require_name("index name", index)?;
    require_name("node name", node)?;
    assemble(
        VectorCommand::GetNode,
        vec![Arg::from(index), Arg::from(node)],
        &ExtraArgs::new(),
    )
}

/// `USEARCH.NODE.GET_ID index id`
pub fn get_node_by_id(index: &str, id: u64) -> Result<Command, CodecError> {
    require_name("index name", index)?;
    assemble(
        VectorCommand::GetNodeById,
        vec![Arg::from(index), Arg::from(id)],
        &ExtraArgs::new(),
    )
}

/// `USEARCH.NODE.DEL index node`
pub fn del_node(index: &str, node: &str) -> Result<Command, CodecError> {
    require_name("index name", index)?;
    require_name("node name", node)?;
    assemble(
        VectorCommand::DelNode,
        vec![Arg::from(index), Arg::from(node)],
        &ExtraArgs::new(),
    )
}

/// `USEARCH.NODE.DEL_ID index id`
pub fn del_node_by_id(index: &str, id: u64) -> Result<Command, CodecError> {
    require_name("index name", index)?;
    assemble(
        VectorCommand::DelNodeById,
        vec![Arg::from(index), Arg::from(id)],
        &ExtraArgs::new(),
    )
}

/// `USEARCH.SEARCH.KANN index k [v1,...,vn] [extra...]`
pub fn search_kann<C: Component>(
    index: &str,
    k: usize,
    vector: &[C],
    is_binary: bool,
    extra: &ExtraArgs,
) -> Result<Command, CodecError> {
    require_name("index name", index)?;
    if k == 0 {
        return Err(CodecError::InvalidArgument(
            "k must be a positive integer".to_string(),
        ));
    }
    let literal = encode_vector(vector, is_binary)?;
    assemble(
        VectorCommand::SearchKann,
        vec![Arg::from(index), Arg::from(k), literal],
        extra,
    )
}

fn require_name(what: &str, value: &str) -> Result<(), CodecError> {
    if value.is_empty() {
        return Err(CodecError::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn encode_vector<C: Component>(vector: &[C], is_binary: bool) -> Result<Arg, CodecError> {
    if vector.is_empty() {
        return Err(CodecError::InvalidArgument(
            "vector must have at least one component".to_string(),
        ));
    }
    TextVectorCodec::encode(vector, is_binary).map(Arg::Bytes)
}

/// Lay out `values` per the catalog entry, then append the extra pairs.
fn assemble(
    command: VectorCommand,
    values: Vec<Arg>,
    extra: &ExtraArgs,
) -> Result<Command, CodecError> {
    let spec = command.spec();
    if values.len() != spec.params.len() {
        return Err(CodecError::InvalidArgument(format!(
            "{} takes {} fixed parameters, got {}",
            spec.name,
            spec.params.len(),
            values.len()
        )));
    }
    if !spec.accepts_extra && !extra.is_empty() {
        return Err(CodecError::InvalidArgument(format!(
            "{} does not accept extra options",
            spec.name
        )));
    }

    let mut args = Vec::with_capacity(spec.fixed_token_count() + extra.len() * 2);
    for (param, value) in spec.params.iter().zip(values) {
        if let Param::Named(name) = param {
            args.push(Arg::from(*name));
        }
        args.push(value);
    }
    args.extend(extra.flatten());

    Ok(Command::with_args(spec.name, args))
}
