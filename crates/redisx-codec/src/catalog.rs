//! Command catalog.
//!
//! The single place that defines each vector-index command: its wire name,
//! the order of its fixed parameters, whether it takes extra option pairs,
//! and the layout of its reply. The builder assembles commands from these
//! layouts and the response registry picks decoders from the reply shapes,
//! so the two cannot drift apart.

use std::fmt;

/// Wire command names.
pub struct CmdName;

impl CmdName {
    pub const USEARCH_CREATE_INDEX: &'static str = "USEARCH.INDEX.CREATE";
    pub const USEARCH_GET_INDEX: &'static str = "USEARCH.INDEX.GET";
    pub const USEARCH_DEL_INDEX: &'static str = "USEARCH.INDEX.DEL";
    pub const USEARCH_ADD_NODE: &'static str = "USEARCH.NODE.ADD";
    pub const USEARCH_GET_NODE: &'static str = "USEARCH.NODE.GET";
    pub const USEARCH_DEL_NODE: &'static str = "USEARCH.NODE.DEL";
    pub const USEARCH_ADD_ID_NODE: &'static str = "USEARCH.NODE.ADD_ID";
    pub const USEARCH_GET_ID_NODE: &'static str = "USEARCH.NODE.GET_ID";
    pub const USEARCH_DEL_ID_NODE: &'static str = "USEARCH.NODE.DEL_ID";
    pub const USEARCH_SEARCH_KANN: &'static str = "USEARCH.SEARCH.KANN";
}

/// One slot in a command's fixed parameter layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Value only
    Positional(&'static str),
    /// `name value` pair; the name token is sent verbatim
    Named(&'static str),
    /// Vector literal produced by the vector codec
    Vector(&'static str),
}

impl Param {
    pub fn name(&self) -> &'static str {
        match self {
            Param::Positional(n) | Param::Named(n) | Param::Vector(n) => n,
        }
    }
}

/// Layout of a command's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyShape {
    /// Scalar status: `OK` or a positive count means success
    Status,
    /// Flat `key, value, key, value, ...`; empty means the index does not exist
    KeyValuePairs,
    /// One node as a field map: `name, <name>, data, <components>`, plus
    /// `id, <id>` for lookups by id. `data` is an array of component tokens
    /// or a vector literal.
    NodeRecord,
    /// Hit count followed by one field map per hit:
    /// `<count>, [id, <id>, name, <name>, similarity, <distance>], ...`
    SearchRows,
}

/// Static description of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: VectorCommand,
    pub name: &'static str,
    /// Fixed parameters in wire order
    pub params: &'static [Param],
    /// Whether extra `name value` pairs may follow the fixed parameters
    pub accepts_extra: bool,
    pub reply: ReplyShape,
}

impl CommandSpec {
    /// Number of wire tokens produced by the fixed parameters.
    pub fn fixed_token_count(&self) -> usize {
        self.params
            .iter()
            .map(|p| match p {
                Param::Named(_) => 2,
                Param::Positional(_) | Param::Vector(_) => 1,
            })
            .sum()
    }

    /// Whether any fixed parameter is a vector literal.
    pub fn has_vector(&self) -> bool {
        self.params.iter().any(|p| matches!(p, Param::Vector(_)))
    }
}

/// The vector-index commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorCommand {
    CreateIndex,
    GetIndex,
    DelIndex,
    AddNode,
    AddNodeById,
    GetNode,
    GetNodeById,
    DelNode,
    DelNodeById,
    SearchKann,
}

impl VectorCommand {
    pub const ALL: [VectorCommand; 10] = [
        VectorCommand::CreateIndex,
        VectorCommand::GetIndex,
        VectorCommand::DelIndex,
        VectorCommand::AddNode,
        VectorCommand::AddNodeById,
        VectorCommand::GetNode,
        VectorCommand::GetNodeById,
        VectorCommand::DelNode,
        VectorCommand::DelNodeById,
        VectorCommand::SearchKann,
    ];

    pub fn spec(self) -> &'static CommandSpec {
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn reply_shape(self) -> ReplyShape {
        self.spec().reply
    }

    /// Look up a command by its exact wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        CATALOG.iter().find(|s| s.name == name).map(|s| s.command)
    }
}

impl fmt::Display for VectorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const CREATE_INDEX_PARAMS: &[Param] = &[
    Param::Positional("name"),
    Param::Named("dim"),
    Param::Named("m"),
    Param::Named("efcon"),
    Param::Named("metric"),
    Param::Named("quantization"),
];
const INDEX_NAME_PARAMS: &[Param] = &[Param::Positional("name")];
const ADD_NODE_PARAMS: &[Param] = &[
    Param::Positional("index"),
    Param::Positional("node"),
    Param::Vector("vector"),
];
const ADD_NODE_ID_PARAMS: &[Param] = &[
    Param::Positional("index"),
    Param::Positional("id"),
    Param::Vector("vector"),
];
const NODE_NAME_PARAMS: &[Param] = &[Param::Positional("index"), Param::Positional("node")];
const NODE_ID_PARAMS: &[Param] = &[Param::Positional("index"), Param::Positional("id")];
const SEARCH_PARAMS: &[Param] = &[
    Param::Positional("index"),
    Param::Positional("k"),
    Param::Vector("vector"),
];

/// Catalog entries, in `VectorCommand` declaration order.
pub static CATALOG: [CommandSpec; 10] = [
    CommandSpec {
        command: VectorCommand::CreateIndex,
        name: CmdName::USEARCH_CREATE_INDEX,
        params: CREATE_INDEX_PARAMS,
        accepts_extra: true,
        reply: ReplyShape::Status,
    },
    CommandSpec {
        command: VectorCommand::GetIndex,
        name: CmdName::USEARCH_GET_INDEX,
        params: INDEX_NAME_PARAMS,
        accepts_extra: false,
        reply: ReplyShape::KeyValuePairs,
    },
    CommandSpec {
        command: VectorCommand::DelIndex,
        name: CmdName::USEARCH_DEL_INDEX,
        params: INDEX_NAME_PARAMS,
        accepts_extra: false,
        reply: ReplyShape::Status,
    },
    CommandSpec {
        command: VectorCommand::AddNode,
        name: CmdName::USEARCH_ADD_NODE,
        params: ADD_NODE_PARAMS,
        accepts_extra: true,
        reply: ReplyShape::Status,
    },
    CommandSpec {
        command: VectorCommand::AddNodeById,
        name: CmdName::USEARCH_ADD_ID_NODE,
        params: ADD_NODE_ID_PARAMS,
        accepts_extra: true,
        reply: ReplyShape::Status,
    },
    CommandSpec {
        command: VectorCommand::GetNode,
        name: CmdName::USEARCH_GET_NODE,
        params: NODE_NAME_PARAMS,
        accepts_extra: false,
        reply: ReplyShape::NodeRecord,
    },
    CommandSpec {
        command: VectorCommand::GetNodeById,
        name: CmdName::USEARCH_GET_ID_NODE,
        params: NODE_ID_PARAMS,
        accepts_extra: false,
        reply: ReplyShape::NodeRecord,
    },
    CommandSpec {
        command: VectorCommand::DelNode,
        name: CmdName::USEARCH_DEL_NODE,
        params: NODE_NAME_PARAMS,
        accepts_extra: false,
        reply: ReplyShape::Status,
    },
    CommandSpec {
        command: VectorCommand::DelNodeById,
        name: CmdName::USEARCH_DEL_ID_NODE,
        params: NODE_ID_PARAMS,
        accepts_extra: false,
        reply: ReplyShape::Status,
    },
    CommandSpec {
        command: VectorCommand::SearchKann,
        name: CmdName::USEARCH_SEARCH_KANN,
        params: SEARCH_PARAMS,
        accepts_extra: true,
        reply: ReplyShape::SearchRows,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_enum() {
        for command in VectorCommand::ALL {
            assert_eq!(command.spec().command, command);
        }
    }

    #[test]
    fn test_wire_names() {
        let names: Vec<&str> = VectorCommand::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "USEARCH.INDEX.CREATE",
                "USEARCH.INDEX.GET",
                "USEARCH.INDEX.DEL",
                "USEARCH.NODE.ADD",
                "USEARCH.NODE.ADD_ID",
                "USEARCH.NODE.GET",
                "USEARCH.NODE.GET_ID",
                "USEARCH.NODE.DEL",
                "USEARCH.NODE.DEL_ID",
                "USEARCH.SEARCH.KANN",
            ]
        );
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(
            VectorCommand::from_name("USEARCH.SEARCH.KANN"),
            Some(VectorCommand::SearchKann)
        );
        assert_eq!(VectorCommand::from_name("usearch.search.kann"), None);
        assert_eq!(VectorCommand::from_name("GET"), None);
    }

    #[test]
    fn test_create_index_layout() {
        let spec = VectorCommand::CreateIndex.spec();
        let names: Vec<&str> = spec.params.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["name", "dim", "m", "efcon", "metric", "quantization"]);
        assert_eq!(spec.fixed_token_count(), 11);
        assert!(spec.accepts_extra);
        assert!(!spec.has_vector());
    }

    #[test]
    fn test_vector_bearing_commands() {
        let with_vector: Vec<VectorCommand> = VectorCommand::ALL
            .into_iter()
            .filter(|c| c.spec().has_vector())
            .collect();
        assert_eq!(
            with_vector,
            vec![
                VectorCommand::AddNode,
                VectorCommand::AddNodeById,
                VectorCommand::SearchKann
            ]
        );
    }

    #[test]
    fn test_reply_shapes() {
        assert_eq!(VectorCommand::GetIndex.reply_shape(), ReplyShape::KeyValuePairs);
        assert_eq!(VectorCommand::GetNodeById.reply_shape(), ReplyShape::NodeRecord);
        assert_eq!(VectorCommand::SearchKann.reply_shape(), ReplyShape::SearchRows);
        assert_eq!(VectorCommand::DelNodeById.reply_shape(), ReplyShape::Status);
    }
}
