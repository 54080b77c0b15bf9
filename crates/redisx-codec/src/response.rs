//! Response decoding and the per-command decoder registry.
//!
//! Every execution context (direct client, pipeline, and their cluster
//! variants) decodes replies through a [`ResponseCallbacks`] registry, so a
//! given reply always produces the same [`Response`] regardless of how the
//! command was sent. The registry is filled in before a client is built and
//! is read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use redisx_types::{IndexInfo, NodeMatch};

use crate::catalog::{ReplyShape, VectorCommand};
use crate::error::CodecError;
use crate::reply::Reply;
use crate::vector::TextVectorCodec;

/// Decoded reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Status command outcome
    Status(bool),
    /// Index description; `None` when the index does not exist
    Index(Option<IndexInfo>),
    /// Node lookup or search results
    Matches(Vec<NodeMatch>),
    /// Reply of a command with no registered decoder
    Raw(Reply),
}

impl Response {
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Status(_) => "status",
            Response::Index(_) => "index",
            Response::Matches(_) => "matches",
            Response::Raw(_) => "raw",
        }
    }
}

/// Decoder signature: command name (for error context) and the raw reply.
pub type ResponseCallback = fn(&str, Reply) -> Result<Response, CodecError>;

/// Map from wire command name to decoder.
#[derive(Clone)]
pub struct ResponseCallbacks {
    callbacks: HashMap<String, ResponseCallback>,
}

impl ResponseCallbacks {
    /// Registry with a decoder for every catalog command.
    pub fn new() -> Self {
        let callbacks = VectorCommand::ALL
            .into_iter()
            .map(|c| (c.name().to_string(), callback_for(c.reply_shape())))
            .collect();
        Self { callbacks }
    }

    /// Registry with no decoders; every reply decodes to `Response::Raw`.
    pub fn empty() -> Self {
        Self {
            callbacks: HashMap::new(),
        }
    }

    /// Process-wide default registry, built on first use.
    pub fn shared() -> Arc<ResponseCallbacks> {
        static SHARED: OnceLock<Arc<ResponseCallbacks>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(ResponseCallbacks::new())).clone()
    }

    /// Register or replace a decoder while building the registry.
    pub fn with_callback(mut self, command: impl Into<String>, callback: ResponseCallback) -> Self {
        self.callbacks.insert(command.into(), callback);
        self
    }

    pub fn get(&self, command: &str) -> Option<ResponseCallback> {
        self.callbacks.get(command).copied()
    }

    pub fn contains(&self, command: &str) -> bool {
        self.callbacks.contains_key(command)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Decode `reply` with the decoder registered for `command`.
    pub fn decode(&self, command: &str, reply: Reply) -> Result<Response, CodecError> {
        match self.callbacks.get(command) {
            Some(callback) => callback(command, reply).inspect_err(|e| {
                warn!(command, error = %e, "Failed to decode reply");
            }),
            None => Ok(Response::Raw(reply)),
        }
    }
}

impl Default for ResponseCallbacks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResponseCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.callbacks.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ResponseCallbacks")
            .field("commands", &names)
            .finish()
    }
}

/// Decoder for a catalog reply shape.
pub fn callback_for(shape: ReplyShape) -> ResponseCallback {
    match shape {
        ReplyShape::Status => parse_status,
        ReplyShape::KeyValuePairs => parse_index_info,
        ReplyShape::NodeRecord => parse_node_record,
        ReplyShape::SearchRows => parse_search_rows,
    }
}

/// `OK` (any case) or a positive count is success; any other scalar is failure.
pub fn parse_status(command: &str, reply: Reply) -> Result<Response, CodecError> {
    let ok = match &reply {
        Reply::Okay => true,
        Reply::Status(s) => s.eq_ignore_ascii_case("OK"),
        Reply::Data(bytes) => bytes.eq_ignore_ascii_case(b"OK"),
        Reply::Int(n) => *n > 0,
        Reply::Nil => false,
        Reply::Error(message) => {
            debug!(command, message = %message, "Status command failed");
            false
        }
        Reply::Array(_) => return Err(unexpected(command, "scalar status", &reply)),
    };
    Ok(Response::Status(ok))
}

/// Flat key/value pairs into an [`IndexInfo`]; empty means no such index.
pub fn parse_index_info(command: &str, reply: Reply) -> Result<Response, CodecError> {
    let items = match reply {
        Reply::Nil => return Ok(Response::Index(None)),
        Reply::Data(bytes) if bytes.is_empty() => return Ok(Response::Index(None)),
        Reply::Array(items) => items,
        Reply::Error(message) => return Err(error_reply(command, message)),
        other => return Err(unexpected(command, "key/value array", &other)),
    };
    if items.is_empty() {
        return Ok(Response::Index(None));
    }
    if items.len() % 2 != 0 {
        return Err(CodecError::UnexpectedReply {
            command: command.to_string(),
            detail: format!("odd number of key/value items: {}", items.len()),
        });
    }

    let mut info = IndexInfo::new();
    let mut iter = items.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        let key = scalar_text(command, &key)?;
        let value = match value {
            Reply::Nil => String::new(),
            other => scalar_text(command, &other)?,
        };
        info.insert(key, value);
    }
    Ok(Response::Index(Some(info)))
}

/// A single node field map. A nil or empty reply is an empty list.
pub fn parse_node_record(command: &str, reply: Reply) -> Result<Response, CodecError> {
    let fields = match reply {
        Reply::Nil => return Ok(Response::Matches(Vec::new())),
        Reply::Array(fields) if fields.is_empty() => return Ok(Response::Matches(Vec::new())),
        Reply::Array(fields) => fields,
        Reply::Error(message) => return Err(error_reply(command, message)),
        other => return Err(unexpected(command, "node field map", &other)),
    };
    Ok(Response::Matches(vec![node_from_fields(command, fields)?]))
}

/// Hit count followed by one field map per hit.
pub fn parse_search_rows(command: &str, reply: Reply) -> Result<Response, CodecError> {
    let items = match reply {
        Reply::Nil => return Ok(Response::Matches(Vec::new())),
        Reply::Array(items) => items,
        Reply::Error(message) => return Err(error_reply(command, message)),
        other => return Err(unexpected(command, "search result array", &other)),
    };

    let mut iter = items.into_iter();
    let count = match iter.next() {
        None => return Ok(Response::Matches(Vec::new())),
        Some(first) => hit_count(command, &first)?,
    };

    let mut matches = Vec::with_capacity(iter.len());
    for row in iter {
        match row {
            Reply::Array(fields) => matches.push(node_from_fields(command, fields)?),
            Reply::Error(message) => return Err(error_reply(command, message)),
            other => return Err(unexpected(command, "search row", &other)),
        }
    }
    if matches.len() != count {
        return Err(CodecError::UnexpectedReply {
            command: command.to_string(),
            detail: format!("reported {} hits, got {} rows", count, matches.len()),
        });
    }
    Ok(Response::Matches(matches))
}

/// Build a [`NodeMatch`] from alternating field names and values.
/// Unknown fields are skipped.
fn node_from_fields(command: &str, fields: Vec<Reply>) -> Result<NodeMatch, CodecError> {
    if fields.len() % 2 != 0 {
        return Err(CodecError::UnexpectedReply {
            command: command.to_string(),
            detail: format!("odd number of node fields: {}", fields.len()),
        });
    }

    let mut id = None;
    let mut name = None;
    let mut distance = None;
    let mut vector = None;

    let mut iter = fields.into_iter();
    while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
        let key = scalar_text(command, &key)?;
        match key.to_ascii_lowercase().as_str() {
            "id" => id = Some(scalar_text(command, &value)?),
            "name" => name = Some(scalar_text(command, &value)?),
            "similarity" | "distance" => distance = optional_distance(command, value)?,
            "data" | "vector" => vector = optional_vector(command, value)?,
            _ => {}
        }
    }

    let id = match (id, &name) {
        (Some(id), _) => id,
        (None, Some(name)) => name.clone(),
        (None, None) => {
            return Err(CodecError::UnexpectedReply {
                command: command.to_string(),
                detail: "node has neither id nor name".to_string(),
            })
        }
    };
    Ok(NodeMatch {
        id,
        name,
        distance,
        vector,
    })
}

fn hit_count(command: &str, reply: &Reply) -> Result<usize, CodecError> {
    let count = match reply {
        Reply::Int(n) => usize::try_from(*n).ok(),
        other => other.as_text().and_then(|t| t.trim().parse().ok()),
    };
    count.ok_or_else(|| unexpected(command, "hit count", reply))
}

/// Typed extraction from a decoded [`Response`].
pub trait FromResponse: Sized {
    fn from_response(command: &str, response: Response) -> Result<Self, CodecError>;
}

impl FromResponse for Response {
    fn from_response(_command: &str, response: Response) -> Result<Self, CodecError> {
        Ok(response)
    }
}

impl FromResponse for bool {
    fn from_response(command: &str, response: Response) -> Result<Self, CodecError> {
        match response {
            Response::Status(ok) => Ok(ok),
            other => Err(mismatch(command, "status", &other)),
        }
    }
}

impl FromResponse for Option<IndexInfo> {
    fn from_response(command: &str, response: Response) -> Result<Self, CodecError> {
        match response {
            Response::Index(info) => Ok(info),
            other => Err(mismatch(command, "index", &other)),
        }
    }
}

impl FromResponse for Vec<NodeMatch> {
    fn from_response(command: &str, response: Response) -> Result<Self, CodecError> {
        match response {
            Response::Matches(matches) => Ok(matches),
            other => Err(mismatch(command, "matches", &other)),
        }
    }
}

impl FromResponse for Reply {
    fn from_response(command: &str, response: Response) -> Result<Self, CodecError> {
        match response {
            Response::Raw(reply) => Ok(reply),
            other => Err(mismatch(command, "raw", &other)),
        }
    }
}

fn scalar_text(command: &str, reply: &Reply) -> Result<String, CodecError> {
    match reply {
        Reply::Error(message) => Err(error_reply(command, message.clone())),
        other => other
            .as_text()
            .map(|t| t.into_owned())
            .ok_or_else(|| unexpected(command, "scalar", other)),
    }
}

fn optional_vector(
    command: &str,
    reply: Reply,
) -> Result<Option<redisx_types::Vector>, CodecError> {
    match reply {
        Reply::Nil => Ok(None),
        Reply::Data(bytes) => TextVectorCodec::decode(&bytes).map(Some),
        Reply::Status(s) => TextVectorCodec::decode(s.as_bytes()).map(Some),
        Reply::Array(components) => {
            let tokens = components
                .iter()
                .map(|c| {
                    c.as_text()
                        .map(|t| t.into_owned())
                        .ok_or_else(|| unexpected(command, "vector component", c))
                })
                .collect::<Result<Vec<_>, _>>()?;
            TextVectorCodec::decode_components(&tokens).map(Some)
        }
        other => Err(unexpected(command, "vector literal", &other)),
    }
}

fn optional_distance(command: &str, reply: Reply) -> Result<Option<f64>, CodecError> {
    match reply {
        Reply::Nil => Ok(None),
        Reply::Int(i) => Ok(Some(i as f64)),
        other => {
            let text = scalar_text(command, &other)?;
            text.trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| CodecError::UnexpectedReply {
                    command: command.to_string(),
                    detail: format!("invalid distance: {:?}", text),
                })
        }
    }
}

fn unexpected(command: &str, expected: &str, got: &Reply) -> CodecError {
    CodecError::UnexpectedReply {
        command: command.to_string(),
        detail: format!("expected {}, got {}", expected, got.kind()),
    }
}

fn mismatch(command: &str, expected: &str, got: &Response) -> CodecError {
    CodecError::UnexpectedReply {
        command: command.to_string(),
        detail: format!("expected {} response, got {}", expected, got.kind()),
    }
}

fn error_reply(command: &str, message: String) -> CodecError {
    CodecError::ErrorReply {
        command: command.to_string(),
        message,
    }
}
