//! Mock transport for testing.

use std::collections::VecDeque;

use redisx_codec::{Command, Reply};

use crate::error::TransportError;
use crate::transport::Transport;

/// Transport that answers from a scripted queue of replies.
///
/// Every command sent is recorded. When the script runs out the transport
/// reports `TransportError::Closed`, which makes unexpected sends visible.
/// A scripted `Reply::Error` is returned as `TransportError::Server`, the
/// way the redis transports report store errors.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: VecDeque<Reply>,
    sent: Vec<Command>,
    batches: Vec<(usize, bool)>,
    cluster: bool,
}

impl MockTransport {
    /// Create a single-node mock with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that behaves like a cluster transport.
    pub fn cluster() -> Self {
        Self {
            cluster: true,
            ..Self::default()
        }
    }

    /// Append one scripted reply.
    pub fn with_reply(mut self, reply: Reply) -> Self {
        self.replies.push_back(reply);
        self
    }

    /// Append several scripted replies.
    pub fn with_replies(mut self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.replies.extend(replies);
        self
    }

    /// Commands sent so far, in order.
    pub fn sent(&self) -> &[Command] {
        &self.sent
    }

    /// `(size, atomic)` of each batch accepted so far.
    pub fn batches(&self) -> &[(usize, bool)] {
        &self.batches
    }

    /// Scripted replies not yet consumed.
    pub fn remaining(&self) -> usize {
        self.replies.len()
    }

    fn next_reply(&mut self, command: &Command) -> Result<Reply, TransportError> {
        self.sent.push(command.clone());
        match self.replies.pop_front() {
            Some(Reply::Error(message)) => Err(TransportError::Server(message)),
            Some(reply) => Ok(reply),
            None => Err(TransportError::Closed(format!(
                "no scripted reply for {}",
                command.name()
            ))),
        }
    }
}

impl Transport for MockTransport {
    fn execute(&mut self, command: &Command) -> Result<Reply, TransportError> {
        self.next_reply(command)
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
        self.batches.push((commands.len(), atomic));
        let results: Vec<_> = commands.iter().map(|c| self.next_reply(c)).collect();
        results.into_iter().collect()
    }

    fn is_cluster(&self) -> bool {
        self.cluster
    }
}
