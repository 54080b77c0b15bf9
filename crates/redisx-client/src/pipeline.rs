//! Deferred execution context.
//!
//! Commands issued on a [`Pipeline`] are queued and return a [`Queued`]
//! handle. `exec()` sends the whole queue in one round trip, decodes every
//! reply through the client's registry and returns [`PipelineResults`], from
//! which each typed value is taken with its handle.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use redisx_codec::{CodecError, Command, FromResponse, Response, ResponseCallbacks};

use crate::commands::CommandExecutor;
use crate::error::ClientError;
use crate::transport::Transport;

/// Handle to the result of a queued command.
pub struct Queued<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Queued<T> {
    fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Position of the command in its pipeline.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for Queued<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Queued<T> {}

impl<T> fmt::Debug for Queued<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Queued").field("index", &self.index).finish()
    }
}

/// Queue of commands bound to a client's transport and registry.
pub struct Pipeline<'a, T: Transport> {
    transport: &'a mut T,
    callbacks: Arc<ResponseCallbacks>,
    commands: Vec<Command>,
    atomic: bool,
}

impl<'a, T: Transport> Pipeline<'a, T> {
    pub(crate) fn new(transport: &'a mut T, callbacks: Arc<ResponseCallbacks>, atomic: bool) -> Self {
        Self {
            transport,
            callbacks,
            commands: Vec::new(),
            atomic,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    /// Commands queued so far, in send order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Queue any command; its reply is returned as an untyped [`Response`].
    pub fn execute_command(&mut self, command: Command) -> Queued<Response> {
        self.push(command)
    }

    /// Drop every queued command without sending anything.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Send the queue and decode every reply.
    ///
    /// An empty pipeline returns empty results without touching the
    /// transport. A reply that fails to decode only affects its own slot.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Transport` if the batch fails (including a store
    /// error reply to any queued command), and
    /// `ClientError::MissingResult` if the transport returns a different
    /// number of replies than commands were sent.
    pub fn exec(self) -> Result<PipelineResults, ClientError> {
        if self.commands.is_empty() {
            return Ok(PipelineResults::default());
        }

        debug!(size = self.commands.len(), atomic = self.atomic, "Executing pipeline");
        let replies = self.transport.execute_batch(&self.commands, self.atomic)?;
        if replies.len() != self.commands.len() {
            return Err(ClientError::MissingResult(format!(
                "sent {} commands, received {} replies",
                self.commands.len(),
                replies.len()
            )));
        }

        let mut names = Vec::with_capacity(self.commands.len());
        let mut slots = Vec::with_capacity(self.commands.len());
        for (command, reply) in self.commands.into_iter().zip(replies) {
            let (name, _) = command.into_parts();
            slots.push(Some(self.callbacks.decode(&name, reply)));
            names.push(name);
        }
        Ok(PipelineResults { names, slots })
    }

    fn push<R>(&mut self, command: Command) -> Queued<R> {
        let handle = Queued::new(self.commands.len());
        self.commands.push(command);
        handle
    }
}

impl<T: Transport> CommandExecutor for Pipeline<'_, T> {
    type Reply<R> = Queued<R>;

    fn execute<R: FromResponse>(&mut self, command: Command) -> Result<Queued<R>, ClientError> {
        Ok(self.push(command))
    }
}

/// Decoded replies of one pipeline run, taken out by handle.
#[derive(Debug, Default)]
pub struct PipelineResults {
    names: Vec<String>,
    slots: Vec<Option<Result<Response, CodecError>>>,
}

impl PipelineResults {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Take the typed result for `handle`. Each result can be taken once.
    ///
    /// # Errors
    ///
    /// - `ClientError::MissingResult` if the slot is out of range or already taken
    /// - `ClientError::Codec` if the reply failed to decode or has another type
    pub fn take<T: FromResponse>(&mut self, handle: Queued<T>) -> Result<T, ClientError> {
        let slot = self
            .slots
            .get_mut(handle.index)
            .and_then(Option::take)
            .ok_or_else(|| {
                ClientError::MissingResult(format!("no pending result at slot {}", handle.index))
            })?;
        let response = slot?;
        Ok(T::from_response(&self.names[handle.index], response)?)
    }

    /// Remaining results in send order; taken slots are skipped.
    pub fn into_responses(self) -> Vec<Result<Response, CodecError>> {
        self.slots.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::commands::VectorCommands;
    use crate::error::TransportError;
    use crate::mock::MockTransport;
    use redisx_codec::Reply;
    use redisx_types::{ExtraArgs, IndexInfo, IndexSpec};

    #[test]
    fn test_empty_pipeline_sends_nothing() {
        let mut client = Client::new(MockTransport::new());
        let results = client.pipeline().exec().unwrap();
        assert!(results.is_empty());
        assert!(client.transport().batches().is_empty());
    }

    #[test]
    fn test_pipeline_queues_and_decodes() {
        let transport = MockTransport::new()
            .with_reply(Reply::Okay)
            .with_reply(Reply::from(vec!["dim", "3"]))
            .with_reply(Reply::Nil);
        let mut client = Client::new(transport);

        let mut pipe = client.pipeline();
        let created = pipe.create_index(&IndexSpec::new("idx0", 3)).unwrap();
        let info = pipe.get_index("idx0").unwrap();
        let hits = pipe
            .search_kann("idx0", 2, &[1.0f32, 0.0, 0.0], false, &ExtraArgs::new())
            .unwrap();
        assert_eq!(pipe.len(), 3);
        assert_eq!(info.index(), 1);

        let mut results = pipe.exec().unwrap();
        assert!(results.take(created).unwrap());
        let expected: IndexInfo = vec![("dim", "3")].into_iter().collect();
        assert_eq!(results.take(info).unwrap(), Some(expected));
        assert!(results.take(hits).unwrap().is_empty());

        assert_eq!(client.transport().batches(), &[(3, false)]);
    }

    #[test]
    fn test_result_taken_once() {
        let mut client = Client::new(MockTransport::new().with_reply(Reply::Okay));
        let mut pipe = client.pipeline();
        let handle = pipe.del_index("idx0").unwrap();
        let mut results = pipe.exec().unwrap();
        assert!(results.take(handle).unwrap());
        assert!(matches!(results.take(handle), Err(ClientError::MissingResult(_))));
    }

    #[test]
    fn test_decode_error_stays_in_slot() {
        let transport = MockTransport::new()
            .with_reply(Reply::from(vec!["dim"]))
            .with_reply(Reply::Okay);
        let mut client = Client::new(transport);
        let mut pipe = client.pipeline();
        let info = pipe.get_index("idx0").unwrap();
        let deleted = pipe.del_index("idx0").unwrap();
        let mut results = pipe.exec().unwrap();

        assert!(matches!(
            results.take(info),
            Err(ClientError::Codec(CodecError::UnexpectedReply { .. }))
        ));
        assert!(results.take(deleted).unwrap());
    }

    #[test]
    fn test_store_error_fails_whole_batch() {
        let transport = MockTransport::new()
            .with_reply(Reply::Okay)
            .with_reply(Reply::Error("ERR index idx0 not found".into()));
        let mut client = Client::new(transport);
        let mut pipe = client.pipeline();
        pipe.create_index(&IndexSpec::new("idx1", 3)).unwrap();
        pipe.del_index("idx0").unwrap();

        let err = pipe.exec().unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::Server(m)) if m.contains("not found")
        ));
        assert_eq!(client.transport().sent().len(), 2);
    }

    #[test]
    fn test_transaction_is_atomic() {
        let mut client = Client::new(MockTransport::new().with_reply(Reply::Okay));
        let mut tx = client.transaction();
        assert!(tx.is_atomic());
        tx.del_index("idx0").unwrap();
        tx.exec().unwrap();
        assert_eq!(client.transport().batches(), &[(1, true)]);
    }

    #[test]
    fn test_cluster_rejects_transaction() {
        let mut client = Client::new(MockTransport::cluster().with_reply(Reply::Okay));
        assert!(client.is_cluster());
        let mut tx = client.transaction();
        tx.del_index("idx0").unwrap();
        let err = tx.exec().unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::Unsupported(_))));

        let mut pipe = client.pipeline();
        let handle = pipe.del_index("idx0").unwrap();
        assert!(pipe.exec().unwrap().take(handle).unwrap());
    }

    #[test]
    fn test_builder_error_queues_nothing() {
        let mut client = Client::new(MockTransport::new());
        let mut pipe = client.pipeline();
        assert!(pipe.create_index(&IndexSpec::new("idx0", 0)).is_err());
        assert!(pipe.is_empty());
    }

    #[test]
    fn test_into_responses_skips_taken() {
        let transport = MockTransport::new().with_reply(Reply::Okay).with_reply(Reply::Int(0));
        let mut client = Client::new(transport);
        let mut pipe = client.pipeline();
        let first = pipe.del_index("a").unwrap();
        pipe.del_index("b").unwrap();
        let mut results = pipe.exec().unwrap();
        results.take(first).unwrap();
        assert_eq!(results.into_responses(), vec![Ok(Response::Status(false))]);
    }
}
