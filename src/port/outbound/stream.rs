//! Message stream port feeding the ingestion loop.

use async_trait::async_trait;

use crate::error::Result;

/// One raw message pulled from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    /// Transport-assigned identifier, used for acknowledgement.
    pub id: String,
    /// Undecoded message body.
    pub payload: Vec<u8>,
}

impl StreamMessage {
    pub fn new(id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// Consumer side of a durable message stream with explicit acknowledgement.
///
/// Messages that are pulled but never acknowledged are redelivered by the
/// transport, so consumers get at-least-once delivery.
#[async_trait]
pub trait QuoteStream: Send {
    /// Pull the next message, suspending until one is available.
    ///
    /// Returns `None` once the stream is closed or exhausted. Transient
    /// failures are returned as `Some(Err(_))` and the stream remains usable.
    async fn next_message(&mut self) -> Option<Result<StreamMessage>>;

    /// Commit a message so it is not redelivered.
    async fn acknowledge(&mut self, message: &StreamMessage) -> Result<()>;

    /// Release the underlying handle.
    async fn close(&mut self);

    /// Stream name for logging.
    fn stream_name(&self) -> &str;
}
