//! Mock [`QuoteStream`] implementations for testing.
//!
//! - [`ScriptedStream`] - Pre-loaded messages and pull errors.
//!   Best for: decode failures, backoff, stop-on-exhaustion.
//!
//! - [`ChannelStream`] - Channel-backed stream with external control handle.
//!   Best for: integration tests needing on-demand message delivery.
//!
//! Both expose a [`StreamProbe`] for asserting acknowledgements, pull counts
//! and closure after the stream has been moved into the loop under test.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::domain::QuoteBatch;
use crate::error::{Result, StreamError};
use crate::port::outbound::{QuoteStream, StreamMessage};

use super::domain::encode;

/// Shared observation point for a mock stream.
#[derive(Debug, Clone, Default)]
pub struct StreamProbe {
    acked: Arc<Mutex<Vec<String>>>,
    pulls: Arc<AtomicU32>,
    closed: Arc<AtomicBool>,
}

impl StreamProbe {
    /// Message ids acknowledged so far, in order.
    pub fn acked(&self) -> Vec<String> {
        self.acked.lock().clone()
    }

    /// How many times `next_message()` was called.
    pub fn pull_count(&self) -> u32 {
        self.pulls.load(Ordering::SeqCst)
    }

    /// Whether `close()` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// ScriptedStream
// ---------------------------------------------------------------------------

/// A mock stream that replays a fixed script of messages and pull errors.
///
/// Once drained it either ends (returns `None`) or, with
/// [`hang_when_drained`](Self::hang_when_drained), blocks forever like a
/// quiet broker.
pub struct ScriptedStream {
    script: VecDeque<Result<StreamMessage>>,
    failing_acks: HashSet<String>,
    hang_when_drained: bool,
    probe: StreamProbe,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            failing_acks: HashSet::new(),
            hang_when_drained: false,
            probe: StreamProbe::default(),
        }
    }

    pub fn with_message(mut self, id: &str, payload: impl Into<Vec<u8>>) -> Self {
        self.script.push_back(Ok(StreamMessage::new(id, payload)));
        self
    }

    pub fn with_batch(self, id: &str, batch: &QuoteBatch) -> Self {
        self.with_message(id, encode(batch))
    }

    /// Queue a transient pull failure.
    pub fn with_pull_error(mut self, reason: &str) -> Self {
        self.script.push_back(Err(StreamError::Read {
            stream: "scripted".to_string(),
            reason: reason.to_string(),
        }
        .into()));
        self
    }

    /// Make acknowledgement of `id` fail.
    pub fn with_failing_ack(mut self, id: &str) -> Self {
        self.failing_acks.insert(id.to_string());
        self
    }

    pub fn hang_when_drained(mut self) -> Self {
        self.hang_when_drained = true;
        self
    }

    pub fn probe(&self) -> StreamProbe {
        self.probe.clone()
    }
}

impl Default for ScriptedStream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteStream for ScriptedStream {
    async fn next_message(&mut self) -> Option<Result<StreamMessage>> {
        self.probe.pulls.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front() {
            Some(item) => Some(item),
            None if self.hang_when_drained => std::future::pending().await,
            None => None,
        }
    }

    async fn acknowledge(&mut self, message: &StreamMessage) -> Result<()> {
        if self.failing_acks.contains(&message.id) {
            return Err(StreamError::Acknowledge {
                stream: "scripted".to_string(),
                message_id: message.id.clone(),
                reason: "broker rejected ack".to_string(),
            }
            .into());
        }
        self.probe.acked.lock().push(message.id.clone());
        Ok(())
    }

    async fn close(&mut self) {
        self.probe.closed.store(true, Ordering::SeqCst);
    }

    fn stream_name(&self) -> &str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// ChannelStream
// ---------------------------------------------------------------------------

/// A mock stream controlled externally via a [`ChannelStreamHandle`].
///
/// Messages sent into the handle are read by the consumer via
/// `next_message()`. No real broker.
pub struct ChannelStream {
    rx: mpsc::Receiver<Option<StreamMessage>>,
    probe: StreamProbe,
}

/// Control handle for a [`ChannelStream`].
pub struct ChannelStreamHandle {
    tx: mpsc::Sender<Option<StreamMessage>>,
    probe: StreamProbe,
}

impl ChannelStreamHandle {
    /// Deliver a raw message.
    pub async fn send(&self, id: &str, payload: impl Into<Vec<u8>>) {
        let _ = self.tx.send(Some(StreamMessage::new(id, payload))).await;
    }

    /// Deliver an encoded envelope.
    pub async fn send_batch(&self, id: &str, batch: &QuoteBatch) {
        self.send(id, encode(batch)).await;
    }

    /// Signal end-of-stream (causes `next_message` to return `None`).
    pub async fn close(&self) {
        let _ = self.tx.send(None).await;
    }

    pub fn probe(&self) -> StreamProbe {
        self.probe.clone()
    }
}

/// Create a [`ChannelStream`] and its control [`ChannelStreamHandle`].
pub fn channel_stream(buffer: usize) -> (ChannelStream, ChannelStreamHandle) {
    let (tx, rx) = mpsc::channel(buffer);
    let probe = StreamProbe::default();
    (
        ChannelStream {
            rx,
            probe: probe.clone(),
        },
        ChannelStreamHandle { tx, probe },
    )
}

#[async_trait]
impl QuoteStream for ChannelStream {
    async fn next_message(&mut self) -> Option<Result<StreamMessage>> {
        self.probe.pulls.fetch_add(1, Ordering::SeqCst);
        match self.rx.recv().await {
            Some(Some(message)) => Some(Ok(message)),
            Some(None) | None => None,
        }
    }

    async fn acknowledge(&mut self, message: &StreamMessage) -> Result<()> {
        self.probe.acked.lock().push(message.id.clone());
        Ok(())
    }

    async fn close(&mut self) {
        self.probe.closed.store(true, Ordering::SeqCst);
        self.rx.close();
    }

    fn stream_name(&self) -> &str {
        "channel"
    }
}
