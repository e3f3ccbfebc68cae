//! [`QuoteStream`] over a Redis Streams consumer group.
//!
//! Each entry carries one JSON envelope in its `payload` field. On startup the
//! consumer first walks its own pending entries (starting from id `0`), which
//! redelivers anything read but never acknowledged before a restart, then
//! switches to new entries (id `>`).

use std::collections::VecDeque;

use ::redis::aio::MultiplexedConnection;
use ::redis::streams::{StreamReadOptions, StreamReadReply};
use ::redis::{AsyncCommands, Value};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{open, redact};
use crate::error::{Result, StreamError};
use crate::port::outbound::{QuoteStream, StreamMessage};

/// Field holding the encoded envelope in each stream entry.
pub const PAYLOAD_FIELD: &str = "payload";

/// Connection and consumer-group coordinates.
#[derive(Debug, Clone)]
pub struct RedisStreamSettings {
    pub url: String,
    pub key: String,
    pub group: String,
    pub consumer: String,
    pub block_ms: usize,
    pub read_count: usize,
}

/// Consumer-group reader with explicit acknowledgement.
pub struct RedisStreamConsumer {
    conn: MultiplexedConnection,
    settings: RedisStreamSettings,
    buffer: VecDeque<StreamMessage>,
    /// Last pending id seen while draining; `None` once reading new entries.
    pending_cursor: Option<String>,
    closed: bool,
}

impl RedisStreamConsumer {
    /// Connect and ensure the consumer group exists.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Connection`] when the server is unreachable or
    /// the group cannot be created.
    pub async fn connect(settings: RedisStreamSettings) -> Result<Self> {
        let connection_error = |reason: String| StreamError::Connection {
            stream: settings.key.clone(),
            reason,
        };

        let mut conn = open(&settings.url)
            .await
            .map_err(|e| connection_error(e.to_string()))?;

        let created: ::redis::RedisResult<()> = conn
            .xgroup_create_mkstream(&settings.key, &settings.group, "$")
            .await;
        match created {
            Ok(()) => info!(stream = %settings.key, group = %settings.group, "Created consumer group"),
            Err(e) if e.code() == Some("BUSYGROUP") => {
                debug!(stream = %settings.key, group = %settings.group, "Consumer group exists");
            }
            Err(e) => return Err(connection_error(e.to_string()).into()),
        }

        info!(
            url = %redact(&settings.url),
            stream = %settings.key,
            group = %settings.group,
            consumer = %settings.consumer,
            "Connected to Redis stream"
        );

        Ok(Self {
            conn,
            settings,
            buffer: VecDeque::new(),
            pending_cursor: Some("0".to_string()),
            closed: false,
        })
    }

    /// Read one page of entries into the buffer. Returns how many arrived.
    async fn fill(&mut self) -> Result<usize> {
        let start_id = self.pending_cursor.clone().unwrap_or_else(|| ">".to_string());
        let options = StreamReadOptions::default()
            .group(&self.settings.group, &self.settings.consumer)
            .count(self.settings.read_count)
            .block(self.settings.block_ms);

        let reply: Option<StreamReadReply> = self
            .conn
            .xread_options(&[&self.settings.key], &[&start_id], &options)
            .await
            .map_err(|e| StreamError::Read {
                stream: self.settings.key.clone(),
                reason: e.to_string(),
            })?;

        let mut received = 0;
        for stream_key in reply.map(|r| r.keys).unwrap_or_default() {
            for entry in stream_key.ids {
                let payload = match entry.map.get(PAYLOAD_FIELD) {
                    Some(value) => decode_payload(&entry.id, value),
                    None => {
                        warn!(message_id = %entry.id, "Stream entry has no payload field");
                        Vec::new()
                    }
                };
                if self.pending_cursor.is_some() {
                    self.pending_cursor = Some(entry.id.clone());
                }
                self.buffer.push_back(StreamMessage::new(entry.id, payload));
                received += 1;
            }
        }

        if self.pending_cursor.is_some() && received == 0 {
            debug!(stream = %self.settings.key, "Pending entries drained");
            self.pending_cursor = None;
        }
        Ok(received)
    }
}

fn decode_payload(message_id: &str, value: &Value) -> Vec<u8> {
    match ::redis::from_redis_value::<Vec<u8>>(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(message_id = %message_id, error = %e, "Stream payload is not a byte string");
            Vec::new()
        }
    }
}

#[async_trait]
impl QuoteStream for RedisStreamConsumer {
    async fn next_message(&mut self) -> Option<Result<StreamMessage>> {
        loop {
            if self.closed {
                return None;
            }
            if let Some(message) = self.buffer.pop_front() {
                return Some(Ok(message));
            }
            // An empty read means the block timed out; ask again.
            if let Err(e) = self.fill().await {
                return Some(Err(e));
            }
        }
    }

    async fn acknowledge(&mut self, message: &StreamMessage) -> Result<()> {
        let acked: i64 = self
            .conn
            .xack(&self.settings.key, &self.settings.group, &[&message.id])
            .await
            .map_err(|e| StreamError::Acknowledge {
                stream: self.settings.key.clone(),
                message_id: message.id.clone(),
                reason: e.to_string(),
            })?;

        if acked == 0 {
            debug!(message_id = %message.id, "Message was already acknowledged");
        }
        Ok(())
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.buffer.clear();
            info!(stream = %self.settings.key, "Stream consumer closed");
        }
    }

    fn stream_name(&self) -> &str {
        &self.settings.key
    }
}
