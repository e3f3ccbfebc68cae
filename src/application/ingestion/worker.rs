//! Consume-transform-commit loop.
//!
//! Each stream message carries one [`QuoteBatch`]. A message is acknowledged
//! only after its priced quotes are in the cache; anything else leaves it
//! pending for redelivery, which gives at-least-once processing. Re-processing
//! is harmless because cache writes are last-write-wins.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::backoff::{Backoff, BackoffPolicy};
use crate::application::cache::QuoteCache;
use crate::domain::QuoteBatch;
use crate::error::{Result, StreamError};
use crate::port::inbound::Pricer;
use crate::port::outbound::{QuoteStream, StreamMessage};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown token fired.
    Cancelled,
    /// The stream reported end of data.
    StreamClosed,
}

/// Counters accumulated over one run of the loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestionReport {
    pub messages_received: u64,
    pub messages_acknowledged: u64,
    /// Messages left unacknowledged because decoding or caching failed.
    pub messages_failed: u64,
    pub ack_failures: u64,
    pub pull_errors: u64,
    pub quotes_priced: u64,
    pub quotes_rejected: u64,
    pub stop_reason: Option<StopReason>,
}

/// Wires a [`QuoteStream`] to a [`Pricer`] and a [`QuoteCache`].
pub struct IngestionLoop {
    pricer: Arc<dyn Pricer>,
    cache: Arc<QuoteCache>,
    backoff: BackoffPolicy,
}

impl IngestionLoop {
    #[must_use]
    pub fn new(pricer: Arc<dyn Pricer>, cache: Arc<QuoteCache>, backoff: BackoffPolicy) -> Self {
        Self {
            pricer,
            cache,
            backoff,
        }
    }

    /// Run until `cancel` fires or the stream ends. The stream is closed on exit.
    pub async fn run(
        &self,
        stream: &mut dyn QuoteStream,
        cancel: &CancellationToken,
    ) -> IngestionReport {
        let stream_name = stream.stream_name().to_string();
        let mut report = IngestionReport::default();
        let mut backoff = Backoff::new(self.backoff);

        info!(stream = %stream_name, "Ingestion started");

        let reason = loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => break StopReason::Cancelled,
                next = stream.next_message() => next,
            };

            let message = match next {
                None => break StopReason::StreamClosed,
                Some(Err(e)) => {
                    report.pull_errors += 1;
                    let delay = backoff.next_delay();
                    warn!(
                        stream = %stream_name,
                        error = %e,
                        consecutive_failures = backoff.consecutive_failures(),
                        delay_ms = delay.as_millis() as u64,
                        "Stream pull failed, backing off"
                    );
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break StopReason::Cancelled,
                        () = tokio::time::sleep(delay) => continue,
                    }
                }
                Some(Ok(message)) => message,
            };

            backoff.reset();
            report.messages_received += 1;

            match self.process(&message, cancel, &mut report).await {
                Ok(()) => match stream.acknowledge(&message).await {
                    Ok(()) => report.messages_acknowledged += 1,
                    Err(e) => {
                        report.ack_failures += 1;
                        error!(message_id = %message.id, error = %e, "Failed to acknowledge message");
                    }
                },
                Err(e) if e.is_cancelled() => break StopReason::Cancelled,
                Err(e) => {
                    report.messages_failed += 1;
                    error!(
                        message_id = %message.id,
                        error = %e,
                        "Message not acknowledged, will be redelivered"
                    );
                }
            }
        };

        stream.close().await;
        report.stop_reason = Some(reason);

        info!(
            stream = %stream_name,
            reason = ?reason,
            received = report.messages_received,
            acknowledged = report.messages_acknowledged,
            failed = report.messages_failed,
            "Ingestion stopped"
        );
        report
    }

    async fn process(
        &self,
        message: &StreamMessage,
        cancel: &CancellationToken,
        report: &mut IngestionReport,
    ) -> Result<()> {
        let batch =
            QuoteBatch::from_slice(&message.payload).map_err(|e| StreamError::Malformed {
                message_id: message.id.clone(),
                reason: e.to_string(),
            })?;

        let priced = self.pricer.price_batch(&batch.odds_data);
        report.quotes_priced += priced.priced.len() as u64;
        report.quotes_rejected += priced.rejected_count() as u64;

        let written = self.cache.put_batch(&priced.priced, cancel).await?;

        debug!(
            message_id = %message.id,
            batch_id = %batch.batch_id,
            received = batch.len(),
            cached = written,
            "Batch processed"
        );
        Ok(())
    }
}
