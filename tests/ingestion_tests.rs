//! Ingestion loop behavior against scripted streams and flaky stores.

use std::sync::Arc;
use std::time::Duration;

use odds_optimizer::adapter::outbound::memory::MemoryStore;
use odds_optimizer::application::cache::QuoteCache;
use odds_optimizer::application::ingestion::{IngestionLoop, StopReason};
use odds_optimizer::application::pricing::PricingEngine;
use odds_optimizer::domain::{OptimizationParameters, QuoteKey};
use odds_optimizer::port::outbound::KeyValueStore;
use odds_optimizer::testkit::config::fast_backoff;
use odds_optimizer::testkit::domain::{batch, QuoteBuilder};
use odds_optimizer::testkit::store::FlakyStore;
use odds_optimizer::testkit::stream::{channel_stream, ScriptedStream};
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;

fn pipeline(store: Arc<dyn KeyValueStore>) -> (IngestionLoop, Arc<QuoteCache>) {
    let cache = Arc::new(QuoteCache::new(store, Duration::from_secs(900)));
    let pricer = Arc::new(PricingEngine::new(OptimizationParameters::default()));
    let worker = IngestionLoop::new(pricer, Arc::clone(&cache), fast_backoff());
    (worker, cache)
}

fn two_selections() -> Vec<odds_optimizer::domain::NormalizedQuote> {
    vec![
        QuoteBuilder::new().selection("Team A").build(),
        QuoteBuilder::new()
            .selection("Team B")
            .back_price(dec!(2.9))
            .lay_price(dec!(3.0))
            .build(),
    ]
}

#[tokio::test]
async fn acknowledges_after_quotes_are_cached() {
    let (worker, cache) = pipeline(Arc::new(MemoryStore::new()));
    let mut stream = ScriptedStream::new().with_batch("1-0", &batch("b1", two_selections()));
    let probe = stream.probe();
    let cancel = CancellationToken::new();

    let report = worker.run(&mut stream, &cancel).await;

    assert_eq!(report.messages_received, 1);
    assert_eq!(report.messages_acknowledged, 1);
    assert_eq!(report.quotes_priced, 2);
    assert_eq!(report.stop_reason, Some(StopReason::StreamClosed));
    assert_eq!(probe.acked(), vec!["1-0".to_string()]);
    assert!(probe.is_closed());

    for selection in ["Team A", "Team B"] {
        let key = QuoteKey::new("event-123", "match_winner", selection);
        let cached = cache.get(&key, &cancel).await.unwrap();
        assert!(cached.is_some(), "{selection} should be cached");
    }
}

#[tokio::test]
async fn cache_failure_leaves_message_pending() {
    let store = Arc::new(FlakyStore::new());
    store.set_fail_writes(true);
    let (worker, _cache) = pipeline(store.clone());
    let mut stream = ScriptedStream::new().with_batch("1-0", &batch("b1", two_selections()));
    let probe = stream.probe();

    let report = worker.run(&mut stream, &CancellationToken::new()).await;

    assert_eq!(report.messages_failed, 1);
    assert_eq!(report.messages_acknowledged, 0);
    assert!(probe.acked().is_empty());
    assert_eq!(store.write_calls(), 1);
}

#[tokio::test]
async fn undecodable_message_is_skipped_without_ack() {
    let (worker, _cache) = pipeline(Arc::new(MemoryStore::new()));
    let mut stream = ScriptedStream::new()
        .with_message("1-0", b"not an envelope".to_vec())
        .with_batch("1-1", &batch("b2", two_selections()));
    let probe = stream.probe();

    let report = worker.run(&mut stream, &CancellationToken::new()).await;

    assert_eq!(report.messages_received, 2);
    assert_eq!(report.messages_failed, 1);
    assert_eq!(probe.acked(), vec!["1-1".to_string()]);
}

#[tokio::test]
async fn invalid_quotes_are_dropped_and_batch_is_acknowledged() {
    let (worker, cache) = pipeline(Arc::new(MemoryStore::new()));
    let quotes = vec![
        QuoteBuilder::new().selection("Bad").back_price(dec!(1.0)).build(),
        QuoteBuilder::new().selection("Good").build(),
    ];
    let mut stream = ScriptedStream::new().with_batch("1-0", &batch("b1", quotes));
    let probe = stream.probe();
    let cancel = CancellationToken::new();

    let report = worker.run(&mut stream, &cancel).await;

    assert_eq!(report.quotes_priced, 1);
    assert_eq!(report.quotes_rejected, 1);
    assert_eq!(probe.acked(), vec!["1-0".to_string()]);

    let bad = QuoteKey::new("event-123", "match_winner", "Bad");
    assert!(cache.get(&bad, &cancel).await.unwrap().is_none());
}

#[tokio::test]
async fn empty_batch_is_acknowledged() {
    let store = Arc::new(FlakyStore::new());
    let (worker, _cache) = pipeline(store.clone());
    let mut stream = ScriptedStream::new().with_batch("1-0", &batch("empty", Vec::new()));
    let probe = stream.probe();

    let report = worker.run(&mut stream, &CancellationToken::new()).await;

    assert_eq!(report.messages_acknowledged, 1);
    assert_eq!(probe.acked(), vec!["1-0".to_string()]);
    assert_eq!(store.write_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn pull_errors_back_off_then_recover() {
    let (worker, _cache) = pipeline(Arc::new(MemoryStore::new()));
    let mut stream = ScriptedStream::new()
        .with_pull_error("connection reset")
        .with_pull_error("connection reset")
        .with_batch("1-0", &batch("b1", two_selections()));
    let probe = stream.probe();

    let report = worker.run(&mut stream, &CancellationToken::new()).await;

    assert_eq!(report.pull_errors, 2);
    assert_eq!(report.messages_acknowledged, 1);
    assert_eq!(probe.acked(), vec!["1-0".to_string()]);
    assert_eq!(probe.pull_count(), 4);
}

#[tokio::test]
async fn ack_failure_is_counted_but_quotes_stay_cached() {
    let (worker, cache) = pipeline(Arc::new(MemoryStore::new()));
    let mut stream = ScriptedStream::new()
        .with_batch("1-0", &batch("b1", two_selections()))
        .with_failing_ack("1-0");
    let cancel = CancellationToken::new();

    let report = worker.run(&mut stream, &cancel).await;

    assert_eq!(report.ack_failures, 1);
    assert_eq!(report.messages_acknowledged, 0);

    let key = QuoteKey::new("event-123", "match_winner", "Team A");
    assert!(cache.get(&key, &cancel).await.unwrap().is_some());
}

#[tokio::test]
async fn cancelled_token_stops_before_pulling() {
    let (worker, _cache) = pipeline(Arc::new(MemoryStore::new()));
    let mut stream = ScriptedStream::new().with_batch("1-0", &batch("b1", two_selections()));
    let probe = stream.probe();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = worker.run(&mut stream, &cancel).await;

    assert_eq!(report.stop_reason, Some(StopReason::Cancelled));
    assert_eq!(probe.pull_count(), 0);
    assert!(probe.acked().is_empty());
    assert!(probe.is_closed());
}

#[tokio::test]
async fn cancellation_interrupts_blocked_pull() {
    let (worker, _cache) = pipeline(Arc::new(MemoryStore::new()));
    let mut stream = ScriptedStream::new()
        .with_batch("1-0", &batch("b1", two_selections()))
        .hang_when_drained();
    let probe = stream.probe();
    let cancel = CancellationToken::new();

    let canceller = {
        let cancel = cancel.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        }
    };
    let (report, ()) = tokio::join!(worker.run(&mut stream, &cancel), canceller);

    assert_eq!(report.stop_reason, Some(StopReason::Cancelled));
    assert_eq!(probe.acked(), vec!["1-0".to_string()]);
    assert!(probe.is_closed());
}

#[tokio::test]
async fn channel_stream_delivers_until_closed() {
    let (worker, cache) = pipeline(Arc::new(MemoryStore::new()));
    let (mut stream, handle) = channel_stream(8);
    let probe = handle.probe();
    let cancel = CancellationToken::new();

    let producer = async {
        handle
            .send_batch("1-0", &batch("b1", vec![QuoteBuilder::new().event("e1").build()]))
            .await;
        handle
            .send_batch("1-1", &batch("b2", vec![QuoteBuilder::new().event("e2").build()]))
            .await;
        handle.close().await;
    };
    let (report, ()) = tokio::join!(worker.run(&mut stream, &cancel), producer);

    assert_eq!(report.stop_reason, Some(StopReason::StreamClosed));
    assert_eq!(probe.acked(), vec!["1-0".to_string(), "1-1".to_string()]);
    assert_eq!(cache.get_by_event("e1", &cancel).await.unwrap().len(), 1);
    assert_eq!(cache.get_by_event("e2", &cancel).await.unwrap().len(), 1);
}
