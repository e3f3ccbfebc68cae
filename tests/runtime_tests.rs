//! Service lifecycle: ingestion and HTTP under one shutdown token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use odds_optimizer::error::{Error, Result};
use odds_optimizer::infrastructure::bootstrap::{build_services, build_store, Backend};
use odds_optimizer::infrastructure::orchestration::run_until_shutdown;
use odds_optimizer::port::outbound::{QuoteStream, StreamMessage};
use odds_optimizer::testkit::config;
use odds_optimizer::testkit::domain::{batch, QuoteBuilder};
use odds_optimizer::testkit::stream::channel_stream;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

async fn http_get(addr: std::net::SocketAddr, path: &str) -> String {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    socket.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn ingests_and_serves_until_cancelled() {
    let config = config::service();
    let cancel = CancellationToken::new();
    let store = build_store(&config, Backend::Memory).await.unwrap();
    let services = build_services(&config, store, cancel.clone()).unwrap();
    let cache = Arc::clone(&services.cache);

    let (stream, handle) = channel_stream(8);
    let probe = handle.probe();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let stream: Box<dyn QuoteStream> = Box::new(stream);
    let runtime = tokio::spawn({
        let cancel = cancel.clone();
        async move { run_until_shutdown(&config, services, Some(stream), listener, cancel).await }
    });

    handle
        .send_batch("1-0", &batch("b1", vec![QuoteBuilder::new().build()]))
        .await;

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while probe.acked().is_empty() {
        assert!(tokio::time::Instant::now() < deadline, "batch never acknowledged");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(
        cache.get_by_event("event-123", &cancel).await.unwrap().len(),
        1
    );

    let response = http_get(addr, "/api/v1/odds/event-123/match_winner/Team%20A").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("optimized_back"));

    cancel.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), runtime)
        .await
        .expect("runtime stops after cancel")
        .unwrap();
    assert!(result.is_ok());
    assert!(probe.is_closed());
}

#[tokio::test]
async fn serves_reads_without_a_stream() {
    let config = config::service();
    let cancel = CancellationToken::new();
    let store = build_store(&config, Backend::Memory).await.unwrap();
    let services = build_services(&config, store, cancel.clone()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let runtime = tokio::spawn({
        let cancel = cancel.clone();
        async move { run_until_shutdown(&config, services, None, listener, cancel).await }
    });

    let response = http_get(addr, "/ready").await;
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.ends_with("READY"));

    cancel.cancel();
    let result = tokio::time::timeout(Duration::from_secs(5), runtime)
        .await
        .expect("runtime stops after cancel")
        .unwrap();
    assert!(result.is_ok());
}

struct PanickingStream;

#[async_trait]
impl QuoteStream for PanickingStream {
    async fn next_message(&mut self) -> Option<Result<StreamMessage>> {
        panic!("stream blew up");
    }

    async fn acknowledge(&mut self, _message: &StreamMessage) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) {}

    fn stream_name(&self) -> &str {
        "panicking"
    }
}

#[tokio::test]
async fn ingestion_panic_shuts_the_service_down() {
    let config = config::service();
    let cancel = CancellationToken::new();
    let store = build_store(&config, Backend::Memory).await.unwrap();
    let services = build_services(&config, store, cancel.clone()).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let stream: Box<dyn QuoteStream> = Box::new(PanickingStream);
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        run_until_shutdown(&config, services, Some(stream), listener, cancel.clone()),
    )
    .await
    .expect("runtime stops once ingestion dies");

    assert!(matches!(result, Err(Error::Ingestion(_))), "{result:?}");
    assert!(cancel.is_cancelled());
}
