//! Key-value store with switchable failures.
//!
//! Wraps a [`MemoryStore`] so tests can seed data, then flip reads, writes or
//! the whole backend into failure mid-test.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::adapter::outbound::memory::MemoryStore;
use crate::error::{Result, StoreError};
use crate::port::outbound::KeyValueStore;

const BACKEND: &str = "flaky";

#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_ping: AtomicBool,
    writes: AtomicU32,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store where every operation fails.
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.set_unavailable(true);
        store
    }

    /// Direct access to the backing data.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.set_fail_reads(unavailable);
        self.set_fail_writes(unavailable);
        self.fail_ping.store(unavailable, Ordering::SeqCst);
    }

    /// Write calls attempted, including failed ones.
    pub fn write_calls(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(flag: &AtomicBool, command: &'static str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Command {
                backend: BACKEND,
                command,
                reason: "injected failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Self::check(&self.fail_reads, "GET")?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_writes, "SET")?;
        self.inner.set(key, value, ttl).await
    }

    async fn set_many(&self, entries: Vec<(String, String)>, ttl: Duration) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_writes, "PIPELINE")?;
        self.inner.set_many(entries, ttl).await
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Self::check(&self.fail_reads, "SCAN")?;
        self.inner.scan_prefix(prefix).await
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        Self::check(&self.fail_reads, "MGET")?;
        self.inner.get_many(keys).await
    }

    async fn ping(&self) -> Result<()> {
        Self::check(&self.fail_ping, "PING")?;
        self.inner.ping().await
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
