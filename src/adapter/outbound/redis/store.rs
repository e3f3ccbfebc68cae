//! [`KeyValueStore`] over Redis strings.

use std::time::Duration;

use ::redis::aio::MultiplexedConnection;
use ::redis::{AsyncCommands, RedisError};
use async_trait::async_trait;
use tracing::info;

use super::{open, redact};
use crate::error::{Result, StoreError};
use crate::port::outbound::KeyValueStore;

const BACKEND: &str = "redis";

/// Redis-backed key-value store.
///
/// Writes use `SET .. PX`, batches go through one pipeline, and prefix
/// listing walks `SCAN MATCH` with the configured page size.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    scan_count: usize,
}

impl RedisStore {
    /// Open a connection and verify it with a round trip.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] when the server cannot be reached.
    pub async fn connect(url: &str, scan_count: usize) -> Result<Self> {
        let conn = open(url).await.map_err(|e| StoreError::Connection {
            backend: BACKEND,
            reason: e.to_string(),
        })?;

        let store = Self { conn, scan_count };
        store.ping().await.map_err(|e| StoreError::Connection {
            backend: BACKEND,
            reason: e.to_string(),
        })?;

        info!(url = %redact(url), "Connected to Redis cache");
        Ok(store)
    }

    fn command_error(command: &'static str) -> impl FnOnce(RedisError) -> StoreError {
        move |e| StoreError::Command {
            backend: BACKEND,
            command,
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(Self::command_error("GET"))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        let ttl_ms = ttl_millis(ttl);
        let _: () = conn
            .pset_ex(key, value, ttl_ms)
            .await
            .map_err(Self::command_error("SET"))?;
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(String, String)>, ttl: Duration) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let ttl_ms = ttl_millis(ttl);
        let mut pipe = ::redis::pipe();
        for (key, value) in entries {
            pipe.pset_ex(key, value, ttl_ms).ignore();
        }

        let mut conn = self.conn.clone();
        let _: () = pipe
            .query_async(&mut conn)
            .await
            .map_err(Self::command_error("PIPELINE"))?;
        Ok(())
    }

    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", glob_escape(prefix));
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, page): (u64, Vec<String>) = ::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(self.scan_count)
                .query_async(&mut conn)
                .await
                .map_err(Self::command_error("SCAN"))?;

            keys.extend(page);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once.
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let values: Vec<Option<String>> = ::redis::cmd("MGET")
            .arg(keys)
            .query_async(&mut conn)
            .await
            .map_err(Self::command_error("MGET"))?;
        Ok(values)
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: String = ::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::command_error("PING"))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}

fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// Escape glob metacharacters so `prefix` matches literally under `MATCH`.
fn glob_escape(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
