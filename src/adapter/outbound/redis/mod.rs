//! Redis adapters: the quote cache backend and the Redis Streams consumer.
//!
//! Both share one connection idiom: a [`MultiplexedConnection`] opened once
//! and cloned per call. The stream consumer holds a separate connection for
//! its blocking reads.

mod store;
mod stream;

pub use store::RedisStore;
pub use stream::{RedisStreamConsumer, RedisStreamSettings};

use ::redis::aio::MultiplexedConnection;
use ::redis::Client;

async fn open(url: &str) -> ::redis::RedisResult<MultiplexedConnection> {
    let client = Client::open(url)?;
    client.get_multiplexed_async_connection().await
}

/// Render a URL for logs without credentials.
fn redact(url: &str) -> String {
    match url.split_once('@') {
        Some((scheme_and_auth, host)) => {
            let scheme = scheme_and_auth
                .split_once("://")
                .map_or("redis", |(scheme, _)| scheme);
            format!("{scheme}://***@{host}")
        }
        None => url.to_string(),
    }
}
