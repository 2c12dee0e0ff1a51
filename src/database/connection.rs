// Database connection management
//
// One entry point: `connect_with_retry`, which bounds each attempt with a
// timeout and retries transient failures on a jittered exponential backoff.

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tokio::time::timeout;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_POOL_CONNECTIONS: u32 = 5;

pub async fn connect_with_retry(database_url: &str) -> Result<Pool<Postgres>> {
    let attempt = || async {
        let timed = timeout(
            CONNECT_TIMEOUT,
            PgPoolOptions::new()
                .max_connections(MAX_POOL_CONNECTIONS)
                .connect(database_url),
        )
        .await;
        let pool = timed.map_err(|_| anyhow::anyhow!("connection attempt timed out"))??;
        Ok::<_, anyhow::Error>(pool)
    };

    let retry_strategy = ExponentialBackoff::from_millis(150)
        .factor(2)
        .max_delay(Duration::from_secs(2))
        .take(3)
        .map(jitter);

    RetryIf::spawn(retry_strategy, attempt, is_transient).await
}

/// Only network-shaped failures are worth retrying; auth and configuration
/// errors fail fast.
fn is_transient(e: &anyhow::Error) -> bool {
    let msg = e.to_string().to_ascii_lowercase();
    msg.contains("timed out")
        || msg.contains("timeout")
        || msg.contains("network")
        || msg.contains("connection")
        || msg.contains("i/o")
        || msg.contains("reset")
        || msg.contains("refused")
}
