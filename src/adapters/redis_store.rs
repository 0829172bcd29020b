//! Redis-backed list store.
//!
//! One [`ConnectionManager`] is built at startup and shared by every request.
//! The multiplexed connection is opened on first use and dropped again after a
//! transport-level failure, so the following call reconnects.

use crate::domain::ports::ListStore;
use crate::utils::error::{ProximityError, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, RedisError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub struct ConnectionManager {
    client: redis::Client,
    connect_timeout: Duration,
    connection: Mutex<Option<MultiplexedConnection>>,
}

impl ConnectionManager {
    /// Parses the URL only; no connection is made until [`acquire`](Self::acquire).
    pub fn new(redis_url: &str, connect_timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| {
            ProximityError::InvalidConfigValueError {
                field: "redis_url".to_string(),
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            client,
            connect_timeout,
            connection: Mutex::new(None),
        })
    }

    /// Shared connection, established on first call.
    ///
    /// Concurrent first callers queue on the mutex, so exactly one of them connects
    /// and the rest reuse its connection.
    pub async fn acquire(&self) -> Result<MultiplexedConnection> {
        let mut slot = self.connection.lock().await;
        if let Some(connection) = slot.as_ref() {
            return Ok(connection.clone());
        }

        tracing::debug!("Opening Redis connection");
        let connection = tokio::time::timeout(
            self.connect_timeout,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| {
            ProximityError::store_unavailable(format!(
                "connection timed out after {:?}",
                self.connect_timeout
            ))
        })?
        .map_err(|e| ProximityError::store_unavailable(format!("connection failed: {}", e)))?;

        tracing::info!("🔌 Redis connection established");
        *slot = Some(connection.clone());
        Ok(connection)
    }

    /// Drop the shared connection so the next [`acquire`](Self::acquire) reconnects.
    pub async fn invalidate(&self) {
        if self.connection.lock().await.take().is_some() {
            tracing::warn!("Redis connection discarded");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }
}

#[derive(Clone)]
pub struct RedisListStore {
    manager: Arc<ConnectionManager>,
}

impl RedisListStore {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }

    pub fn connect_lazy(redis_url: &str, connect_timeout: Duration) -> Result<Self> {
        Ok(Self::new(Arc::new(ConnectionManager::new(
            redis_url,
            connect_timeout,
        )?)))
    }

    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    async fn command_failed(&self, operation: &str, e: RedisError) -> ProximityError {
        if is_transport_error(&e) {
            self.manager.invalidate().await;
        }
        tracing::error!("Redis {} failed: {}", operation, e);
        ProximityError::store_unavailable(format!("{} failed: {}", operation, e))
    }
}

impl ListStore for RedisListStore {
    async fn push_front(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut connection = self.manager.acquire().await?;
        match connection.lpush::<_, _, ()>(key, value).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.command_failed("LPUSH", e).await),
        }
    }

    async fn range_all(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let mut connection = self.manager.acquire().await?;
        match connection.lrange::<_, Vec<Vec<u8>>>(key, 0, -1).await {
            Ok(records) => Ok(records),
            Err(e) => Err(self.command_failed("LRANGE", e).await),
        }
    }
}

fn is_transport_error(e: &RedisError) -> bool {
    e.is_io_error()
        || e.is_connection_dropped()
        || e.is_connection_refusal()
        || e.is_timeout()
        || e.is_unrecoverable_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparsable_url() {
        let result = ConnectionManager::new("not a redis url", Duration::from_secs(1));
        assert!(matches!(
            result,
            Err(ProximityError::InvalidConfigValueError { .. })
        ));
    }

    #[tokio::test]
    async fn test_new_manager_is_not_connected() {
        let manager = ConnectionManager::new("redis://127.0.0.1:6379", Duration::from_secs(1))
            .unwrap();
        assert!(!manager.is_connected().await);
        manager.invalidate().await;
        assert!(!manager.is_connected().await);
    }
}
