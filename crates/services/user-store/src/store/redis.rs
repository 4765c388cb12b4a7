//! Redis implementation of the store handle.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use std::collections::HashMap;

use common::{AppResult, StoreConfig};

use super::HashStore;

/// Redis-backed store handle.
///
/// Wraps a `ConnectionManager`; every command works on its own clone of the
/// manager, which is dropped when the command returns.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis and verify the server answers.
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        let store = Self { connection };
        store.ping().await?;

        tracing::info!(
            max_idle = config.max_idle,
            idle_timeout_secs = config.idle_timeout_secs,
            "Redis store connected"
        );

        Ok(store)
    }

    /// Get the connection manager for direct Redis operations.
    pub fn connection(&self) -> ConnectionManager {
        self.connection.clone()
    }

    /// Check connectivity with a PING round trip.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl HashStore for RedisStore {
    async fn incr(&self, key: &str) -> AppResult<i64> {
        let mut conn = self.connection.clone();
        let value: i64 = redis::cmd("INCR").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let inserted: bool = conn.hset_nx(key, field, value).await?;
        Ok(inserted)
    }

    async fn hset_multiple(&self, key: &str, fields: Vec<(String, String)>) -> AppResult<()> {
        // HSET with no field/value pairs is a syntax error
        if fields.is_empty() {
            return Ok(());
        }

        let mut conn = self.connection.clone();
        let _: () = conn.hset_multiple(key, fields.as_slice()).await?;
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn hgetall(&self, key: &str) -> AppResult<HashMap<String, String>> {
        let mut conn = self.connection.clone();
        let fields: HashMap<String, String> = conn.hgetall(key).await?;
        Ok(fields)
    }

    async fn hdel(&self, key: &str, field: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn.hdel(key, field).await?;
        Ok(removed > 0)
    }

    async fn del(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn.del(key).await?;
        Ok(removed > 0)
    }
}
