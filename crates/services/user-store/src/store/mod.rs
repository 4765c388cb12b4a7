//! Store handle - the primitive command set the repository is built on.
//!
//! Each command is atomic on the store side. Implementations acquire a
//! connection for the duration of a single command and release it on every
//! exit path.

mod memory;
mod redis;

use async_trait::async_trait;
use std::collections::HashMap;

use common::AppResult;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Keyed hash store commands.
///
/// A failure to reach the store surfaces as `AppError::Unavailable`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait HashStore: Send + Sync {
    /// Increment an integer counter by one and return the new value (INCR)
    async fn incr(&self, key: &str) -> AppResult<i64>;

    /// Set a hash field only if it is absent; true if it was set (HSETNX)
    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> AppResult<bool>;

    /// Set several hash fields at once, overwriting existing values (HSET)
    async fn hset_multiple(&self, key: &str, fields: Vec<(String, String)>) -> AppResult<()>;

    /// Read one hash field (HGET)
    async fn hget(&self, key: &str, field: &str) -> AppResult<Option<String>>;

    /// Read every field of a hash; empty when the key is absent (HGETALL)
    async fn hgetall(&self, key: &str) -> AppResult<HashMap<String, String>>;

    /// Remove one hash field; true if it existed (HDEL)
    async fn hdel(&self, key: &str, field: &str) -> AppResult<bool>;

    /// Remove a key; true if it existed (DEL)
    async fn del(&self, key: &str) -> AppResult<bool>;
}
