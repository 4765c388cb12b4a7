//! In-process store handle.
//!
//! Mirrors the Redis semantics the repository relies on, so it can stand in
//! for a live server in tests and local tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use common::{AppError, AppResult};

use super::HashStore;

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Hash(HashMap<String, String>),
}

/// In-memory keyspace with Redis-compatible string and hash commands.
#[derive(Debug)]
pub struct MemoryStore {
    keys: Mutex<HashMap<String, Value>>,
    available: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            keys: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store becoming unreachable (or reachable again).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Check if the keyspace is empty
    pub async fn is_empty(&self) -> bool {
        self.keys.lock().await.is_empty()
    }

    /// Remove every key (FLUSHALL)
    pub async fn flush_all(&self) {
        self.keys.lock().await.clear();
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AppError::unavailable("memory store is offline"))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn wrong_type(key: &str) -> AppError {
    AppError::internal(format!(
        "WRONGTYPE operation against key '{}' holding the wrong kind of value",
        key
    ))
}

#[async_trait]
impl HashStore for MemoryStore {
    async fn incr(&self, key: &str) -> AppResult<i64> {
        self.ensure_available()?;
        let mut keys = self.keys.lock().await;

        let current = match keys.get(key) {
            None => 0,
            Some(Value::Str(s)) => s.parse::<i64>().map_err(|_| {
                AppError::internal("value is not an integer or out of range")
            })?,
            Some(Value::Hash(_)) => return Err(wrong_type(key)),
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| AppError::internal("increment or decrement would overflow"))?;
        keys.insert(key.to_string(), Value::Str(next.to_string()));

        Ok(next)
    }

    async fn hset_nx(&self, key: &str, field: &str, value: &str) -> AppResult<bool> {
        self.ensure_available()?;
        let mut keys = self.keys.lock().await;

        let hash = match keys
            .entry(key.to_string())
            .or_insert_with(|| Value::Hash(HashMap::new()))
        {
            Value::Hash(hash) => hash,
            Value::Str(_) => return Err(wrong_type(key)),
        };

        if hash.contains_key(field) {
            return Ok(false);
        }
        hash.insert(field.to_string(), value.to_string());
        Ok(true)
    }

    async fn hset_multiple(&self, key: &str, fields: Vec<(String, String)>) -> AppResult<()> {
        self.ensure_available()?;
        if fields.is_empty() {
            return Ok(());
        }

        let mut keys = self.keys.lock().await;
        let hash = match keys
            .entry(key.to_string())
            .or_insert_with(|| Value::Hash(HashMap::new()))
        {
            Value::Hash(hash) => hash,
            Value::Str(_) => return Err(wrong_type(key)),
        };

        hash.extend(fields);
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> AppResult<Option<String>> {
        self.ensure_available()?;
        let keys = self.keys.lock().await;

        match keys.get(key) {
            None => Ok(None),
            Some(Value::Hash(hash)) => Ok(hash.get(field).cloned()),
            Some(Value::Str(_)) => Err(wrong_type(key)),
        }
    }

    async fn hgetall(&self, key: &str) -> AppResult<HashMap<String, String>> {
        self.ensure_available()?;
        let keys = self.keys.lock().await;

        match keys.get(key) {
            None => Ok(HashMap::new()),
            Some(Value::Hash(hash)) => Ok(hash.clone()),
            Some(Value::Str(_)) => Err(wrong_type(key)),
        }
    }

    async fn hdel(&self, key: &str, field: &str) -> AppResult<bool> {
        self.ensure_available()?;
        let mut keys = self.keys.lock().await;

        let (removed, now_empty) = match keys.get_mut(key) {
            None => return Ok(false),
            Some(Value::Hash(hash)) => {
                let removed = hash.remove(field).is_some();
                (removed, hash.is_empty())
            }
            Some(Value::Str(_)) => return Err(wrong_type(key)),
        };

        // Redis drops a hash once its last field is gone
        if now_empty {
            keys.remove(key);
        }

        Ok(removed)
    }

    async fn del(&self, key: &str) -> AppResult<bool> {
        self.ensure_available()?;
        Ok(self.keys.lock().await.remove(key).is_some())
    }
}
