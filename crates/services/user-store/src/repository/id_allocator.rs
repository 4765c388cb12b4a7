//! Surrogate identifier allocation.

use std::sync::Arc;

use common::{AppError, AppResult};

use crate::constants::{NEXT_USER_ID_KEY, USER_KEY_PREFIX};
use crate::store::HashStore;

/// Internal storage identifier of a user.
///
/// Allocated from a shared counter, never reused and never handed to callers
/// of the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i64);

impl UserId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Key of the record hash for this identifier (`user:<id>`)
    pub fn record_key(&self) -> String {
        format!("{}{}", USER_KEY_PREFIX, self.0)
    }

    /// Parse an identifier as stored in the email index.
    ///
    /// Accepts the record key form (`user:42`) as well as a bare number.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let digits = raw.strip_prefix(USER_KEY_PREFIX).unwrap_or(raw);
        digits
            .parse::<i64>()
            .map(Self)
            .map_err(|_| AppError::deserialization(format!("invalid user id '{}'", raw)))
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out strictly increasing identifiers from the `next_user_id` counter.
pub struct IdAllocator<S: HashStore> {
    store: Arc<S>,
}

impl<S: HashStore> IdAllocator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Allocate the next identifier. Values may be skipped but never repeat.
    pub async fn next_id(&self) -> AppResult<UserId> {
        let value = self.store.incr(NEXT_USER_ID_KEY).await?;
        Ok(UserId(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockHashStore};
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_record_key() {
        assert_eq!(UserId::new(7).record_key(), "user:7");
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!(assert_ok!(UserId::parse("user:12")), UserId::new(12));
        assert_eq!(assert_ok!(UserId::parse("12")), UserId::new(12));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = assert_err!(UserId::parse("user:abc"));
        assert_eq!(err.code(), "DESERIALIZATION_ERROR");
        assert_err!(UserId::parse("session:1"));
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let allocator = IdAllocator::new(Arc::new(MemoryStore::new()));

        let first = assert_ok!(allocator.next_id().await);
        let second = assert_ok!(allocator.next_id().await);
        let third = assert_ok!(allocator.next_id().await);

        assert_eq!(first, UserId::new(1));
        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn test_uses_shared_counter_key() {
        let mut store = MockHashStore::new();
        store
            .expect_incr()
            .with(eq("next_user_id"))
            .times(1)
            .returning(|_| Ok(41));

        let allocator = IdAllocator::new(Arc::new(store));
        assert_eq!(assert_ok!(allocator.next_id().await), UserId::new(41));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockHashStore::new();
        store
            .expect_incr()
            .returning(|_| Err(AppError::unavailable("connection refused")));

        let allocator = IdAllocator::new(Arc::new(store));
        assert!(assert_err!(allocator.next_id().await).is_unavailable());
    }
}
