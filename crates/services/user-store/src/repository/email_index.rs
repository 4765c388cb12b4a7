//! Email index - the `users` hash mapping each email to its user's record.

use std::sync::Arc;

use common::{AppResult, OptionExt};

use super::UserId;
use crate::constants::USERS_INDEX_KEY;
use crate::store::HashStore;

/// Maps emails to surrogate identifiers, at most one identifier per email.
///
/// Entry presence is what makes a user exist. Uniqueness relies solely on the
/// conditional insert; there is no other locking.
pub struct EmailIndex<S: HashStore> {
    store: Arc<S>,
}

impl<S: HashStore> EmailIndex<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Bind `email` to `id` unless the email is already bound.
    ///
    /// Returns `false` without touching the existing entry when it is.
    pub async fn try_bind(&self, email: &str, id: UserId) -> AppResult<bool> {
        self.store
            .hset_nx(USERS_INDEX_KEY, email, &id.record_key())
            .await
    }

    /// Look up the identifier bound to `email`.
    pub async fn resolve(&self, email: &str) -> AppResult<UserId> {
        let raw = self
            .store
            .hget(USERS_INDEX_KEY, email)
            .await?
            .ok_or_not_found(format!("user {}", email))?;

        let id = UserId::parse(&raw)?;
        tracing::debug!(email = %email, user_id = %id, "Resolved user id");
        Ok(id)
    }

    /// Remove the entry for `email`; `false` if there was none.
    pub async fn unbind(&self, email: &str) -> AppResult<bool> {
        self.store.hdel(USERS_INDEX_KEY, email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockHashStore};
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_bind_then_resolve() {
        let index = EmailIndex::new(Arc::new(MemoryStore::new()));

        assert!(assert_ok!(index.try_bind("a@example.com", UserId::new(3)).await));
        assert_eq!(
            assert_ok!(index.resolve("a@example.com").await),
            UserId::new(3)
        );
    }

    #[tokio::test]
    async fn test_second_bind_loses_and_keeps_first() {
        let index = EmailIndex::new(Arc::new(MemoryStore::new()));

        assert!(assert_ok!(index.try_bind("a@example.com", UserId::new(1)).await));
        assert!(!assert_ok!(index.try_bind("a@example.com", UserId::new(2)).await));
        assert_eq!(
            assert_ok!(index.resolve("a@example.com").await),
            UserId::new(1)
        );
    }

    #[tokio::test]
    async fn test_stores_record_key_as_value() {
        let store = Arc::new(MemoryStore::new());
        let index = EmailIndex::new(store.clone());
        assert_ok!(index.try_bind("a@example.com", UserId::new(9)).await);

        let raw = assert_ok!(store.hget("users", "a@example.com").await);
        assert_eq!(raw.as_deref(), Some("user:9"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_email_is_not_found() {
        let index = EmailIndex::new(Arc::new(MemoryStore::new()));

        let err = assert_err!(index.resolve("ghost@example.com").await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resolve_malformed_entry() {
        let mut store = MockHashStore::new();
        store
            .expect_hget()
            .with(eq("users"), eq("a@example.com"))
            .returning(|_, _| Ok(Some("not-an-id".to_string())));

        let index = EmailIndex::new(Arc::new(store));
        let err = assert_err!(index.resolve("a@example.com").await);
        assert_eq!(err.code(), "DESERIALIZATION_ERROR");
    }

    #[tokio::test]
    async fn test_unbind_reports_removal() {
        let index = EmailIndex::new(Arc::new(MemoryStore::new()));
        assert_ok!(index.try_bind("a@example.com", UserId::new(1)).await);

        assert!(assert_ok!(index.unbind("a@example.com").await));
        assert!(!assert_ok!(index.unbind("a@example.com").await));
    }
}
