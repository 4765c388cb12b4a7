//! Per-user record hashes (`user:<id>`).

use std::collections::HashMap;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{User, UserField};

use super::UserId;
use crate::store::HashStore;

/// Reads and writes the field hash of each user.
pub struct RecordStore<S: HashStore> {
    store: Arc<S>,
}

impl<S: HashStore> RecordStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Write every field of `user`, replacing whatever is stored under `id`.
    pub async fn put_full(&self, id: UserId, user: &User) -> AppResult<()> {
        let fields = UserField::ALL
            .iter()
            .map(|field| (field.as_str().to_string(), user.value_of(*field).to_string()))
            .collect();

        self.store.hset_multiple(&id.record_key(), fields).await
    }

    /// Read the record back into a `User`.
    pub async fn read_full(&self, id: UserId) -> AppResult<User> {
        let key = id.record_key();
        let fields = self.store.hgetall(&key).await?;

        if fields.is_empty() {
            return Err(AppError::not_found(format!("record {}", key)));
        }

        decode_user(&key, fields)
    }

    /// Overwrite only the given fields. Each must be mutable.
    pub async fn put_partial(&self, id: UserId, updates: &[(UserField, String)]) -> AppResult<()> {
        if let Some((field, _)) = updates.iter().find(|(field, _)| !field.is_mutable()) {
            return Err(AppError::validation(format!("field '{}' is immutable", field)));
        }

        if updates.is_empty() {
            return Ok(());
        }

        let key = id.record_key();
        let fields = updates
            .iter()
            .map(|(field, value)| (field.as_str().to_string(), value.clone()))
            .collect();

        self.store.hset_multiple(&key, fields).await?;
        tracing::debug!(key = %key, fields = updates.len(), "Record fields updated");
        Ok(())
    }

    /// Remove the record; `false` if nothing was stored under `id`.
    pub async fn delete(&self, id: UserId) -> AppResult<bool> {
        self.store.del(&id.record_key()).await
    }
}

fn decode_user(key: &str, mut fields: HashMap<String, String>) -> AppResult<User> {
    let mut take = |field: UserField| {
        fields.remove(field.as_str()).ok_or_else(|| {
            AppError::deserialization(format!("record {} has no '{}' field", key, field))
        })
    };

    Ok(User {
        email: take(UserField::Email)?,
        name: take(UserField::Name)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, MockHashStore};
    use tokio_test::{assert_err, assert_ok};

    fn sample() -> User {
        User::new("user@example.com", "Test User")
    }

    #[tokio::test]
    async fn test_put_full_then_read() {
        let records = RecordStore::new(Arc::new(MemoryStore::new()));
        assert_ok!(records.put_full(UserId::new(1), &sample()).await);

        assert_eq!(assert_ok!(records.read_full(UserId::new(1)).await), sample());
    }

    #[tokio::test]
    async fn test_layout_uses_email_and_name_fields() {
        let store = Arc::new(MemoryStore::new());
        let records = RecordStore::new(store.clone());
        assert_ok!(records.put_full(UserId::new(5), &sample()).await);

        let raw = assert_ok!(store.hgetall("user:5").await);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw["email"], "user@example.com");
        assert_eq!(raw["name"], "Test User");
    }

    #[tokio::test]
    async fn test_read_missing_record_is_not_found() {
        let records = RecordStore::new(Arc::new(MemoryStore::new()));
        assert!(assert_err!(records.read_full(UserId::new(1)).await).is_not_found());
    }

    #[tokio::test]
    async fn test_read_record_without_name_fails_to_decode() {
        let store = Arc::new(MemoryStore::new());
        assert_ok!(
            store
                .hset_multiple(
                    "user:1",
                    vec![("email".to_string(), "user@example.com".to_string())]
                )
                .await
        );

        let records = RecordStore::new(store);
        let err = assert_err!(records.read_full(UserId::new(1)).await);
        assert_eq!(err.code(), "DESERIALIZATION_ERROR");
    }

    #[tokio::test]
    async fn test_read_ignores_unknown_fields() {
        let store = Arc::new(MemoryStore::new());
        let records = RecordStore::new(store.clone());
        assert_ok!(records.put_full(UserId::new(1), &sample()).await);
        assert_ok!(
            store
                .hset_multiple("user:1", vec![("legacy".to_string(), "x".to_string())])
                .await
        );

        assert_eq!(assert_ok!(records.read_full(UserId::new(1)).await), sample());
    }

    #[tokio::test]
    async fn test_put_partial_leaves_email_untouched() {
        let records = RecordStore::new(Arc::new(MemoryStore::new()));
        assert_ok!(records.put_full(UserId::new(1), &sample()).await);

        assert_ok!(
            records
                .put_partial(UserId::new(1), &[(UserField::Name, "New User Name".to_string())])
                .await
        );

        let user = assert_ok!(records.read_full(UserId::new(1)).await);
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.name, "New User Name");
    }

    #[tokio::test]
    async fn test_put_partial_rejects_immutable_field() {
        // No store command may be issued
        let records = RecordStore::new(Arc::new(MockHashStore::new()));

        let err = assert_err!(
            records
                .put_partial(UserId::new(1), &[(UserField::Email, "x@example.com".to_string())])
                .await
        );
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_put_partial_empty_is_noop() {
        let records = RecordStore::new(Arc::new(MockHashStore::new()));
        assert_ok!(records.put_partial(UserId::new(1), &[]).await);
    }

    #[tokio::test]
    async fn test_delete_reports_removal() {
        let records = RecordStore::new(Arc::new(MemoryStore::new()));
        assert_ok!(records.put_full(UserId::new(1), &sample()).await);

        assert!(assert_ok!(records.delete(UserId::new(1)).await));
        assert!(!assert_ok!(records.delete(UserId::new(1)).await));
    }
}
