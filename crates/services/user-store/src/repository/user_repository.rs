//! User repository - create, read, update and delete users by email.
//!
//! Each operation is a short sequence of independent store commands. The
//! sequences are not atomic as a whole: a failure midway can leave an
//! allocated id unused, or a record whose index entry is already gone.
//! Nothing here repairs that state.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, StoreConfig};
use domain::{User, UserField};

use super::{EmailIndex, IdAllocator, RecordStore};
use crate::store::{HashStore, RedisStore};

/// User repository trait for dependency injection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user; `Conflict` if the email is already taken
    async fn create_user(&self, user: &User) -> AppResult<()>;

    /// Fetch a user by email
    async fn get_user(&self, email: &str) -> AppResult<User>;

    /// Overwrite the mutable fields of the user identified by `user.email`
    async fn update_user(&self, user: &User) -> AppResult<()>;

    /// Remove the user's index entry and record
    async fn delete_user(&self, email: &str) -> AppResult<()>;
}

/// Concrete implementation of UserRepository over a hash store.
///
/// Holds no user state of its own; everything lives in the store.
pub struct UserStore<S: HashStore> {
    ids: IdAllocator<S>,
    index: EmailIndex<S>,
    records: RecordStore<S>,
}

impl<S: HashStore> UserStore<S> {
    /// Create new repository instance
    pub fn new(store: Arc<S>) -> Self {
        Self {
            ids: IdAllocator::new(store.clone()),
            index: EmailIndex::new(store.clone()),
            records: RecordStore::new(store),
        }
    }
}

impl UserStore<RedisStore> {
    /// Connect to Redis and build a repository on top of it.
    pub async fn connect(config: &StoreConfig) -> AppResult<Self> {
        let store = RedisStore::connect(config).await?;
        Ok(Self::new(Arc::new(store)))
    }
}

#[async_trait]
impl<S: HashStore> UserRepository for UserStore<S> {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        let id = self.ids.next_id().await?;

        if !self.index.try_bind(&user.email, id).await? {
            // The allocated id is abandoned; ids are never handed out twice
            tracing::warn!(email = %user.email, user_id = %id, "Email already bound, id abandoned");
            return Err(AppError::conflict(format!("user {}", user.email)));
        }

        self.records.put_full(id, user).await?;

        tracing::info!(email = %user.email, user_id = %id, "User created");
        Ok(())
    }

    async fn get_user(&self, email: &str) -> AppResult<User> {
        let id = self.index.resolve(email).await?;
        self.records.read_full(id).await
    }

    async fn update_user(&self, user: &User) -> AppResult<()> {
        let id = self
            .index
            .resolve(&user.email)
            .await
            .map_err(|e| with_context(e, "update"))?;

        let updates: Vec<(UserField, String)> = user.mutable_fields();
        self.records.put_partial(id, &updates).await
    }

    async fn delete_user(&self, email: &str) -> AppResult<()> {
        let id = self
            .index
            .resolve(email)
            .await
            .map_err(|e| with_context(e, "delete"))?;

        if !self.index.unbind(email).await? {
            tracing::warn!(email = %email, user_id = %id, "Index entry vanished before unbind");
            return Err(AppError::delete_failed(format!(
                "index entry for {} was already removed",
                email
            )));
        }

        if !self.records.delete(id).await? {
            tracing::warn!(email = %email, user_id = %id, "Record missing for indexed user");
            return Err(AppError::delete_failed(format!(
                "record {} did not exist",
                id.record_key()
            )));
        }

        tracing::info!(email = %email, user_id = %id, "User deleted");
        Ok(())
    }
}

/// Prefix a lookup failure with the operation it aborted.
fn with_context(err: AppError, operation: &str) -> AppError {
    match err {
        AppError::NotFound(what) => {
            AppError::not_found(format!("cannot {} {}: user does not exist", operation, what))
        }
        other => other,
    }
}
