//! User Store Library
//!
//! A user record repository on top of a keyed hash store. Users are looked up
//! by email; storage is keyed by an internal surrogate identifier.
//!
//! ```rust,ignore
//! let config = StoreConfig::from_env();
//! let users = UserStore::connect(&config).await?;
//!
//! users.create_user(&User::new("user@example.com", "Test User")).await?;
//! let user = users.get_user("user@example.com").await?;
//! ```

pub mod constants;
pub mod repository;
pub mod store;

pub use repository::{EmailIndex, IdAllocator, RecordStore, UserId, UserRepository, UserStore};
pub use store::{HashStore, MemoryStore, RedisStore};

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockHashStore;

pub use common::{AppError, AppResult, StoreConfig};
pub use domain::{User, UserField};
