//! Repository layer for data access.

mod email_index;
mod id_allocator;
mod record_store;
mod user_repository;

pub use email_index::EmailIndex;
pub use id_allocator::{IdAllocator, UserId};
pub use record_store::RecordStore;
pub use user_repository::{UserRepository, UserStore};
