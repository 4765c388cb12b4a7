//! Store key layout.
//!
//! These names are shared with every other reader and writer of the store
//! and must not change.

/// Integer counter that hands out surrogate user identifiers
pub const NEXT_USER_ID_KEY: &str = "next_user_id";

/// Hash mapping each email to the record key of its user
pub const USERS_INDEX_KEY: &str = "users";

/// Prefix of the per-user record hash (`user:<id>`)
pub const USER_KEY_PREFIX: &str = "user:";
