//! Database row types that have no public API counterpart.
//! The password hash never leaves the storage and auth layers.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}
