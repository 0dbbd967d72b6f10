use rusqlite::{Connection, Row};

use crate::error::{OptionalExt, is_unique_violation};
use crate::models::UserRow;
use crate::{Database, StoreError, StoreResult};

const USER_COLUMNS: &str = "id, email, password, created_at";

impl Database {
    // -- Users --

    /// Insert a new account. The UNIQUE index on `email` decides duplicates,
    /// so two concurrent registrations cannot both succeed.
    pub fn create_user(&self, email: &str, password_hash: &str) -> StoreResult<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (email, password) VALUES (?1, ?2)",
                (email, password_hash),
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateEmail
                } else {
                    e.into()
                }
            })?;

            let id = conn.last_insert_rowid();
            query_user_by_id(conn, id)?.ok_or(StoreError::NotFound)
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: i64) -> StoreResult<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        email: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn query_user_by_email(conn: &Connection, email: &str) -> StoreResult<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))?;
    stmt.query_row([email], user_from_row).optional()
}

fn query_user_by_id(conn: &Connection, id: i64) -> StoreResult<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
    stmt.query_row([id], user_from_row).optional()
}
