//! Ownership-scoped CRUD shared by every tracker record.
//!
//! Each statement filters or stamps `user_id` itself; callers cannot reach a
//! row owned by someone else, and a foreign row looks exactly like a missing
//! one.

use rusqlite::types::Value;
use rusqlite::{Row, params_from_iter};

use jobhunt_types::api::{CompanyListFields, InternshipFields};
use jobhunt_types::models::{CompanyList, Internship};

use crate::error::OptionalExt;
use crate::{Database, StoreError, StoreResult};

/// A table whose rows belong to exactly one user through `user_id`.
pub trait OwnedRecord: Sized + Send + 'static {
    /// Client-writable part of the record.
    type Fields: Send + 'static;

    const TABLE: &'static str;

    /// Writable columns, in the order `values` yields them.
    const COLUMNS: &'static [&'static str];

    fn values(fields: &Self::Fields) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Database {
    pub fn create_owned<T: OwnedRecord>(&self, owner_id: i64, fields: &T::Fields) -> StoreResult<T> {
        let placeholders: Vec<String> = (1..=T::COLUMNS.len() + 1).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} (user_id, {}) VALUES ({})",
            T::TABLE,
            T::COLUMNS.join(", "),
            placeholders.join(", ")
        );

        let mut params = Vec::with_capacity(T::COLUMNS.len() + 1);
        params.push(Value::Integer(owner_id));
        params.extend(T::values(fields));

        self.with_conn(|conn| {
            conn.execute(&sql, params_from_iter(params))?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT * FROM {} WHERE id = ?1", T::TABLE),
                [id],
                |row| T::from_row(row),
            )
            .optional()?
            .ok_or(StoreError::NotFound)
        })
    }

    pub fn list_owned<T: OwnedRecord>(&self, owner_id: i64) -> StoreResult<Vec<T>> {
        let sql = format!("SELECT * FROM {} WHERE user_id = ?1 ORDER BY id", T::TABLE);
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([owner_id], |row| T::from_row(row))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Overwrite the writable columns of `id` if, and only if, `owner_id`
    /// owns it. `user_id` is never part of the SET list.
    pub fn update_owned<T: OwnedRecord>(
        &self,
        id: i64,
        owner_id: i64,
        fields: &T::Fields,
    ) -> StoreResult<()> {
        let n = T::COLUMNS.len();
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {}, updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') \
             WHERE id = ?{} AND user_id = ?{}",
            T::TABLE,
            assignments.join(", "),
            n + 1,
            n + 2
        );

        let mut params = T::values(fields);
        params.push(Value::Integer(id));
        params.push(Value::Integer(owner_id));

        self.with_conn(|conn| {
            let changed = conn.execute(&sql, params_from_iter(params))?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    pub fn delete_owned<T: OwnedRecord>(&self, id: i64, owner_id: i64) -> StoreResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1 AND user_id = ?2", T::TABLE);
        self.with_conn(|conn| {
            let changed = conn.execute(&sql, [id, owner_id])?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }
}

impl OwnedRecord for CompanyList {
    type Fields = CompanyListFields;

    const TABLE: &'static str = "company_lists";
    const COLUMNS: &'static [&'static str] = &["company", "occupation", "member", "selection", "intern"];

    fn values(f: &CompanyListFields) -> Vec<Value> {
        vec![
            Value::Text(f.company.clone()),
            Value::Text(f.occupation.clone()),
            Value::Integer(f.member),
            Value::Text(f.selection.clone()),
            Value::Integer(i64::from(f.intern)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            company: row.get("company")?,
            occupation: row.get("occupation")?,
            member: row.get("member")?,
            selection: row.get("selection")?,
            intern: row.get("intern")?,
            user_id: row.get("user_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

impl OwnedRecord for Internship {
    type Fields = InternshipFields;

    const TABLE: &'static str = "internships";
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "company",
        "dailystart",
        "dailyfinish",
        "content",
        "selection",
        "joined",
    ];

    fn values(f: &InternshipFields) -> Vec<Value> {
        vec![
            Value::Text(f.title.clone()),
            Value::Text(f.company.clone()),
            Value::Integer(f.dailystart),
            Value::Integer(f.dailyfinish),
            Value::Text(f.content.clone()),
            Value::Text(f.selection.clone()),
            Value::Integer(i64::from(f.joined)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            company: row.get("company")?,
            dailystart: row.get("dailystart")?,
            dailyfinish: row.get("dailyfinish")?,
            content: row.get("content")?,
            selection: row.get("selection")?,
            joined: row.get("joined")?,
            user_id: row.get("user_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}
