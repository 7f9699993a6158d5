//! Generic JSON document operations.
//!
//! Every collection lives in the single `documents` table.  The functions
//! here take a plain [`Connection`] so they can run inside a transaction as
//! well as on the [`Database`] handle.

use chrono::{SecondsFormat, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::Value;

use crate::database::Database;
use crate::error::{Result, StoreError};

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocKey {
    pub collection: String,
    pub key: String,
}

impl DocKey {
    pub fn new(collection: &str, key: &str) -> Self {
        Self {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }
}

impl std::fmt::Display for DocKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Equality filters over top-level body fields plus ordering by the
/// store-assigned creation time.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<(String, Value)>,
    order: Option<Order>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push((field.to_string(), value.into()));
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = Some(Order::Descending);
        self
    }

    pub fn oldest_first(mut self) -> Self {
        self.order = Some(Order::Ascending);
        self
    }
}

/// Store-side timestamp format.  Fixed precision keeps lexicographic order
/// equal to chronological order.
pub(crate) fn store_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Create or overwrite a document.  The creation time of an existing
/// document is preserved.
pub fn put(conn: &Connection, collection: &str, key: &str, body: &Value) -> Result<()> {
    let now = store_timestamp();
    conn.execute(
        "INSERT INTO documents (collection, key, body, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(collection, key) DO UPDATE
         SET body = excluded.body, updated_at = excluded.updated_at",
        params![collection, key, serde_json::to_string(body)?, now],
    )?;
    Ok(())
}

/// Create a document, failing with [`StoreError::Conflict`] if the key is
/// already taken.
pub fn insert(conn: &Connection, collection: &str, key: &str, body: &Value) -> Result<()> {
    let now = store_timestamp();
    conn.execute(
        "INSERT INTO documents (collection, key, body, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![collection, key, serde_json::to_string(body)?, now],
    )
    .map_err(|e| StoreError::from_constraint(e, &format!("{collection}/{key} exists")))?;
    Ok(())
}

pub fn get(conn: &Connection, collection: &str, key: &str) -> Result<Option<Value>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
            params![collection, key],
            |row| row.get(0),
        )
        .optional()?;

    match body {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Delete a document.  Returns `true` if it existed.
pub fn delete(conn: &Connection, collection: &str, key: &str) -> Result<bool> {
    let affected = conn.execute(
        "DELETE FROM documents WHERE collection = ?1 AND key = ?2",
        params![collection, key],
    )?;
    Ok(affected > 0)
}

/// Run `query` against `collection`, returning `(key, body)` pairs.
pub fn query(conn: &Connection, collection: &str, query: &Query) -> Result<Vec<(String, Value)>> {
    let mut sql = String::from("SELECT key, body FROM documents WHERE collection = ?");
    let mut args: Vec<SqlValue> = vec![SqlValue::Text(collection.to_string())];

    for (field, value) in &query.filters {
        sql.push_str(" AND json_extract(body, ?) = ?");
        args.push(SqlValue::Text(format!("$.{field}")));
        args.push(to_sql_value(value));
    }

    match query.order {
        Some(Order::Descending) => sql.push_str(" ORDER BY created_at DESC, rowid DESC"),
        Some(Order::Ascending) => sql.push_str(" ORDER BY created_at ASC, rowid ASC"),
        None => sql.push_str(" ORDER BY rowid ASC"),
    }

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(args), |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut docs = Vec::new();
    for row in rows {
        let (key, body) = row?;
        docs.push((key, serde_json::from_str(&body)?));
    }
    Ok(docs)
}

/// SQL value that compares equal to what `json_extract` yields for `value`.
fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

impl Database {
    pub fn put_document(&self, collection: &str, key: &str, body: &Value) -> Result<()> {
        put(self.conn(), collection, key, body)
    }

    pub fn insert_document(&self, collection: &str, key: &str, body: &Value) -> Result<()> {
        insert(self.conn(), collection, key, body)
    }

    pub fn get_document(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        get(self.conn(), collection, key)
    }

    pub fn delete_document(&self, collection: &str, key: &str) -> Result<bool> {
        delete(self.conn(), collection, key)
    }

    pub fn query_documents(&self, collection: &str, q: &Query) -> Result<Vec<(String, Value)>> {
        query(self.conn(), collection, q)
    }
}
