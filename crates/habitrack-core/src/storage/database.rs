//! SQLite-backed document store.
//!
//! Each document is one row of the `documents` table holding its JSON body.
//! Writes are last-write-wins, matching the hosted backend this stands in for.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::{data_dir, migrations};
use crate::error::{CoreError, StoreError};
use crate::store::{codec_error, merge_values, set_value_at_path, DocumentListing, DocumentStore};

/// SQLite document store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the store at `<data_dir>/habitrack.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("habitrack.db");
        Self::open_path(&path)
    }

    /// Open (or create) the store at `path`.
    pub fn open_path(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store.
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, CoreError> {
        migrations::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Backend("database connection lock poisoned".to_string()))
    }
}

fn read_body(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> Result<Option<Value>, StoreError> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;

    body.map(|text| serde_json::from_str(&text).map_err(|e| codec_error(collection, id, e)))
        .transpose()
}

fn write_body(
    conn: &Connection,
    collection: &str,
    id: &str,
    body: &Value,
) -> Result<(), StoreError> {
    let text = serde_json::to_string(body).map_err(|e| codec_error(collection, id, e))?;
    conn.execute(
        "INSERT INTO documents (collection, id, body, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
        params![collection, id, text, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

impl DocumentStore for SqliteStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.lock()?;
        read_body(&conn, collection, id)
    }

    fn set_document(
        &self,
        collection: &str,
        id: &str,
        record: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let body = match read_body(&tx, collection, id)? {
            Some(mut existing) if merge => {
                merge_values(&mut existing, record);
                existing
            }
            _ => record,
        };
        write_body(&tx, collection, id, &body)?;
        tx.commit()?;
        Ok(())
    }

    fn update_field(
        &self,
        collection: &str,
        id: &str,
        field_path: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut body = read_body(&tx, collection, id)?.ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        })?;
        set_value_at_path(&mut body, field_path, value)?;
        write_body(&tx, collection, id, &body)?;
        tx.commit()?;
        Ok(())
    }
}

impl DocumentListing for SqliteStore {
    fn list_documents(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, text) = row?;
            let body: Value = serde_json::from_str(&text).map_err(|e| codec_error(collection, &id, e))?;
            docs.push((id, body));
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_and_get() {
        let store = SqliteStore::open_memory().unwrap();
        assert!(store.get_document("users", "u1").unwrap().is_none());
        store
            .set_document("users", "u1", json!({"points": 10}), false)
            .unwrap();
        assert_eq!(
            store.get_document("users", "u1").unwrap(),
            Some(json!({"points": 10}))
        );
    }

    #[test]
    fn merge_and_overwrite() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .set_document("users", "u1", json!({"points": 10, "display_name": "Ana"}), false)
            .unwrap();
        store
            .set_document("users", "u1", json!({"points": 20}), true)
            .unwrap();
        assert_eq!(
            store.get_document("users", "u1").unwrap(),
            Some(json!({"points": 20, "display_name": "Ana"}))
        );
    }

    #[test]
    fn update_nested_field() {
        let store = SqliteStore::open_memory().unwrap();
        store
            .set_document("users", "u1", json!({"streak": {"current_streak": 3}}), false)
            .unwrap();
        store
            .update_field("users", "u1", "streak.current_streak", json!(0))
            .unwrap();
        let doc = store.get_document("users", "u1").unwrap().unwrap();
        assert_eq!(doc["streak"]["current_streak"], 0);

        let err = store
            .update_field("users", "missing", "points", json!(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn list_documents_by_collection() {
        let store = SqliteStore::open_memory().unwrap();
        store.set_document("users", "b", json!({}), false).unwrap();
        store.set_document("users", "a", json!({}), false).unwrap();
        store.set_document("habits", "h", json!({}), false).unwrap();
        let ids: Vec<String> = store
            .list_documents("users")
            .unwrap()
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn reopen_file_keeps_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habitrack.db");
        {
            let store = SqliteStore::open_path(&path).unwrap();
            store
                .set_document("habits", "h1", json!({"name": "Read"}), false)
                .unwrap();
        }
        let store = SqliteStore::open_path(&path).unwrap();
        assert_eq!(
            store.get_document("habits", "h1").unwrap(),
            Some(json!({"name": "Read"}))
        );
    }
}
