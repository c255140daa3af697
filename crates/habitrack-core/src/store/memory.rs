use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::{merge_values, set_value_at_path, DocumentListing, DocumentStore};
use crate::error::StoreError;

type Documents = BTreeMap<(String, String), Value>;

/// In-process document store.
///
/// Last write wins, like the hosted backend. Used by tests and as the
/// injection point for callers that have no database.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<Documents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections.
    pub fn len(&self) -> usize {
        self.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Documents>, StoreError> {
        self.docs
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

fn key(collection: &str, id: &str) -> (String, String) {
    (collection.to_string(), id.to_string())
}

impl DocumentStore for MemoryStore {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.lock()?.get(&key(collection, id)).cloned())
    }

    fn set_document(
        &self,
        collection: &str,
        id: &str,
        record: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        let mut docs = self.lock()?;
        let k = key(collection, id);
        if merge {
            if let Some(existing) = docs.get_mut(&k) {
                merge_values(existing, record);
                return Ok(());
            }
        }
        docs.insert(k, record);
        Ok(())
    }

    fn update_field(
        &self,
        collection: &str,
        id: &str,
        field_path: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        let mut docs = self.lock()?;
        let doc = docs
            .get_mut(&key(collection, id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        set_value_at_path(doc, field_path, value)
    }
}

impl DocumentListing for MemoryStore {
    fn list_documents(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|((c, _), _)| c == collection)
            .map(|((_, id), doc)| (id.clone(), doc.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_set_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get_document("users", "u1").unwrap().is_none());
        store
            .set_document("users", "u1", json!({"points": 0}), false)
            .unwrap();
        assert_eq!(
            store.get_document("users", "u1").unwrap(),
            Some(json!({"points": 0}))
        );
    }

    #[test]
    fn set_with_merge_keeps_other_fields() {
        let store = MemoryStore::new();
        store
            .set_document("users", "u1", json!({"points": 5, "name": "a"}), false)
            .unwrap();
        store
            .set_document("users", "u1", json!({"points": 15}), true)
            .unwrap();
        assert_eq!(
            store.get_document("users", "u1").unwrap(),
            Some(json!({"points": 15, "name": "a"}))
        );

        store
            .set_document("users", "u1", json!({"points": 1}), false)
            .unwrap();
        assert_eq!(
            store.get_document("users", "u1").unwrap(),
            Some(json!({"points": 1}))
        );
    }

    #[test]
    fn update_field_requires_document() {
        let store = MemoryStore::new();
        let err = store
            .update_field("users", "ghost", "points", json!(1))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn list_is_scoped_to_collection() {
        let store = MemoryStore::new();
        store.set_document("users", "u1", json!({}), false).unwrap();
        store.set_document("habits", "h1", json!({}), false).unwrap();
        let users = store.list_documents("users").unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].0, "u1");
        assert_eq!(store.len(), 2);
    }
}
