//! Document store abstraction.
//!
//! The hosted database is an opaque collaborator that offers three
//! operations on JSON documents addressed by `(collection, id)`. Everything
//! that persists state goes through [`DocumentStore`], so tests can inject
//! [`MemoryStore`] instead of a live backend.

mod memory;

pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Collection holding one profile document per user.
pub const USERS: &str = "users";
/// Collection holding one document per habit.
pub const HABITS: &str = "habits";

/// Every document backend implements this trait.
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when it does not exist.
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Write a document. With `merge`, object fields are merged into the
    /// existing record instead of replacing it.
    fn set_document(
        &self,
        collection: &str,
        id: &str,
        record: Value,
        merge: bool,
    ) -> Result<(), StoreError>;

    /// Overwrite one field addressed by a dot-separated path.
    ///
    /// # Errors
    /// Fails with [`StoreError::NotFound`] when the document is absent.
    fn update_field(
        &self,
        collection: &str,
        id: &str,
        field_path: &str,
        value: Value,
    ) -> Result<(), StoreError>;
}

/// Backends that can enumerate a whole collection.
pub trait DocumentListing: DocumentStore {
    fn list_documents(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        (**self).get_document(collection, id)
    }

    fn set_document(
        &self,
        collection: &str,
        id: &str,
        record: Value,
        merge: bool,
    ) -> Result<(), StoreError> {
        (**self).set_document(collection, id, record, merge)
    }

    fn update_field(
        &self,
        collection: &str,
        id: &str,
        field_path: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        (**self).update_field(collection, id, field_path, value)
    }
}

impl<S: DocumentListing + ?Sized> DocumentListing for &S {
    fn list_documents(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        (**self).list_documents(collection)
    }
}

/// Fetch and decode a document.
pub fn get_typed<T, S>(store: &S, collection: &str, id: &str) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
    S: DocumentStore + ?Sized,
{
    match store.get_document(collection, id)? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| codec_error(collection, id, e)),
        None => Ok(None),
    }
}

/// Encode and write a document.
pub fn set_typed<T, S>(
    store: &S,
    collection: &str,
    id: &str,
    record: &T,
    merge: bool,
) -> Result<(), StoreError>
where
    T: Serialize,
    S: DocumentStore + ?Sized,
{
    let value = serde_json::to_value(record).map_err(|e| codec_error(collection, id, e))?;
    store.set_document(collection, id, value, merge)
}

pub(crate) fn codec_error(collection: &str, id: &str, err: serde_json::Error) -> StoreError {
    StoreError::Codec {
        collection: collection.to_string(),
        id: id.to_string(),
        message: err.to_string(),
    }
}

/// Deep-merge `patch` into `target`.
///
/// Objects merge key by key; any other value in `patch` replaces the
/// target value.
pub fn merge_values(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                match target.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Write `value` at a dot-separated path, creating missing parent objects.
///
/// # Errors
/// Fails when the path is empty, has an empty segment, or crosses a
/// non-object value.
pub fn set_value_at_path(root: &mut Value, path: &str, value: Value) -> Result<(), StoreError> {
    let invalid = || StoreError::InvalidPath(path.to_string());
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(invalid());
    }

    let mut parts = path.split('.').peekable();
    let mut current = root;
    while let Some(part) = parts.next() {
        let obj = current.as_object_mut().ok_or_else(invalid)?;
        if parts.peek().is_none() {
            obj.insert(part.to_string(), value);
            return Ok(());
        }
        current = obj
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    Err(invalid())
}
