//! The document store: declared collections over the journal

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::observability::Logger;

use super::errors::{StoreError, StoreResult};
use super::filter::Filter;
use super::journal::Journal;
use super::record::JournalRecord;

/// Declares a collection the store will accept documents for. These
/// declarations are the store's whole schema: a name and, optionally, a
/// field whose value must be unique across the collection.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub unique_field: Option<&'static str>,
}

impl CollectionSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            unique_field: None,
        }
    }

    pub const fn with_unique(name: &'static str, field: &'static str) -> Self {
        Self {
            name,
            unique_field: Some(field),
        }
    }
}

struct Inner {
    journal: Journal,
    collections: HashMap<String, Vec<Value>>,
}

/// Insert-only document store with declared collections.
///
/// In-memory state is rebuilt from the journal at open. Reads clone the
/// matching documents; inserts append to the journal (fsynced) before
/// publishing to memory. One lock covers both, which keeps unique-field
/// checks atomic with the insert that depends on them.
pub struct DocumentStore {
    specs: Vec<CollectionSpec>,
    inner: RwLock<Inner>,
}

impl DocumentStore {
    /// Opens the store in `data_dir`, replaying any existing journal.
    ///
    /// Fails on IO errors, journal corruption, or a replayed record
    /// naming an undeclared collection.
    pub fn open(data_dir: &Path, specs: &[CollectionSpec]) -> StoreResult<Self> {
        let (journal, records) = Journal::open(data_dir)?;

        let mut collections: HashMap<String, Vec<Value>> = specs
            .iter()
            .map(|spec| (spec.name.to_string(), Vec::new()))
            .collect();

        let replayed = records.len();
        for record in records {
            let body: Value = serde_json::from_slice(&record.body)?;
            let slot = collections
                .get_mut(&record.collection)
                .ok_or_else(|| StoreError::UnknownCollection(record.collection.clone()))?;
            slot.push(body);
        }

        Logger::info(
            "STORE_OPENED",
            &[
                ("data_dir", &data_dir.display().to_string()),
                ("records", &replayed.to_string()),
            ],
        );

        Ok(Self {
            specs: specs.to_vec(),
            inner: RwLock::new(Inner {
                journal,
                collections,
            }),
        })
    }

    /// Inserts a document, assigning `_id` and `created_at`. Returns the
    /// document as stored.
    pub fn insert(&self, collection: &str, body: Value) -> StoreResult<Value> {
        let spec = self.spec(collection)?;
        let mut fields: Map<String, Value> = match body {
            Value::Object(map) => map,
            _ => return Err(StoreError::NotAnObject),
        };

        let id = Uuid::new_v4().to_string();
        fields.insert("_id".to_string(), Value::String(id.clone()));
        fields.insert(
            "created_at".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        let document = Value::Object(fields);

        let mut inner = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;

        if let Some(field) = spec.unique_field {
            if let Some(value) = document.get(field) {
                let existing = inner
                    .collections
                    .get(collection)
                    .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
                if existing.iter().any(|doc| doc.get(field) == Some(value)) {
                    return Err(StoreError::DuplicateValue {
                        collection: collection.to_string(),
                        field: field.to_string(),
                        value: display_value(value),
                    });
                }
            }
        }

        let record = JournalRecord::new(collection, &id, serde_json::to_vec(&document)?);
        inner.journal.append(&record)?;
        inner
            .collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?
            .push(document.clone());

        Ok(document)
    }

    /// All documents in a collection matching the filter, in insertion
    /// order.
    pub fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        self.spec(collection)?;
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        let documents = inner
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(documents
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }

    /// Fetches a single document by its `_id`.
    pub fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        self.spec(collection)?;
        let inner = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        let documents = inner
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(documents
            .iter()
            .find(|doc| doc.get("_id").and_then(Value::as_str) == Some(id))
            .cloned())
    }

    fn spec(&self, collection: &str) -> StoreResult<&CollectionSpec> {
        self.specs
            .iter()
            .find(|spec| spec.name == collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
