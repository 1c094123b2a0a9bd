//! In-process record store.
//!
//! Documents live in insertion order per collection behind an async
//! read-write lock. Unique indexes and the filter operators used by the
//! repository (`$eq`, `$ne`, `$gt`, `$gte`, `$lt`, `$lte`) behave as they do
//! on the server, so the HTTP layer can be exercised without a database.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{RecordStore, StoreError, StoreResult};

#[derive(Default, Debug)]
struct CollectionData {
    documents: Vec<Document>,
    unique: Vec<String>,
}

#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, CollectionData>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let data = collections.entry(collection.to_string()).or_default();
        if !data.unique.iter().any(|f| f == field) {
            data.unique.push(field.to_string());
        }
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let data = collections.entry(collection.to_string()).or_default();

        for mut document in documents {
            if !document.contains_key("_id") {
                document.insert("_id", ObjectId::new());
            }

            let unique = std::iter::once("_id").chain(data.unique.iter().map(String::as_str));
            for field in unique {
                let Some(value) = document.get(field) else {
                    continue;
                };
                let taken = data
                    .documents
                    .iter()
                    .any(|existing| existing.get(field).is_some_and(|v| equals(v, value)));
                if taken {
                    return Err(StoreError::DuplicateKey(format!(
                        "E11000 duplicate key error collection: {} index: {}_1 dup key: {{ {}: {} }}",
                        collection, field, field, value
                    )));
                }
            }

            data.documents.push(document);
        }

        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(data) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for document in &data.documents {
            if evaluate(document, &filter)? {
                found.push(document.clone());
            }
        }
        Ok(found)
    }
}

/// Evaluate a filter document against `document`
pub fn evaluate(document: &Document, filter: &Document) -> StoreResult<bool> {
    for (field, condition) in filter {
        let value = document.get(field).unwrap_or(&Bson::Null);

        let holds = match condition {
            Bson::Document(ops) if is_operator_document(ops) => {
                let mut all = true;
                for (op, operand) in ops {
                    if !apply(op, value, operand)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            _ => equals(value, condition),
        };

        if !holds {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_document(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|k| k.starts_with('$'))
}

fn apply(op: &str, value: &Bson, operand: &Bson) -> StoreResult<bool> {
    let ordering = compare(value, operand);
    Ok(match op {
        "$eq" => equals(value, operand),
        "$ne" => !equals(value, operand),
        "$gt" => ordering == Some(Ordering::Greater),
        "$gte" => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        "$lt" => ordering == Some(Ordering::Less),
        "$lte" => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        other => {
            return Err(StoreError::Backend(format!("unknown operator: {}", other)));
        }
    })
}

fn equals(a: &Bson, b: &Bson) -> bool {
    match (a, b) {
        (Bson::Null, Bson::Null) => true,
        _ => compare(a, b) == Some(Ordering::Equal),
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Ordering between two values of the same BSON kind; numbers compare across widths
fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
