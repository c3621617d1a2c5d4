//! In-memory CRUD service.

use core::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::call::{Id, Params};
use crate::error::{ServiceError, ServiceResult};
use crate::method::MethodSet;
use crate::service::Service;

/// A service storing JSON objects in memory, keyed by an auto-incremented
/// numeric `id` starting at 0.
///
/// `find`, multi-record `patch` and multi-record `remove` treat
/// [`Params::query`] as a set of equality filters.
#[derive(Debug, Default)]
pub struct MemoryService {
    records: Mutex<IndexMap<u64, Value>>,
    next_id: AtomicU64,
}

impl MemoryService {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

fn key(id: &Id) -> Result<u64, ServiceError> {
    match id {
        Id::Number(n) => Ok(*n),
        Id::String(s) => s.parse().map_err(|_| not_found(id)),
    }
}

fn not_found(id: &Id) -> ServiceError {
    ServiceError::not_found(format!("no record found for id '{id}'"))
}

fn object(data: Value) -> Result<Map<String, Value>, ServiceError> {
    match data {
        Value::Object(map) => Ok(map),
        other => Err(ServiceError::bad_request(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

fn with_id(mut map: Map<String, Value>, id: u64) -> Value {
    map.insert("id".into(), Value::from(id));
    Value::Object(map)
}

fn matches(record: &Value, query: &Map<String, Value>) -> bool {
    query
        .iter()
        .all(|(field, expected)| record.get(field) == Some(expected))
}

fn merge(record: &mut Value, changes: &Map<String, Value>) {
    if let Some(target) = record.as_object_mut() {
        for (field, value) in changes {
            if field != "id" {
                target.insert(field.clone(), value.clone());
            }
        }
    }
}

#[async_trait]
impl Service for MemoryService {
    fn methods(&self) -> MethodSet {
        MethodSet::ALL
    }

    async fn get(&self, id: Id, _params: Params) -> ServiceResult {
        let key = key(&id)?;
        self.records
            .lock()
            .get(&key)
            .cloned()
            .ok_or_else(|| not_found(&id))
    }

    async fn find(&self, params: Params) -> ServiceResult {
        let records = self.records.lock();
        Ok(Value::Array(
            records
                .values()
                .filter(|record| matches(record, &params.query))
                .cloned()
                .collect(),
        ))
    }

    async fn create(&self, data: Value, _params: Params) -> ServiceResult {
        let map = object(data)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = with_id(map, id);
        self.records.lock().insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Id, data: Value, _params: Params) -> ServiceResult {
        let key = key(&id)?;
        let map = object(data)?;
        let mut records = self.records.lock();
        let slot = records.get_mut(&key).ok_or_else(|| not_found(&id))?;
        *slot = with_id(map, key);
        Ok(slot.clone())
    }

    async fn patch(&self, id: Option<Id>, data: Value, params: Params) -> ServiceResult {
        let changes = object(data)?;
        let mut records = self.records.lock();

        if let Some(id) = id {
            let record = records
                .get_mut(&key(&id)?)
                .ok_or_else(|| not_found(&id))?;
            merge(record, &changes);
            return Ok(record.clone());
        }

        let patched = records
            .values_mut()
            .filter(|record| matches(record, &params.query))
            .map(|record| {
                merge(record, &changes);
                record.clone()
            })
            .collect();
        Ok(Value::Array(patched))
    }

    async fn remove(&self, id: Option<Id>, params: Params) -> ServiceResult {
        let mut records = self.records.lock();

        if let Some(id) = id {
            return records
                .shift_remove(&key(&id)?)
                .ok_or_else(|| not_found(&id));
        }

        let doomed: Vec<u64> = records
            .iter()
            .filter(|(_, record)| matches(record, &params.query))
            .map(|(key, _)| *key)
            .collect();
        let removed = doomed
            .iter()
            .filter_map(|key| records.shift_remove(key))
            .collect();
        Ok(Value::Array(removed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn crud_round_trip() {
        let store = MemoryService::new();

        let created = store
            .create(json!({ "text": "a", "done": false }), Params::default())
            .await
            .unwrap();
        assert_eq!(created, json!({ "text": "a", "done": false, "id": 0 }));

        let fetched = store.get(Id::from(0u64), Params::default()).await.unwrap();
        assert_eq!(fetched, created);

        let updated = store
            .update(Id::from("0"), json!({ "text": "b" }), Params::default())
            .await
            .unwrap();
        assert_eq!(updated, json!({ "text": "b", "id": 0 }));

        let patched = store
            .patch(Some(Id::from(0u64)), json!({ "done": true, "id": 9 }), Params::default())
            .await
            .unwrap();
        assert_eq!(patched, json!({ "text": "b", "id": 0, "done": true }));

        let removed = store.remove(Some(Id::from(0u64)), Params::default()).await.unwrap();
        assert_eq!(removed, patched);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn query_filters_multi_record_operations() {
        let store = MemoryService::new();
        for (text, done) in [("a", true), ("b", false), ("c", true)] {
            store
                .create(json!({ "text": text, "done": done }), Params::default())
                .await
                .unwrap();
        }

        let done = Params::default().with_query("done", true);
        let found = store.find(done.clone()).await.unwrap();
        assert_eq!(found.as_array().map(Vec::len), Some(2));

        let patched = store
            .patch(None, json!({ "archived": true }), done.clone())
            .await
            .unwrap();
        assert!(
            patched
                .as_array()
                .unwrap()
                .iter()
                .all(|record| record["archived"] == json!(true))
        );

        let removed = store.remove(None, done).await.unwrap();
        assert_eq!(removed.as_array().map(Vec::len), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_records_and_bad_data_fail() {
        let store = MemoryService::new();

        assert_eq!(
            store.get(Id::from(4u64), Params::default()).await,
            Err(ServiceError::not_found("no record found for id '4'"))
        );
        assert!(matches!(
            store.create(json!([1, 2]), Params::default()).await,
            Err(ServiceError::BadRequest(_))
        ));
        assert!(matches!(
            store.remove(Some(Id::from("x")), Params::default()).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
