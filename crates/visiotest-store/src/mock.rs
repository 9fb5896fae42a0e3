//! Mock record store.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use visiotest_core::traits::{Collection, Query, Record, RecordId, RecordStore, StoredRecord};

/// A call received by [`MockStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Save {
        collection: Collection,
        data: serde_json::Value,
    },
    Query(Query),
}

/// A stand-in backend: logs every call, always succeeds, and never returns
/// anything from a query.
///
/// Calls are recorded so tests can assert on what the session persisted.
pub struct MockStore {
    /// Number of saves made; suffixes generated ids.
    save_count: AtomicU32,
    /// Every call, in order.
    calls: Mutex<Vec<StoreCall>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            save_count: AtomicU32::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Get the number of saves made to this store.
    pub fn save_count(&self) -> u32 {
        self.save_count.load(Ordering::Relaxed)
    }

    /// Get every call made to this store.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: StoreCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn save(&self, record: &Record) -> anyhow::Result<RecordId> {
        let collection = record.collection();
        let data = record.to_json()?;
        tracing::info!(%collection, %data, "mock store: save");

        let seq = self.save_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.record(StoreCall::Save { collection, data });
        Ok(format!(
            "mock-id-{}-{seq}",
            chrono::Utc::now().timestamp_millis()
        ))
    }

    async fn query(&self, criteria: &Query) -> anyhow::Result<Vec<StoredRecord>> {
        tracing::info!(collection = %criteria.collection, filters = criteria.filters.len(), "mock store: query");
        self.record(StoreCall::Query(criteria.clone()));
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use visiotest_core::model::UserProfile;

    use super::*;

    #[tokio::test]
    async fn save_returns_mock_ids_and_records_calls() {
        let store = MockStore::new();
        let profile = UserProfile {
            name: "Ana".into(),
            age: 45,
            ..Default::default()
        };

        let first = store.save(&Record::Profile(profile.clone())).await.unwrap();
        let second = store.save(&Record::Profile(profile)).await.unwrap();
        assert!(first.starts_with("mock-id-"));
        assert_ne!(first, second);
        assert_eq!(store.save_count(), 2);

        match &store.calls()[0] {
            StoreCall::Save { collection, data } => {
                assert_eq!(*collection, Collection::Users);
                assert_eq!(data["name"], "Ana");
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn query_is_always_empty() {
        let store = MockStore::new();
        store
            .save(&Record::Profile(UserProfile::default()))
            .await
            .unwrap();
        let query = Query::collection(Collection::Users).where_eq("name", "");
        let found = store.query(&query).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(store.calls().last(), Some(&StoreCall::Query(query)));
    }
}
