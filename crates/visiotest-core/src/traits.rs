//! Persistence collaborator trait and the records it accepts.
//!
//! The session never depends on persistence succeeding: it only needs an
//! identifier back from `save`. Implementations live in `visiotest-store`.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{TestResult, UserProfile};

/// Identifier assigned by a store to a saved record.
pub type RecordId = String;

/// Trait for backends that keep profiles and test results.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Human-readable store name (e.g. "mock").
    fn name(&self) -> &str;

    /// Persist a record and return its identifier.
    async fn save(&self, record: &Record) -> anyhow::Result<RecordId>;

    /// Fetch the records matching `criteria`.
    async fn query(&self, criteria: &Query) -> anyhow::Result<Vec<StoredRecord>>;
}

/// Named groups of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    #[serde(rename = "users")]
    Users,
    #[serde(rename = "testResults")]
    TestResults,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::TestResults => "testResults",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record handed to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum Record {
    Profile(UserProfile),
    TestResult(TestResult),
}

impl Record {
    pub fn collection(&self) -> Collection {
        match self {
            Record::Profile(_) => Collection::Users,
            Record::TestResult(_) => Collection::TestResults,
        }
    }

    /// The record's fields as a JSON object.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Record::Profile(profile) => serde_json::to_value(profile),
            Record::TestResult(result) => serde_json::to_value(result),
        }
    }
}

/// A record as returned by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: RecordId,
    pub collection: Collection,
    pub data: serde_json::Value,
}

/// Equality condition on a top-level field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub value: serde_json::Value,
}

/// Query criteria: a collection plus equality filters, all of which must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub collection: Collection,
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
}

impl Query {
    pub fn collection(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
        }
    }

    /// Add an equality filter on a top-level field.
    pub fn where_eq(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.filters.push(FieldFilter {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Whether a stored record satisfies these criteria.
    pub fn matches(&self, record: &StoredRecord) -> bool {
        record.collection == self.collection
            && self
                .filters
                .iter()
                .all(|f| record.data.get(&f.field) == Some(&f.value))
    }
}
