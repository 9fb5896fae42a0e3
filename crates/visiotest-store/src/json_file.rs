//! JSON-lines file store.
//!
//! One file per collection (`users.jsonl`, `testResults.jsonl`) under a
//! directory; each line is a [`StoredRecord`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use visiotest_core::traits::{Collection, Query, Record, RecordId, RecordStore, StoredRecord};

use crate::error::StoreError;

/// Durable local store that appends records to JSON-lines files.
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes appends so lines never interleave.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create store directory {}", dir.display()))?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.jsonl", collection.as_str()))
    }

    async fn read_collection(&self, collection: Collection) -> Result<Vec<StoredRecord>, StoreError> {
        let path = self.collection_path(collection);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<StoredRecord>(line).map_err(|source| {
                    StoreError::CorruptRecord {
                        path: path.clone(),
                        line: index + 1,
                        source,
                    }
                })
            })
            .collect()
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    async fn save(&self, record: &Record) -> Result<RecordId> {
        let stored = StoredRecord {
            id: Uuid::new_v4().to_string(),
            collection: record.collection(),
            data: record.to_json().map_err(StoreError::from)?,
        };
        let mut line = serde_json::to_string(&stored).map_err(StoreError::from)?;
        line.push('\n');

        let path = self.collection_path(stored.collection);
        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
        file.flush().await.map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(collection = %stored.collection, id = %stored.id, "record saved");
        Ok(stored.id)
    }

    async fn query(&self, criteria: &Query) -> Result<Vec<StoredRecord>> {
        let records = self.read_collection(criteria.collection).await?;
        Ok(records.into_iter().filter(|r| criteria.matches(r)).collect())
    }
}
