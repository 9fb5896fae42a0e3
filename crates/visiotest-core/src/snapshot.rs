//! Session report snapshots with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{TestResult, TestType, UserProfile};

/// A registered profile together with the results it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,
    pub profile: UserProfile,
    /// Results in completion order.
    pub results: Vec<TestResult>,
}

impl SessionReport {
    pub fn new(profile: UserProfile, results: Vec<TestResult>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            profile,
            results,
        }
    }

    pub fn result_for(&self, test_type: TestType) -> Option<&TestResult> {
        self.results.iter().find(|r| r.test_type == test_type)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
