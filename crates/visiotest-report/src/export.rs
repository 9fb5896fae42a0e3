//! Downloadable export document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use visiotest_core::model::{TestResult, TestType, UserProfile};

use crate::analysis::SCORE_SCALE;

/// Structured snapshot of a session, keyed in Portuguese.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub usuario: String,
    pub idade: u32,
    /// Export date, `dd/mm/yyyy`.
    pub data: String,
    pub resultados: Vec<ExportedResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedResult {
    pub teste: TestType,
    /// `"7/10"`.
    pub pontuacao: String,
    pub nivel: u32,
    /// Whole seconds, `"12s"`.
    pub duracao: String,
}

impl ExportDocument {
    pub fn new(profile: &UserProfile, results: &[TestResult], date: NaiveDate) -> Self {
        Self {
            usuario: profile.name.clone(),
            idade: profile.age,
            data: date.format("%d/%m/%Y").to_string(),
            resultados: results
                .iter()
                .map(|r| ExportedResult {
                    teste: r.test_type,
                    pontuacao: format!("{}/{SCORE_SCALE}", r.score),
                    nivel: r.level,
                    duracao: format!("{}s", duration_seconds(r.duration)),
                })
                .collect(),
        }
    }

    /// Write the document as pretty JSON into `dir`, named by
    /// [`export_file_name`]. Returns the written path.
    pub fn write_to_dir(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(self).context("failed to serialize export")?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        Ok(path)
    }
}

/// Milliseconds to whole seconds, rounding half up.
pub fn duration_seconds(duration_ms: u64) -> u64 {
    (duration_ms + 500) / 1000
}

/// `visiotest-<name>-<YYYY-MM-DD>.json`, with runs of whitespace in the
/// name collapsed to a single `-`.
pub fn export_file_name(profile: &UserProfile, date: NaiveDate) -> String {
    let name = profile.name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("visiotest-{name}-{}.json", date.format("%Y-%m-%d"))
}
