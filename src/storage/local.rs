// src/storage/local.rs

//! Local filesystem storage implementation.
//!
//! All writes go through a temp-file-then-rename step so an interrupted
//! run never leaves a truncated artifact behind. Reads of missing files
//! return `None` rather than an error.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{CorpusResult, Locale, PageAuditRecord};
use crate::report::ReportArtifacts;
use crate::storage::ReportStore;

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalReportStore {
    root_dir: PathBuf,
}

impl LocalReportStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn table_key(locale: Locale) -> String {
        format!("audit-{locale}.csv")
    }

    fn results_key(locale: Locale) -> String {
        format!("results-{locale}.json")
    }
}

#[async_trait]
impl ReportStore for LocalReportStore {
    async fn write_artifacts(
        &self,
        artifacts: &ReportArtifacts,
        corpus: &CorpusResult,
    ) -> Result<()> {
        for (locale, table) in &artifacts.csv {
            self.write_bytes(&Self::table_key(*locale), table.as_bytes())
                .await?;
        }

        self.write_json("issue-catalog.json", &artifacts.issues)
            .await?;
        self.write_json("summary-metrics.json", &artifacts.summary)
            .await?;

        for (locale, records) in &corpus.records {
            self.write_json(&Self::results_key(*locale), records)
                .await?;
        }
        self.write_json("fetch-errors.json", &corpus.fetch_errors)
            .await?;

        log::info!(
            "Wrote {} locale tables and {} issues to {}",
            artifacts.csv.len(),
            artifacts.issues.len(),
            self.root_dir.display()
        );
        Ok(())
    }

    async fn load_corpus(&self) -> Result<Option<CorpusResult>> {
        let mut corpus = CorpusResult::new();
        let mut found = false;

        for locale in Locale::ALL {
            let records: Option<Vec<PageAuditRecord>> =
                self.read_json(&Self::results_key(locale)).await?;
            if let Some(records) = records {
                corpus.records.insert(locale, records);
                found = true;
            }
        }
        if !found {
            log::warn!("No stored results under {}", self.root_dir.display());
            return Ok(None);
        }

        if let Some(errors) = self.read_json("fetch-errors.json").await? {
            corpus.fetch_errors = errors;
        }
        Ok(Some(corpus))
    }
}
