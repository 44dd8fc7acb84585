// src/storage/mod.rs

//! Storage abstractions for report artifacts.
//!
//! ## Directory Structure
//!
//! ```text
//! reports/
//! ├── audit-en.csv          # Per-locale audit tables
//! ├── audit-ru.csv
//! ├── issue-catalog.json    # Actionable findings with sequential ids
//! ├── summary-metrics.json  # Per-locale aggregates
//! ├── results-en.json       # Raw audit records, input for `report` runs
//! ├── results-ru.json
//! └── fetch-errors.json     # Pages that produced no record
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CorpusResult;
use crate::report::ReportArtifacts;

// Re-export for convenience
pub use local::LocalReportStore;

/// Trait for report storage backends.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist every artifact of a finished run: the locale CSV tables,
    /// the issue catalog, the summary metrics, and the raw results that
    /// `report` runs rebuild from.
    async fn write_artifacts(
        &self,
        artifacts: &ReportArtifacts,
        corpus: &CorpusResult,
    ) -> Result<()>;

    /// Load raw results persisted by an earlier audit, or `None` when no
    /// run has been stored yet.
    async fn load_corpus(&self) -> Result<Option<CorpusResult>>;
}
