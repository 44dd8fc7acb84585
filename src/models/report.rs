// src/models/report.rs

//! Report-side models: duplicate groups, the issue catalog, and summary
//! metrics.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::page::Locale;
use crate::models::rules::Rule;

/// Metadata field subject to duplicate grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataField {
    Title,
    Description,
}

impl MetadataField {
    /// Fields checked for duplicates, in report order.
    pub const DEDUPED: [MetadataField; 2] = [MetadataField::Title, MetadataField::Description];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataField::Title => "title",
            MetadataField::Description => "description",
        }
    }

    /// The duplicate rule resolved from groups of this field.
    pub fn duplicate_rule(&self) -> Rule {
        match self {
            MetadataField::Title => Rule::TitleNoDuplicates,
            MetadataField::Description => Rule::DescriptionNoDuplicates,
        }
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pages within one locale sharing an identical field value.
///
/// The value is the post-override one and the grouping key is the exact
/// string: no trimming or case folding, so near-duplicates stay apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub field: MetadataField,
    pub value: String,
    pub count: usize,
    pub urls: Vec<String>,
}

/// One actionable finding in the issue catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Ordinal assigned at generation time; not stable across runs
    pub issue_id: u32,

    pub rule: Rule,

    /// Example of the offending value, when the failure is not absence
    pub evidence_example: Option<String>,

    pub affected_urls_count: usize,

    /// First affected URLs in encounter order, capped
    pub sample_urls: Vec<String>,
}

/// Issue list persisted as `issue-catalog.json`.
///
/// Serializes transparently, so the JSON root is the bare array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueCatalog {
    pub issues: Vec<Issue>,
}

impl IssueCatalog {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Aggregates for one locale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocaleSummary {
    pub total_pages: usize,

    /// Integer pass-rate percentage per rule
    pub pass_rates: BTreeMap<Rule, u32>,

    /// Pages carrying a duplicated title (sum of group counts)
    pub duplicate_titles: usize,

    /// Pages carrying a duplicated description (sum of group counts)
    pub duplicate_descriptions: usize,

    /// Pages failing either canonical rule
    pub canonical_errors: usize,

    /// Pages whose hreflang set does not cover both locales
    pub hreflang_errors: usize,
}

/// Locale-keyed aggregates, persisted as `summary-metrics.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub locales: BTreeMap<Locale, LocaleSummary>,

    /// Fetch failures across the whole run
    pub fetch_error_count: usize,
}
