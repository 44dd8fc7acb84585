// src/report/csv.rs

//! Per-locale CSV export.
//!
//! One row per audited page: page fields, then the registry override
//! columns, then one column per rule. Every cell is quoted regardless of
//! content so spreadsheet imports never re-type or split values.

use csv::{QuoteStyle, WriterBuilder};

use crate::error::{AppError, Result};
use crate::models::{PageAuditRecord, PageMetadata, Registry, Rule, RuleStatus};

/// Metadata columns preceding the per-rule columns.
const PAGE_COLUMNS: [&str; 19] = [
    "url",
    "status",
    "title",
    "title_pixel_width",
    "description",
    "description_char_count",
    "h1",
    "canonical",
    "robots_meta",
    "x_robots_tag",
    "og_title",
    "og_description",
    "hreflang",
    "detected_language",
    "indexable",
    "registry_title",
    "registry_description",
    "registry_og_title",
    "registry_og_description",
];

/// Render one locale's records as a CSV document.
pub fn locale_table(records: &[PageAuditRecord], registry: &Registry) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    let mut header: Vec<&str> = PAGE_COLUMNS.to_vec();
    header.extend(Rule::ALL.iter().map(Rule::name));
    writer.write_record(&header)?;

    for record in records {
        writer.write_record(row(record, registry))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::audit("csv export", e))?;
    String::from_utf8(bytes).map_err(|e| AppError::audit("csv export", e))
}

fn row(record: &PageAuditRecord, registry: &Registry) -> Vec<String> {
    let meta = &record.metadata;
    let entry = registry.lookup(&meta.url);

    let mut cells = vec![
        meta.url.clone(),
        meta.http_status.to_string(),
        text_cell(meta.title.as_deref()),
        count_cell(meta.title_pixel_width.map(u64::from)),
        text_cell(meta.meta_description.as_deref()),
        count_cell(meta.description_char_count.map(|c| c as u64)),
        text_cell(meta.h1.as_deref()),
        text_cell(meta.canonical_url.as_deref()),
        text_cell(meta.robots_meta.as_deref()),
        text_cell(meta.x_robots_tag.as_deref()),
        text_cell(meta.og_title.as_deref()),
        text_cell(meta.og_description.as_deref()),
        join_hreflang(meta),
        text_cell(meta.detected_language.as_deref()),
        record.indexable.to_string(),
        text_cell(entry.and_then(|e| e.title.as_deref())),
        text_cell(entry.and_then(|e| e.description.as_deref())),
        text_cell(entry.and_then(|e| e.og_title.as_deref())),
        text_cell(entry.and_then(|e| e.og_description.as_deref())),
    ];
    cells.extend(
        Rule::ALL
            .iter()
            .map(|rule| status_cell(record.rules.get(rule)).to_string()),
    );
    cells
}

/// Absent values render as the empty string, exactly as extracted values
/// render verbatim. The distinction survives only in the JSON results.
fn text_cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn count_cell(value: Option<u64>) -> String {
    value.map_or_else(String::new, |v| v.to_string())
}

/// `lang:href` pairs separated by `;`, in document order.
fn join_hreflang(meta: &PageMetadata) -> String {
    meta.hreflang
        .iter()
        .map(|link| format!("{}:{}", link.lang, link.href))
        .collect::<Vec<_>>()
        .join(";")
}

/// Analysis resolves `Pending` before export; one that survives renders as
/// PASS, matching a rule that was never contradicted. A rule missing from
/// the map entirely renders as `N/A`.
fn status_cell(status: Option<&RuleStatus>) -> &'static str {
    match status {
        None => "N/A",
        Some(RuleStatus::Fail) => "FAIL",
        Some(RuleStatus::Pass | RuleStatus::Pending) => "PASS",
    }
}
