// src/report/mod.rs

//! Report generation.
//!
//! Turns an analyzed corpus into the derived artifacts: one CSV table per
//! locale, the issue catalog, and the summary metrics wrapper. Everything
//! here is pure; persistence lives behind the storage trait.

pub mod csv;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{
    CorpusResult, DuplicateGroup, Issue, IssueCatalog, Locale, PageAuditRecord, Registry, Rule,
    SummaryMetrics,
};
use crate::pipeline::EnrichedCorpus;

/// Cap on example URLs carried by one issue.
const SAMPLE_URL_CAP: usize = 10;

/// Everything the report stage produces for one run.
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    /// Rendered CSV document per locale
    pub csv: BTreeMap<Locale, String>,
    pub issues: IssueCatalog,
    pub summary: SummaryMetrics,
}

/// Build every derived artifact from an analyzed corpus.
pub fn generate(enriched: &EnrichedCorpus, registry: &Registry) -> Result<ReportArtifacts> {
    let mut tables = BTreeMap::new();
    for locale in Locale::ALL {
        let table = csv::locale_table(enriched.corpus.records_for(locale), registry)?;
        tables.insert(locale, table);
    }

    let issues = issue_catalog(&enriched.corpus, &enriched.duplicates);
    log::info!(
        "Report generated: {} locale tables, {} issues",
        tables.len(),
        issues.len()
    );

    Ok(ReportArtifacts {
        csv: tables,
        issues,
        summary: enriched.summary.clone(),
    })
}

/// Assemble the issue catalog with sequential ids.
///
/// The per-rule scan covers the English corpus; Russian pages surface
/// through their CSV table and through the duplicate-group entries, which
/// cover every locale.
fn issue_catalog(
    corpus: &CorpusResult,
    duplicates: &BTreeMap<Locale, Vec<DuplicateGroup>>,
) -> IssueCatalog {
    let mut issues = Vec::new();
    let mut next_id = 1u32;

    let english = corpus.records_for(Locale::En);
    for rule in Rule::ALL {
        let failing: Vec<&PageAuditRecord> =
            english.iter().filter(|record| record.failed(rule)).collect();
        if failing.is_empty() {
            continue;
        }

        let evidence = failing.iter().find_map(|record| evidence_for(rule, record));
        issues.push(Issue {
            issue_id: next_id,
            rule,
            evidence_example: evidence,
            affected_urls_count: failing.len(),
            sample_urls: failing
                .iter()
                .take(SAMPLE_URL_CAP)
                .map(|record| record.metadata.url.clone())
                .collect(),
        });
        next_id += 1;
    }

    for groups in duplicates.values() {
        for group in groups {
            issues.push(Issue {
                issue_id: next_id,
                rule: group.field.duplicate_rule(),
                evidence_example: Some(group.value.clone()),
                affected_urls_count: group.count,
                sample_urls: group.urls.iter().take(SAMPLE_URL_CAP).cloned().collect(),
            });
            next_id += 1;
        }
    }

    IssueCatalog::new(issues)
}

/// The offending value behind a failure. `None` when the failure is the
/// field being absent.
fn evidence_for(rule: Rule, record: &PageAuditRecord) -> Option<String> {
    let meta = &record.metadata;
    let field = match rule {
        Rule::TitleLength
        | Rule::TitleContainsToolConcept
        | Rule::TitleBrandConsistent
        | Rule::TitleNoTruncation
        | Rule::TitleNoDuplicates => &meta.title,
        Rule::DescriptionLength
        | Rule::DescriptionSpecific
        | Rule::DescriptionNoDuplicates
        | Rule::DescriptionNoLanguageMismatch => &meta.meta_description,
        Rule::CanonicalSelfReferential | Rule::CanonicalNotCrossLanguage => &meta.canonical_url,
        Rule::NoindexAbsent => &meta.robots_meta,
        Rule::OgTitlePresent => &meta.og_title,
        Rule::OgDescriptionPresent => &meta.og_description,
    };
    field.clone()
}
