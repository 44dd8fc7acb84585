// src/pipeline/analyze.rs

//! Corpus analyzer.
//!
//! Runs strictly after the crawl: groups exact duplicate titles and
//! descriptions per locale, resolves the `Pending` duplicate-rule slots
//! (this module is the only writer allowed to), and computes the per-locale
//! summary metrics. Pure data transformation; running it twice on the same
//! corpus yields identical output.

use std::collections::{BTreeMap, HashSet};

use crate::models::{
    CorpusResult, DuplicateGroup, Locale, LocaleSummary, MetadataField, PageAuditRecord, Registry,
    Rule, RuleStatus, SummaryMetrics,
};

/// Corpus plus everything the analyzer derived from it.
#[derive(Debug, Clone)]
pub struct EnrichedCorpus {
    pub corpus: CorpusResult,
    pub duplicates: BTreeMap<Locale, Vec<DuplicateGroup>>,
    pub summary: SummaryMetrics,
}

/// Analyze a frozen corpus.
pub fn analyze(mut corpus: CorpusResult, registry: &Registry) -> EnrichedCorpus {
    let duplicates = collect_duplicates(&corpus, registry);
    resolve_duplicate_rules(&mut corpus, &duplicates);
    let summary = summarize(&corpus, &duplicates);

    let group_count: usize = duplicates.values().map(Vec::len).sum();
    log::info!(
        "Analysis complete: {} pages, {} duplicate groups, {} fetch errors",
        corpus.total_pages(),
        group_count,
        corpus.fetch_errors.len()
    );

    EnrichedCorpus {
        corpus,
        duplicates,
        summary,
    }
}

/// The grouping value for a field: registry override when present, else the
/// raw extracted value. Absent values never group.
fn effective_value<'a>(
    field: MetadataField,
    registry: &'a Registry,
    record: &'a PageAuditRecord,
) -> Option<&'a str> {
    match field {
        MetadataField::Title => {
            registry.effective_title(&record.metadata.url, record.metadata.title.as_deref())
        }
        MetadataField::Description => registry
            .effective_description(&record.metadata.url, record.metadata.meta_description.as_deref()),
    }
}

/// Group records by exact field value within each locale. The grouping key
/// is the exact string; whitespace and case differences keep values apart.
fn collect_duplicates(
    corpus: &CorpusResult,
    registry: &Registry,
) -> BTreeMap<Locale, Vec<DuplicateGroup>> {
    let mut duplicates = BTreeMap::new();

    for (locale, records) in &corpus.records {
        let mut groups = Vec::new();
        for field in MetadataField::DEDUPED {
            let mut by_value: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for record in records {
                if let Some(value) = effective_value(field, registry, record) {
                    by_value
                        .entry(value.to_string())
                        .or_default()
                        .push(record.metadata.url.clone());
                }
            }

            for (value, urls) in by_value {
                if urls.len() > 1 {
                    groups.push(DuplicateGroup {
                        field,
                        value,
                        count: urls.len(),
                        urls,
                    });
                }
            }
        }
        duplicates.insert(*locale, groups);
    }

    duplicates
}

/// Resolve every record's `Pending` duplicate slots: members of a group
/// fail, everyone else passes.
fn resolve_duplicate_rules(
    corpus: &mut CorpusResult,
    duplicates: &BTreeMap<Locale, Vec<DuplicateGroup>>,
) {
    let empty = Vec::new();
    for (locale, records) in corpus.records.iter_mut() {
        let groups = duplicates.get(locale).unwrap_or(&empty);
        for field in MetadataField::DEDUPED {
            let duplicated: HashSet<&str> = groups
                .iter()
                .filter(|group| group.field == field)
                .flat_map(|group| group.urls.iter().map(String::as_str))
                .collect();

            let rule = field.duplicate_rule();
            for record in records.iter_mut() {
                let status =
                    RuleStatus::from_bool(!duplicated.contains(record.metadata.url.as_str()));
                record.rules.insert(rule, status);
            }
        }
    }
}

fn hreflang_covers(record: &PageAuditRecord, locale: Locale) -> bool {
    record.metadata.hreflang.iter().any(|link| {
        let lang = link.lang.to_lowercase();
        lang == locale.code() || lang.starts_with(&format!("{}-", locale.code()))
    })
}

/// A correct catalogue page advertises both locale variants.
fn has_hreflang_error(record: &PageAuditRecord) -> bool {
    Locale::ALL
        .iter()
        .any(|locale| !hreflang_covers(record, *locale))
}

fn summarize(
    corpus: &CorpusResult,
    duplicates: &BTreeMap<Locale, Vec<DuplicateGroup>>,
) -> SummaryMetrics {
    let empty = Vec::new();
    let mut summary = SummaryMetrics {
        fetch_error_count: corpus.fetch_errors.len(),
        ..SummaryMetrics::default()
    };

    for (locale, records) in &corpus.records {
        let mut locale_summary = LocaleSummary {
            total_pages: records.len(),
            ..LocaleSummary::default()
        };

        for rule in Rule::ALL {
            let evaluated = records
                .iter()
                .filter(|record| record.rules.contains_key(&rule))
                .count();
            let passed = records
                .iter()
                .filter(|record| record.rules.get(&rule).is_some_and(RuleStatus::is_pass))
                .count();
            let rate = if evaluated == 0 {
                0
            } else {
                (passed as f64 / evaluated as f64 * 100.0).round() as u32
            };
            locale_summary.pass_rates.insert(rule, rate);
        }

        let groups = duplicates.get(locale).unwrap_or(&empty);
        locale_summary.duplicate_titles = groups
            .iter()
            .filter(|group| group.field == MetadataField::Title)
            .map(|group| group.count)
            .sum();
        locale_summary.duplicate_descriptions = groups
            .iter()
            .filter(|group| group.field == MetadataField::Description)
            .map(|group| group.count)
            .sum();

        locale_summary.canonical_errors = records
            .iter()
            .filter(|record| {
                record.failed(Rule::CanonicalSelfReferential)
                    || record.failed(Rule::CanonicalNotCrossLanguage)
            })
            .count();
        locale_summary.hreflang_errors = records.iter().filter(|r| has_hreflang_error(r)).count();

        summary.locales.insert(*locale, locale_summary);
    }

    summary
}
