// src/models/rules.rs

//! Rule identifiers, rule outcomes, and the audit record types built from
//! them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::page::{FetchFailure, Locale, PageMetadata};

/// The fixed, ordered set of audit rules.
///
/// Declaration order is evaluation and report order; `Ord` relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    TitleLength,
    TitleContainsToolConcept,
    TitleBrandConsistent,
    TitleNoTruncation,
    DescriptionLength,
    DescriptionSpecific,
    CanonicalSelfReferential,
    CanonicalNotCrossLanguage,
    NoindexAbsent,
    OgTitlePresent,
    OgDescriptionPresent,
    TitleNoDuplicates,
    DescriptionNoDuplicates,
    DescriptionNoLanguageMismatch,
}

impl Rule {
    /// All rules in evaluation order.
    pub const ALL: [Rule; 14] = [
        Rule::TitleLength,
        Rule::TitleContainsToolConcept,
        Rule::TitleBrandConsistent,
        Rule::TitleNoTruncation,
        Rule::DescriptionLength,
        Rule::DescriptionSpecific,
        Rule::CanonicalSelfReferential,
        Rule::CanonicalNotCrossLanguage,
        Rule::NoindexAbsent,
        Rule::OgTitlePresent,
        Rule::OgDescriptionPresent,
        Rule::TitleNoDuplicates,
        Rule::DescriptionNoDuplicates,
        Rule::DescriptionNoLanguageMismatch,
    ];

    /// Stable snake_case name, used as CSV column header and JSON key.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::TitleLength => "title_length",
            Rule::TitleContainsToolConcept => "title_contains_tool_concept",
            Rule::TitleBrandConsistent => "title_brand_consistent",
            Rule::TitleNoTruncation => "title_no_truncation",
            Rule::DescriptionLength => "description_length",
            Rule::DescriptionSpecific => "description_specific",
            Rule::CanonicalSelfReferential => "canonical_self_referential",
            Rule::CanonicalNotCrossLanguage => "canonical_not_cross_language",
            Rule::NoindexAbsent => "noindex_absent",
            Rule::OgTitlePresent => "og_title_present",
            Rule::OgDescriptionPresent => "og_description_present",
            Rule::TitleNoDuplicates => "title_no_duplicates",
            Rule::DescriptionNoDuplicates => "description_no_duplicates",
            Rule::DescriptionNoLanguageMismatch => "description_no_language_mismatch",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one rule for one page.
///
/// The duplicate rules cannot be decided from a single page, so the
/// evaluator leaves them `Pending`; the corpus analyzer is the only writer
/// that resolves `Pending` to `Pass`/`Fail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Pending,
    Pass,
    Fail,
}

impl RuleStatus {
    pub fn from_bool(pass: bool) -> Self {
        if pass { RuleStatus::Pass } else { RuleStatus::Fail }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, RuleStatus::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, RuleStatus::Fail)
    }
}

/// Ordered rule-name to outcome map for one page.
pub type RuleResult = BTreeMap<Rule, RuleStatus>;

/// Everything the audit knows about one (slug, locale) page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageAuditRecord {
    pub locale: Locale,
    pub slug: String,
    pub metadata: PageMetadata,
    pub rules: RuleResult,

    /// 200 status and no noindex directive
    pub indexable: bool,
}

impl PageAuditRecord {
    /// Whether the given rule failed for this page. Absent rules do not
    /// count as failures.
    pub fn failed(&self, rule: Rule) -> bool {
        self.rules.get(&rule).is_some_and(RuleStatus::is_fail)
    }
}

/// Full result set of one audit run, frozen before analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusResult {
    /// Audit records grouped by locale, in fetch order
    pub records: BTreeMap<Locale, Vec<PageAuditRecord>>,

    /// Pages that produced no record
    #[serde(default)]
    pub fetch_errors: Vec<FetchFailure>,
}

impl Default for CorpusResult {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusResult {
    /// An empty corpus with every locale present, so report artifacts are
    /// produced for a locale even when all of its fetches failed.
    pub fn new() -> Self {
        let mut records = BTreeMap::new();
        for locale in Locale::ALL {
            records.insert(locale, Vec::new());
        }
        Self {
            records,
            fetch_errors: Vec::new(),
        }
    }

    /// Records for one locale, empty when none were collected.
    pub fn records_for(&self, locale: Locale) -> &[PageAuditRecord] {
        self.records.get(&locale).map_or(&[], Vec::as_slice)
    }

    /// Number of successfully audited pages across all locales.
    pub fn total_pages(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_is_declaration_order() {
        let mut sorted = Rule::ALL;
        sorted.sort();
        assert_eq!(sorted, Rule::ALL);
        assert_eq!(Rule::ALL.len(), 14);
    }

    #[test]
    fn rule_names_serialize_as_snake_case() {
        let json = serde_json::to_string(&Rule::TitleContainsToolConcept).unwrap();
        assert_eq!(json, "\"title_contains_tool_concept\"");
        assert_eq!(Rule::TitleLength.name(), "title_length");
    }

    #[test]
    fn rule_result_map_keeps_rule_order() {
        let mut rules = RuleResult::new();
        rules.insert(Rule::NoindexAbsent, RuleStatus::Pass);
        rules.insert(Rule::TitleLength, RuleStatus::Fail);
        let keys: Vec<Rule> = rules.keys().copied().collect();
        assert_eq!(keys, vec![Rule::TitleLength, Rule::NoindexAbsent]);
    }

    #[test]
    fn new_corpus_has_all_locales() {
        let corpus = CorpusResult::new();
        assert_eq!(corpus.records.len(), Locale::ALL.len());
        assert!(corpus.records_for(Locale::Ru).is_empty());
        assert_eq!(corpus.total_pages(), 0);
    }

    #[test]
    fn default_corpus_matches_new() {
        let corpus = CorpusResult::default();
        assert_eq!(corpus.records.len(), Locale::ALL.len());
        assert!(corpus.fetch_errors.is_empty());
    }
}
