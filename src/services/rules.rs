// src/services/rules.rs

//! Per-page rule evaluator.
//!
//! Every rule is a pure function over one page's metadata plus the shared
//! [`RuleContext`]. The registry below fixes the evaluation order. A rule
//! that lacks the data it needs fails; there is no not-applicable outcome
//! at this level. The two duplicate rules need the whole corpus, so they
//! come back `Pending` and are resolved by the corpus analyzer.

use url::Url;

use crate::models::{AuditConfig, Locale, PageMetadata, Rule, RuleResult, RuleStatus};
use crate::utils::lang::{Script, dominant_script};
use crate::utils::url::{resolve_href, same_document};

/// Shared inputs for rule evaluation.
pub struct RuleContext<'a> {
    /// Thresholds and word lists
    pub audit: &'a AuditConfig,

    /// Locale the page was enqueued under
    pub locale: Locale,

    /// The page's own URL (final, post-redirect); the URL a correct
    /// canonical must resolve to
    pub page_url: &'a Url,
}

type RuleFn = fn(&PageMetadata, &RuleContext) -> RuleStatus;

/// The rule registry, in evaluation order.
static RULES: [(Rule, RuleFn); 14] = [
    (Rule::TitleLength, title_length),
    (Rule::TitleContainsToolConcept, title_contains_tool_concept),
    (Rule::TitleBrandConsistent, title_brand_consistent),
    (Rule::TitleNoTruncation, title_no_truncation),
    (Rule::DescriptionLength, description_length),
    (Rule::DescriptionSpecific, description_specific),
    (Rule::CanonicalSelfReferential, canonical_self_referential),
    (Rule::CanonicalNotCrossLanguage, canonical_not_cross_language),
    (Rule::NoindexAbsent, noindex_absent),
    (Rule::OgTitlePresent, og_title_present),
    (Rule::OgDescriptionPresent, og_description_present),
    (Rule::TitleNoDuplicates, pending_duplicate),
    (Rule::DescriptionNoDuplicates, pending_duplicate),
    (
        Rule::DescriptionNoLanguageMismatch,
        description_no_language_mismatch,
    ),
];

/// Evaluate all rules for one page.
pub fn evaluate(metadata: &PageMetadata, ctx: &RuleContext) -> RuleResult {
    RULES
        .iter()
        .map(|(rule, eval)| (*rule, eval(metadata, ctx)))
        .collect()
}

fn title_length(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    let Some(title) = meta.title.as_deref() else {
        return RuleStatus::Fail;
    };
    let chars = title.chars().count();
    let within_chars = chars >= ctx.audit.title_min_chars && chars <= ctx.audit.title_max_chars;
    let within_pixels = meta
        .title_pixel_width
        .is_some_and(|w| w <= ctx.audit.title_max_pixels);
    RuleStatus::from_bool(within_chars || within_pixels)
}

fn title_contains_tool_concept(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    let Some(title) = meta.title.as_deref() else {
        return RuleStatus::Fail;
    };
    let lowered = title.to_lowercase();
    let found = ctx
        .audit
        .tool_keywords
        .iter()
        .any(|keyword| lowered.contains(&keyword.to_lowercase()));
    RuleStatus::from_bool(found)
}

fn title_brand_consistent(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    let Some(title) = meta.title.as_deref() else {
        return RuleStatus::Fail;
    };
    let branded = ctx
        .audit
        .brand_suffixes
        .iter()
        .any(|suffix| title.ends_with(suffix));
    RuleStatus::from_bool(branded)
}

fn title_no_truncation(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    RuleStatus::from_bool(
        meta.title_pixel_width
            .is_some_and(|w| w <= ctx.audit.title_max_pixels),
    )
}

fn description_length(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    let Some(count) = meta.description_char_count else {
        return RuleStatus::Fail;
    };
    RuleStatus::from_bool(
        count >= ctx.audit.description_min_chars && count <= ctx.audit.description_max_chars,
    )
}

fn description_specific(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    let Some(description) = meta.meta_description.as_deref() else {
        return RuleStatus::Fail;
    };
    let lowered = description.to_lowercase();
    let generic = ctx
        .audit
        .generic_phrases
        .iter()
        .any(|phrase| lowered.contains(&phrase.to_lowercase()));
    RuleStatus::from_bool(!generic)
}

fn canonical_self_referential(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    let Some(canonical) = meta.canonical_url.as_deref() else {
        return RuleStatus::Fail;
    };
    let Some(resolved) = resolve_href(ctx.page_url, canonical) else {
        return RuleStatus::Fail;
    };
    RuleStatus::from_bool(same_document(&resolved, ctx.page_url))
}

fn canonical_not_cross_language(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    let Some(canonical) = meta.canonical_url.as_deref() else {
        return RuleStatus::Fail;
    };
    let Some(resolved) = resolve_href(ctx.page_url, canonical) else {
        return RuleStatus::Fail;
    };
    match Locale::from_path(resolved.path()) {
        Some(locale) if locale == ctx.locale.opposite() => RuleStatus::Fail,
        _ => RuleStatus::Pass,
    }
}

fn noindex_absent(meta: &PageMetadata, _ctx: &RuleContext) -> RuleStatus {
    let noindex = meta
        .robots_meta
        .as_deref()
        .is_some_and(|robots| robots.to_lowercase().contains("noindex"));
    RuleStatus::from_bool(!noindex)
}

fn og_title_present(meta: &PageMetadata, _ctx: &RuleContext) -> RuleStatus {
    RuleStatus::from_bool(meta.og_title.as_deref().is_some_and(|v| !v.trim().is_empty()))
}

fn og_description_present(meta: &PageMetadata, _ctx: &RuleContext) -> RuleStatus {
    RuleStatus::from_bool(
        meta.og_description
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty()),
    )
}

/// Duplicate detection needs the frozen corpus; the analyzer fills this in.
fn pending_duplicate(_meta: &PageMetadata, _ctx: &RuleContext) -> RuleStatus {
    RuleStatus::Pending
}

fn description_no_language_mismatch(meta: &PageMetadata, ctx: &RuleContext) -> RuleStatus {
    let Some(title) = meta.title.as_deref() else {
        return RuleStatus::Fail;
    };
    let Some(description) = meta.meta_description.as_deref() else {
        return RuleStatus::Fail;
    };
    let expected = Script::expected_for(ctx.locale);
    RuleStatus::from_bool(
        dominant_script(title) == expected && dominant_script(description) == expected,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_meta(url: &str) -> PageMetadata {
        PageMetadata {
            url: url.to_string(),
            http_status: 200,
            title: None,
            meta_description: None,
            h1: None,
            canonical_url: None,
            robots_meta: None,
            x_robots_tag: None,
            og_title: None,
            og_description: None,
            hreflang: Vec::new(),
            detected_language: None,
            title_pixel_width: None,
            description_char_count: None,
        }
    }

    fn with_title(url: &str, title: &str, glyph: u32) -> PageMetadata {
        let mut meta = base_meta(url);
        meta.title = Some(title.to_string());
        meta.title_pixel_width = Some(title.chars().count() as u32 * glyph);
        meta
    }

    fn with_description(url: &str, description: &str) -> PageMetadata {
        let mut meta = base_meta(url);
        meta.meta_description = Some(description.to_string());
        meta.description_char_count = Some(description.chars().count());
        meta
    }

    struct Fixture {
        audit: AuditConfig,
        page_url: Url,
    }

    impl Fixture {
        fn en() -> Self {
            Self {
                audit: AuditConfig::default(),
                page_url: Url::parse("https://example.com/tools/text-counter").unwrap(),
            }
        }

        fn ru() -> Self {
            Self {
                audit: AuditConfig::default(),
                page_url: Url::parse("https://example.com/ru/tools/text-counter").unwrap(),
            }
        }

        fn ctx(&self, locale: Locale) -> RuleContext<'_> {
            RuleContext {
                audit: &self.audit,
                locale,
                page_url: &self.page_url,
            }
        }
    }

    #[test]
    fn branded_tool_title_passes_the_title_rules() {
        let fx = Fixture::en();
        let title = "Text Counter Online Free Tool | Text Case Converter";
        assert_eq!(title.chars().count(), 51);

        let meta = with_title(&fx.page_url.to_string(), title, 6);
        let rules = evaluate(&meta, &fx.ctx(Locale::En));

        assert_eq!(rules[&Rule::TitleLength], RuleStatus::Pass);
        assert_eq!(rules[&Rule::TitleBrandConsistent], RuleStatus::Pass);
        assert_eq!(rules[&Rule::TitleContainsToolConcept], RuleStatus::Pass);
    }

    #[test]
    fn title_in_char_range_passes_regardless_of_pixels() {
        let fx = Fixture::en();
        let mut meta = with_title(
            &fx.page_url.to_string(),
            "Text Counter Online Free Tool | Text Case Converter",
            6,
        );
        meta.title_pixel_width = Some(10_000);

        let status = title_length(&meta, &fx.ctx(Locale::En));
        assert_eq!(status, RuleStatus::Pass);
    }

    #[test]
    fn short_title_with_small_pixels_still_passes_length() {
        let fx = Fixture::en();
        let meta = with_title(&fx.page_url.to_string(), "Tiny Tool", 6);
        assert_eq!(title_length(&meta, &fx.ctx(Locale::En)), RuleStatus::Pass);
    }

    #[test]
    fn missing_title_fails_every_title_rule() {
        let fx = Fixture::en();
        let meta = base_meta(&fx.page_url.to_string());
        let ctx = fx.ctx(Locale::En);

        assert_eq!(title_length(&meta, &ctx), RuleStatus::Fail);
        assert_eq!(title_contains_tool_concept(&meta, &ctx), RuleStatus::Fail);
        assert_eq!(title_brand_consistent(&meta, &ctx), RuleStatus::Fail);
        assert_eq!(title_no_truncation(&meta, &ctx), RuleStatus::Fail);
    }

    #[test]
    fn wide_title_fails_truncation() {
        let fx = Fixture::en();
        let long = "x".repeat(120);
        let meta = with_title(&fx.page_url.to_string(), &long, 6);
        // 120 chars x 6px = 720px, over the 600px budget.
        assert_eq!(
            title_no_truncation(&meta, &fx.ctx(Locale::En)),
            RuleStatus::Fail
        );
    }

    #[test]
    fn description_length_bounds_are_inclusive() {
        let fx = Fixture::en();
        let ctx = fx.ctx(Locale::En);
        for (len, expected) in [
            (119, RuleStatus::Fail),
            (120, RuleStatus::Pass),
            (160, RuleStatus::Pass),
            (161, RuleStatus::Fail),
        ] {
            let meta = with_description(&fx.page_url.to_string(), &"a".repeat(len));
            assert_eq!(description_length(&meta, &ctx), expected, "len {len}");
        }
    }

    #[test]
    fn generic_phrases_fail_specificity_case_insensitively() {
        let fx = Fixture::en();
        let ctx = fx.ctx(Locale::En);

        let generic = with_description(
            &fx.page_url.to_string(),
            "The Best Free Online Tool for counting words.",
        );
        assert_eq!(description_specific(&generic, &ctx), RuleStatus::Fail);

        let specific = with_description(
            &fx.page_url.to_string(),
            "Count words, characters and sentences as you type.",
        );
        assert_eq!(description_specific(&specific, &ctx), RuleStatus::Pass);
    }

    #[test]
    fn missing_canonical_fails_both_canonical_rules() {
        let fx = Fixture::en();
        let meta = base_meta(&fx.page_url.to_string());
        let ctx = fx.ctx(Locale::En);

        assert_eq!(canonical_self_referential(&meta, &ctx), RuleStatus::Fail);
        assert_eq!(canonical_not_cross_language(&meta, &ctx), RuleStatus::Fail);
    }

    #[test]
    fn self_referential_canonical_passes_absolute_and_relative() {
        let fx = Fixture::en();
        let ctx = fx.ctx(Locale::En);

        let mut meta = base_meta(&fx.page_url.to_string());
        meta.canonical_url = Some("https://example.com/tools/text-counter".into());
        assert_eq!(canonical_self_referential(&meta, &ctx), RuleStatus::Pass);

        meta.canonical_url = Some("/tools/text-counter".into());
        assert_eq!(canonical_self_referential(&meta, &ctx), RuleStatus::Pass);

        meta.canonical_url = Some("https://example.com/tools/other".into());
        assert_eq!(canonical_self_referential(&meta, &ctx), RuleStatus::Fail);
    }

    #[test]
    fn cross_language_canonical_fails() {
        let fx = Fixture::en();
        let mut meta = base_meta(&fx.page_url.to_string());
        meta.canonical_url = Some("https://example.com/ru/tools/text-counter".into());

        assert_eq!(
            canonical_not_cross_language(&meta, &fx.ctx(Locale::En)),
            RuleStatus::Fail
        );

        // Same-language canonical is fine even when not self-referential.
        meta.canonical_url = Some("https://example.com/tools/other".into());
        assert_eq!(
            canonical_not_cross_language(&meta, &fx.ctx(Locale::En)),
            RuleStatus::Pass
        );
    }

    #[test]
    fn ru_canonical_to_en_namespace_fails() {
        let fx = Fixture::ru();
        let mut meta = base_meta(&fx.page_url.to_string());
        meta.canonical_url = Some("https://example.com/tools/text-counter".into());

        assert_eq!(
            canonical_not_cross_language(&meta, &fx.ctx(Locale::Ru)),
            RuleStatus::Fail
        );
    }

    #[test]
    fn noindex_fails_and_clean_robots_passes() {
        let fx = Fixture::en();
        let ctx = fx.ctx(Locale::En);

        let mut meta = base_meta(&fx.page_url.to_string());
        assert_eq!(noindex_absent(&meta, &ctx), RuleStatus::Pass);

        meta.robots_meta = Some("index, follow".into());
        assert_eq!(noindex_absent(&meta, &ctx), RuleStatus::Pass);

        meta.robots_meta = Some("noindex, nofollow".into());
        assert_eq!(noindex_absent(&meta, &ctx), RuleStatus::Fail);

        meta.robots_meta = Some("NOINDEX".into());
        assert_eq!(noindex_absent(&meta, &ctx), RuleStatus::Fail);
    }

    #[test]
    fn og_rules_require_non_blank_values() {
        let fx = Fixture::en();
        let ctx = fx.ctx(Locale::En);
        let mut meta = base_meta(&fx.page_url.to_string());

        assert_eq!(og_title_present(&meta, &ctx), RuleStatus::Fail);

        meta.og_title = Some("   ".into());
        assert_eq!(og_title_present(&meta, &ctx), RuleStatus::Fail);

        meta.og_title = Some("Word Counter".into());
        assert_eq!(og_title_present(&meta, &ctx), RuleStatus::Pass);

        meta.og_description = Some("Count words online.".into());
        assert_eq!(og_description_present(&meta, &ctx), RuleStatus::Pass);
    }

    #[test]
    fn duplicate_rules_are_pending_after_evaluation() {
        let fx = Fixture::en();
        let meta = base_meta(&fx.page_url.to_string());
        let rules = evaluate(&meta, &fx.ctx(Locale::En));

        assert_eq!(rules[&Rule::TitleNoDuplicates], RuleStatus::Pending);
        assert_eq!(rules[&Rule::DescriptionNoDuplicates], RuleStatus::Pending);
    }

    #[test]
    fn language_mismatch_checks_both_title_and_description() {
        let fx = Fixture::ru();
        let ctx = fx.ctx(Locale::Ru);

        let mut meta = base_meta(&fx.page_url.to_string());
        meta.title = Some("Счётчик слов онлайн".into());
        meta.meta_description = Some("Подсчитайте слова и символы мгновенно.".into());
        assert_eq!(
            description_no_language_mismatch(&meta, &ctx),
            RuleStatus::Pass
        );

        // English description on the Russian page.
        meta.meta_description = Some("Count words and characters instantly.".into());
        assert_eq!(
            description_no_language_mismatch(&meta, &ctx),
            RuleStatus::Fail
        );

        meta.meta_description = None;
        assert_eq!(
            description_no_language_mismatch(&meta, &ctx),
            RuleStatus::Fail
        );
    }

    #[test]
    fn evaluate_covers_every_rule_in_order() {
        let fx = Fixture::en();
        let meta = base_meta(&fx.page_url.to_string());
        let rules = evaluate(&meta, &fx.ctx(Locale::En));

        let keys: Vec<Rule> = rules.keys().copied().collect();
        assert_eq!(keys, Rule::ALL.to_vec());
    }
}
