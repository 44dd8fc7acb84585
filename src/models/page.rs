// src/models/page.rs

//! Page-level domain models: locales, extracted metadata, fetch failures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Locale variant of an audited page.
///
/// The catalogue is bilingual: every slug exists under the English path
/// (`/tools/{slug}`) and the Russian path (`/ru/tools/{slug}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ru,
}

impl Locale {
    /// All locales, in report order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ru];

    /// Two-letter language code.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    /// URL path for a slug in this locale.
    pub fn page_path(&self, slug: &str) -> String {
        match self {
            Locale::En => format!("/tools/{slug}"),
            Locale::Ru => format!("/ru/tools/{slug}"),
        }
    }

    /// Infer the locale from a URL path, if the path belongs to the
    /// tool-page namespace at all.
    pub fn from_path(path: &str) -> Option<Locale> {
        if path.starts_with("/ru/tools/") {
            Some(Locale::Ru)
        } else if path.starts_with("/tools/") {
            Some(Locale::En)
        } else {
            None
        }
    }

    /// The other locale of the pair.
    pub fn opposite(&self) -> Locale {
        match self {
            Locale::En => Locale::Ru,
            Locale::Ru => Locale::En,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One `<link rel="alternate" hreflang=...>` entry, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HreflangLink {
    pub lang: String,
    pub href: String,
}

/// Raw metadata extracted from one fetched page.
///
/// Every string field is optional: absence means the tag/attribute was not
/// found, which is distinct from a tag carrying an empty value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status of the final response
    pub http_status: u16,

    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1: Option<String>,
    pub canonical_url: Option<String>,
    pub robots_meta: Option<String>,

    /// `X-Robots-Tag` response header, verbatim
    pub x_robots_tag: Option<String>,

    pub og_title: Option<String>,
    pub og_description: Option<String>,

    /// All hreflang alternate links, in document order
    #[serde(default)]
    pub hreflang: Vec<HreflangLink>,

    /// `lang` attribute of the `<html>` element
    pub detected_language: Option<String>,

    /// Approximated as character count x average glyph width, not a text
    /// shaping measurement; present only when a title was extracted
    pub title_pixel_width: Option<u32>,

    /// Present only when a description was extracted
    pub description_char_count: Option<usize>,
}

impl PageMetadata {
    /// A page is indexable when it returned 200 and its robots meta does
    /// not carry a noindex directive. The `X-Robots-Tag` header is reported
    /// but does not gate indexability.
    pub fn is_indexable(&self) -> bool {
        let noindex = self
            .robots_meta
            .as_deref()
            .is_some_and(|robots| robots.to_lowercase().contains("noindex"));
        self.http_status == 200 && !noindex
    }
}

/// Why a fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    Timeout,
    Network,
    RedirectLoop,
}

impl FetchErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::Network => "network",
            FetchErrorKind::RedirectLoop => "redirect_loop",
        }
    }
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed page, recorded in the corpus instead of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchFailure {
    pub url: String,
    pub locale: Locale,
    pub slug: String,
    pub kind: FetchErrorKind,
    pub error: String,
}
