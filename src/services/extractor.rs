// src/services/extractor.rs

//! Metadata extractor.
//!
//! Turns a raw HTML body into a [`PageMetadata`] record. Pure, no I/O, and
//! tolerant of malformed markup: a missing tag is a normal outcome, not an
//! error. Singular fields take the first match in document order; extracted
//! values are kept verbatim, without trimming, so downstream exact-match
//! grouping sees what the page really serves.

use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{AuditConfig, HreflangLink, PageMetadata};

/// HTML metadata extractor with pre-parsed selectors.
///
/// The `i` flag makes attribute values match case-insensitively, so
/// `<META NAME="Description">` is found as well as the lowercase form.
/// Element and attribute names are already lowercased by the HTML parser.
pub struct MetadataExtractor {
    title: Selector,
    h1: Selector,
    meta_description: Selector,
    robots: Selector,
    og_title: Selector,
    og_description: Selector,
    canonical: Selector,
    hreflang: Selector,
    html: Selector,
    avg_glyph_width_px: u32,
}

impl MetadataExtractor {
    /// Create an extractor using the configured glyph-width heuristic.
    pub fn new(audit: &AuditConfig) -> Result<Self> {
        Ok(Self {
            title: parse_selector("title")?,
            h1: parse_selector("h1")?,
            meta_description: parse_selector(r#"meta[name="description" i]"#)?,
            robots: parse_selector(r#"meta[name="robots" i]"#)?,
            og_title: parse_selector(r#"meta[property="og:title" i]"#)?,
            og_description: parse_selector(r#"meta[property="og:description" i]"#)?,
            canonical: parse_selector(r#"link[rel="canonical" i]"#)?,
            hreflang: parse_selector(r#"link[rel="alternate" i][hreflang]"#)?,
            html: parse_selector("html")?,
            avg_glyph_width_px: audit.avg_glyph_width_px,
        })
    }

    /// Extract metadata from a fetched page body.
    pub fn extract(
        &self,
        body: &str,
        final_url: &Url,
        http_status: u16,
        x_robots_tag: Option<String>,
    ) -> PageMetadata {
        let document = Html::parse_document(body);

        let title = first_text(&document, &self.title);
        let meta_description = first_attr(&document, &self.meta_description, "content");

        let title_pixel_width = title
            .as_deref()
            .map(|t| t.chars().count() as u32 * self.avg_glyph_width_px);
        let description_char_count = meta_description.as_deref().map(|d| d.chars().count());

        let hreflang = document
            .select(&self.hreflang)
            .filter_map(|el| {
                // Both attributes are required; a tag missing either is
                // silently skipped.
                let lang = el.value().attr("hreflang")?;
                let href = el.value().attr("href")?;
                Some(HreflangLink {
                    lang: lang.to_string(),
                    href: href.to_string(),
                })
            })
            .collect();

        let detected_language = document
            .select(&self.html)
            .next()
            .and_then(|el| el.value().attr("lang"))
            .map(str::to_string);

        PageMetadata {
            url: final_url.to_string(),
            http_status,
            title,
            meta_description,
            h1: first_text(&document, &self.h1),
            canonical_url: first_attr(&document, &self.canonical, "href"),
            robots_meta: first_attr(&document, &self.robots, "content"),
            x_robots_tag,
            og_title: first_attr(&document, &self.og_title, "content"),
            og_description: first_attr(&document, &self.og_description, "content"),
            hreflang,
            detected_language,
            title_pixel_width,
            description_char_count,
        }
    }
}

/// Text content of the first matching element, verbatim.
fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Attribute value of the first matching element. An element without the
/// attribute leaves the field absent.
fn first_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
