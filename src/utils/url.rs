// src/utils/url.rs

//! URL helpers for the bilingual page catalogue.

use url::Url;

use crate::error::Result;
use crate::models::Locale;

/// Build the catalogue URL for a slug in a locale.
///
/// # Examples
/// ```
/// use url::Url;
/// use seo_audit::models::Locale;
/// use seo_audit::utils::url::page_url;
///
/// let base = Url::parse("https://example.com").unwrap();
/// assert_eq!(
///     page_url(&base, Locale::Ru, "word-counter").unwrap().as_str(),
///     "https://example.com/ru/tools/word-counter"
/// );
/// ```
pub fn page_url(base: &Url, locale: Locale, slug: &str) -> Result<Url> {
    Ok(base.join(&locale.page_path(slug))?)
}

/// Resolve a potentially relative href against a base URL.
pub fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    base.join(href).ok()
}

/// Whether two URLs address the same document.
///
/// Scheme, host, port, path and query must all match; only the fragment is
/// ignored. Trailing-slash and case differences are deliberate mismatches.
pub fn same_document(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
        && a.path() == b.path()
        && a.query() == b.query()
}
