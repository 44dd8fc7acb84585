// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and fetch behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Rule thresholds and word lists
    #[serde(default)]
    pub audit: AuditConfig,

    /// Audited site and its page catalogue
    #[serde(default)]
    pub site: SiteConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.crawler.max_redirects == 0 {
            return Err(AppError::validation("crawler.max_redirects must be > 0"));
        }
        if self.audit.avg_glyph_width_px == 0 {
            return Err(AppError::validation("audit.avg_glyph_width_px must be > 0"));
        }
        if self.audit.title_min_chars > self.audit.title_max_chars {
            return Err(AppError::validation(
                "audit.title_min_chars exceeds audit.title_max_chars",
            ));
        }
        if self.audit.description_min_chars > self.audit.description_max_chars {
            return Err(AppError::validation(
                "audit.description_min_chars exceeds audit.description_max_chars",
            ));
        }
        if self.audit.brand_suffixes.is_empty() {
            return Err(AppError::validation("No brand suffixes defined"));
        }
        if self.audit.tool_keywords.is_empty() {
            return Err(AppError::validation("No tool keywords defined"));
        }
        self.site.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            audit: AuditConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

/// HTTP client and fetch behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Redirect hop limit per fetch
    #[serde(default = "defaults::max_redirects")]
    pub max_redirects: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            max_redirects: defaults::max_redirects(),
        }
    }
}

/// Rule thresholds and word lists fed into the rule evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Minimum title length in characters
    #[serde(default = "defaults::title_min_chars")]
    pub title_min_chars: usize,

    /// Maximum title length in characters
    #[serde(default = "defaults::title_max_chars")]
    pub title_max_chars: usize,

    /// Pixel budget before a SERP truncates the title
    #[serde(default = "defaults::title_max_pixels")]
    pub title_max_pixels: u32,

    /// Average glyph width used for the pixel-width heuristic
    #[serde(default = "defaults::avg_glyph_width")]
    pub avg_glyph_width_px: u32,

    /// Minimum description length in characters
    #[serde(default = "defaults::description_min_chars")]
    pub description_min_chars: usize,

    /// Maximum description length in characters
    #[serde(default = "defaults::description_max_chars")]
    pub description_max_chars: usize,

    /// Suffixes a branded title must end with
    #[serde(default = "defaults::brand_suffixes")]
    pub brand_suffixes: Vec<String>,

    /// Words a tool-page title is expected to contain
    #[serde(default = "defaults::tool_keywords")]
    pub tool_keywords: Vec<String>,

    /// Phrases that mark a description as boilerplate
    #[serde(default = "defaults::generic_phrases")]
    pub generic_phrases: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            title_min_chars: defaults::title_min_chars(),
            title_max_chars: defaults::title_max_chars(),
            title_max_pixels: defaults::title_max_pixels(),
            avg_glyph_width_px: defaults::avg_glyph_width(),
            description_min_chars: defaults::description_min_chars(),
            description_max_chars: defaults::description_max_chars(),
            brand_suffixes: defaults::brand_suffixes(),
            tool_keywords: defaults::tool_keywords(),
            generic_phrases: defaults::generic_phrases(),
        }
    }
}

/// The audited site: base origin and the enumerated page catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base origin the slug paths are resolved against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Tool-page slugs, audited in both locales
    #[serde(default = "defaults::slugs")]
    pub slugs: Vec<String>,
}

impl SiteConfig {
    /// Parsed base origin.
    pub fn base(&self) -> Result<url::Url> {
        Ok(url::Url::parse(&self.base_url)?)
    }

    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)
            .map_err(|e| AppError::validation(format!("site.base_url: {e}")))?;
        if self.slugs.is_empty() {
            return Err(AppError::validation("No slugs defined"));
        }
        let mut seen = std::collections::HashSet::new();
        for slug in &self.slugs {
            if slug.trim().is_empty() {
                return Err(AppError::validation("site.slugs contains an empty slug"));
            }
            if !seen.insert(slug.as_str()) {
                return Err(AppError::validation(format!("duplicate slug: {slug}")));
            }
        }
        Ok(())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            slugs: defaults::slugs(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; seo-audit/1.0)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn request_delay() -> u64 {
        100
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn max_redirects() -> usize {
        10
    }

    // Audit thresholds
    pub fn title_min_chars() -> usize {
        45
    }
    pub fn title_max_chars() -> usize {
        65
    }
    pub fn title_max_pixels() -> u32 {
        600
    }
    pub fn avg_glyph_width() -> u32 {
        6
    }
    pub fn description_min_chars() -> usize {
        120
    }
    pub fn description_max_chars() -> usize {
        160
    }

    pub fn brand_suffixes() -> Vec<String> {
        vec![
            " | Text Case Converter".into(),
            " — Text Case Converter".into(),
        ]
    }

    pub fn tool_keywords() -> Vec<String> {
        vec![
            "converter".into(),
            "counter".into(),
            "generator".into(),
            "checker".into(),
            "tool".into(),
            "online".into(),
        ]
    }

    pub fn generic_phrases() -> Vec<String> {
        vec![
            "welcome to our website".into(),
            "best free online tool".into(),
            "click here".into(),
            "lorem ipsum".into(),
            "under construction".into(),
            "coming soon".into(),
        ]
    }

    // Site defaults
    pub fn base_url() -> String {
        "https://textcaseconvert.com".into()
    }
    pub fn slugs() -> Vec<String> {
        vec![
            "case-converter".into(),
            "word-counter".into(),
            "character-counter".into(),
            "sentence-counter".into(),
            "title-case-converter".into(),
            "lowercase-converter".into(),
            "uppercase-converter".into(),
            "slug-generator".into(),
        ]
    }
}
