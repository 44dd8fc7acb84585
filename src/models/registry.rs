// src/models/registry.rs

//! Curated metadata overrides.
//!
//! The registry is an optional TOML file of per-URL entries maintained by
//! operators. When an entry carries a value, that value takes precedence
//! over the scraped one for duplicate grouping and appears in the
//! override columns of the CSV export.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Override values for one page, keyed by URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub url: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub og_title: Option<String>,

    #[serde(default)]
    pub og_description: Option<String>,
}

/// Lookup-by-URL collection of curated overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Load a registry from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let registry: Registry = toml::from_str(&content)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Reject entries that could never match a page.
    pub fn validate(&self) -> Result<()> {
        for entry in &self.entries {
            if entry.url.trim().is_empty() {
                return Err(AppError::validation("registry entry with empty url"));
            }
            url::Url::parse(&entry.url)
                .map_err(|e| AppError::validation(format!("registry url {}: {e}", entry.url)))?;
        }
        Ok(())
    }

    /// The entry for a URL, if any. Exact string match.
    pub fn lookup(&self, url: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.url == url)
    }

    /// Curated title for a URL, else the extracted one.
    pub fn effective_title<'a>(&'a self, url: &str, extracted: Option<&'a str>) -> Option<&'a str> {
        self.lookup(url)
            .and_then(|entry| entry.title.as_deref())
            .or(extracted)
    }

    /// Curated description for a URL, else the extracted one.
    pub fn effective_description<'a>(
        &'a self,
        url: &str,
        extracted: Option<&'a str>,
    ) -> Option<&'a str> {
        self.lookup(url)
            .and_then(|entry| entry.description.as_deref())
            .or(extracted)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
