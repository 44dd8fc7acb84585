// src/models/mod.rs

//! Domain models for the audit application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod page;
mod registry;
mod report;
mod rules;

// Re-export all public types
pub use config::{AuditConfig, Config, CrawlerConfig, SiteConfig};
pub use page::{FetchErrorKind, FetchFailure, HreflangLink, Locale, PageMetadata};
pub use registry::{Registry, RegistryEntry};
pub use report::{
    DuplicateGroup, Issue, IssueCatalog, LocaleSummary, MetadataField, SummaryMetrics,
};
pub use rules::{CorpusResult, PageAuditRecord, Rule, RuleResult, RuleStatus};
