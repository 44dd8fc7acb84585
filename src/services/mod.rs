// src/services/mod.rs

//! Service layer for the audit application.
//!
//! This module contains the per-page stages of the pipeline:
//! - Page fetching (`PageFetcher`)
//! - Metadata extraction (`MetadataExtractor`)
//! - Rule evaluation (`evaluate` with a `RuleContext`)

pub mod extractor;
pub mod fetcher;
pub mod rules;

pub use extractor::MetadataExtractor;
pub use fetcher::{FetchError, FetchResult, PageFetcher};
pub use rules::{RuleContext, evaluate};
