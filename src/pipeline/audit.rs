// src/pipeline/audit.rs

//! Audit crawl pipeline.
//!
//! Enumerates every (slug, locale) pair once, fetches them with a bounded
//! worker pool, and folds the outcomes into a [`CorpusResult`] from a single
//! consumer loop. The corpus this returns is frozen: analysis only ever sees
//! the complete result set.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{Config, CorpusResult, FetchFailure, Locale, PageAuditRecord};
use crate::services::{FetchResult, MetadataExtractor, PageFetcher, RuleContext, evaluate};
use crate::utils::url::page_url;

/// Counts reported at the end of a crawl.
#[derive(Debug, Default)]
pub struct AuditStats {
    pub pages_total: usize,
    pub pages_audited: usize,
    pub pages_failed: usize,
}

/// Orchestrates fetch, extract and evaluate for the whole catalogue.
pub struct AuditRunner {
    config: Arc<Config>,
    fetcher: PageFetcher,
    extractor: MetadataExtractor,
}

impl AuditRunner {
    /// Create a runner with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let fetcher = PageFetcher::new(&config.crawler)?;
        let extractor = MetadataExtractor::new(&config.audit)?;
        Ok(Self {
            config,
            fetcher,
            extractor,
        })
    }

    /// Fetch and evaluate every catalogue page.
    ///
    /// At most `max_concurrent` fetches are in flight; results are consumed
    /// by this single loop, so the corpus needs no locking. A failed page is
    /// recorded in `fetch_errors` and never aborts the batch.
    pub async fn run(&self) -> Result<CorpusResult> {
        let started = Instant::now();
        let base = self.config.site.base()?;
        let delay = Duration::from_millis(self.config.crawler.request_delay_ms);
        let concurrency = self.config.crawler.max_concurrent.max(1);

        let mut jobs = Vec::new();
        for locale in Locale::ALL {
            for slug in &self.config.site.slugs {
                jobs.push((locale, slug.clone(), page_url(&base, locale, slug)?));
            }
        }

        let mut stats = AuditStats {
            pages_total: jobs.len(),
            ..AuditStats::default()
        };
        log::info!(
            "Auditing {} pages ({} slugs x {} locales) from {}",
            jobs.len(),
            self.config.site.slugs.len(),
            Locale::ALL.len(),
            base
        );

        let mut corpus = CorpusResult::new();
        let mut pages = stream::iter(jobs)
            .map(|(locale, slug, url)| async move {
                let result = self.fetcher.fetch(&url).await;
                (locale, slug, url, result)
            })
            .buffered(concurrency);

        while let Some((locale, slug, url, result)) = pages.next().await {
            match result {
                Ok(fetch) => {
                    let record = self.build_record(locale, slug, &fetch);
                    corpus.records.entry(locale).or_default().push(record);
                    stats.pages_audited += 1;
                }
                Err(error) => {
                    stats.pages_failed += 1;
                    log::warn!("Failed to fetch {slug} ({url}): {error}");
                    corpus.fetch_errors.push(FetchFailure {
                        url: url.to_string(),
                        locale,
                        slug,
                        kind: error.kind,
                        error: error.message,
                    });
                }
            }

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        log::info!(
            "Audit crawl finished: {}/{} pages audited, {} failed, {:.1}s",
            stats.pages_audited,
            stats.pages_total,
            stats.pages_failed,
            started.elapsed().as_secs_f64()
        );

        Ok(corpus)
    }

    fn build_record(&self, locale: Locale, slug: String, fetch: &FetchResult) -> PageAuditRecord {
        let x_robots_tag = fetch.header("x-robots-tag");
        let metadata =
            self.extractor
                .extract(&fetch.body, &fetch.final_url, fetch.status, x_robots_tag);

        let ctx = RuleContext {
            audit: &self.config.audit,
            locale,
            page_url: &fetch.final_url,
        };
        let rules = evaluate(&metadata, &ctx);
        let indexable = metadata.is_indexable();

        PageAuditRecord {
            locale,
            slug,
            metadata,
            rules,
            indexable,
        }
    }
}
