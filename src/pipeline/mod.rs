// src/pipeline/mod.rs

//! Pipeline entry points for audit operations.
//!
//! - `run_audit`: Crawl both locale catalogues, evaluate rules, analyze, report
//! - `run_report`: Regenerate every derived artifact from stored raw results

pub mod analyze;
pub mod audit;

pub use analyze::{EnrichedCorpus, analyze};
pub use audit::{AuditRunner, AuditStats};

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Config, Registry};
use crate::report;
use crate::storage::ReportStore;

/// Run the full pipeline: fetch, extract, evaluate, analyze, persist.
pub async fn run_audit(
    config: Arc<Config>,
    registry: &Registry,
    store: &dyn ReportStore,
) -> Result<()> {
    let runner = AuditRunner::new(Arc::clone(&config))?;
    let corpus = runner.run().await?;
    let enriched = analyze(corpus, registry);
    let artifacts = report::generate(&enriched, registry)?;
    store.write_artifacts(&artifacts, &enriched.corpus).await
}

/// Rebuild reports from raw results persisted by an earlier audit run.
///
/// Re-runs analysis rather than trusting stored rule statuses, so a
/// registry edited after the crawl changes duplicate grouping without a
/// refetch.
pub async fn run_report(registry: &Registry, store: &dyn ReportStore) -> Result<()> {
    let corpus = store
        .load_corpus()
        .await?
        .ok_or_else(|| AppError::audit("report", "no stored results found; run an audit first"))?;
    let enriched = analyze(corpus, registry);
    let artifacts = report::generate(&enriched, registry)?;
    store.write_artifacts(&artifacts, &enriched.corpus).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::models::Locale;
    use crate::storage::LocalReportStore;

    fn test_config(base_url: &str) -> Config {
        let mut config = Config::default();
        config.site.base_url = base_url.to_string();
        config.site.slugs = vec!["alpha".to_string()];
        config.crawler.request_delay_ms = 0;
        config.crawler.timeout_secs = 1;
        config
    }

    #[tokio::test]
    async fn run_audit_persists_every_artifact_for_a_mixed_run() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/alpha"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html lang=\"en\"><head><title>Alpha Tool</title></head><body></body></html>",
            ))
            .mount(&server)
            .await;
        // The Russian page stalls past the timeout and ends up a fetch error.
        Mock::given(method("GET"))
            .and(path("/ru/tools/alpha"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_string("late"),
            )
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let store = LocalReportStore::new(tmp.path());
        run_audit(
            Arc::new(test_config(&server.uri())),
            &Registry::default(),
            &store,
        )
        .await
        .unwrap();

        for key in [
            "audit-en.csv",
            "audit-ru.csv",
            "issue-catalog.json",
            "summary-metrics.json",
            "results-en.json",
            "results-ru.json",
            "fetch-errors.json",
        ] {
            assert!(tmp.path().join(key).exists(), "missing artifact {key}");
        }

        let corpus = store.load_corpus().await.unwrap().unwrap();
        assert_eq!(corpus.records_for(Locale::En).len(), 1);
        assert!(corpus.records_for(Locale::Ru).is_empty());
        assert_eq!(corpus.fetch_errors.len(), 1);
    }

    #[tokio::test]
    async fn run_report_without_stored_results_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let store = LocalReportStore::new(tmp.path());

        let err = run_report(&Registry::default(), &store).await.unwrap_err();
        assert!(matches!(err, AppError::Audit { .. }));
    }
}
