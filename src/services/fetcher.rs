// src/services/fetcher.rs

//! Page fetcher.
//!
//! Issues GET requests with the client redirect policy disabled and follows
//! `Location` headers by hand, so the hop chain is bounded, loop-checked and
//! visible in the logs. Failures come back as values; the pipeline records
//! them and keeps going.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{Client, redirect::Policy};
use thiserror::Error;
use url::Url;

use crate::error::Result;
use crate::models::{CrawlerConfig, FetchErrorKind};

/// Final response of one fetch, after redirects.
#[derive(Debug)]
pub struct FetchResult {
    pub final_url: Url,
    pub status: u16,
    /// Response headers of the final hop; header names are case-insensitive
    pub headers: HeaderMap,
    pub body: String,
}

impl FetchResult {
    /// First value of a response header, if it is valid text.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

/// A failed fetch. Terminal for the URL within this run; never retried.
#[derive(Debug, Clone, Error)]
#[error("{kind} error: {message}")]
pub struct FetchError {
    pub kind: FetchErrorKind,
    pub message: String,
}

impl FetchError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn redirect_loop(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::RedirectLoop,
            message: message.into(),
        }
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else {
            Self::network(error.to_string())
        }
    }
}

/// HTTP fetcher for audit pages.
pub struct PageFetcher {
    client: Client,
    max_redirects: usize,
}

impl PageFetcher {
    /// Create a fetcher from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
        })
    }

    /// Fetch a URL, following redirects up to the configured hop limit.
    ///
    /// Non-2xx terminal statuses are successes here; the status is judged
    /// downstream. Revisiting a URL or running out of hops is a
    /// `RedirectLoop` failure.
    pub async fn fetch(&self, url: &Url) -> std::result::Result<FetchResult, FetchError> {
        let mut current = url.clone();
        let mut visited: HashSet<String> = HashSet::new();

        for _hop in 0..=self.max_redirects {
            if !visited.insert(current.to_string()) {
                return Err(FetchError::redirect_loop(format!(
                    "already visited {current}"
                )));
            }

            log::debug!("GET {current}");
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(FetchError::from_reqwest)?;

            let status = response.status().as_u16();
            if is_redirect(status) {
                let target = redirect_target(&current, response.headers());
                match target {
                    Some(next) => {
                        log::debug!("Redirect {current} -> {next} ({status})");
                        current = next;
                        continue;
                    }
                    // A redirect without a usable Location is terminal;
                    // report it as the final response.
                    None => return finalize(current, response).await,
                }
            }

            return finalize(current, response).await;
        }

        Err(FetchError::redirect_loop(format!(
            "redirect limit of {} hops exceeded at {current}",
            self.max_redirects
        )))
    }
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Resolve the Location header against the current URL. Relative values are
/// the common case on same-origin redirects.
fn redirect_target(current: &Url, headers: &HeaderMap) -> Option<Url> {
    let location = headers.get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

async fn finalize(
    final_url: Url,
    response: reqwest::Response,
) -> std::result::Result<FetchResult, FetchError> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.text().await.map_err(FetchError::from_reqwest)?;
    Ok(FetchResult {
        final_url,
        status,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(timeout_secs: u64) -> CrawlerConfig {
        CrawlerConfig {
            user_agent: "seo-audit-test/1.0".into(),
            timeout_secs,
            request_delay_ms: 0,
            max_concurrent: 1,
            max_redirects: 5,
        }
    }

    async fn fetch_path(server: &MockServer, fetcher: &PageFetcher, p: &str) -> FetchResult {
        let url = Url::parse(&format!("{}{}", server.uri(), p)).unwrap();
        fetcher.fetch(&url).await.unwrap()
    }

    #[tokio::test]
    async fn follows_relative_redirects_to_final_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tools/old"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/tools/new"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/tools/new"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<title>New</title>"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(&test_config(5)).unwrap();
        let result = fetch_path(&server, &fetcher, "/tools/old").await;

        assert_eq!(result.status, 200);
        assert!(result.final_url.path().ends_with("/tools/new"));
        assert!(result.body.contains("New"));
    }

    #[tokio::test]
    async fn detects_redirect_loops() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/b"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/b"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/a"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(&test_config(5)).unwrap();
        let url = Url::parse(&format!("{}/a", server.uri())).unwrap();
        let error = fetcher.fetch(&url).await.unwrap_err();

        assert_eq!(error.kind, FetchErrorKind::RedirectLoop);
    }

    #[tokio::test]
    async fn hop_limit_bounds_long_chains() {
        let server = MockServer::start().await;
        // 7 distinct hops against a limit of 5.
        for i in 0..7 {
            Mock::given(method("GET"))
                .and(path(format!("/hop/{i}")))
                .respond_with(
                    ResponseTemplate::new(301)
                        .insert_header("Location", format!("/hop/{}", i + 1).as_str()),
                )
                .mount(&server)
                .await;
        }

        let fetcher = PageFetcher::new(&test_config(5)).unwrap();
        let url = Url::parse(&format!("{}/hop/0", server.uri())).unwrap();
        let error = fetcher.fetch(&url).await.unwrap_err();

        assert_eq!(error.kind, FetchErrorKind::RedirectLoop);
    }

    #[tokio::test]
    async fn timeouts_are_reported_as_timeout_kind() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(&test_config(1)).unwrap();
        let url = Url::parse(&format!("{}/slow", server.uri())).unwrap();
        let error = fetcher.fetch(&url).await.unwrap_err();

        assert_eq!(error.kind, FetchErrorKind::Timeout);
    }

    #[tokio::test]
    async fn non_success_statuses_are_not_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(&test_config(5)).unwrap();
        let result = fetch_path(&server, &fetcher, "/gone").await;

        assert_eq!(result.status, 404);
        assert_eq!(result.body, "not found");
    }

    #[tokio::test]
    async fn exposes_response_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tagged"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Robots-Tag", "noindex")
                    .set_body_string("ok"),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(&test_config(5)).unwrap();
        let result = fetch_path(&server, &fetcher, "/tagged").await;

        // Header lookup is case-insensitive.
        assert_eq!(result.header("x-robots-tag").as_deref(), Some("noindex"));
    }
}
