//! HTTP client and request pacing for LinkedIn job search
//!
//! Provides the outbound fetch used by the page orchestrator. The client
//! sends a browser-like header set and reports every failure as an empty
//! body, which the orchestrator reads as "no more pages".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tokio::time::sleep;

use crate::error::{JobsError, Result};
use crate::url::{SEARCH_ENDPOINT, accept_language, build_referer_url};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Search endpoint queried for each page
    pub endpoint: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: SEARCH_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Fixed interval inserted between successive page fetches of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    interval: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(350))
    }
}

impl PacingPolicy {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// No delay between pages
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait out the interval before the next page
    pub async fn pause(&self) {
        if !self.interval.is_zero() {
            sleep(self.interval).await;
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// One upstream page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Full search URL including the page query
    pub url: String,
    /// Upstream locale, used for `Accept-Language`
    pub language_tag: String,
    /// Filters-only query reflected in the `Referer`
    pub referer_query: String,
}

/// Fetches raw page markup for the orchestrator
///
/// Implementations return an empty string on any failure.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Search endpoint the orchestrator builds page URLs against
    fn endpoint(&self) -> &str {
        SEARCH_ENDPOINT
    }

    async fn fetch_page(&self, request: &PageRequest) -> String;
}

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Browser-like headers that do not depend on the request
const STATIC_HEADERS: &[(&str, &str)] = &[
    ("priority", "u=0, i"),
    (
        "sec-ch-ua",
        "\"Not;A=Brand\";v=\"99\", \"Google Chrome\";v=\"139\", \"Chromium\";v=\"139\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
];

/// HTTP client for the LinkedIn guest search endpoint
///
/// Follows redirects and never surfaces upstream errors to the caller.
pub struct JobsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl JobsClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        for (name, value) in STATIC_HEADERS {
            headers.insert(
                HeaderName::from_static(*name),
                HeaderValue::from_static(*value),
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers(headers)
            .build()
            .map_err(JobsError::HttpError)?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
        })
    }

    /// Per-request headers: `Accept-Language` and `Referer`
    pub fn request_headers(request: &PageRequest) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let language = accept_language(&request.language_tag);
        let language = HeaderValue::from_str(&language)
            .map_err(|_| JobsError::InvalidHeader(format!("Accept-Language: {}", language)))?;
        headers.insert(header::ACCEPT_LANGUAGE, language);

        let referer = build_referer_url(&request.referer_query);
        let referer = HeaderValue::from_str(&referer)
            .map_err(|_| JobsError::InvalidHeader(format!("Referer: {}", referer)))?;
        headers.insert(header::REFERER, referer);

        Ok(headers)
    }

    async fn try_fetch(&self, request: &PageRequest) -> Result<String> {
        let headers = Self::request_headers(request)?;

        let response = self
            .client
            .get(&request.url)
            .headers(headers)
            .send()
            .await
            .map_err(JobsError::HttpError)?;

        let status = response.status();
        let body = response.text().await.map_err(JobsError::HttpError)?;
        tracing::info!(
            "GET {} -> HTTP {}, bytes={}",
            request.url,
            status.as_u16(),
            body.len()
        );

        if !status.is_success() {
            return Ok(String::new());
        }
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for JobsClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_page(&self, request: &PageRequest) -> String {
        match self.try_fetch(request).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "upstream fetch failed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;
    use wiremock::matchers::{header as header_eq, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/jobs-guest/jobs/api/seeMoreJobPostings/search";

    fn client_for(server: &MockServer) -> JobsClient {
        JobsClient::with_config(ClientConfig {
            endpoint: format!("{}{}", server.uri(), SEARCH_PATH),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn page_request(client: &JobsClient, query: &str) -> PageRequest {
        PageRequest {
            url: format!("{}?{}", client.endpoint(), query),
            language_tag: "it_IT".to_string(),
            referer_query: "keywords=rust&f_WT=1%2C2".to_string(),
        }
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, SEARCH_ENDPOINT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_client_creation() {
        assert!(JobsClient::new().is_ok());
    }

    #[test]
    fn test_request_headers() {
        let request = PageRequest {
            url: String::new(),
            language_tag: "en_US".to_string(),
            referer_query: String::new(),
        };
        let headers = JobsClient::request_headers(&request).unwrap();
        assert_eq!(headers[header::ACCEPT_LANGUAGE], "en-US,en;q=0.8");
        assert_eq!(headers[header::REFERER], "https://www.linkedin.com/jobs/search/");
    }

    #[test]
    fn test_request_headers_reject_control_characters() {
        let request = PageRequest {
            url: String::new(),
            language_tag: "en\nUS".to_string(),
            referer_query: String::new(),
        };
        assert!(matches!(
            JobsClient::request_headers(&request),
            Err(JobsError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_pacing_default_interval() {
        assert_eq!(PacingPolicy::default().interval(), Duration::from_millis(350));
        assert_eq!(PacingPolicy::none().interval(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_pause_waits_interval() {
        let pacing = PacingPolicy::new(Duration::from_millis(350));
        let start = Instant::now();
        pacing.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("start", "0"))
            .and(header_regex("accept-language", "^(it-IT|en;q=0.8)$"))
            .and(header_eq(
                "referer",
                "https://www.linkedin.com/jobs/search/?keywords=rust&f_WT=1%2C2",
            ))
            .and(header_eq("sec-fetch-mode", "navigate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<li>card</li>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body = client.fetch_page(&page_request(&client, "start=0")).await;
        assert_eq!(body, "<li>card</li>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_gives_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.fetch_page(&page_request(&client, "start=0")).await, "");
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", "/moved"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(200).set_body_string("moved body"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let body = client.fetch_page(&page_request(&client, "start=0")).await;
        assert_eq!(body, "moved body");
    }

    #[tokio::test]
    async fn test_fetch_transport_error_gives_empty_body() {
        let client = JobsClient::with_config(ClientConfig {
            endpoint: "http://127.0.0.1:9/search".to_string(),
            timeout_secs: 1,
        })
        .unwrap();

        let body = client.fetch_page(&page_request(&client, "start=0")).await;
        assert!(body.is_empty());
    }
}
