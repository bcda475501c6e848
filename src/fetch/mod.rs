//! HTTP fetching for the crawl engine
//!
//! This module builds the shared HTTP client and performs the plain
//! fetches the static strategy and the frontier rely on. Fetch failures
//! are classified into [`FetchError`] values that callers record as
//! data; nothing here aborts a session.

use crate::config::HttpConfig;
use crate::FetchError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, if present
    pub content_type: Option<String>,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// Returns the body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns true if the response content type looks like HTML.
    ///
    /// An absent content type counts as HTML, matching the classifier's
    /// treatment of extensionless URLs.
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(ct) => ct.to_lowercase().contains("html"),
            None => true,
        }
    }
}

/// Builds the HTTP client used for one crawl session
///
/// The client carries a realistic browser-like header set, bounded
/// timeouts, and transparent gzip/brotli decompression.
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single URL, following redirects.
///
/// Returns a [`FetchedPage`] on any 2xx response; non-2xx statuses,
/// timeouts, and transport failures become [`FetchError`] values.
///
/// # Arguments
///
/// * `client` - The session HTTP client
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let body = response
        .bytes()
        .await
        .map_err(classify_error)?
        .to_vec();

    Ok(FetchedPage {
        final_url,
        status: status.as_u16(),
        content_type,
        body,
    })
}

/// Fetches a URL and returns its body as text.
///
/// Used for pulling external script payloads into the bundle-heuristic
/// strategy.
pub async fn fetch_text(client: &Client, url: &Url) -> Result<String, FetchError> {
    let page = fetch_page(client, url).await?;
    Ok(page.text())
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Request(error.to_string())
    }
}
