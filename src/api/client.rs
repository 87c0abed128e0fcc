//! FANBOX API HTTP client.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::cookie::Jar;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use tokio::io::AsyncRead;
use tokio_util::io::StreamReader;
use url::Url;

use crate::api::types::{ApiResponse, Page};
use crate::config::Listing;
use crate::error::{Error, Result};

/// FANBOX API base URL.
pub const API_BASE: &str = "https://api.fanbox.cc";

/// Website origin, sent as `Origin` and used for post links.
pub const ORIGIN_URL: &str = "https://www.fanbox.cc";

/// Sent as `Referer` on every request.
pub const REFERER_URL: &str = "https://www.fanbox.cc/";

/// Desktop browser user agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept header for JSON listing calls.
pub const JSON_ACCEPT: &str = "application/json, text/plain, */*";

/// Session cookie name.
pub const SESSION_COOKIE: &str = "FANBOXSESSID";

/// Cookies are scoped to the parent domain so downloads hosts receive them too.
const COOKIE_DOMAIN: &str = ".fanbox.cc";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest pause between body reads. Large attachments stream for as long as
/// data keeps arriving.
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum number of body characters kept in a failure message.
const BODY_SNIPPET_LEN: usize = 512;

/// A response body read incrementally from the network.
pub type BodyReader = Pin<Box<dyn AsyncRead + Send>>;

/// Authenticated GET capability used by the poller and the download tasks.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Open the body at `url` for streaming.
    ///
    /// Retries cover the request up to a successful status. Errors while
    /// reading the returned body surface from the reader.
    async fn fetch(&self, url: &str) -> Result<BodyReader>;

    /// Fetch and decode a listing page at `url`.
    async fn fetch_page(&self, url: &str) -> Result<Page>;
}

/// Cookie-authenticated FANBOX session.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct FanboxSession {
    client: Client,
    retries: u32,
    api_base: String,
}

impl FanboxSession {
    /// Create a session from a `FANBOXSESSID` value.
    ///
    /// `retries` is the number of additional attempts after the first one.
    pub fn new(session_id: &str, retries: u32) -> Result<Self> {
        let client = Client::builder()
            .cookie_provider(session_cookies(session_id)?)
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retries,
            api_base: API_BASE.to_string(),
        })
    }

    /// Point listing calls at a different API host.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of the first page of a listing.
    pub fn listing_url(&self, listing: Listing) -> String {
        format!("{}{}", self.api_base, listing.endpoint())
    }

    /// First page of posts from creators the user supports.
    pub async fn supporting_posts(&self) -> Result<Page> {
        self.posts_from_url(&self.listing_url(Listing::Supporting))
            .await
    }

    /// First page of the home feed (all followed creators).
    pub async fn home_posts(&self) -> Result<Page> {
        self.posts_from_url(&self.listing_url(Listing::Home)).await
    }

    /// Fetch a listing page from a cursor URL.
    ///
    /// Listing bodies are small and read whole, so a read failure on a 2xx
    /// response is retried like a transport failure.
    pub async fn posts_from_url(&self, url: &str) -> Result<Page> {
        let headers = build_headers(true);
        let attempts = self.retries + 1;
        let mut last = AttemptFailure::default();

        for attempt in 1..=attempts {
            let response = match self.attempt(url, &headers, attempt).await {
                Ok(response) => response,
                Err(failure) => {
                    last = failure;
                    continue;
                }
            };

            let status = response.status().as_u16();
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(url, attempt, error = %e, "Failed to read body");
                    last = AttemptFailure {
                        status: Some(status),
                        reason: format!("failed to read body: {}", e),
                    };
                    continue;
                }
            };

            let response: ApiResponse<Page> =
                serde_json::from_slice(&body).map_err(|source| Error::Decode {
                    url: url.to_string(),
                    source,
                })?;

            tracing::debug!(
                url,
                items = response.body.items.len(),
                "Fetched listing page"
            );

            return Ok(response.body);
        }

        Err(last.into_error(url, attempts))
    }

    /// Open a file body as a chunked stream.
    ///
    /// Retries stop at the first 2xx response; the body is never buffered
    /// whole.
    pub async fn download(&self, url: &str) -> Result<BodyReader> {
        let headers = build_headers(false);
        let attempts = self.retries + 1;
        let mut last = AttemptFailure::default();

        for attempt in 1..=attempts {
            match self.attempt(url, &headers, attempt).await {
                Ok(response) => {
                    let chunks = response.bytes_stream().map_err(io::Error::other);
                    return Ok(Box::pin(StreamReader::new(chunks)));
                }
                Err(failure) => last = failure,
            }
        }

        Err(last.into_error(url, attempts))
    }

    /// Send one authenticated GET and check for a 2xx status.
    async fn attempt(
        &self,
        url: &str,
        headers: &HeaderMap,
        attempt: u32,
    ) -> std::result::Result<Response, AttemptFailure> {
        tracing::debug!(url, attempt, "GET");

        let response = match self.client.get(url).headers(headers.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url, attempt, error = %e, "Request failed");
                return Err(AttemptFailure {
                    status: None,
                    reason: format!("failed to do request: {}", e),
                });
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Drain the body before the next attempt.
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(url, attempt, status = status.as_u16(), "Unexpected status");
        Err(AttemptFailure {
            status: Some(status.as_u16()),
            reason: format!(
                "unexpected status code {}, body {}",
                status.as_u16(),
                snippet(&body)
            ),
        })
    }
}

/// Why the latest attempt at a request failed.
#[derive(Debug, Default)]
struct AttemptFailure {
    status: Option<u16>,
    reason: String,
}

impl AttemptFailure {
    fn into_error(self, url: &str, attempts: u32) -> Error {
        Error::FetchFailed {
            url: url.to_string(),
            attempts,
            status: self.status,
            reason: self.reason,
        }
    }
}

#[async_trait]
impl Fetcher for FanboxSession {
    async fn fetch(&self, url: &str) -> Result<BodyReader> {
        self.download(url).await
    }

    async fn fetch_page(&self, url: &str) -> Result<Page> {
        self.posts_from_url(url).await
    }
}

/// Cookie jar carrying the policy agreement and the session id for every
/// `fanbox.cc` host.
fn session_cookies(session_id: &str) -> Result<Arc<Jar>> {
    let cookie_url = Url::parse(ORIGIN_URL)?;
    let jar = Arc::new(Jar::default());

    for (name, value) in [
        ("privacy_policy_agreement", "2"),
        (SESSION_COOKIE, session_id),
    ] {
        jar.add_cookie_str(
            &format!(
                "{}={}; Domain={}; Path=/; Secure; HttpOnly",
                name, value, COOKIE_DOMAIN
            ),
            &cookie_url,
        );
    }

    Ok(jar)
}

/// Build the fixed headers sent with every request.
fn build_headers(json: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN_URL));
    headers.insert(header::REFERER, HeaderValue::from_static(REFERER_URL));
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::DNT, HeaderValue::from_static("1"));

    if json {
        headers.insert(header::ACCEPT, HeaderValue::from_static(JSON_ACCEPT));
    }

    headers
}

/// Truncate a response body for error messages.
fn snippet(body: &str) -> &str {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
