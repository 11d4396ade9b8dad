//! Transport layer for the Vizlook client.
//!
//! The [`Transport`] trait is the seam between the client and the network: it
//! sends one HTTP request and hands back the status, headers and a body that
//! can be read incrementally. [`ReqwestTransport`] is the default
//! implementation.

use std::collections::HashMap;
use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;

use crate::error::{VizlookError, VizlookResult};

/// Response body as an incrementally readable stream of chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = VizlookResult<Bytes>> + Send>>;

/// A fully built HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Serialized request body.
    pub body: Option<Vec<u8>>,
}

/// An HTTP response whose body has not been read yet.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers (names lowercased).
    pub headers: HashMap<String, String>,
    /// Response body. `None` if the transport has no readable body.
    pub body: Option<ByteStream>,
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl HttpResponse {
    /// Create a response from a status and a body stream.
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Some(body),
        }
    }

    /// Create a response whose body is a single chunk.
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        Self::from_chunks(status, vec![body.into()])
    }

    /// Create a response whose body arrives as the given chunks, in order.
    pub fn from_chunks(status: u16, chunks: Vec<Bytes>) -> Self {
        let chunks = chunks.into_iter().map(Ok::<Bytes, VizlookError>);
        Self::new(status, Box::pin(stream::iter(chunks)))
    }

    /// Create a response with no readable body.
    pub fn without_body(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a response header (builder-style).
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the whole body into memory. A missing body reads as empty.
    pub async fn bytes(self) -> VizlookResult<Vec<u8>> {
        let mut out = Vec::new();
        if let Some(mut body) = self.body {
            while let Some(chunk) = body.next().await {
                out.extend_from_slice(&chunk?);
            }
        }
        Ok(out)
    }
}

/// Transport abstraction for Vizlook requests.
///
/// Implementations must return as soon as the status and headers are known,
/// leaving the body to be read incrementally. Body read failures should be
/// reported as [`VizlookError::TransportFailed`] or [`VizlookError::Timeout`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and return the response head plus an unread body.
    async fn send(&self, request: HttpRequest) -> VizlookResult<HttpResponse>;
}

/// Configuration for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Total request timeout, including reading the body. `None` means no
    /// limit, which suits long answer streams.
    pub timeout: Option<Duration>,
    /// Connection timeout. Defaults to 30 seconds.
    pub connect_timeout: Duration,
    /// Additional HTTP headers to include on every request.
    pub headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(30),
            headers: HashMap::new(),
        }
    }
}

/// HTTP transport using `reqwest`.
///
/// # Example
///
/// ```no_run
/// use vizlook_rs::client::{ReqwestTransport, TransportConfig};
/// use std::time::Duration;
///
/// # fn example() -> vizlook_rs::VizlookResult<()> {
/// let config = TransportConfig {
///     timeout: Some(Duration::from_secs(120)),
///     ..TransportConfig::default()
/// };
/// let transport = ReqwestTransport::with_config(config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with a default `reqwest::Client`.
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Create a transport from a [`TransportConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`VizlookError::InvalidConfig`] for an invalid header or if
    /// the HTTP client cannot be built.
    pub fn with_config(config: TransportConfig) -> VizlookResult<Self> {
        let mut default_headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| VizlookError::InvalidConfig(format!("header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| VizlookError::InvalidConfig(format!("header '{key}' value: {e}")))?;
            default_headers.insert(name, value);
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| VizlookError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Create a transport around an existing `reqwest::Client`.
    ///
    /// Useful to share a connection pool or configure TLS externally.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a `reqwest` failure to a Vizlook error.
fn map_reqwest_error(url: &str, err: reqwest::Error) -> VizlookError {
    if err.is_timeout() {
        VizlookError::Timeout(format!("request to {url} timed out: {err}"))
    } else if err.is_connect() {
        VizlookError::transport(url, format!("connection failed: {err}"))
    } else {
        VizlookError::transport(url, err)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> VizlookResult<HttpResponse> {
        let url = request.url;
        let mut builder = self.client.request(request.method, &url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(&url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map(move |chunk| chunk.map_err(|e| map_reqwest_error(&url, e))),
        );

        Ok(HttpResponse {
            status,
            headers,
            body: Some(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bytes_concatenates_chunks() {
        let response = HttpResponse::from_chunks(
            200,
            vec![Bytes::from_static(b"{\"a\":"), Bytes::from_static(b"1}")],
        );
        assert!(response.is_success());
        assert_eq!(response.bytes().await.unwrap(), b"{\"a\":1}".to_vec());
    }

    #[tokio::test]
    async fn bytes_of_missing_body_is_empty() {
        let response = HttpResponse::without_body(204);
        assert!(response.bytes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bytes_propagates_body_errors() {
        let body: ByteStream = Box::pin(stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(VizlookError::transport("/search", "connection reset")),
        ]));
        let err = HttpResponse::new(200, body).bytes().await.unwrap_err();
        assert!(matches!(err, VizlookError::TransportFailed { .. }));
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse::without_body(200).is_success());
        assert!(HttpResponse::without_body(299).is_success());
        assert!(!HttpResponse::without_body(301).is_success());
        assert!(!HttpResponse::without_body(432).is_success());
    }

    #[test]
    fn headers_are_lowercased() {
        let response =
            HttpResponse::without_body(200).with_header("Content-Type", "text/event-stream");
        assert_eq!(
            response.headers.get("content-type").map(String::as_str),
            Some("text/event-stream")
        );
    }

    #[test]
    fn invalid_header_is_config_error() {
        let mut config = TransportConfig::default();
        config
            .headers
            .insert("bad header".to_string(), "v".to_string());
        let err = ReqwestTransport::with_config(config).unwrap_err();
        assert!(matches!(err, VizlookError::InvalidConfig(_)));
    }

    #[test]
    fn default_config_has_no_total_timeout() {
        let config = TransportConfig::default();
        assert!(config.timeout.is_none());
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }
}
