//! High-level Vizlook client.
//!
//! Provides one typed method per API operation plus the generic
//! [`VizlookClient::request`] they are built on.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::builders::{ClientBuilder, ClientConfig};
use crate::error::{VizlookError, VizlookResult};
use crate::types::{
    AnswerOptions, AnswerResponse, SearchOptions, SearchResponse, VideoContentsOptions,
    VideoContentsResponse, VideoUrls,
};

use super::request::{
    answer_request, search_request, video_contents_request, ApiRequest, ANSWER_ENDPOINT,
};
use super::stream::AnswerStream;
use super::transport::{HttpRequest, HttpResponse, Transport};

/// Client for the Vizlook API.
///
/// Operations:
/// - [`search`](Self::search): `POST /search`
/// - [`answer`](Self::answer): `POST /answer`, whole answer at once
/// - [`stream_answer`](Self::stream_answer): `POST /answer` as an event stream
/// - [`get_video_contents`](Self::get_video_contents): `POST /videos`
///
/// The client holds only read-only configuration, so one instance can serve
/// any number of concurrent requests and streams.
///
/// # Construction
///
/// ```no_run
/// use vizlook_rs::client::VizlookClient;
///
/// # fn example() -> vizlook_rs::VizlookResult<()> {
/// // API key from VIZLOOK_API_KEY:
/// let client = VizlookClient::from_env()?;
///
/// // Explicit key:
/// let client = VizlookClient::new("vl-...")?;
///
/// // Full control:
/// let client = VizlookClient::builder()
///     .with_api_key("vl-...")
///     .with_base_url("http://localhost:8080")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct VizlookClient {
    transport: Box<dyn Transport>,
    base_url: String,
    headers: HashMap<String, String>,
}

impl std::fmt::Debug for VizlookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VizlookClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl VizlookClient {
    /// Create a client with the given API key and default settings.
    ///
    /// # Errors
    ///
    /// Returns [`VizlookError::MissingApiKey`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> VizlookResult<Self> {
        ClientBuilder::new().with_api_key(api_key).build()
    }

    /// Create a client with the API key from `VIZLOOK_API_KEY`.
    pub fn from_env() -> VizlookResult<Self> {
        ClientBuilder::new().build()
    }

    /// Start configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client from a resolved config and a custom transport.
    ///
    /// Use this for custom HTTP stacks or to mock the network in tests.
    pub fn with_transport(config: ClientConfig, transport: Box<dyn Transport>) -> Self {
        let headers = config.request_headers();
        Self {
            transport,
            base_url: config.base_url,
            headers,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ──────────────────────────────────────────────────
    // API operations
    // ──────────────────────────────────────────────────

    /// Search videos (`POST /search`).
    ///
    /// The query is limited to 500 characters by the API.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> VizlookResult<SearchResponse> {
        self.request(search_request(query, &options)?).await
    }

    /// Answer a query in non-stream mode (`POST /answer`).
    pub async fn answer(&self, query: &str, options: AnswerOptions) -> VizlookResult<AnswerResponse> {
        self.request(answer_request(query, &options, false)?).await
    }

    /// Answer a query in stream mode (`POST /answer` with `stream: true`).
    ///
    /// The status is checked before anything is returned: on a non-success
    /// status this fails with [`VizlookError::RequestFailed`] and no stream is
    /// produced.
    ///
    /// ```no_run
    /// # async fn example(client: vizlook_rs::client::VizlookClient) -> vizlook_rs::VizlookResult<()> {
    /// use vizlook_rs::{AnswerOptions, StreamEvent};
    ///
    /// let mut stream = client
    ///     .stream_answer("How to learn python?", AnswerOptions::default())
    ///     .await?;
    /// while let Some(event) = stream.next().await {
    ///     if let StreamEvent::AnswerChunk { text } = event? {
    ///         print!("{text}");
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn stream_answer(
        &self,
        query: &str,
        options: AnswerOptions,
    ) -> VizlookResult<AnswerStream> {
        let request = answer_request(query, &options, true)?;
        let response = self.send(&request).await?;
        let body = response.body.ok_or_else(|| VizlookError::StreamUnavailable {
            path: ANSWER_ENDPOINT.to_string(),
        })?;
        Ok(AnswerStream::new(body, ANSWER_ENDPOINT))
    }

    /// Retrieve the contents of one or more videos (`POST /videos`).
    ///
    /// Only YouTube watch URLs are supported for now.
    pub async fn get_video_contents(
        &self,
        urls: impl Into<VideoUrls>,
        options: VideoContentsOptions,
    ) -> VizlookResult<VideoContentsResponse> {
        let urls = urls.into();
        self.request(video_contents_request(&urls, &options)?).await
    }

    /// Send any request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// - [`VizlookError::RequestFailed`] on a non-success status
    /// - [`VizlookError::InvalidResponse`] if the body does not decode as `T`
    /// - [`VizlookError::TransportFailed`] / [`VizlookError::Timeout`] on network failures
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> VizlookResult<T> {
        let response = self.send(&request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| e.with_path(&request.endpoint))?;
        serde_json::from_slice(&body).map_err(|e| {
            VizlookError::InvalidResponse(format!(
                "failed to decode {} response: {e}",
                request.endpoint
            ))
        })
    }

    // ──────────────────────────────────────────────────
    // Internal helpers
    // ──────────────────────────────────────────────────

    /// Send a request and check the status. The body is left unread on success.
    async fn send(&self, request: &ApiRequest) -> VizlookResult<HttpResponse> {
        let url = request.url(&self.base_url)?;

        let mut headers = self.headers.clone();
        for (key, value) in &request.headers {
            headers.retain(|k, _| !k.eq_ignore_ascii_case(key));
            headers.insert(key.clone(), value.clone());
        }

        let body = request
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| {
                VizlookError::InvalidConfig(format!("failed to serialize request body: {e}"))
            })?;

        tracing::debug!(method = %request.method, %url, "sending vizlook request");

        let response = self
            .transport
            .send(HttpRequest {
                method: request.method.clone(),
                url,
                headers,
                body,
            })
            .await
            .map_err(|e| e.with_path(&request.endpoint))?;

        if !response.is_success() {
            let status = response.status;
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(status, path = %request.endpoint, "failed to read error body: {e}");
                    Vec::new()
                }
            };
            let err = VizlookError::from_error_body(status, request.endpoint.clone(), &body);
            tracing::warn!(status, path = %request.endpoint, "vizlook request failed: {err}");
            return Err(err);
        }

        Ok(response)
    }
}
