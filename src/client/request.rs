//! Request building for the Vizlook endpoints.
//!
//! Each endpoint helper is a pure function from caller options to an
//! [`ApiRequest`]: endpoint path, method, JSON body, query pairs and extra
//! headers. The client turns it into an HTTP request.

use std::collections::HashMap;

use reqwest::Method;
use serde::Serialize;

use crate::error::{VizlookError, VizlookResult};
use crate::types::{
    AnswerOptions, Category, CrawlMode, PublishedDate, SearchOptions, VideoContentsOptions,
    VideoUrls,
};

/// Path of the search endpoint.
pub const SEARCH_ENDPOINT: &str = "/search";

/// Path of the answer endpoint (stream and non-stream).
pub const ANSWER_ENDPOINT: &str = "/answer";

/// Path of the video contents endpoint.
pub const VIDEOS_ENDPOINT: &str = "/videos";

/// A request against the Vizlook API, before base URL and default headers apply.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Endpoint path, e.g. `/search`.
    pub endpoint: String,
    /// HTTP method.
    pub method: Method,
    /// JSON body.
    pub body: Option<serde_json::Value>,
    /// Query parameters, in order. Repeated keys are allowed.
    pub query: Vec<(String, String)>,
    /// Headers that override the client defaults for this request.
    pub headers: HashMap<String, String>,
}

impl ApiRequest {
    /// A request with the given method and endpoint and nothing else.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            query: Vec::new(),
            headers: HashMap::new(),
        }
    }

    /// A `POST` request.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    /// A `GET` request.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    /// Serialize `body` as the JSON body (builder-style).
    pub fn with_json(mut self, body: &impl Serialize) -> VizlookResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| {
            VizlookError::InvalidConfig(format!("failed to serialize request body: {e}"))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Append a query parameter (builder-style).
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append one query parameter per value, all under `key` (builder-style).
    pub fn with_query_list<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        for value in values {
            self.query.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Set a per-request header (builder-style).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// The absolute URL of this request under `base_url`, including the query string.
    ///
    /// # Errors
    ///
    /// Returns [`VizlookError::InvalidConfig`] if the result is not a valid URL.
    pub fn url(&self, base_url: &str) -> VizlookResult<String> {
        let raw = format!("{}{}", base_url.trim_end_matches('/'), self.endpoint);
        let mut url = reqwest::Url::parse(&raw)
            .map_err(|e| VizlookError::InvalidConfig(format!("invalid request URL '{raw}': {e}")))?;
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url.to_string())
    }
}

// ---------------------------------------------------------------------------
// Wire bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentOptionsBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    include_transcription: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_summary: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    query: &'a str,
    content_options: ContentOptionsBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_published_date: Option<&'a PublishedDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_published_date: Option<&'a PublishedDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerBody<'a> {
    query: &'a str,
    stream: bool,
    content_options: ContentOptionsBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideosBody<'a> {
    urls: &'a [String],
    content_options: ContentOptionsBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    crawl_mode: Option<CrawlMode>,
}

/// Build a `POST /search` request.
pub fn search_request(query: &str, options: &SearchOptions) -> VizlookResult<ApiRequest> {
    let body = SearchBody {
        query,
        content_options: ContentOptionsBody {
            include_transcription: options.include_transcription,
            include_summary: options.include_summary,
        },
        category: options.category,
        start_published_date: options.start_published_date.as_ref(),
        end_published_date: options.end_published_date.as_ref(),
        max_results: options.max_results,
    };
    ApiRequest::post(SEARCH_ENDPOINT).with_json(&body)
}

/// Build a `POST /answer` request. Stream mode also asks for an event stream.
pub fn answer_request(
    query: &str,
    options: &AnswerOptions,
    stream: bool,
) -> VizlookResult<ApiRequest> {
    let body = AnswerBody {
        query,
        stream,
        content_options: ContentOptionsBody {
            include_transcription: options.include_transcription,
            include_summary: None,
        },
    };
    let request = ApiRequest::post(ANSWER_ENDPOINT).with_json(&body)?;
    Ok(if stream {
        request.with_header("Accept", "text/event-stream")
    } else {
        request
    })
}

/// Build a `POST /videos` request.
///
/// The response always includes at least one of transcription and summary:
/// transcription is requested unless only a summary was asked for.
pub fn video_contents_request(
    urls: &VideoUrls,
    options: &VideoContentsOptions,
) -> VizlookResult<ApiRequest> {
    let include_summary = options.include_summary;
    let include_transcription =
        options.include_transcription.unwrap_or(false) || !include_summary.unwrap_or(false);
    let body = VideosBody {
        urls: &urls.0,
        content_options: ContentOptionsBody {
            include_transcription: Some(include_transcription),
            include_summary,
        },
        crawl_mode: options.crawl_mode,
    };
    ApiRequest::post(VIDEOS_ENDPOINT).with_json(&body)
}
