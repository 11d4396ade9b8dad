//! Vizlook API types: request options, responses, and stream events.
//!
//! All wire types serialize as camelCase JSON. Unknown fields sent by the
//! server are ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Request options
// ============================================================================

/// Video category filter for search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Healthcare videos.
    Healthcare,
    /// E-commerce videos.
    Ecommerce,
    /// Technology videos.
    Tech,
    /// Finance videos.
    Finance,
    /// Education videos.
    Education,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Healthcare => "Healthcare",
            Category::Ecommerce => "Ecommerce",
            Category::Tech => "Tech",
            Category::Finance => "Finance",
            Category::Education => "Education",
        };
        write!(f, "{}", s)
    }
}

/// A published-date bound: an ISO 8601 timestamp or epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PublishedDate {
    /// Epoch milliseconds.
    Millis(i64),
    /// ISO 8601 timestamp string.
    Iso(String),
}

impl From<i64> for PublishedDate {
    fn from(millis: i64) -> Self {
        PublishedDate::Millis(millis)
    }
}

impl From<&str> for PublishedDate {
    fn from(iso: &str) -> Self {
        PublishedDate::Iso(iso.to_string())
    }
}

impl From<String> for PublishedDate {
    fn from(iso: String) -> Self {
        PublishedDate::Iso(iso)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for PublishedDate {
    fn from(date: chrono::DateTime<chrono::Utc>) -> Self {
        PublishedDate::Millis(date.timestamp_millis())
    }
}

/// Options for [`search`](crate::client::VizlookClient::search).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Restrict results to a category.
    pub category: Option<Category>,
    /// Only videos published at or after this date.
    pub start_published_date: Option<PublishedDate>,
    /// Only videos published at or before this date.
    pub end_published_date: Option<PublishedDate>,
    /// Maximum number of results. The server default is 10, the maximum 20.
    pub max_results: Option<u32>,
    /// Include the video transcription in each result.
    pub include_transcription: Option<bool>,
    /// Include the video summary in each result.
    pub include_summary: Option<bool>,
}

/// Options for [`answer`](crate::client::VizlookClient::answer) and
/// [`stream_answer`](crate::client::VizlookClient::stream_answer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerOptions {
    /// Include the video transcription in the answer citations.
    pub include_transcription: Option<bool>,
}

/// Live-crawl policy for video contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrawlMode {
    /// Only return cached contents. The server default.
    Never,
    /// Crawl in real time when no cached contents exist.
    Fallback,
    /// Always crawl in real time.
    Always,
}

/// Options for [`get_video_contents`](crate::client::VizlookClient::get_video_contents).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoContentsOptions {
    /// Live-crawl policy.
    pub crawl_mode: Option<CrawlMode>,
    /// Include the transcription. Defaults to on when no summary is requested.
    pub include_transcription: Option<bool>,
    /// Include the summary.
    pub include_summary: Option<bool>,
}

/// One video URL or several.
///
/// Only YouTube watch URLs are supported by the API for now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUrls(pub Vec<String>);

impl From<&str> for VideoUrls {
    fn from(url: &str) -> Self {
        VideoUrls(vec![url.to_string()])
    }
}

impl From<String> for VideoUrls {
    fn from(url: String) -> Self {
        VideoUrls(vec![url])
    }
}

impl From<Vec<String>> for VideoUrls {
    fn from(urls: Vec<String>) -> Self {
        VideoUrls(urls)
    }
}

impl From<Vec<&str>> for VideoUrls {
    fn from(urls: Vec<&str>) -> Self {
        VideoUrls(urls.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for VideoUrls {
    fn from(urls: [&str; N]) -> Self {
        VideoUrls(urls.iter().map(|u| u.to_string()).collect())
    }
}

// ============================================================================
// Shared video fields
// ============================================================================

/// Video thumbnail image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image URL.
    pub url: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Video author / channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Author page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Avatar image URL.
    pub avatar: String,
}

/// A video segment with a visual description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoClip {
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// What can be seen in the segment.
    pub visual_description: String,
}

/// An audio segment with its transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioClip {
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Spoken text.
    pub transcription: String,
    /// Speaker ID such as `speaker_1`, or the speaker's name if identified.
    pub speaker_id: String,
}

/// Visual and audio transcription of a video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTranscription {
    /// Video clips with visual descriptions.
    #[serde(default)]
    pub video_clips: Vec<VideoClip>,
    /// Audio clips with transcriptions.
    #[serde(default)]
    pub audio_clips: Vec<AudioClip>,
}

/// The video clip that best matches the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoHighlight {
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Visual description of the clip.
    pub visual_description: String,
    /// Audio transcription of the clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_transcription: Option<String>,
}

/// A titled section of a video summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    /// Start time in seconds.
    pub start_time: f64,
    /// End time in seconds.
    pub end_time: f64,
    /// Section title.
    pub title: String,
    /// Section summary.
    pub summary: String,
}

/// Overall and per-section summary of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    /// Summary of the whole video.
    pub overall_summary: String,
    /// Summaries of each section.
    #[serde(default)]
    pub section_summaries: Vec<SectionSummary>,
}

/// Dollar cost of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DollarCost {
    /// Total cost in US dollars.
    pub total: f64,
    /// Per-feature breakdown, when the endpoint reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<CostBreakdown>,
}

/// Per-feature cost breakdown. Which fields are present depends on the endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Search cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<f64>,
    /// Summary cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<f64>,
    /// Transcription cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<f64>,
    /// Live crawl cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawl: Option<f64>,
}

// ============================================================================
// Search
// ============================================================================

/// A single search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    /// Video page URL.
    pub url: String,
    /// Video title.
    pub title: String,
    /// Video description.
    pub description: String,
    /// Thumbnail image.
    pub thumbnail: Thumbnail,
    /// Author / channel.
    pub author: Author,
    /// Published date as an ISO timestamp string.
    pub published_date: String,
    /// Duration in seconds.
    pub duration: f64,
    /// Video page favicon.
    pub favicon: String,
    /// Relevance score for the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Clips matching the query.
    #[serde(default)]
    pub highlights: Vec<VideoHighlight>,
    /// Transcription, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<VideoTranscription>,
    /// Summary, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<VideoSummary>,
}

/// Response of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Search results.
    pub results: Vec<SearchResultItem>,
    /// Cost of the search.
    pub dollar_cost: DollarCost,
}

// ============================================================================
// Answer
// ============================================================================

/// A video cited as supporting evidence for an answer.
///
/// Same shape as [`SearchResultItem`] without the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationItem {
    /// Video page URL.
    pub url: String,
    /// Video title.
    pub title: String,
    /// Video description.
    pub description: String,
    /// Thumbnail image.
    pub thumbnail: Thumbnail,
    /// Author / channel.
    pub author: Author,
    /// Published date as an ISO timestamp string.
    pub published_date: String,
    /// Duration in seconds.
    pub duration: f64,
    /// Video page favicon.
    pub favicon: String,
    /// Relevance score for the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Clips matching the query.
    #[serde(default)]
    pub highlights: Vec<VideoHighlight>,
    /// Transcription, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<VideoTranscription>,
}

/// Response of `POST /answer` in non-stream mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    /// Answer text.
    pub answer: String,
    /// Supporting videos.
    #[serde(default)]
    pub citations: Vec<CitationItem>,
    /// Cost of the answer.
    pub dollar_cost: DollarCost,
}

/// A typed event from the answer stream.
///
/// The set is closed: match it exhaustively so the `Error` case cannot be
/// silently skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Incremental answer text.
    AnswerChunk {
        /// Text to append to the answer.
        text: String,
    },

    /// The full citation set, delivered once.
    Citations {
        /// Supporting videos.
        citations: Vec<CitationItem>,
    },

    /// Dollar cost report.
    Cost {
        /// Total cost in US dollars.
        total_cost: f64,
    },

    /// Server-signaled error. Does not end the stream by itself.
    Error {
        /// Error text from the server.
        message: String,
    },
}

impl StreamEvent {
    /// The wire discriminator for this event.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamEvent::AnswerChunk { .. } => "answer-chunk",
            StreamEvent::Citations { .. } => "citations",
            StreamEvent::Cost { .. } => "cost",
            StreamEvent::Error { .. } => "error",
        }
    }
}

/// Everything an answer stream delivered, folded together.
///
/// Produced by [`AnswerStream::collect_answer`](crate::client::AnswerStream::collect_answer).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamedAnswer {
    /// Concatenated answer chunks.
    pub answer: String,
    /// The citation set, if one was sent.
    pub citations: Vec<CitationItem>,
    /// The reported total cost, if one was sent.
    pub total_cost: Option<f64>,
    /// Server-signaled error messages, in arrival order.
    pub errors: Vec<String>,
}

// ============================================================================
// Video contents
// ============================================================================

/// Reason a video's contents could not be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoContentErrorType {
    /// The URL could not be parsed.
    FailedToParseUrl,
    /// No cached contents and crawling was not allowed.
    CacheNotFound,
    /// The video source failed during crawl.
    CrawlSourceFail,
    /// The video was not found during crawl.
    CrawlNotFound,
    /// The video is too long to crawl.
    CrawlVideoDurationExceedsLimit,
    /// The crawler failed.
    CrawlServerError,
    /// The crawl timed out.
    CrawlTimeout,
    /// An error type this SDK does not know yet.
    #[serde(other)]
    Unknown,
}

/// Retrieval outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentStatusKind {
    /// Contents were retrieved.
    Success,
    /// Contents could not be retrieved; see the error.
    Fail,
}

/// Error details for a failed retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoContentError {
    /// Error category.
    #[serde(rename = "type")]
    pub error_type: VideoContentErrorType,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Retrieval status for one requested URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentStatus {
    /// The requested URL.
    pub url: String,
    /// Outcome.
    pub status: ContentStatusKind,
    /// Error details when `status` is `Fail`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<VideoContentError>,
    /// Whether the contents were crawled live.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_live_crawl: Option<bool>,
}

/// Video metadata plus the requested transcription and summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentData {
    /// Video page URL.
    pub url: String,
    /// Video title.
    pub title: String,
    /// Video description.
    pub description: String,
    /// Thumbnail image.
    pub thumbnail: Thumbnail,
    /// Author / channel.
    pub author: Author,
    /// Published date as an ISO timestamp string.
    pub published_date: String,
    /// Duration in seconds.
    pub duration: f64,
    /// Video page favicon.
    pub favicon: String,
    /// Transcription, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcription: Option<VideoTranscription>,
    /// Summary, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<VideoSummary>,
}

/// Contents for one requested URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoContent {
    /// Video data. Absent when retrieval failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<VideoContentData>,
    /// Retrieval status.
    pub status: VideoContentStatus,
}

impl VideoContent {
    /// Whether retrieval succeeded for this URL.
    pub fn is_success(&self) -> bool {
        self.status.status == ContentStatusKind::Success
    }
}

/// Response of `POST /videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentsResponse {
    /// One entry per requested URL.
    pub results: Vec<VideoContent>,
    /// Cost of the request.
    pub dollar_cost: DollarCost,
}
