//! # vizlook-rs: Rust SDK for the Vizlook video search API
//!
//! Vizlook indexes online videos and answers questions from them. This crate
//! is a typed async client for its HTTP API:
//!
//! - `POST /search`: find videos matching a query
//! - `POST /answer`: answer a query from video content, either as a single
//!   response or as a stream of events over Server-Sent Events (SSE)
//! - `POST /videos`: fetch transcriptions and summaries for given video URLs
//!
//! ## Quick Start
//!
//! ```no_run
//! use vizlook_rs::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads VIZLOOK_API_KEY
//!     let client = VizlookClient::from_env()?;
//!
//!     let answer = client
//!         .answer("How to learn python?", AnswerOptions::default())
//!         .await?;
//!     println!("{}", answer.answer);
//!
//!     // Or stream it as it is generated
//!     let mut stream = client
//!         .stream_answer("How to learn python?", AnswerOptions::default())
//!         .await?;
//!     while let Some(event) = stream.next().await {
//!         match event? {
//!             StreamEvent::AnswerChunk { text } => print!("{text}"),
//!             StreamEvent::Citations { citations } => {
//!                 println!("\n{} citations", citations.len());
//!             }
//!             StreamEvent::Cost { total_cost } => println!("cost: ${total_cost}"),
//!             StreamEvent::Error { message } => eprintln!("error: {message}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Streaming
//!
//! The answer stream is pull-based: a chunk is read from the connection only
//! when the caller asks for the next event. Dropping an [`client::AnswerStream`]
//! releases the connection. A non-success HTTP status is reported as
//! [`VizlookError::RequestFailed`] before any stream is returned.
//!
//! Malformed or unknown frames are skipped, so newer server event types do not
//! break older clients.
//!
//! ## Architecture
//!
//! - [`client::VizlookClient`]: typed methods for every operation
//! - [`client::AnswerStream`]: the answer event stream
//! - [`client::FrameDecoder`]: incremental SSE `data:` frame decoder
//! - [`client::Transport`]: pluggable HTTP transport, [`client::ReqwestTransport`] by default
//! - [`builders::ClientBuilder`]: API key, base URL, timeouts and headers
//! - [`error::VizlookError`]: error type with the API's HTTP status codes

pub mod builders;
pub mod client;
pub mod error;
pub mod types;

/// Prelude module that re-exports commonly used types and traits.
///
/// ```
/// use vizlook_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::types::{
        AnswerOptions, AnswerResponse, Category, CitationItem, CrawlMode, PublishedDate,
        SearchOptions, SearchResponse, SearchResultItem, StreamEvent, StreamedAnswer,
        VideoContent, VideoContentsOptions, VideoContentsResponse, VideoUrls,
    };

    pub use crate::error::{VizlookError, VizlookResult};

    pub use crate::builders::ClientBuilder;
    pub use crate::client::{AnswerStream, VizlookClient};
}

pub use builders::ClientBuilder;
pub use client::VizlookClient;
pub use error::{VizlookError, VizlookResult};
pub use types::*;
