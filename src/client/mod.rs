//! Vizlook client: call the search, answer and video contents endpoints.
//!
//! - [`VizlookClient`]: high-level client with one typed method per operation
//! - [`AnswerStream`]: the answer event stream returned by
//!   [`VizlookClient::stream_answer`]
//! - [`FrameDecoder`] / [`map_frame`]: the SSE decoding the stream is built on
//! - [`Transport`] / [`ReqwestTransport`]: pluggable transport layer
//!
//! # Quick Start
//!
//! ```no_run
//! use vizlook_rs::client::VizlookClient;
//! use vizlook_rs::{AnswerOptions, SearchOptions, StreamEvent};
//!
//! # async fn example() -> vizlook_rs::VizlookResult<()> {
//! let client = VizlookClient::from_env()?;
//!
//! let results = client
//!     .search("how to be productive", SearchOptions::default())
//!     .await?;
//! for item in &results.results {
//!     println!("{} ({})", item.title, item.url);
//! }
//!
//! let mut stream = client
//!     .stream_answer("How to learn python?", AnswerOptions::default())
//!     .await?;
//! while let Some(event) = stream.next().await {
//!     if let StreamEvent::AnswerChunk { text } = event? {
//!         print!("{text}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod request;
mod sse;
mod stream;
mod transport;
mod vizlook_client;

pub use request::{
    answer_request, search_request, video_contents_request, ApiRequest, ANSWER_ENDPOINT,
    SEARCH_ENDPOINT, VIDEOS_ENDPOINT,
};
pub use sse::{map_frame, FrameDecoder, DATA_PREFIX, DONE_SENTINEL};
pub use stream::AnswerStream;
pub use transport::{
    ByteStream, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportConfig,
};
pub use vizlook_client::VizlookClient;
