//! The answer event stream.
//!
//! [`AnswerStream`] pulls chunks from the response body only when the caller
//! asks for the next event. It owns the body outright: there is no background
//! task, so dropping the stream releases the connection immediately.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{FusedStream, Stream, StreamExt};

use crate::error::VizlookResult;
use crate::types::{StreamEvent, StreamedAnswer};

use super::sse::{map_frame, FrameDecoder};
use super::transport::ByteStream;

/// A lazy stream of [`StreamEvent`]s from `POST /answer` in stream mode.
///
/// Events are yielded in wire order. The stream ends (`None`) when the
/// response body ends; there is no closing event. If reading the body fails,
/// one `Err` is yielded and the stream ends. Events already yielded stay valid.
///
/// # Example
///
/// ```no_run
/// # async fn example(mut stream: vizlook_rs::client::AnswerStream) -> vizlook_rs::VizlookResult<()> {
/// use vizlook_rs::StreamEvent;
///
/// while let Some(event) = stream.next().await {
///     match event? {
///         StreamEvent::AnswerChunk { text } => print!("{text}"),
///         StreamEvent::Citations { citations } => println!("\n{} citations", citations.len()),
///         StreamEvent::Cost { total_cost } => println!("cost: ${total_cost}"),
///         StreamEvent::Error { message } => eprintln!("server error: {message}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct AnswerStream {
    /// Response body; `None` once it has ended, failed, or been released.
    body: Option<ByteStream>,
    decoder: FrameDecoder,
    /// Events decoded from the last chunk that the caller has not pulled yet.
    ready: VecDeque<StreamEvent>,
    path: String,
}

impl std::fmt::Debug for AnswerStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerStream")
            .field("path", &self.path)
            .field("open", &self.body.is_some())
            .field("ready", &self.ready.len())
            .finish_non_exhaustive()
    }
}

impl AnswerStream {
    /// Wrap a response body. `path` is used in error context.
    pub fn new(body: ByteStream, path: impl Into<String>) -> Self {
        Self {
            body: Some(body),
            decoder: FrameDecoder::new(),
            ready: VecDeque::new(),
            path: path.into(),
        }
    }

    /// Get the next event.
    ///
    /// Returns `None` once the stream is exhausted.
    pub async fn next(&mut self) -> Option<VizlookResult<StreamEvent>> {
        StreamExt::next(self).await
    }

    /// Whether the response body is still held.
    pub fn is_open(&self) -> bool {
        self.body.is_some()
    }

    /// Drain the stream and fold every event into a [`StreamedAnswer`].
    ///
    /// Server-signaled `Error` events are collected, not returned as `Err`.
    ///
    /// # Errors
    ///
    /// Fails if reading the body fails.
    pub async fn collect_answer(mut self) -> VizlookResult<StreamedAnswer> {
        let mut answer = StreamedAnswer::default();
        while let Some(event) = self.next().await {
            match event? {
                StreamEvent::AnswerChunk { text } => answer.answer.push_str(&text),
                StreamEvent::Citations { citations } => answer.citations = citations,
                StreamEvent::Cost { total_cost } => answer.total_cost = Some(total_cost),
                StreamEvent::Error { message } => answer.errors.push(message),
            }
        }
        Ok(answer)
    }

    fn release_body(&mut self) {
        if self.body.take().is_some() {
            tracing::debug!(path = %self.path, "answer stream body released");
        }
    }

    fn enqueue(&mut self, frame: &str) {
        if let Some(event) = map_frame(frame) {
            self.ready.push_back(event);
        }
    }
}

impl Stream for AnswerStream {
    type Item = VizlookResult<StreamEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        loop {
            if let Some(event) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(event)));
            }

            let Some(body) = this.body.as_mut() else {
                return Poll::Ready(None);
            };

            match body.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Some(Ok(chunk))) => {
                    for frame in this.decoder.feed(&chunk) {
                        this.enqueue(&frame);
                    }
                }
                Poll::Ready(Some(Err(err))) => {
                    this.release_body();
                    tracing::warn!(path = %this.path, "answer stream failed: {err}");
                    return Poll::Ready(Some(Err(err.with_path(&this.path))));
                }
                Poll::Ready(None) => {
                    this.release_body();
                    if let Some(frame) = this.decoder.flush() {
                        this.enqueue(&frame);
                    }
                }
            }
        }
    }
}

impl FusedStream for AnswerStream {
    fn is_terminated(&self) -> bool {
        self.body.is_none() && self.ready.is_empty()
    }
}
