//! Server-Sent Events (SSE) decoding for the answer stream.
//!
//! Two stages:
//!
//! - [`FrameDecoder`] turns arbitrarily fragmented bytes into `data:` payloads
//!   ("frames"). It carries partial lines and partial UTF-8 sequences across
//!   chunk boundaries.
//! - [`map_frame`] parses one frame's JSON into a typed [`StreamEvent`].
//!
//! Only `data:` lines are meaningful. `event:`, `id:`, `retry:` and comment
//! lines are dropped, as are blank lines. A `[DONE]` payload produces no
//! frame; the stream ends when the byte source ends.
//!
//! # Lenient frame parsing
//!
//! A frame that is not valid JSON, has no `type`, has a `type` this SDK does
//! not know, or has a `data` payload of the wrong shape is discarded. One bad
//! frame never aborts the stream and is never surfaced as an error, so the
//! server can add new event types without breaking older clients.

use serde::Deserialize;

use crate::types::{CitationItem, DollarCost, StreamEvent};

/// Prefix of the only SSE field this decoder reads.
pub const DATA_PREFIX: &str = "data:";

/// Payload that marks "no event".
pub const DONE_SENTINEL: &str = "[DONE]";

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Incremental decoder from raw SSE bytes to `data:` payloads.
///
/// After every [`feed`](Self::feed) the internal buffer holds at most one
/// partial line (no `\n`), which is completed by the next chunk or by
/// [`flush`](Self::flush).
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Decoded text of the trailing partial line.
    buffer: String,
    /// Bytes of a UTF-8 sequence split by a chunk boundary.
    pending_utf8: Vec<u8>,
    /// Set once the first character has been decoded.
    started: bool,
}

impl FrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk and return the payload of every `data:` line it completes.
    ///
    /// Payloads are trimmed. Empty payloads and the `[DONE]` sentinel are skipped.
    /// A byte order mark at the very start of the stream is dropped.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let decoded = self.decode_utf8(chunk);
        let mut text = decoded.as_str();
        if !self.started && !text.is_empty() {
            self.started = true;
            text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        }
        self.buffer.push_str(text);

        let mut frames = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[start..].find('\n') {
            let end = start + offset;
            if let Some(frame) = extract_frame(&self.buffer[start..end]) {
                frames.push(frame);
            }
            start = end + 1;
        }
        self.buffer.drain(..start);

        frames
    }

    /// Finish decoding once the byte source has ended.
    ///
    /// Returns the trailing `data:` line if the stream did not end with a
    /// newline. Leaves the decoder empty.
    pub fn flush(&mut self) -> Option<String> {
        let mut rest = std::mem::take(&mut self.buffer);
        if !self.pending_utf8.is_empty() {
            self.pending_utf8.clear();
            rest.push(char::REPLACEMENT_CHARACTER);
        }
        extract_frame(&rest)
    }

    /// The undecoded trailing partial line.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    /// Decode `chunk` after any bytes carried over from the previous chunk.
    ///
    /// Invalid sequences become U+FFFD. An incomplete sequence at the end is
    /// held back until more bytes arrive.
    fn decode_utf8(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending_utf8);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest: &[u8] = &bytes;
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let valid_len = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&rest[..valid_len]));
                    match err.error_len() {
                        Some(bad_len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &rest[valid_len + bad_len..];
                        }
                        None => {
                            self.pending_utf8 = rest[valid_len..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }
}

/// Payload of a single line, if it is a non-empty, non-sentinel `data:` line.
fn extract_frame(line: &str) -> Option<String> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() || payload == DONE_SENTINEL {
        return None;
    }
    Some(payload.to_string())
}

// ---------------------------------------------------------------------------
// Event mapping
// ---------------------------------------------------------------------------

/// Wire shape of one answer-stream frame: `{"type": ..., "data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data")]
enum WireEvent {
    #[serde(rename = "answer-chunk")]
    AnswerChunk(String),
    #[serde(rename = "citations", alias = "data-citations")]
    Citations(CitationsPayload),
    #[serde(rename = "cost", alias = "data-cost")]
    Cost(CostPayload),
    #[serde(rename = "error")]
    Error(ErrorPayload),
}

#[derive(Debug, Deserialize)]
struct CitationsPayload {
    citations: Vec<CitationItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CostPayload {
    dollar_cost: DollarCost,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorPayload {
    error_text: String,
}

impl From<WireEvent> for StreamEvent {
    fn from(event: WireEvent) -> Self {
        match event {
            WireEvent::AnswerChunk(text) => StreamEvent::AnswerChunk { text },
            WireEvent::Citations(payload) => StreamEvent::Citations {
                citations: payload.citations,
            },
            WireEvent::Cost(payload) => StreamEvent::Cost {
                total_cost: payload.dollar_cost.total,
            },
            WireEvent::Error(payload) => StreamEvent::Error {
                message: payload.error_text,
            },
        }
    }
}

/// Parse a frame payload into a [`StreamEvent`].
///
/// Returns `None` for anything that does not match a known event shape (see
/// the module docs on lenient frame parsing). Discards are logged at debug level.
pub fn map_frame(frame: &str) -> Option<StreamEvent> {
    match serde_json::from_str::<WireEvent>(frame) {
        Ok(event) => Some(event.into()),
        Err(e) => {
            tracing::debug!(
                frame_len = frame.len(),
                "discarding unrecognized answer stream frame: {e}"
            );
            None
        }
    }
}
