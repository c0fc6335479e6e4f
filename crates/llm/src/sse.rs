//! Server-sent event decoding for OpenAI-compatible chat completion streams
//!
//! Raw response chunks are buffered as bytes and split into lines. Every
//! complete `data: ` line is decoded into a [`StreamDelta`]. A `[DONE]`
//! payload ends the stream, malformed payloads are logged and skipped.

use crate::types::TransportError;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::pin::Pin;
use tracing::{debug, warn};

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

/// Lazy sequence of text fragments produced by a streaming request
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>;

/// A single decoded provider event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamDelta {
    pub text_fragment: Option<String>,
    pub is_terminal: bool,
}

impl StreamDelta {
    fn terminal() -> Self {
        Self {
            text_fragment: None,
            is_terminal: true,
        }
    }
}

/// A `data:` payload that could not be parsed
#[derive(Debug, thiserror::Error)]
#[error("Failed to parse stream event '{payload}': {source}")]
pub struct DecodeError {
    pub payload: String,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Decodes a single `data:` payload (prefix already stripped)
pub fn parse_event(payload: &str) -> Result<StreamDelta, DecodeError> {
    let chunk: ChatCompletionChunk =
        serde_json::from_str(payload).map_err(|source| DecodeError {
            payload: payload.to_string(),
            source,
        })?;

    let text_fragment = chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty());

    Ok(StreamDelta {
        text_fragment,
        is_terminal: false,
    })
}

/// Incremental SSE line decoder.
///
/// The buffer holds bytes rather than text so that a multi-byte character
/// split across two network chunks decodes the same as an unsplit one.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known to contain no newline
    scanned: usize,
    finished: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a `[DONE]` marker was seen. All further input is ignored.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feeds a raw chunk and returns the events of every line it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamDelta> {
        let mut deltas = Vec::new();
        if self.finished {
            return deltas;
        }

        self.buffer.extend_from_slice(chunk);

        let mut start = 0;
        let mut search_from = self.scanned;
        while let Some(offset) = self.buffer[search_from..]
            .iter()
            .position(|byte| *byte == b'\n')
        {
            let newline = search_from + offset;
            let line = self.buffer[start..newline].to_vec();
            start = newline + 1;
            search_from = start;
            if let Some(delta) = self.decode_line(&line) {
                deltas.push(delta);
            }
            if self.finished {
                self.buffer.clear();
                self.scanned = 0;
                return deltas;
            }
        }

        self.buffer.drain(..start);
        self.scanned = self.buffer.len();
        deltas
    }

    /// Decodes whatever is left in the buffer once the underlying stream ended
    pub fn finish(&mut self) -> Vec<StreamDelta> {
        if self.finished || self.buffer.is_empty() {
            return Vec::new();
        }
        let line = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        self.decode_line(&line).into_iter().collect()
    }

    fn decode_line(&mut self, line: &[u8]) -> Option<StreamDelta> {
        let line = String::from_utf8_lossy(line);
        let payload = line.strip_prefix(DATA_PREFIX)?.trim();

        if payload == DONE_MARKER {
            debug!("Received end of stream marker");
            self.finished = true;
            return Some(StreamDelta::terminal());
        }
        if payload.is_empty() {
            return None;
        }

        match parse_event(payload) {
            Ok(delta) => {
                debug!("Received stream event: '{}'", payload);
                Some(delta)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

/// Turns a stream of raw response chunks into the text fragments it carries.
///
/// Only non-empty fragments are forwarded. The sequence ends at `[DONE]` or
/// when the underlying stream ends. A failing chunk ends the sequence with a
/// [`TransportError::Network`].
pub fn text_fragments<S, B, E>(chunks: S) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut chunks = Box::pin(chunks);
        let mut decoder = SseDecoder::new();

        while let Some(chunk) = chunks.next().await {
            let deltas = match chunk {
                Ok(bytes) => decoder.push(bytes.as_ref()),
                Err(e) => {
                    yield Err(TransportError::Network(format!("Stream interrupted: {e}")));
                    return;
                }
            };
            for delta in deltas {
                if let Some(text) = delta.text_fragment {
                    yield Ok(text);
                }
            }
            if decoder.is_finished() {
                return;
            }
        }

        for delta in decoder.finish() {
            if let Some(text) = delta.text_fragment {
                yield Ok(text);
            }
        }
    };

    Box::pin(stream)
}
