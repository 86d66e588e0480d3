//! SSE framing around the stream translator.
//!
//! The gateway hands us the upstream body either as one complete buffer
//! ([`translate_sse_buffer`]) or as a live byte stream
//! ([`translate_byte_stream`]). Both walk the `data:` lines in arrival order,
//! feed each parsed chunk to a [`StreamTranslator`], and flush the
//! terminator events at `[DONE]` or end-of-input.
//!
//! A malformed data line is skipped, not fatal, except the very first one,
//! which fails the buffered call since the stream as a whole is then
//! unusable. Dropping the stream returned by [`translate_byte_stream`] is
//! how a caller cancels mid-flight; events already yielded stay valid.

use bytes::Bytes;
use futures::stream::Stream;
use futures::StreamExt;

use crate::claude_types::StreamEvent;
use crate::error::{Result, TranslateError};
use crate::openai_types::ChatCompletionChunk;
use crate::stream::StreamTranslator;

/// One Claude SSE event, ready to be written as `event:`/`data:` lines.
#[derive(Debug, Clone)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
}

impl SseEvent {
    pub fn from_stream_event(event: &StreamEvent) -> Option<Self> {
        serde_json::to_string(event).ok().map(|data| Self {
            event: event.event_name().to_string(),
            data,
        })
    }

    /// Render as SSE wire text: `event: <kind>\ndata: {json}\n\n`.
    pub fn to_sse_string(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event, self.data)
    }
}

/// Outcome of one `data:` line. Skips are a value, not an error, so the
/// fatal/non-fatal boundary stays in the loop that consumes them.
enum DataLine {
    Chunk(Box<ChatCompletionChunk>),
    Done,
    Skip,
}

fn parse_data_line(line: &str) -> Option<&str> {
    line.strip_prefix("data: ")
        .or_else(|| line.strip_prefix("data:"))
        .map(str::trim)
}

fn classify(data: &str) -> DataLine {
    if data == "[DONE]" {
        return DataLine::Done;
    }
    match serde_json::from_str(data) {
        Ok(chunk) => DataLine::Chunk(Box::new(chunk)),
        Err(e) => {
            tracing::debug!(error = %e, "skipping unparseable stream chunk");
            DataLine::Skip
        }
    }
}

/// Translate a complete raw OpenAI SSE buffer into the ordered Claude event
/// sequence, terminator included.
pub fn translate_sse_buffer(raw: &[u8]) -> Result<Vec<SseEvent>> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| TranslateError::parse(format!("stream is not valid utf-8: {e}")))?;

    let mut translator = StreamTranslator::new();
    let mut out = Vec::new();
    let mut data_lines = 0usize;

    'lines: for line in text.lines() {
        let Some(data) = parse_data_line(line.trim()) else {
            continue;
        };
        if data.is_empty() {
            continue;
        }
        data_lines += 1;

        match classify(data) {
            DataLine::Done => break 'lines,
            DataLine::Chunk(chunk) => {
                push_events(&mut out, translator.process_chunk(&chunk));
            }
            DataLine::Skip => {
                if data_lines == 1 {
                    return Err(TranslateError::parse(
                        "first stream data line is not valid JSON",
                    ));
                }
            }
        }
    }

    push_events(&mut out, translator.finish());
    Ok(out)
}

/// Translate a live OpenAI SSE byte stream into a stream of Claude SSE
/// events. Lines are reassembled across chunk boundaries; the translator's
/// terminator events are flushed when the input ends, `[DONE]` or not.
pub fn translate_byte_stream<S, E>(byte_stream: S) -> impl Stream<Item = SseEvent> + Send
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send,
{
    async_stream::stream! {
        let mut translator = StreamTranslator::new();
        let mut buffer = String::new();

        tokio::pin!(byte_stream);

        'outer: while let Some(chunk_result) = byte_stream.next().await {
            let bytes = match chunk_result {
                Ok(b) => b,
                Err(e) => {
                    tracing::warn!(error = %e, "upstream byte stream failed");
                    break;
                }
            };

            buffer.push_str(&String::from_utf8_lossy(&bytes));

            // Process complete lines
            while let Some(newline_pos) = buffer.find('\n') {
                let line = buffer[..newline_pos].trim().to_string();
                buffer = buffer[newline_pos + 1..].to_string();

                let Some(data) = parse_data_line(&line) else {
                    continue;
                };
                if data.is_empty() {
                    continue;
                }

                match classify(data) {
                    DataLine::Done => break 'outer,
                    DataLine::Skip => {}
                    DataLine::Chunk(chunk) => {
                        for event in translator.process_chunk(&chunk) {
                            if let Some(sse) = SseEvent::from_stream_event(&event) {
                                yield sse;
                            }
                        }
                    }
                }
            }
        }

        for event in translator.finish() {
            if let Some(sse) = SseEvent::from_stream_event(&event) {
                yield sse;
            }
        }
    }
}

fn push_events(out: &mut Vec<SseEvent>, events: Vec<StreamEvent>) {
    for event in events {
        if let Some(sse) = SseEvent::from_stream_event(&event) {
            out.push(sse);
        }
    }
}
