//! Response translation between `OpenAI` and Claude wire formats.
//!
//! The response-side core of a gateway that serves Claude Messages API
//! clients from an `OpenAI`-compatible backend. The surrounding gateway
//! performs the network fetch and hands this crate already-fetched bytes:
//! a complete JSON body, a complete SSE buffer, or a live byte stream.
//! Translation functions are pure (no I/O); the one async surface,
//! [`sse::translate_byte_stream`], is cancelled by dropping it.
//!
//! Reasoning ("thinking") content arrives from backends in several
//! inconsistent encodings and token usage in nested `*_details` objects;
//! [`reasoning`] and [`usage`] normalize both into the single Claude
//! representation used by the streaming and non-streaming paths alike.

pub mod claude_types;
pub mod error;
pub mod openai_types;
pub mod reasoning;
pub mod response;
pub mod sse;
pub mod stream;
pub mod usage;

pub use error::{Result, TranslateError};
pub use response::{openai_error_to_claude, openai_to_claude, translate_completion};
pub use sse::{translate_byte_stream, translate_sse_buffer, SseEvent};
pub use stream::StreamTranslator;
pub use usage::map_usage;

/// Output of [`translate`]: one full message body, or the SSE event sequence.
#[derive(Debug, Clone)]
pub enum Translated {
    Message(Vec<u8>),
    Events(Vec<SseEvent>),
}

/// Translate one fetched upstream response. The original client request is
/// consulted only for its `stream` flag, which selects the path; it is not
/// otherwise transformed.
pub fn translate(original_request: &[u8], response: &[u8]) -> Result<Translated> {
    if wants_stream(original_request) {
        Ok(Translated::Events(sse::translate_sse_buffer(response)?))
    } else {
        Ok(Translated::Message(response::translate_completion(
            response,
        )?))
    }
}

/// Whether the original client request asked for a streaming response.
pub fn wants_stream(original_request: &[u8]) -> bool {
    #[derive(serde::Deserialize, Default)]
    struct StreamFlag {
        #[serde(default)]
        stream: bool,
    }

    serde_json::from_slice::<StreamFlag>(original_request)
        .map(|f| f.stream)
        .unwrap_or(false)
}
