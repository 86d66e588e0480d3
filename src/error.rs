//! Error types for the translation core.
//!
//! Only outer-envelope failures are errors: a response body or a first SSE
//! data line that is not JSON at all. Absent optional fields degrade to
//! empty/zero output, and malformed lines later in a stream are skipped by
//! the stream loop, so neither surfaces here.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TranslateError {
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranslateError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
