//! Maps OpenAI-style token usage onto the Claude usage object.

use crate::claude_types::{OutputTokensDetails, Usage};
use crate::openai_types::ChatUsage;

/// Translate an OpenAI `usage` object into a Claude `usage` object.
///
/// Total and deterministic: every populated source field lands in exactly one
/// target field, absent fields stay zero/omitted, nothing is fabricated.
/// `prompt_tokens_details.cached_tokens` maps to `cache_read_input_tokens`;
/// `cache_creation_input_tokens` has no OpenAI-side source and stays absent.
pub fn map_usage(usage: Option<&ChatUsage>) -> Usage {
    let Some(u) = usage else {
        return Usage::default();
    };

    Usage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
        cache_creation_input_tokens: None,
        cache_read_input_tokens: u
            .prompt_tokens_details
            .as_ref()
            .and_then(|d| d.cached_tokens),
        output_tokens_details: u
            .completion_tokens_details
            .as_ref()
            .and_then(|d| d.reasoning_tokens)
            .map(|reasoning_tokens| OutputTokensDetails { reasoning_tokens }),
    }
}
