//! Normalizes the reasoning ("thinking") text out of a response fragment.
//!
//! Backends encode reasoning in at least three layouts, introduced at
//! different times. Extraction tries them in that order and the first
//! non-empty match wins; shapes further down the list are ignored even when
//! present:
//!
//! 1. a flat `reasoning` string on the delta/message (`reasoning_content`
//!    accepted as an alternate spelling at the same level);
//! 2. a `content` array element of type `"reasoning"` whose `summary` holds
//!    `{type:"summary_text", text}` parts, concatenated in array order;
//! 3. a choice-level `reasoning.summary` array sibling to `message`.
//!
//! Both the streaming and non-streaming translators go through this module,
//! so a new backend layout is added in exactly one place.

use crate::openai_types::{Choice, ChunkDelta, MessageContent, SummaryPart};

/// Extract reasoning text from a streaming delta. `None` means the caller
/// must not open or feed a thinking block for this chunk.
pub fn extract_from_delta(delta: &ChunkDelta) -> Option<String> {
    if let Some(text) = flat(delta.reasoning.as_deref(), delta.reasoning_content.as_deref()) {
        return Some(text);
    }
    summary_in_content(delta.content.as_ref())
}

/// Extract reasoning text from a non-streaming choice, checking the message
/// first and the choice-level `reasoning.summary` last.
pub fn extract_from_choice(choice: &Choice) -> Option<String> {
    if let Some(text) = flat(
        choice.message.reasoning.as_deref(),
        choice.message.reasoning_content.as_deref(),
    ) {
        return Some(text);
    }
    if let Some(text) = summary_in_content(choice.message.content.as_ref()) {
        return Some(text);
    }
    choice
        .reasoning
        .as_ref()
        .and_then(|r| non_empty(concat_summaries(&r.summary)))
}

fn flat(reasoning: Option<&str>, reasoning_content: Option<&str>) -> Option<String> {
    reasoning
        .filter(|s| !s.is_empty())
        .or_else(|| reasoning_content.filter(|s| !s.is_empty()))
        .map(str::to_string)
}

fn summary_in_content(content: Option<&MessageContent>) -> Option<String> {
    let Some(MessageContent::Parts(parts)) = content else {
        return None;
    };
    let joined: String = parts
        .iter()
        .filter_map(|p| p.reasoning_summary())
        .map(concat_summaries)
        .collect();
    non_empty(joined)
}

/// Concatenate the `text` of every `summary_text` entry, in array order.
fn concat_summaries(parts: &[SummaryPart]) -> String {
    parts
        .iter()
        .filter(|p| p.part_type == "summary_text")
        .map(|p| p.text.as_str())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
