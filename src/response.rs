//! Translate a complete OpenAI Chat Completion response into a Claude
//! Messages response.
//!
//! Composition order is fixed: extracted reasoning becomes one leading
//! `thinking` block, then the answer text block(s), then any `tool_use`
//! blocks. A thinking block always precedes the text it explains.

use crate::claude_types::{ErrorResponse, MessagesResponse, ResponseContentBlock, Usage};
use crate::error::{Result, TranslateError};
use crate::openai_types::{ChatCompletionResponse, ChatErrorResponse, MessageContent};
use crate::reasoning;
use crate::usage::map_usage;

/// Translate raw OpenAI response bytes into raw Claude message bytes.
///
/// Malformed top-level JSON fails the call; a missing `choices` array is not
/// malformed and yields an empty-content message.
pub fn translate_completion(response: &[u8]) -> Result<Vec<u8>> {
    let resp: ChatCompletionResponse = serde_json::from_slice(response)
        .map_err(|e| TranslateError::parse(format!("invalid completion response: {e}")))?;
    let translated = openai_to_claude(&resp);
    Ok(serde_json::to_vec(&translated)?)
}

/// Translate a parsed OpenAI Chat Completion response. Pure function.
pub fn openai_to_claude(resp: &ChatCompletionResponse) -> MessagesResponse {
    let choice = resp.choices.first();

    let mut content: Vec<ResponseContentBlock> = Vec::new();

    if let Some(c) = choice {
        if let Some(thinking) = reasoning::extract_from_choice(c) {
            content.push(ResponseContentBlock::Thinking {
                thinking,
                signature: None,
            });
        }

        match c.message.content.as_ref() {
            Some(MessageContent::Text(text)) if !text.is_empty() => {
                content.push(ResponseContentBlock::Text { text: text.clone() });
            }
            Some(MessageContent::Parts(parts)) => {
                for part in parts {
                    if let Some(text) = part.output_text() {
                        content.push(ResponseContentBlock::Text {
                            text: text.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }

        if let Some(tool_calls) = c.message.tool_calls.as_ref() {
            for tc in tool_calls {
                let input: serde_json::Value =
                    serde_json::from_str(&tc.function.arguments).unwrap_or(serde_json::Value::Null);

                content.push(ResponseContentBlock::ToolUse {
                    id: tc.id.clone(),
                    name: tc.function.name.clone(),
                    input,
                });
            }
        }
    }

    let stop_reason = choice
        .and_then(|c| c.finish_reason.as_deref())
        .map(map_finish_reason)
        .unwrap_or_else(|| "end_turn".to_string());

    let usage: Usage = map_usage(resp.usage.as_ref());

    MessagesResponse {
        id: claude_message_id(&resp.id),
        response_type: "message".to_string(),
        role: "assistant".to_string(),
        content,
        model: resp.model.clone(),
        stop_reason: Some(stop_reason),
        stop_sequence: None,
        usage,
    }
}

/// Map OpenAI `finish_reason` to Claude `stop_reason`. Unrecognized values
/// pass through unchanged.
pub fn map_finish_reason(reason: &str) -> String {
    match reason {
        "stop" => "end_turn".to_string(),
        "length" => "max_tokens".to_string(),
        "tool_calls" | "function_call" => "tool_use".to_string(),
        "content_filter" => "end_turn".to_string(),
        other => other.to_string(),
    }
}

/// Reuse the upstream response id under the Claude `msg_` prefix; the stream
/// translator falls back to a generated id when the source has none.
pub fn claude_message_id(source_id: &str) -> String {
    if source_id.is_empty() {
        format!("msg_{}", uuid::Uuid::new_v4().to_string().replace('-', ""))
    } else {
        format!("msg_{}", source_id.trim_start_matches("chatcmpl-"))
    }
}

/// Translate an OpenAI error body into a Claude error response.
pub fn openai_error_to_claude(err: &ChatErrorResponse) -> ErrorResponse {
    let error_type = match err.error.error_type.as_str() {
        "invalid_request_error" => "invalid_request_error",
        "rate_limit_error" | "rate_limit_exceeded" => "rate_limit_error",
        "server_error" | "internal_error" => "api_error",
        _ => "api_error",
    };

    ErrorResponse::new(error_type, &err.error.message)
}
