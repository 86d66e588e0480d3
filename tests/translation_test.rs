use claude_translate::{
    translate, translate_completion, translate_sse_buffer, wants_stream, Translated,
};

// ────────────────────────────────────────────────────────────────
// Streaming: raw SSE buffers in, Claude SSE events out
// ────────────────────────────────────────────────────────────────

#[test]
fn test_stream_reasoning_fallback_field() {
    let raw = b"data: {\"id\":\"chatcmpl_1\",\"model\":\"claude-opus-4.6\",\"choices\":[{\"delta\":{\"reasoning\":\"reasoning from fallback field\"}}]}";

    let events = translate_sse_buffer(raw).unwrap();
    let joined: String = events.iter().map(|e| e.to_sse_string()).collect();

    assert!(
        joined.contains("\"type\":\"thinking_delta\""),
        "stream output missing thinking_delta: {joined}"
    );
    assert!(
        joined.contains("reasoning from fallback field"),
        "stream output missing fallback reasoning text: {joined}"
    );
}

#[test]
fn test_stream_content_array_reasoning() {
    let raw = b"data: {\"id\":\"chatcmpl_3\",\"model\":\"claude-opus-4.6\",\"choices\":[{\"delta\":{\"content\":[{\"type\":\"reasoning\",\"summary\":[{\"type\":\"summary_text\",\"text\":\"reasoning from summary\"}]},{\"type\":\"output_text\",\"text\":\"final answer\"}]}}]}";

    let events = translate_sse_buffer(raw).unwrap();
    let joined: String = events.iter().map(|e| e.to_sse_string()).collect();

    assert!(joined.contains("\"type\":\"thinking_delta\""));
    assert!(joined.contains("reasoning from summary"));
    assert!(joined.contains("\"type\":\"text_delta\""));
    assert!(joined.contains("final answer"));

    // Thinking precedes text
    let thinking_pos = joined.find("thinking_delta").unwrap();
    let text_pos = joined.find("text_delta").unwrap();
    assert!(thinking_pos < text_pos);
}

#[test]
fn test_stream_block_indices_strictly_increase() {
    let raw = concat!(
        "data: {\"choices\":[{\"delta\":{\"reasoning\":\"think\"}}]}\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"answer\"}}]}\n",
        "data: {\"choices\":[{\"delta\":{\"reasoning\":\"more\"}}]}\n",
        "data: [DONE]\n",
    );

    let events = translate_sse_buffer(raw.as_bytes()).unwrap();

    let start_indices: Vec<u64> = events
        .iter()
        .filter(|e| e.event == "content_block_start")
        .map(|e| {
            serde_json::from_str::<serde_json::Value>(&e.data).unwrap()["index"]
                .as_u64()
                .unwrap()
        })
        .collect();

    assert_eq!(start_indices, vec![0, 1, 2]);
}

// ────────────────────────────────────────────────────────────────
// Non-streaming: raw JSON bodies in, Claude message bytes out
// ────────────────────────────────────────────────────────────────

#[test]
fn test_nonstream_reasoning_and_usage() {
    let raw = br#"{
      "id":"chatcmpl_2",
      "model":"claude-opus-4.6",
      "choices":[{"finish_reason":"stop","message":{"content":"answer","reasoning":"model reasoning"}}],
      "usage":{
        "prompt_tokens":120,
        "completion_tokens":80,
        "prompt_tokens_details":{"cached_tokens":20},
        "completion_tokens_details":{"reasoning_tokens":33}
      }
    }"#;

    let out = translate_completion(raw).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let thinking = parsed["content"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["type"] == "thinking")
        .expect("missing thinking block from message.reasoning");
    assert_eq!(thinking["thinking"], "model reasoning");

    assert_eq!(parsed["usage"]["input_tokens"], 120);
    assert_eq!(parsed["usage"]["output_tokens"], 80);
    assert_eq!(parsed["usage"]["output_tokens_details"]["reasoning_tokens"], 33);
    assert_eq!(parsed["usage"]["cache_read_input_tokens"], 20);
    assert_eq!(parsed["stop_reason"], "end_turn");
}

#[test]
fn test_nonstream_top_level_reasoning_summary() {
    let raw = br#"{
      "id":"chatcmpl_4",
      "model":"claude-opus-4.6",
      "choices":[{
        "finish_reason":"stop",
        "reasoning":{"summary":[{"type":"summary_text","text":"top level reasoning"}]},
        "message":{"content":[{"type":"output_text","text":"ok"}]}
      }]
    }"#;

    let out = translate_completion(raw).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let content = parsed["content"].as_array().unwrap();

    let thinking = content.iter().find(|b| b["type"] == "thinking").unwrap();
    assert_eq!(thinking["thinking"], "top level reasoning");

    let text = content.iter().find(|b| b["type"] == "text").unwrap();
    assert_eq!(text["text"], "ok");

    // thinking block comes first
    assert_eq!(content[0]["type"], "thinking");
}

#[test]
fn test_translation_is_idempotent() {
    let raw = br#"{"id":"chatcmpl_2","model":"m","choices":[{"finish_reason":"stop","message":{"content":"answer","reasoning":"r"}}],"usage":{"prompt_tokens":1,"completion_tokens":2}}"#;

    assert_eq!(
        translate_completion(raw).unwrap(),
        translate_completion(raw).unwrap()
    );

    let stream_raw = b"data: {\"id\":\"chatcmpl_1\",\"model\":\"m\",\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\ndata: [DONE]\n";
    let first: Vec<String> = translate_sse_buffer(stream_raw)
        .unwrap()
        .iter()
        .map(|e| e.to_sse_string())
        .collect();
    let second: Vec<String> = translate_sse_buffer(stream_raw)
        .unwrap()
        .iter()
        .map(|e| e.to_sse_string())
        .collect();

    // The message id is derived from the source id, so output is byte-identical
    assert_eq!(first, second);
}

// ────────────────────────────────────────────────────────────────
// Dispatch on the original request's stream flag
// ────────────────────────────────────────────────────────────────

#[test]
fn test_dispatch_by_stream_flag() {
    assert!(wants_stream(br#"{"stream":true}"#));
    assert!(!wants_stream(br#"{"stream":false}"#));
    assert!(!wants_stream(br#"{"model":"m"}"#));
    assert!(!wants_stream(b"not json"));

    let streaming = translate(
        br#"{"stream":true}"#,
        b"data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\n",
    )
    .unwrap();
    assert!(matches!(streaming, Translated::Events(_)));

    let buffered = translate(
        br#"{"stream":false}"#,
        br#"{"id":"chatcmpl_1","model":"m","choices":[{"finish_reason":"stop","message":{"content":"hi"}}]}"#,
    )
    .unwrap();
    assert!(matches!(buffered, Translated::Message(_)));
}
