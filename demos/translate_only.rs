//! Demonstrate the translation layer on canned upstream payloads.
//!
//! Usage:
//!   `cargo run --example translate_only`

use claude_translate::{translate_completion, translate_sse_buffer};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    // A complete OpenAI-style response with reasoning and usage details
    let response = br#"{
      "id": "chatcmpl-demo",
      "model": "kimi-k2p5",
      "choices": [{
        "finish_reason": "stop",
        "message": {
          "content": "The capital of Germany is Berlin.",
          "reasoning": "The user asked a geography question; recall the capital."
        }
      }],
      "usage": {
        "prompt_tokens": 42,
        "completion_tokens": 9,
        "completion_tokens_details": {"reasoning_tokens": 5}
      }
    }"#;

    let message = translate_completion(response).expect("translation failed");
    let pretty: serde_json::Value = serde_json::from_slice(&message).unwrap();

    println!("=== Translated Response (Claude Messages format) ===");
    println!("{}", serde_json::to_string_pretty(&pretty).unwrap());

    // The same backend streaming: reasoning first, then the answer
    let sse = concat!(
        "data: {\"id\":\"chatcmpl-demo\",\"model\":\"kimi-k2p5\",\"choices\":[{\"delta\":{\"reasoning\":\"Recall the capital...\"}}]}\n",
        "data: {\"id\":\"chatcmpl-demo\",\"model\":\"kimi-k2p5\",\"choices\":[{\"delta\":{\"content\":\"The capital\"}}]}\n",
        "data: {\"id\":\"chatcmpl-demo\",\"model\":\"kimi-k2p5\",\"choices\":[{\"delta\":{\"content\":\" is Berlin.\"},\"finish_reason\":\"stop\"}]}\n",
        "data: [DONE]\n",
    );

    println!();
    println!("=== Streaming Translation Demo ===");

    let events = translate_sse_buffer(sse.as_bytes()).expect("stream translation failed");
    for event in &events {
        print!("{}", event.to_sse_string());
    }

    println!("Done! The translation layer works without any network calls.");
}
