//! State machine for translating OpenAI streaming chunks into Claude SSE
//! events.
//!
//! The [`StreamTranslator`] processes OpenAI `ChatCompletionChunk`s one at a
//! time, tracking which content block is open and which index it owns, and
//! emits the corresponding Claude stream events (`message_start`,
//! `content_block_start`, `content_block_delta`, ...). Reasoning deltas feed
//! a `thinking` block, answer text feeds a `text` block; opening a block of
//! one kind closes the other first. Indices only ever grow; a closed block's
//! index is never reused.
//!
//! One translator instance belongs to one stream. Concurrent streams each get
//! their own instance; nothing is shared.

use crate::claude_types::{
    Delta, DeltaUsage, MessageDeltaBody, MessagesResponse, ResponseContentBlock, StreamEvent, Usage,
};
use crate::openai_types::{ChatCompletionChunk, MessageContent};
use crate::reasoning;
use crate::response::{claude_message_id, map_finish_reason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Thinking,
    Text,
}

#[derive(Debug, Clone, Copy)]
struct OpenBlock {
    index: usize,
    kind: BlockKind,
}

/// Tracks an in-progress tool call being streamed, keyed by the OpenAI
/// tool-call index.
#[derive(Debug, Clone, Default)]
struct ActiveToolCall {
    block_index: usize,
    emitted_start: bool,
}

/// State machine that translates OpenAI streaming chunks into Claude SSE events.
///
/// Usage:
///   let mut translator = StreamTranslator::new();
///   for chunk in openai_chunks {
///       let events = translator.process_chunk(&chunk);
///       // send each event as SSE
///   }
///   let final_events = translator.finish();
#[derive(Debug)]
pub struct StreamTranslator {
    msg_id: String,
    model: String,
    started: bool,
    finished: bool,
    next_block_index: usize,
    open_block: Option<OpenBlock>,
    active_tool_calls: Vec<ActiveToolCall>,
    input_tokens: u64,
    output_tokens: u64,
}

impl Default for StreamTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamTranslator {
    /// Message id and model are taken from the first chunk that arrives.
    pub fn new() -> Self {
        Self {
            msg_id: String::new(),
            model: String::new(),
            started: false,
            finished: false,
            next_block_index: 0,
            open_block: None,
            active_tool_calls: Vec::new(),
            input_tokens: 0,
            output_tokens: 0,
        }
    }

    /// Process a single OpenAI streaming chunk, returning zero or more Claude
    /// SSE events. A chunk with neither reasoning nor content (e.g. a
    /// role-only delta) emits nothing and leaves the block state untouched.
    pub fn process_chunk(&mut self, chunk: &ChatCompletionChunk) -> Vec<StreamEvent> {
        if self.finished {
            return Vec::new();
        }

        let mut events = Vec::new();

        if let Some(usage) = &chunk.usage {
            self.input_tokens = usage.prompt_tokens;
            self.output_tokens = usage.completion_tokens;
        }

        if !self.started {
            self.msg_id = claude_message_id(&chunk.id);
            self.model = chunk.model.clone();
            events.push(self.make_message_start());
            events.push(StreamEvent::Ping);
            self.started = true;
        }

        let choice = match chunk.choices.first() {
            Some(c) => c,
            None => return events,
        };

        if let Some(thinking) = reasoning::extract_from_delta(&choice.delta) {
            let index = self.ensure_block(BlockKind::Thinking, &mut events);
            events.push(StreamEvent::ContentBlockDelta {
                index,
                delta: Delta::ThinkingDelta { thinking },
            });
        }

        match choice.delta.content.as_ref() {
            Some(MessageContent::Text(text)) if !text.is_empty() => {
                let index = self.ensure_block(BlockKind::Text, &mut events);
                events.push(StreamEvent::ContentBlockDelta {
                    index,
                    delta: Delta::TextDelta { text: text.clone() },
                });
            }
            Some(MessageContent::Parts(parts)) => {
                for part in parts {
                    let Some(text) = part.output_text().filter(|t| !t.is_empty()) else {
                        continue;
                    };
                    let index = self.ensure_block(BlockKind::Text, &mut events);
                    events.push(StreamEvent::ContentBlockDelta {
                        index,
                        delta: Delta::TextDelta {
                            text: text.to_string(),
                        },
                    });
                }
            }
            _ => {}
        }

        if let Some(tool_calls) = &choice.delta.tool_calls {
            for tc in tool_calls {
                let tc_index = tc.index as usize;

                // A delta carrying an id starts a new tool call
                if tc.id.is_some() {
                    self.close_open_block(&mut events);

                    let block_index = self.next_block_index;
                    self.next_block_index += 1;

                    let tool_id = tc.id.clone().unwrap_or_default();
                    let tool_name = tc
                        .function
                        .as_ref()
                        .and_then(|f| f.name.clone())
                        .unwrap_or_default();

                    events.push(StreamEvent::ContentBlockStart {
                        index: block_index,
                        content_block: ResponseContentBlock::ToolUse {
                            id: tool_id,
                            name: tool_name,
                            input: serde_json::Value::Object(serde_json::Map::new()),
                        },
                    });

                    if self.active_tool_calls.len() <= tc_index {
                        self.active_tool_calls
                            .resize_with(tc_index + 1, ActiveToolCall::default);
                    }
                    self.active_tool_calls[tc_index] = ActiveToolCall {
                        block_index,
                        emitted_start: true,
                    };
                }

                // Argument fragments stream against the recorded block
                let args = tc
                    .function
                    .as_ref()
                    .and_then(|f| f.arguments.as_deref())
                    .filter(|a| !a.is_empty());
                if let Some(args) = args {
                    let block = self
                        .active_tool_calls
                        .get(tc_index)
                        .filter(|t| t.emitted_start);
                    if let Some(block) = block {
                        events.push(StreamEvent::ContentBlockDelta {
                            index: block.block_index,
                            delta: Delta::InputJsonDelta {
                                partial_json: args.to_string(),
                            },
                        });
                    }
                }
            }
        }

        if let Some(reason) = &choice.finish_reason {
            events.append(&mut self.make_finish_events(reason));
        }

        events
    }

    /// Call when the stream ends (on `[DONE]` or end-of-input) to close any
    /// open block and flush the terminator events.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        if self.finished {
            return Vec::new();
        }

        if !self.started {
            self.msg_id = claude_message_id("");
            let mut events = vec![self.make_message_start()];
            events.append(&mut self.make_finish_events("stop"));
            return events;
        }

        // No finish_reason seen; close out as a natural stop
        self.make_finish_events("stop")
    }

    /// Return the index of the open block of `kind`, closing any open block
    /// of the other kind and opening a fresh one (next index) as needed.
    fn ensure_block(&mut self, kind: BlockKind, events: &mut Vec<StreamEvent>) -> usize {
        if let Some(open) = self.open_block {
            if open.kind == kind {
                return open.index;
            }
        }

        self.close_open_block(events);

        let index = self.next_block_index;
        self.next_block_index += 1;

        let content_block = match kind {
            BlockKind::Thinking => ResponseContentBlock::Thinking {
                thinking: String::new(),
                signature: None,
            },
            BlockKind::Text => ResponseContentBlock::Text {
                text: String::new(),
            },
        };

        events.push(StreamEvent::ContentBlockStart {
            index,
            content_block,
        });
        self.open_block = Some(OpenBlock { index, kind });
        index
    }

    fn close_open_block(&mut self, events: &mut Vec<StreamEvent>) {
        if let Some(open) = self.open_block.take() {
            events.push(StreamEvent::ContentBlockStop { index: open.index });
        }
    }

    fn make_message_start(&self) -> StreamEvent {
        StreamEvent::MessageStart {
            message: MessagesResponse {
                id: self.msg_id.clone(),
                response_type: "message".to_string(),
                role: "assistant".to_string(),
                content: Vec::new(),
                model: self.model.clone(),
                stop_reason: None,
                stop_sequence: None,
                usage: Usage {
                    input_tokens: self.input_tokens,
                    output_tokens: 0,
                    ..Default::default()
                },
            },
        }
    }

    fn make_finish_events(&mut self, reason: &str) -> Vec<StreamEvent> {
        if self.finished {
            return Vec::new();
        }
        self.finished = true;

        let mut events = Vec::new();

        self.close_open_block(&mut events);

        for tc in &self.active_tool_calls {
            if tc.emitted_start {
                events.push(StreamEvent::ContentBlockStop {
                    index: tc.block_index,
                });
            }
        }
        self.active_tool_calls.clear();

        events.push(StreamEvent::MessageDelta {
            delta: MessageDeltaBody {
                stop_reason: Some(map_finish_reason(reason)),
                stop_sequence: None,
            },
            usage: DeltaUsage {
                output_tokens: self.output_tokens,
            },
        });

        events.push(StreamEvent::MessageStop);

        events
    }
}
