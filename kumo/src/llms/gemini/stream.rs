//! Gemini SSE stream parsing.
//!
//! `streamGenerateContent?alt=sse` emits one JSON response object per
//! `data:` line. There is no `[DONE]` sentinel. The final chunk carries a
//! `finishReason`, and function calls arrive whole in a single chunk rather
//! than as incremental argument deltas.

use crate::error::Result;
use crate::stream::{StopReason, StreamChunk};

use super::types::GeminiGenerateResponse;

/// Parse SSE events from a text buffer.
pub fn parse_sse_events(text: &str) -> Vec<Result<StreamChunk>> {
    let mut results = Vec::new();

    for line in text.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        // Parse data lines
        if let Some(data) = line.strip_prefix("data: ") {
            let data = data.trim();

            match serde_json::from_str::<GeminiGenerateResponse>(data) {
                Ok(chunk) => {
                    results.extend(convert_chunk(chunk));
                }
                Err(e) => {
                    tracing::warn!("Failed to parse SSE chunk: {e}, data: {data}");
                }
            }
        }
    }

    results
}

/// Convert a Gemini stream chunk to our format.
fn convert_chunk(chunk: GeminiGenerateResponse) -> Vec<Result<StreamChunk>> {
    let mut results = Vec::new();
    let mut tool_call_index = 0;

    for candidate in chunk.candidates {
        if let Some(content) = candidate.content {
            for part in content.parts {
                if let Some(call) = part.function_call {
                    // Function calls arrive complete, so emit the full
                    // start/delta/complete sequence at once
                    let id = format!("call_{}", uuid::Uuid::new_v4().simple());
                    results.push(Ok(StreamChunk::tool_use_start(
                        tool_call_index,
                        id,
                        &call.name,
                    )));
                    results.push(Ok(StreamChunk::tool_use_delta(
                        tool_call_index,
                        call.args.to_string(),
                    )));
                    results.push(Ok(StreamChunk::ToolUseComplete {
                        index: tool_call_index,
                    }));
                    tool_call_index += 1;
                } else if let Some(text) = part.text
                    && !text.is_empty()
                {
                    if part.thought.unwrap_or(false) {
                        results.push(Ok(StreamChunk::ReasoningContent(text)));
                    } else {
                        results.push(Ok(StreamChunk::text(text)));
                    }
                }
            }
        }

        // The last chunk carries the finish reason; usage rides along on it
        if let Some(reason) = &candidate.finish_reason {
            if let Some(usage) = chunk.usage_metadata.clone() {
                results.push(Ok(StreamChunk::Usage(usage)));
            }
            let stop_reason = if tool_call_index > 0 {
                StopReason::ToolCalls
            } else {
                StopReason::parse(reason)
            };
            results.push(Ok(StreamChunk::done(Some(stop_reason))));
        }
    }

    results
}
