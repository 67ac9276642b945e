//! Gemini ChatProvider implementation.

use async_trait::async_trait;
use futures::StreamExt;

use crate::chat::{ChatProvider, ChatRequest, ChatResponse};
use crate::error::{LlmError, Result};
use crate::message::{Content, Message, Role, ToolCall};
use crate::stream::{ChatStream, StopReason, StreamChunk};

use super::client::Gemini;
use super::stream::parse_sse_events;
use super::types::GeminiGenerateResponse;

impl Gemini {
    /// Parse the response into a ChatResponse.
    pub(crate) fn parse_response(response: GeminiGenerateResponse) -> Result<ChatResponse> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::response_format("at least one candidate", "no candidates"))?;

        let mut text_parts: Vec<String> = Vec::new();
        let mut thought_parts: Vec<String> = Vec::new();
        let mut tool_calls: Vec<ToolCall> = Vec::new();

        if let Some(content) = candidate.content {
            for part in content.parts {
                if let Some(call) = part.function_call {
                    // The API does not assign call ids, so mint one to link
                    // the call with its eventual tool result message
                    let id = format!("call_{}", uuid::Uuid::new_v4().simple());
                    tool_calls.push(ToolCall::function(id, call.name, call.args.to_string()));
                } else if let Some(text) = part.text {
                    if part.thought.unwrap_or(false) {
                        thought_parts.push(text);
                    } else {
                        text_parts.push(text);
                    }
                }
            }
        }

        let stop_reason = if tool_calls.is_empty() {
            candidate
                .finish_reason
                .as_deref()
                .map_or(StopReason::Stop, StopReason::parse)
        } else {
            StopReason::ToolCalls
        };

        let content = if text_parts.is_empty() {
            None
        } else {
            Some(Content::Text(text_parts.concat()))
        };
        let reasoning_content = if thought_parts.is_empty() {
            None
        } else {
            Some(thought_parts.concat())
        };

        let message = Message {
            role: Role::Assistant,
            content,
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id: None,
            name: None,
            reasoning_content,
        };

        Ok(ChatResponse {
            message,
            stop_reason,
            usage: response.usage_metadata,
            model: response.model_version,
            id: response.response_id,
            raw: None,
        })
    }
}

#[async_trait]
impl ChatProvider for Gemini {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let model = self.resolve_model(request);
        let url = self.generate_url(&model);
        let body = self.build_body(request);

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let response_text = response.text().await?;
        let parsed: GeminiGenerateResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                LlmError::response_format(
                    "valid Gemini response",
                    format!("parse error: {e}, response: {response_text}"),
                )
            })?;

        let mut chat_response = Self::parse_response(parsed)?;
        if chat_response.model.is_none() {
            chat_response.model = Some(model);
        }
        Ok(chat_response)
    }

    async fn chat_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<ChatStream> {
        let model = self.resolve_model(request);
        let url = self.stream_url(&model);
        let body = self.build_body(request);

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let stream = response.bytes_stream();
        let parsed_stream = stream.flat_map(move |chunk_result| {
            let chunks: Vec<Result<StreamChunk>> = match chunk_result {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    parse_sse_events(&text)
                }
                Err(e) => vec![Err(LlmError::stream(e.to_string()).into())],
            };
            futures::stream::iter(chunks)
        });

        Ok(Box::pin(parsed_stream))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        self.model()
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    fn supports_tools(&self) -> bool {
        true
    }

    fn supports_vision(&self) -> bool {
        true
    }

    fn supports_json_mode(&self) -> bool {
        true
    }
}
