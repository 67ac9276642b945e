//! Gemini API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::chat::ChatRequest;
use crate::error::{LlmError, Result};
use crate::message::{Content, ContentPart, Message, Role};

use super::config::GeminiConfig;
use super::types::{
    GeminiContent, GeminiErrorResponse, GeminiFunctionCallingConfig, GeminiGenerateRequest,
    GeminiGenerationConfig, GeminiPart, GeminiThinkingConfig, GeminiToolConfig, GeminiTools,
};

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct Gemini {
    pub(crate) config: Arc<GeminiConfig>,
    pub(crate) client: Client,
}

impl Gemini {
    /// Create a new Gemini client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::auth("gemini", "API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Resolve the model for a request, falling back to the configured default.
    pub(crate) fn resolve_model(&self, request: &ChatRequest) -> String {
        if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model.clone()
        }
    }

    /// Build the generate content URL for a model.
    pub(crate) fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }

    /// Build the streaming generate content URL for a model.
    pub(crate) fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.config.base_url, model
        )
    }

    /// Build the batch embeddings URL for a model.
    pub(crate) fn batch_embed_url(&self, model: &str) -> String {
        format!("{}/models/{}:batchEmbedContents", self.config.base_url, model)
    }

    /// Build request headers for JSON requests.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
    }

    /// Convert a conversation message to a Gemini content turn.
    ///
    /// System messages are handled separately by [`Self::build_body`] and
    /// must not be passed here.
    pub(crate) fn convert_message(msg: &Message) -> GeminiContent {
        match msg.role {
            Role::Assistant => {
                let mut parts = Vec::new();
                if let Some(content) = &msg.content {
                    parts.extend(Self::convert_content(content));
                }
                if let Some(tool_calls) = &msg.tool_calls {
                    for tc in tool_calls {
                        // Arguments arrive as a JSON string but the wire
                        // format wants a structured object
                        let args = serde_json::from_str::<Value>(&tc.function.arguments)
                            .unwrap_or_else(|_| Value::String(tc.function.arguments.clone()));
                        parts.push(GeminiPart::function_call(tc.function.name.clone(), args));
                    }
                }
                GeminiContent {
                    role: Some("model".to_owned()),
                    parts,
                }
            }
            Role::Tool => {
                let name = msg.name.clone().unwrap_or_else(|| "tool".to_owned());
                let text = msg
                    .content
                    .as_ref()
                    .and_then(Content::as_text)
                    .unwrap_or_default();
                // functionResponse.response must be a JSON object
                let response = match serde_json::from_str::<Value>(&text) {
                    Ok(value @ Value::Object(_)) => value,
                    Ok(value) => serde_json::json!({ "result": value }),
                    Err(_) => serde_json::json!({ "result": text }),
                };
                GeminiContent {
                    role: Some("user".to_owned()),
                    parts: vec![GeminiPart::function_response(name, response)],
                }
            }
            // System is filtered out before conversion
            Role::User | Role::System => GeminiContent {
                role: Some("user".to_owned()),
                parts: msg
                    .content
                    .as_ref()
                    .map(Self::convert_content)
                    .unwrap_or_default(),
            },
        }
    }

    /// Convert a message body into wire parts.
    fn convert_content(content: &Content) -> Vec<GeminiPart> {
        match content {
            Content::Text(text) => vec![GeminiPart::text(text.clone())],
            Content::Parts(parts) => parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => GeminiPart::text(text.clone()),
                    ContentPart::InlineImage { mime_type, data } => GeminiPart {
                        inline_data: Some(super::types::GeminiInlineData {
                            mime_type: mime_type.clone(),
                            data: data.clone(),
                        }),
                        ..GeminiPart::default()
                    },
                })
                .collect(),
        }
    }

    /// Convert a tool choice value into a function calling config.
    fn convert_tool_config(tool_choice: &Value) -> Option<GeminiToolConfig> {
        let (mode, allowed) = match tool_choice {
            Value::String(s) => (s.to_uppercase(), None),
            Value::Object(map) => {
                let mode = map
                    .get("mode")
                    .and_then(Value::as_str)
                    .map(str::to_uppercase)?;
                let allowed = map.get("allowed_function_names").and_then(|v| {
                    v.as_array().map(|names| {
                        names
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_owned)
                            .collect::<Vec<_>>()
                    })
                });
                (mode, allowed)
            }
            _ => return None,
        };

        Some(GeminiToolConfig {
            function_calling_config: GeminiFunctionCallingConfig {
                mode,
                allowed_function_names: allowed,
            },
        })
    }

    /// Build the request body.
    pub(crate) fn build_body(&self, request: &ChatRequest) -> GeminiGenerateRequest {
        // System messages fold into a single systemInstruction block
        let system_texts: Vec<String> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .filter_map(|m| m.content.as_ref().and_then(Content::as_text))
            .collect();
        let system_instruction = if system_texts.is_empty() {
            None
        } else {
            Some(GeminiContent::bare_text(system_texts.join("\n\n")))
        };

        let contents: Vec<GeminiContent> = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(Self::convert_message)
            .collect();

        let tools = request.tools.as_ref().map(|defs| {
            vec![GeminiTools {
                function_declarations: defs.clone(),
            }]
        });

        let tool_config = request.tool_choice.as_ref().and_then(Self::convert_tool_config);

        let (response_mime_type, response_schema) = match &request.response_format {
            Some(crate::chat::ResponseFormat::JsonObject) => {
                (Some("application/json".to_owned()), None)
            }
            Some(crate::chat::ResponseFormat::JsonSchema { json_schema }) => (
                Some("application/json".to_owned()),
                Some(json_schema.schema.clone()),
            ),
            Some(crate::chat::ResponseFormat::Text) | None => (None, None),
        };

        let thinking_config = if request.thinking_budget.is_some()
            || request.include_thoughts.is_some()
        {
            Some(GeminiThinkingConfig {
                thinking_budget: request.thinking_budget,
                include_thoughts: request.include_thoughts,
            })
        } else {
            None
        };

        let generation_config = GeminiGenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            top_k: request.top_k,
            candidate_count: request.n,
            stop_sequences: request.stop.clone(),
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
            seed: request.seed,
            response_mime_type,
            response_schema,
            thinking_config,
        };

        GeminiGenerateRequest {
            contents,
            system_instruction,
            tools,
            tool_config,
            generation_config: Some(generation_config),
        }
    }

    /// Parse an error response from Gemini.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(body) {
            let error = error_response.error;
            let code = error
                .status
                .unwrap_or_else(|| error.code.map_or_else(String::new, |c| c.to_string()));

            return match status {
                401 | 403 => LlmError::auth("gemini", error.message),
                429 => LlmError::rate_limited("gemini"),
                400 if error.message.contains("token count") => LlmError::context_exceeded(0, 0),
                _ => LlmError::provider_code("gemini", code, error.message),
            };
        }

        LlmError::http_status(status, body.to_owned())
    }
}
