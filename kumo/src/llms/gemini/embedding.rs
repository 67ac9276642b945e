//! Gemini Embedding API implementation.

use async_trait::async_trait;

use crate::embedding::{Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::error::{LlmError, Result};

use super::client::Gemini;
use super::types::{GeminiBatchEmbedRequest, GeminiBatchEmbedResponse, GeminiContent,
    GeminiEmbedRequest};

/// Default embedding model for Gemini.
const DEFAULT_EMBEDDING_MODEL: &str = "gemini-embedding-001";
/// Default embedding dimension for gemini-embedding-001.
const DEFAULT_EMBEDDING_DIMENSION: usize = 3072;

#[async_trait]
impl EmbeddingProvider for Gemini {
    async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
        let model = if request.model.is_empty() {
            DEFAULT_EMBEDDING_MODEL.to_owned()
        } else {
            request.model.clone()
        };
        let url = self.batch_embed_url(&model);

        // Each batch entry repeats the fully qualified model name
        let qualified = format!("models/{model}");
        let body = GeminiBatchEmbedRequest {
            requests: request
                .input
                .iter()
                .map(|text| GeminiEmbedRequest {
                    model: qualified.clone(),
                    content: GeminiContent::bare_text(text.clone()),
                    task_type: request.task_type.map(|t| t.as_str().to_owned()),
                    output_dimensionality: request.dimensions,
                    title: request.title.clone(),
                })
                .collect(),
        };

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let response_text = response.text().await?;
        let parsed: GeminiBatchEmbedResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                LlmError::response_format(
                    "valid Gemini embedding response",
                    format!("parse error: {e}, response: {response_text}"),
                )
            })?;

        let embeddings = parsed
            .embeddings
            .into_iter()
            .enumerate()
            .map(|(index, data)| Embedding::new(data.values, index))
            .collect();

        // The batch endpoint reports no token usage
        Ok(EmbeddingResponse {
            embeddings,
            model: Some(model),
            usage: None,
            total_tokens: None,
        })
    }

    fn default_embedding_model(&self) -> &str {
        DEFAULT_EMBEDDING_MODEL
    }

    fn embedding_dimension(&self) -> Option<usize> {
        Some(DEFAULT_EMBEDDING_DIMENSION)
    }
}
