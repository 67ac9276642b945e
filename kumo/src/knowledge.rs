//! Knowledge retrieval over embedded documents.
//!
//! A [`Knowledge`] base couples an [`EmbeddingProvider`] with a
//! [`VectorStore`]: `add` embeds documents and stores them, `search` embeds
//! the query and returns the most similar documents with their scores.
//! [`KnowledgeSearchTool`] exposes the search to agents as a regular tool.
//!
//! # Example
//!
//! ```rust,ignore
//! use kumo::knowledge::{Document, InMemoryVectorStore, Knowledge, KnowledgeSearchTool};
//!
//! let knowledge = Knowledge::new(provider.clone(), Arc::new(InMemoryVectorStore::new()));
//! knowledge.add(vec![
//!     Document::new("rust-book", "Rust is a systems programming language."),
//!     Document::new("tokio", "Tokio is an async runtime for Rust."),
//! ]).await?;
//!
//! let agent = Agent::new("librarian")
//!     .provider(provider)
//!     .tool(KnowledgeSearchTool::new(knowledge));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::embedding::{EmbeddingProvider, EmbeddingRequest, TaskType};
use crate::error::{LlmError, Result, ToolError};
use crate::tool::Tool;

/// A document in a knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document id.
    pub id: String,
    /// The document text that gets embedded and returned to the model.
    pub text: String,
    /// Arbitrary metadata carried alongside the text (source, title, ...).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Document {
    /// Creates a document with no metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A document paired with its similarity score, as returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// The matched document.
    pub document: Document,
    /// Cosine similarity to the query, higher is closer.
    pub score: f32,
}

/// Async storage interface for embedded documents.
///
/// `add_documents` upserts by document id so re-adding a document replaces
/// its previous text and vector.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Stores documents with their embedding vectors.
    async fn add_documents(&self, documents: Vec<(Document, Vec<f32>)>) -> Result<()>;

    /// Returns the `top_k` documents most similar to `query_vector`,
    /// best match first.
    async fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<ScoredDocument>>;
}

/// A vector store shared across tasks.
pub type SharedVectorStore = Arc<dyn VectorStore>;

/// Cosine similarity between two vectors; zero on dimension mismatch.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// In-memory vector store using a brute-force cosine-similarity scan.
///
/// Ephemeral and unindexed; suited for tests and small document sets.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<Vec<(Document, Vec<f32>)>>,
}

impl InMemoryVectorStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if no documents are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn add_documents(&self, documents: Vec<(Document, Vec<f32>)>) -> Result<()> {
        let mut guard = self.entries.write().await;
        for (document, vector) in documents {
            if let Some(existing) = guard.iter_mut().find(|(d, _)| d.id == document.id) {
                *existing = (document, vector);
            } else {
                guard.push((document, vector));
            }
        }
        Ok(())
    }

    async fn search(&self, query_vector: &[f32], top_k: usize) -> Result<Vec<ScoredDocument>> {
        let guard = self.entries.read().await;
        let mut scored: Vec<ScoredDocument> = guard
            .iter()
            .map(|(document, vector)| ScoredDocument {
                document: document.clone(),
                score: cosine_similarity(query_vector, vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// A knowledge base coupling an embedding provider with a vector store.
///
/// Documents are embedded with [`TaskType::RetrievalDocument`] and queries
/// with [`TaskType::RetrievalQuery`], matching the asymmetric retrieval
/// setup the embedding models are trained for.
#[derive(Clone)]
pub struct Knowledge {
    provider: Arc<dyn EmbeddingProvider>,
    store: SharedVectorStore,
    model: String,
    dimensions: Option<u32>,
}

impl fmt::Debug for Knowledge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Knowledge")
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

impl Knowledge {
    /// Creates a knowledge base using the provider's default embedding model.
    #[must_use]
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: SharedVectorStore) -> Self {
        let model = provider.default_embedding_model().to_owned();
        Self {
            provider,
            store,
            model,
            dimensions: None,
        }
    }

    /// Overrides the embedding model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the embedding output dimensions (Matryoshka truncation).
    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: u32) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    fn request(&self, input: Vec<String>, task_type: TaskType) -> EmbeddingRequest {
        let mut request = EmbeddingRequest::new(&self.model, input).task_type(task_type);
        if let Some(dims) = self.dimensions {
            request = request.dimensions(dims);
        }
        request
    }

    /// Embeds `documents` in one batch request and stores them.
    pub async fn add(&self, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
        let request = self.request(texts, TaskType::RetrievalDocument);
        let response = self.provider.embed(&request).await?;

        if response.embeddings.len() != documents.len() {
            return Err(LlmError::response_format(
                format!("{} embeddings", documents.len()),
                format!("{} embeddings", response.embeddings.len()),
            )
            .into());
        }

        // Providers may return embeddings out of order; pair by index.
        let mut embeddings = response.embeddings;
        embeddings.sort_by_key(|e| e.index);

        let entries = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| (document, embedding.vector))
            .collect();

        self.store.add_documents(entries).await
    }

    /// Embeds `query` and returns the `top_k` closest documents.
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<ScoredDocument>> {
        let request = self.request(vec![query.to_owned()], TaskType::RetrievalQuery);
        let response = self.provider.embed(&request).await?;

        let embedding = response.embeddings.into_iter().next().ok_or_else(|| {
            crate::error::Error::from(LlmError::response_format("embedding", "empty response"))
        })?;

        self.store.search(&embedding.vector, top_k).await
    }
}

/// Default number of documents returned by [`KnowledgeSearchTool`].
pub const DEFAULT_TOP_K: usize = 5;

/// Tool exposing [`Knowledge::search`] to agents.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct KnowledgeSearchTool {
    knowledge: Knowledge,
    /// Number of documents returned when the model does not ask for more.
    pub top_k: usize,
}

impl KnowledgeSearchTool {
    /// Creates a search tool over `knowledge`.
    #[must_use]
    pub const fn new(knowledge: Knowledge) -> Self {
        Self {
            knowledge,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Sets the default number of results.
    #[must_use]
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Arguments for a knowledge-base search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub struct KnowledgeSearchArgs {
    /// The search query.
    pub query: String,

    /// How many documents to return.
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[async_trait]
impl Tool for KnowledgeSearchTool {
    const NAME: &'static str = "knowledge_search";
    type Args = KnowledgeSearchArgs;
    type Output = Vec<ScoredDocument>;
    type Error = ToolError;

    fn description(&self) -> String {
        "Searches the knowledge base for documents relevant to the query. \
         Returns the best-matching documents with their similarity scores."
            .to_string()
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "top_k": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "How many documents to return (default 5)"
                }
            },
            "required": ["query"]
        })
    }

    fn output_type(&self) -> &'static str {
        "array"
    }

    async fn call(&self, args: Self::Args) -> std::result::Result<Self::Output, Self::Error> {
        let top_k = args.top_k.unwrap_or(self.top_k);
        self.knowledge
            .search(&args.query, top_k)
            .await
            .map_err(|e| ToolError::execution(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::embedding::{Embedding, EmbeddingResponse};
    use crate::tool::DynTool;

    /// Embeds text as occurrence counts of three fixed keywords, which makes
    /// similarity scores deterministic and easy to reason about.
    struct KeywordEmbedder;

    const AXES: [&str; 3] = ["rust", "python", "cooking"];

    #[allow(clippy::cast_precision_loss)]
    fn keyword_vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        AXES.iter()
            .map(|axis| lower.matches(axis).count() as f32)
            .collect()
    }

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed(&self, request: &EmbeddingRequest) -> Result<EmbeddingResponse> {
            let embeddings = request
                .input
                .iter()
                .enumerate()
                .map(|(i, text)| Embedding::new(keyword_vector(text), i))
                .collect();
            Ok(EmbeddingResponse::new(embeddings))
        }

        fn default_embedding_model(&self) -> &str {
            "keyword-test"
        }
    }

    fn sample_knowledge() -> Knowledge {
        Knowledge::new(Arc::new(KeywordEmbedder), Arc::new(InMemoryVectorStore::new()))
    }

    async fn seeded_knowledge() -> Knowledge {
        let knowledge = sample_knowledge();
        knowledge
            .add(vec![
                Document::new("d1", "rust rust rust"),
                Document::new("d2", "python python"),
                Document::new("d3", "cooking with python"),
            ])
            .await
            .unwrap();
        knowledge
    }

    mod document {
        use super::*;

        #[test]
        fn new_has_no_metadata() {
            let doc = Document::new("id-1", "hello");
            assert_eq!(doc.id, "id-1");
            assert_eq!(doc.text, "hello");
            assert!(doc.metadata.is_empty());
        }

        #[test]
        fn with_metadata_accumulates() {
            let doc = Document::new("id-1", "hello")
                .with_metadata("source", "wiki")
                .with_metadata("page", 3);
            assert_eq!(doc.metadata["source"], "wiki");
            assert_eq!(doc.metadata["page"], 3);
        }

        #[test]
        fn serde_skips_empty_metadata() {
            let json = serde_json::to_string(&Document::new("a", "b")).unwrap();
            assert!(!json.contains("metadata"));
        }

        #[test]
        fn serde_round_trip() {
            let doc = Document::new("a", "b").with_metadata("k", "v");
            let json = serde_json::to_string(&doc).unwrap();
            let back: Document = serde_json::from_str(&json).unwrap();
            assert_eq!(doc, back);
        }
    }

    mod cosine {
        use super::*;

        #[test]
        fn identical_vectors_score_one() {
            let sim = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]);
            assert!((sim - 1.0).abs() < 1e-6);
        }

        #[test]
        fn orthogonal_vectors_score_zero() {
            assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        }

        #[test]
        fn mismatched_dimensions_score_zero() {
            assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        }

        #[test]
        fn zero_vector_scores_zero() {
            assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        }
    }

    mod in_memory_vector_store {
        use super::*;

        #[tokio::test]
        async fn add_and_search_orders_by_similarity() {
            let store = InMemoryVectorStore::new();
            store
                .add_documents(vec![
                    (Document::new("x", "x-axis"), vec![1.0, 0.0]),
                    (Document::new("y", "y-axis"), vec![0.0, 1.0]),
                    (Document::new("xy", "diagonal"), vec![0.7, 0.7]),
                ])
                .await
                .unwrap();

            let hits = store.search(&[1.0, 0.0], 3).await.unwrap();
            assert_eq!(hits[0].document.id, "x");
            assert_eq!(hits[1].document.id, "xy");
            assert_eq!(hits[2].document.id, "y");
            assert!(hits[0].score > hits[1].score);
        }

        #[tokio::test]
        async fn top_k_truncates_results() {
            let store = InMemoryVectorStore::new();
            store
                .add_documents(vec![
                    (Document::new("a", "a"), vec![1.0, 0.0]),
                    (Document::new("b", "b"), vec![0.9, 0.1]),
                    (Document::new("c", "c"), vec![0.0, 1.0]),
                ])
                .await
                .unwrap();

            let hits = store.search(&[1.0, 0.0], 2).await.unwrap();
            assert_eq!(hits.len(), 2);
        }

        #[tokio::test]
        async fn add_upserts_by_id() {
            let store = InMemoryVectorStore::new();
            store
                .add_documents(vec![(Document::new("a", "old"), vec![1.0, 0.0])])
                .await
                .unwrap();
            store
                .add_documents(vec![(Document::new("a", "new"), vec![0.0, 1.0])])
                .await
                .unwrap();

            assert_eq!(store.len().await, 1);
            let hits = store.search(&[0.0, 1.0], 1).await.unwrap();
            assert_eq!(hits[0].document.text, "new");
        }

        #[tokio::test]
        async fn search_empty_store_returns_empty() {
            let store = InMemoryVectorStore::new();
            assert!(store.is_empty().await);
            let hits = store.search(&[1.0], 5).await.unwrap();
            assert!(hits.is_empty());
        }
    }

    mod knowledge {
        use super::*;

        #[tokio::test]
        async fn add_then_search_finds_closest_document() {
            let knowledge = seeded_knowledge().await;

            let hits = knowledge.search("rust", 1).await.unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].document.id, "d1");
        }

        #[tokio::test]
        async fn search_scores_descend() {
            let knowledge = seeded_knowledge().await;

            let hits = knowledge.search("python", 3).await.unwrap();
            assert_eq!(hits[0].document.id, "d2");
            assert!(hits[0].score >= hits[1].score);
            assert!(hits[1].score >= hits[2].score);
        }

        #[tokio::test]
        async fn add_empty_is_noop() {
            let knowledge = sample_knowledge();
            knowledge.add(vec![]).await.unwrap();
            let hits = knowledge.search("rust", 5).await.unwrap();
            assert!(hits.is_empty());
        }

        #[test]
        fn uses_provider_default_model() {
            let knowledge = sample_knowledge();
            assert_eq!(knowledge.model, "keyword-test");
        }

        #[test]
        fn with_model_overrides() {
            let knowledge = sample_knowledge().with_model("custom");
            assert_eq!(knowledge.model, "custom");
        }

        #[test]
        fn debug_omits_provider_and_store() {
            let repr = format!("{:?}", sample_knowledge());
            assert!(repr.contains("keyword-test"));
            assert!(repr.contains(".."));
        }
    }

    mod knowledge_search_tool {
        use super::*;

        #[tokio::test]
        async fn call_returns_scored_documents() {
            let tool = KnowledgeSearchTool::new(seeded_knowledge().await);

            let hits = tool
                .call(KnowledgeSearchArgs {
                    query: "cooking".to_owned(),
                    top_k: Some(1),
                })
                .await
                .unwrap();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].document.id, "d3");
        }

        #[tokio::test]
        async fn top_k_defaults_when_omitted() {
            let tool = KnowledgeSearchTool::new(seeded_knowledge().await).with_top_k(2);

            let args: KnowledgeSearchArgs =
                serde_json::from_value(serde_json::json!({"query": "python"})).unwrap();
            let hits = tool.call(args).await.unwrap();
            assert_eq!(hits.len(), 2);
        }

        #[tokio::test]
        async fn callable_through_dyn_tool() {
            let tool = KnowledgeSearchTool::new(seeded_knowledge().await);
            let boxed: Box<dyn DynTool> = Box::new(tool);

            let result = boxed
                .call_json(serde_json::json!({"query": "rust", "top_k": 1}))
                .await
                .unwrap();
            assert_eq!(result[0]["document"]["id"], "d1");
        }

        #[test]
        fn definition_exposes_schema() {
            // Building a definition must not require a populated store.
            let tool = KnowledgeSearchTool::new(sample_knowledge());
            let def = Tool::definition(&tool);
            assert_eq!(def.name, "knowledge_search");
            assert_eq!(def.parameters["required"][0], "query");
        }
    }
}
