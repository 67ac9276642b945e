//! Knowledge-base retrieval example.
//!
//! Embeds a handful of documents into an [`InMemoryVectorStore`] using the
//! Gemini embedding API, then gives the agent a [`KnowledgeSearchTool`] so
//! it answers questions from the stored documents instead of guessing.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_knowledge
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let gemini = Arc::new(Gemini::from_env()?);

    let embedder: Arc<dyn EmbeddingProvider> = Arc::clone(&gemini);
    let store: SharedVectorStore = Arc::new(InMemoryVectorStore::new());
    let knowledge = Knowledge::new(embedder, store);

    knowledge
        .add(vec![
            Document::new(
                "return-policy",
                "Items can be returned within 30 days of delivery for a full \
                 refund. Opened software is not returnable.",
            ),
            Document::new(
                "shipping",
                "Standard shipping takes 3-5 business days. Express shipping \
                 arrives the next business day for orders placed before 2pm.",
            ),
            Document::new(
                "warranty",
                "All hardware carries a two-year limited warranty covering \
                 manufacturing defects.",
            ),
        ])
        .await?;

    let results = knowledge.search("how long do refunds take", 2).await?;
    for hit in &results {
        println!("{:.3}  {}", hit.score, hit.document.id);
    }
    println!("---");

    let provider: SharedChatProvider = gemini;
    let agent = Agent::new("support")
        .instructions(
            "You are a customer support agent. Answer using only what the \
             knowledge_search tool returns. If nothing relevant is found, say so.",
        )
        .model("gemini-2.5-flash")
        .provider(provider)
        .tool(Box::new(KnowledgeSearchTool::new(knowledge).with_top_k(3)));

    let result = agent
        .run(
            "I bought a keyboard five weeks ago and it stopped working. What are my options?",
            RunConfig::default(),
        )
        .await?;
    println!("{}", result.text().unwrap_or("no output"));

    Ok(())
}
