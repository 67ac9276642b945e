//! User memories with a SQLite-backed memory store.
//!
//! Stores durable facts about a user in a [`SqliteMemoryStore`] and injects
//! the relevant ones into the agent's instructions. Unlike a session, which
//! replays the raw conversation, a memory store holds distilled facts that
//! survive across conversations.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_memory --features memory-sqlite
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let store: SharedMemoryStore = Arc::new(SqliteMemoryStore::open("memories.db")?);

    store
        .add(
            UserMemory::new("ada", "Prefers answers in metric units")
                .with_topics(vec!["preferences".into()]),
        )
        .await?;
    store
        .add(
            UserMemory::new("ada", "Is training for a marathon in October")
                .with_topics(vec!["running".into(), "goals".into()]),
        )
        .await?;

    let memories = store.get("ada").await?;
    let memory_block = memories
        .iter()
        .map(|m| format!("- {}", m.memory))
        .collect::<Vec<_>>()
        .join("\n");

    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let agent = Agent::new("coach")
        .instructions(format!(
            "You are a personal running coach. What you know about the user:\n{memory_block}"
        ))
        .model("gemini-2.5-flash")
        .provider(provider);

    let result = agent
        .run(
            "How long should my long run be this weekend?",
            RunConfig::default(),
        )
        .await?;
    println!("{}", result.text().unwrap_or("no output"));

    let hits = store.search("ada", "marathon", None).await?;
    println!("---");
    println!("memories matching 'marathon': {}", hits.len());

    Ok(())
}
