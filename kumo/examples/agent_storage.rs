//! Persistent conversation storage with SQLite.
//!
//! Runs two turns of a conversation against the same [`SqliteSession`].
//! The second turn can refer back to the first because the session replays
//! its stored messages into the prompt. Restarting the program keeps the
//! history, since it lives in `conversations.db`.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_storage --features memory-sqlite
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let agent = Agent::new("assistant")
        .instructions("You are a helpful assistant with a perfect memory of this conversation.")
        .model("gemini-2.5-flash")
        .provider(provider);

    let session: SharedSession = Arc::new(SqliteSession::open("conversations.db", "demo-user")?);

    let first = agent
        .run(
            "My favorite programming language is Rust. Remember that.",
            RunConfig::new().with_shared_session(Arc::clone(&session)),
        )
        .await?;
    println!("> {}", first.text().unwrap_or("no output"));

    let second = agent
        .run(
            "What is my favorite programming language?",
            RunConfig::new().with_shared_session(Arc::clone(&session)),
        )
        .await?;
    println!("> {}", second.text().unwrap_or("no output"));

    println!("---");
    println!("messages stored: {}", session.len().await?);

    Ok(())
}
