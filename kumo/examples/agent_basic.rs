//! Basic agent example using Gemini.
//!
//! Demonstrates the simplest possible agent: a single agent with
//! instructions, a model, and a provider.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_basic
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let agent = Agent::new("assistant")
        .instructions("You are a helpful assistant. Keep answers concise.")
        .model("gemini-2.5-flash")
        .provider(provider);

    let result = agent
        .run("What is the capital of France?", RunConfig::default())
        .await?;
    println!("{}", result.text().unwrap_or("no output"));

    Ok(())
}
