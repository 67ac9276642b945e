//! Web search agent example demonstrating built-in tools.
//!
//! The agent combines [`WebSearchTool`] with a [`ThinkTool`] scratchpad so
//! it can plan before it searches.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_search
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use kumo::tools::{ThinkTool, WebSearchTool};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let agent = Agent::new("searcher")
        .instructions(
            "You answer questions using web search. Think first about what to \
             search for, then search, then answer with sources.",
        )
        .model("gemini-2.5-flash")
        .provider(provider)
        .tool(Box::new(WebSearchTool::new().with_max_results(5)))
        .tool(Box::new(ThinkTool))
        .max_steps(8);

    let result = agent
        .run(
            "What is the latest stable Rust release and what is one headline feature?",
            RunConfig::default(),
        )
        .await?;

    println!("{}", result.text().unwrap_or("no output"));
    println!("---");
    println!(
        "tokens: {} (input: {}, output: {})",
        result.usage.total_tokens, result.usage.input_tokens, result.usage.output_tokens
    );

    Ok(())
}
