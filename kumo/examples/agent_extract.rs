//! Webpage content extraction example.
//!
//! Gives the agent an [`ExtractContentTool`] so it can fetch a page,
//! strip the markup, and summarize the visible text.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_extract
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use kumo::tools::ExtractContentTool;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let agent = Agent::new("reader")
        .instructions(
            "You read webpages for the user. Use the extract_content tool to \
             fetch pages, then answer based only on the extracted text.",
        )
        .model("gemini-2.5-flash")
        .provider(provider)
        .tool(Box::new(ExtractContentTool::default()));

    let result = agent
        .run(
            "Summarize https://www.rust-lang.org in two sentences.",
            RunConfig::default(),
        )
        .await?;

    println!("{}", result.text().unwrap_or("no output"));
    println!("---");
    println!(
        "steps: {}, tool calls: {}",
        result.steps,
        result.tool_call_count()
    );

    Ok(())
}
