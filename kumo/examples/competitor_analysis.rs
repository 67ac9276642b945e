//! Competitor analysis research agent.
//!
//! A deeper research workflow: the agent searches the web, pulls the text of
//! promising pages with [`ExtractContentTool`], keeps notes with [`ThinkTool`],
//! and produces a short report.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example competitor_analysis
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use kumo::tools::{ExtractContentTool, ThinkTool, WebSearchTool};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let agent = Agent::new("analyst")
        .instructions(
            "You are a market research analyst. For each competitor: search \
             for it, open its website with extract_content, and note its \
             positioning with the think tool. Finish with a report containing \
             one short paragraph per competitor and a comparison table.",
        )
        .model("gemini-2.5-pro")
        .provider(provider)
        .tool(Box::new(WebSearchTool::new().with_max_results(5)))
        .tool(Box::new(ExtractContentTool::default()))
        .tool(Box::new(ThinkTool))
        .max_steps(20);

    let config = RunConfig::new().with_hooks(LoggingRunHooks::new());

    let result = agent
        .run(
            "Compare the hosted CI offerings of GitHub Actions, GitLab CI, and \
             CircleCI: pricing model, free tier, and self-hosted runner support.",
            config,
        )
        .await?;

    println!("{}", result.text().unwrap_or("no output"));
    println!("---");
    println!(
        "steps: {}, tool calls: {}, tokens: {}",
        result.steps,
        result.tool_call_count(),
        result.usage.total_tokens
    );

    Ok(())
}
