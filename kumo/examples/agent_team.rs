//! Multi-agent team example with managed sub-agents.
//!
//! An orchestrator delegates to two managed agents. Each sub-agent has its
//! own model and tools; the orchestrator's LLM sees them as tools named
//! after the agents and can dispatch them in parallel.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_team
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use kumo::tools::WebSearchTool;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let researcher = Agent::new("researcher")
        .description("Researches a topic on the web and reports the facts found.")
        .instructions("You research topics using web search. Report facts with sources.")
        .model("gemini-2.5-flash")
        .provider(Arc::clone(&provider))
        .tool(Box::new(WebSearchTool::new()));

    let writer = Agent::new("writer")
        .description("Turns research notes into clear prose for a general audience.")
        .instructions("You rewrite research notes into a clear, engaging summary.")
        .model("gemini-2.5-flash")
        .provider(Arc::clone(&provider));

    let orchestrator = Agent::new("orchestrator")
        .instructions(
            "You coordinate a research team. Delegate fact-finding to the \
             researcher and prose to the writer, then present the final text.",
        )
        .model("gemini-2.5-pro")
        .provider(provider)
        .managed_agent(researcher)
        .managed_agent(writer)
        .max_steps(12);

    let result = orchestrator
        .run(
            "Produce a one-paragraph summary of how WebAssembly is used outside the browser.",
            RunConfig::new().with_hooks(LoggingRunHooks::new()),
        )
        .await?;

    println!("{}", result.text().unwrap_or("no output"));

    Ok(())
}
