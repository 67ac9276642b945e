//! Streaming agent example.
//!
//! Consumes the event stream from [`Agent::run_streamed`], printing text
//! deltas as they arrive and a usage summary at the end.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_streaming
//! ```

#![allow(clippy::print_stdout)]

use futures::StreamExt;
use kumo::prelude::*;
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let agent = Agent::new("storyteller")
        .instructions("You tell short, vivid stories.")
        .model("gemini-2.5-flash")
        .provider(provider);

    let mut stream = agent.run_streamed(
        "Tell a three-sentence story about a lighthouse keeper.",
        RunConfig::default(),
    );

    while let Some(event) = stream.next().await {
        match event? {
            RunEvent::TextDelta(delta) => {
                print!("{delta}");
                let _ = std::io::stdout().flush();
            }
            RunEvent::ToolCallStarted { name, .. } => {
                println!("\n[tool: {name}]");
            }
            RunEvent::RunCompleted { result } => {
                println!();
                println!("---");
                println!(
                    "steps: {}, tokens: {}",
                    result.steps, result.usage.total_tokens
                );
            }
            _ => {}
        }
    }

    Ok(())
}
