//! Structured output example using a schema derived from a Rust type.
//!
//! The agent is constrained to emit JSON matching the `Country` schema,
//! which is generated at compile time via `schemars`. The result is then
//! deserialized straight into the struct.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! cargo run --example agent_structured --features schema
//! ```

#![allow(clippy::print_stdout)]

use kumo::prelude::*;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, JsonSchema)]
struct Country {
    name: String,
    capital: String,
    population: u64,
    official_languages: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let provider: SharedChatProvider = Arc::new(Gemini::from_env()?);

    let agent = Agent::new("geo")
        .instructions("You provide country facts as structured JSON.")
        .model("gemini-2.5-flash")
        .provider(provider)
        .output_type::<Country>();

    let result = agent
        .run("Tell me about Switzerland", RunConfig::default())
        .await?;

    let country: Country = result.parse()?;
    println!("name:       {}", country.name);
    println!("capital:    {}", country.capital);
    println!("population: {}", country.population);
    println!("languages:  {}", country.official_languages.join(", "));

    Ok(())
}
