//! Agent module — core abstractions for building AI agents.
//!
//! This module implements a **Runner-driven, managed-agent** architecture:
//!
//! - **[`Agent`]** is a self-contained unit with its own LLM provider, enabling
//!   heterogeneous multi-agent systems where each agent uses a different model.
//! - **[`Runner`]** is a stateless execution engine that drives the agent through
//!   a ReAct-style reasoning loop (think → act → observe → repeat).
//! - **Managed agents** are sub-agents registered via [`Agent::managed_agent`],
//!   dispatched inline by the Runner as parallel tool calls.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use kumo::agent::{Agent, RunConfig};
//!
//! let agent = Agent::new("assistant")
//!     .instructions("You are a helpful assistant.")
//!     .model("gemini-2.5-flash")
//!     .provider(provider.clone());
//!
//! let result = agent.run("Hello!", RunConfig::default()).await?;
//! println!("{}", result.text().unwrap_or("no output"));
//! ```
//!
//! # Heterogeneous Multi-Agent
//!
//! ```rust,ignore
//! let researcher = Agent::new("researcher")
//!     .instructions("You research topics thoroughly.")
//!     .model("gemini-2.5-pro")
//!     .provider(provider.clone());
//!
//! let writer = Agent::new("writer")
//!     .instructions("You write clear summaries.")
//!     .model("gemini-2.5-flash")
//!     .provider(provider.clone());
//!
//! let orchestrator = Agent::new("orchestrator")
//!     .instructions("Delegate research and writing tasks to your team.")
//!     .model("gemini-2.5-flash")
//!     .provider(provider.clone())
//!     .managed_agent(researcher)
//!     .managed_agent(writer);
//!
//! // The orchestrator's LLM can call "researcher" and "writer" as tools.
//! // Each sub-agent runs with its own provider and model.
//! let result = orchestrator.run("Write about Rust", RunConfig::default()).await?;
//! ```

mod config;
pub mod error;
mod hook;
pub mod result;
mod runner;

pub use config::{Agent, Instructions, OutputSchema};
pub use error::AgentError;
pub use result::{
    NextStep, RunConfig, RunEvent, RunResult, StepInfo, ToolCallRecord, ToolCallRequest, UserInput,
};
pub use runner::Runner;
