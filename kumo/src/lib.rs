//! Kumo - A Rust framework for building AI agents
//!
//! This crate provides a lightweight, ergonomic framework for building AI agents
//! that can use tools, search knowledge bases, remember users across sessions,
//! and delegate work to managed sub-agents.

pub mod agent;
pub mod callback;
pub mod chat;
pub mod embedding;
pub mod error;
pub mod guardrail;
pub mod knowledge;
pub mod llms;
pub mod memory;
pub mod message;
pub mod prelude;
pub mod stream;
pub mod tool;
#[cfg(feature = "toolkit")]
pub mod tools;
pub mod usage;

pub use error::{AgentError, Error, LlmError, Result, ToolError};
