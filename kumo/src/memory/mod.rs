//! Memory module — conversation history and durable user memories.
//!
//! Two kinds of persistence live here:
//!
//! - **Sessions** ([`Session`]) store the ordered message history of one
//!   conversation so agent runs can resume where a prior run left off.
//!   Attach one via [`RunConfig::with_session`](crate::agent::RunConfig::with_session).
//! - **Memory stores** ([`MemoryStore`]) hold durable facts about a user
//!   that survive across conversations.
//!
//! Both come with an in-memory backend for tests and short-lived runs, and
//! a SQLite backend (feature `memory-sqlite`) for persistence across
//! process restarts.
//!
//! # Example
//!
//! ```rust,ignore
//! use kumo::agent::{Agent, RunConfig};
//! use kumo::memory::SqliteSession;
//!
//! let session = SqliteSession::open("history.db", "user-42")?;
//! let config = RunConfig::new().with_session(session);
//!
//! // The runner loads prior history before the run and appends the new
//! // user message and final assistant output after it.
//! let result = agent.run("What did we talk about?", config).await?;
//! ```

mod error;
mod in_memory;
mod session;
#[cfg(feature = "memory-sqlite")]
mod sqlite;
mod store;

pub use error::MemoryError;
pub use in_memory::InMemorySession;
pub use session::{Session, SharedSession};
#[cfg(feature = "memory-sqlite")]
pub use sqlite::{SqliteMemoryStore, SqliteSession};
pub use store::{InMemoryMemoryStore, MemoryStore, SharedMemoryStore, UserMemory};
