//! Lifecycle hooks for observing agent runs.
//!
//! This module provides two complementary hook traits plus the shared
//! [`RunContext`] that flows through every hook invocation:
//!
//! - **[`RunHooks`]** — global hooks that observe all agents in a run.
//! - **[`AgentHooks`]** — hooks bound to a single agent instance.
//!
//! Both traits default every method to a no-op, so implementations only
//! override the events they care about. Ready-made implementations cover the
//! common cases: [`LoggingRunHooks`]/[`LoggingAgentHooks`] emit structured
//! `tracing` events, and [`NoopRunHooks`]/[`NoopAgentHooks`] are explicit
//! do-nothing placeholders.
//!
//! # Example
//!
//! ```rust,ignore
//! use kumo::callback::{LoggingRunHooks, LogLevel, RunContext};
//!
//! let hooks = LoggingRunHooks::with_level(LogLevel::Debug);
//! let config = RunConfig::new().with_hooks(hooks);
//! ```

mod context;
mod hooks;
mod logging;
pub(crate) mod noop;

pub use context::RunContext;
pub use hooks::{
    AgentHooks, BoxedAgentHooks, BoxedRunHooks, RunHooks, SharedAgentHooks, SharedRunHooks,
};
pub use logging::{LogLevel, LoggingAgentHooks, LoggingRunHooks};
pub use noop::{NoopAgentHooks, NoopRunHooks};
