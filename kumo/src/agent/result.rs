//! Run inputs, configuration, and outcome types.
//!
//! Everything the [`Runner`](super::Runner) consumes or produces lives here:
//!
//! - [`UserInput`] — what the caller hands to a run (text or multimodal parts)
//! - [`RunConfig`] — per-run settings (hooks, session, limits, guardrails)
//! - [`NextStep`] — the Runner's classification of each LLM response
//! - [`RunResult`] / [`StepInfo`] / [`ToolCallRecord`] — the completed run
//! - [`RunEvent`] — incremental events emitted by streaming runs

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::callback::{RunHooks, SharedRunHooks};
use crate::chat::ChatResponse;
use crate::error::Result;
use crate::guardrail::{
    InputGuardrail, InputGuardrailResult, OutputGuardrail, OutputGuardrailResult,
};
use crate::memory::{Session, SharedSession};
use crate::message::{ContentPart, Message, ToolCall};
use crate::tool::ConfirmationHandler;
use crate::usage::Usage;

/// Input for an agent run.
///
/// Most callers pass a `&str` or `String` directly thanks to the `From`
/// impls; multimodal input uses [`ContentPart`]s.
#[derive(Debug, Clone, PartialEq)]
pub enum UserInput {
    /// Plain text input.
    Text(String),
    /// Multimodal input (text and images).
    Parts(Vec<ContentPart>),
}

impl UserInput {
    /// Converts this input into a user [`Message`].
    #[must_use]
    pub fn into_message(self) -> Message {
        match self {
            Self::Text(text) => Message::user(text),
            Self::Parts(parts) => Message::user_parts(parts),
        }
    }
}

impl From<&str> for UserInput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for UserInput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for UserInput {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<Vec<ContentPart>> for UserInput {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// Per-run configuration.
///
/// Everything here applies to a single [`Runner::run`](super::Runner::run)
/// or [`Runner::run_streamed`](super::Runner::run_streamed) invocation.
/// Settings that overlap with agent-level configuration (e.g. `max_steps`)
/// take precedence over the agent's own values when set.
///
/// # Example
///
/// ```rust
/// use kumo::agent::RunConfig;
/// use kumo::callback::LoggingRunHooks;
///
/// let config = RunConfig::new()
///     .with_hooks(LoggingRunHooks::new())
///     .with_max_steps(5);
/// ```
#[derive(Clone, Default)]
pub struct RunConfig {
    /// Overrides the agent's `max_steps` when set.
    pub max_steps: Option<usize>,

    /// Run-level lifecycle hooks observing all agents in the run.
    pub hooks: Option<SharedRunHooks>,

    /// Session for conversation history persistence.
    ///
    /// When set, prior history is loaded before the first step and the
    /// user/assistant exchange is appended after a successful run.
    pub session: Option<SharedSession>,

    /// Handler consulted when a tool requires confirmation before executing.
    pub confirmation_handler: Option<Arc<dyn ConfirmationHandler>>,

    /// Input guardrails applied in addition to the agent's own.
    pub input_guardrails: Vec<InputGuardrail>,

    /// Output guardrails applied in addition to the agent's own.
    pub output_guardrails: Vec<OutputGuardrail>,

    /// Caps how many tool calls execute concurrently within one step.
    ///
    /// `None` runs all calls of a step simultaneously.
    pub max_tool_concurrency: Option<usize>,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("max_steps", &self.max_steps)
            .field("hooks", &self.hooks.is_some())
            .field("session", &self.session.is_some())
            .field("confirmation_handler", &self.confirmation_handler.is_some())
            .field("input_guardrails", &self.input_guardrails)
            .field("output_guardrails", &self.output_guardrails)
            .field("max_tool_concurrency", &self.max_tool_concurrency)
            .finish()
    }
}

impl RunConfig {
    /// Creates an empty run configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the agent's maximum step count for this run.
    #[must_use]
    pub const fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Attaches run-level lifecycle hooks.
    #[must_use]
    pub fn with_hooks(mut self, hooks: impl RunHooks + 'static) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    /// Attaches already-shared run-level hooks.
    #[must_use]
    pub fn with_shared_hooks(mut self, hooks: SharedRunHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Attaches a session for conversation history.
    #[must_use]
    pub fn with_session(mut self, session: impl Session + 'static) -> Self {
        self.session = Some(Arc::new(session));
        self
    }

    /// Attaches an already-shared session.
    #[must_use]
    pub fn with_shared_session(mut self, session: SharedSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the confirmation handler for tools that require approval.
    #[must_use]
    pub fn with_confirmation_handler(mut self, handler: impl ConfirmationHandler + 'static) -> Self {
        self.confirmation_handler = Some(Arc::new(handler));
        self
    }

    /// Adds a run-level input guardrail.
    #[must_use]
    pub fn input_guardrail(mut self, guardrail: InputGuardrail) -> Self {
        self.input_guardrails.push(guardrail);
        self
    }

    /// Adds a run-level output guardrail.
    #[must_use]
    pub fn output_guardrail(mut self, guardrail: OutputGuardrail) -> Self {
        self.output_guardrails.push(guardrail);
        self
    }

    /// Caps concurrent tool execution within a step.
    #[must_use]
    pub const fn with_max_tool_concurrency(mut self, limit: usize) -> Self {
        self.max_tool_concurrency = Some(limit);
        self
    }
}

/// A tool call requested by the LLM, with its arguments parsed to JSON.
///
/// The wire format carries arguments as a JSON string; parsing happens once
/// here so downstream code works with a structured [`Value`]. Arguments that
/// fail to parse are preserved verbatim as a JSON string.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back in the tool result message.
    pub id: String,
    /// Name of the tool (or managed agent) to invoke.
    pub name: String,
    /// Parsed call arguments.
    pub arguments: Value,
}

impl From<&ToolCall> for ToolCallRequest {
    fn from(call: &ToolCall) -> Self {
        let arguments = serde_json::from_str(&call.function.arguments)
            .unwrap_or_else(|_| Value::String(call.function.arguments.clone()));
        Self {
            id: call.id.clone(),
            name: call.function.name.clone(),
            arguments,
        }
    }
}

/// The Runner's classification of an LLM response.
#[derive(Debug, Clone)]
pub enum NextStep {
    /// The LLM produced a final answer; the run is complete.
    FinalOutput {
        /// Final output value. Plain text becomes `Value::String`; structured
        /// output is parsed JSON.
        output: Value,
    },
    /// The LLM requested tool calls that are cleared for execution.
    ToolCalls {
        /// Calls to execute this step.
        calls: Vec<ToolCallRequest>,
    },
    /// Some requested calls require human confirmation before executing.
    NeedsApproval {
        /// Calls awaiting confirmation.
        pending_approval: Vec<ToolCallRequest>,
        /// Calls already cleared by policy, executed alongside confirmed ones.
        approved: Vec<ToolCallRequest>,
    },
}

/// Record of one executed tool call.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    /// Provider-assigned call id.
    pub id: String,
    /// Tool name.
    pub name: String,
    /// Arguments the tool was invoked with.
    pub arguments: Value,
    /// Serialized tool output (or error text on failure).
    pub result: String,
    /// Whether the tool executed successfully.
    pub success: bool,
}

/// Everything that happened in one reasoning step.
#[derive(Debug, Clone)]
pub struct StepInfo {
    /// 1-indexed step number.
    pub step: usize,
    /// The LLM response for this step.
    pub response: ChatResponse,
    /// Tool calls executed during this step.
    pub tool_calls: Vec<ToolCallRecord>,
}

/// The outcome of a completed agent run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Final output. Plain text runs produce `Value::String`; structured
    /// output runs produce the parsed JSON value.
    pub output: Value,
    /// Cumulative token usage across all LLM calls in the run.
    pub usage: Usage,
    /// Number of reasoning steps taken.
    pub steps: usize,
    /// Per-step history, in order.
    pub step_history: Vec<StepInfo>,
    /// Name of the agent that produced this result.
    pub agent_name: String,
    /// Results from input guardrails that ran (none triggered).
    pub input_guardrail_results: Vec<InputGuardrailResult>,
    /// Results from output guardrails that ran (none triggered).
    pub output_guardrail_results: Vec<OutputGuardrailResult>,
}

impl RunResult {
    /// Returns the final output as text, if it is a plain string.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.output.as_str()
    }

    /// Deserializes the final output into a concrete type.
    ///
    /// Intended for structured-output runs where
    /// [`Agent::output_schema`](super::Agent::output_schema) constrains the
    /// LLM to produce JSON conforming to a schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the output does not
    /// match the target type.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.output.clone())?)
    }

    /// Returns the total number of tool calls across all steps.
    #[must_use]
    pub fn tool_call_count(&self) -> usize {
        self.step_history.iter().map(|s| s.tool_calls.len()).sum()
    }
}

/// Incremental events emitted by [`Runner::run_streamed`](super::Runner::run_streamed).
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// The run has started.
    RunStarted {
        /// Name of the agent being run.
        agent_name: String,
    },
    /// A reasoning step has started.
    StepStarted {
        /// 1-indexed step number.
        step: usize,
    },
    /// A fragment of assistant text was generated.
    TextDelta(String),
    /// A fragment of model reasoning was generated.
    ReasoningDelta(String),
    /// The LLM started a tool call.
    ToolCallStarted {
        /// Provider-assigned call id.
        id: String,
        /// Tool name.
        name: String,
    },
    /// A tool call finished executing.
    ToolCallCompleted {
        /// The completed call record.
        record: ToolCallRecord,
    },
    /// A reasoning step completed.
    StepCompleted {
        /// Full step information.
        step_info: Box<StepInfo>,
    },
    /// The run completed with a final result.
    RunCompleted {
        /// The completed run result.
        result: Box<RunResult>,
    },
}

impl RunEvent {
    /// Returns the text delta if this is a [`RunEvent::TextDelta`].
    #[must_use]
    pub fn as_text_delta(&self) -> Option<&str> {
        match self {
            Self::TextDelta(delta) => Some(delta),
            _ => None,
        }
    }

    /// Returns `true` if this event ends the run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::RunCompleted { .. })
    }
}
