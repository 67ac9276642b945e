//! Agent runtime errors.
//!
//! These errors cover failures of the run loop itself, as opposed to LLM
//! provider errors ([`crate::LlmError`]) or tool failures
//! ([`crate::ToolError`]). They convert into the crate-level
//! [`Error`](crate::Error) via `Error::Agent`.

/// Errors produced by the agent run loop.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum AgentError {
    /// A runtime failure, e.g. a missing provider or malformed output.
    #[error("{0}")]
    Runtime(String),

    /// The step limit was reached without a final answer.
    #[error("Maximum steps ({max_steps}) reached without final answer")]
    MaxSteps {
        /// The configured step limit.
        max_steps: usize,
    },

    /// An input guardrail tripped before the run could proceed.
    #[error("Input guardrail '{guardrail_name}' triggered")]
    InputGuardrailTriggered {
        /// Name of the guardrail that tripped.
        guardrail_name: String,
    },

    /// An output guardrail tripped on the final answer.
    #[error("Output guardrail '{guardrail_name}' triggered")]
    OutputGuardrailTriggered {
        /// Name of the guardrail that tripped.
        guardrail_name: String,
    },
}

impl AgentError {
    /// Creates a runtime error with a message.
    #[must_use]
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Creates a max steps error.
    #[must_use]
    pub const fn max_steps(max_steps: usize) -> Self {
        Self::MaxSteps { max_steps }
    }

    /// Creates an input guardrail error.
    #[must_use]
    pub fn input_guardrail_triggered(guardrail_name: impl Into<String>) -> Self {
        Self::InputGuardrailTriggered {
            guardrail_name: guardrail_name.into(),
        }
    }

    /// Creates an output guardrail error.
    #[must_use]
    pub fn output_guardrail_triggered(guardrail_name: impl Into<String>) -> Self {
        Self::OutputGuardrailTriggered {
            guardrail_name: guardrail_name.into(),
        }
    }
}
