//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use kumo::prelude::*;
//! ```

#[cfg(feature = "gemini")]
pub use crate::llms::{Gemini, GeminiConfig};

pub use crate::agent::{
    Agent, Instructions, NextStep, OutputSchema, RunConfig, RunEvent, RunResult, Runner, StepInfo,
    ToolCallRecord, ToolCallRequest, UserInput,
};
pub use crate::callback::{
    AgentHooks, BoxedAgentHooks, BoxedRunHooks, LogLevel, LoggingAgentHooks, LoggingRunHooks,
    NoopAgentHooks, NoopRunHooks, RunContext, RunHooks, SharedAgentHooks, SharedRunHooks,
};
pub use crate::error::{AgentError, Error, LlmError, Result, ToolError};

pub use crate::chat::{
    ChatProvider, ChatProviderExt, ChatRequest, ChatResponse, ResponseFormat, SharedChatProvider,
    ToolChoice,
};
pub use crate::embedding::{
    Embedding, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, EmbeddingUsage, TaskType,
};
pub use crate::guardrail::{
    GuardrailOutput, InputGuardrail, InputGuardrailCheck, InputGuardrailResult, OutputGuardrail,
    OutputGuardrailCheck, OutputGuardrailResult,
};
pub use crate::knowledge::{
    Document, InMemoryVectorStore, Knowledge, KnowledgeSearchTool, ScoredDocument,
    SharedVectorStore, VectorStore,
};
#[cfg(feature = "memory-sqlite")]
pub use crate::memory::{SqliteMemoryStore, SqliteSession};
pub use crate::memory::{
    InMemoryMemoryStore, InMemorySession, MemoryError, MemoryStore, Session, SharedMemoryStore,
    SharedSession, UserMemory,
};
pub use crate::message::{Content, ContentPart, FunctionCall, Message, Role, ToolCall};
pub use crate::stream::{ChatStream, StopReason, StreamAggregator, StreamChunk};
pub use crate::tool::{
    AlwaysDenyHandler, AutoApproveHandler, BoxedConfirmationHandler, BoxedTool,
    ConfirmationHandler, DynTool, Tool, ToolBox, ToolCallResult, ToolConfirmationRequest,
    ToolConfirmationResponse, ToolDefinition, ToolExecutionPolicy, ToolResult, ToolType,
};
pub use crate::usage::{Usage, UsageTracker};
