//! The [`Session`] trait for conversation history persistence.
//!
//! A session stores the ordered message history of a conversation so that
//! agent runs can resume where a prior run left off. Backends implement
//! this trait; the [`Runner`](crate::agent::Runner) consumes it through
//! [`RunConfig::with_session`](crate::agent::RunConfig::with_session).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// Async storage interface for per-conversation message history.
///
/// Implementations must be safe to share across tasks. All methods are
/// fallible so persistent backends can surface I/O and database errors.
#[async_trait]
pub trait Session: Send + Sync {
    /// The session identifier this handle operates on.
    fn id(&self) -> &str;

    /// Retrieves stored messages in insertion order.
    ///
    /// With `limit`, only the **latest** `limit` messages are returned
    /// (still oldest-first). `None` returns the full history.
    async fn get_messages(&self, limit: Option<usize>) -> Result<Vec<Message>>;

    /// Appends messages to the history.
    async fn add_messages(&self, messages: &[Message]) -> Result<()>;

    /// Removes and returns the most recent message, if any.
    async fn pop_message(&self) -> Result<Option<Message>>;

    /// Deletes all messages in this session.
    async fn clear(&self) -> Result<()>;

    /// Number of stored messages.
    async fn len(&self) -> Result<usize>;

    /// Returns `true` if the session holds no messages.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// A session shared across tasks.
pub type SharedSession = Arc<dyn Session>;
