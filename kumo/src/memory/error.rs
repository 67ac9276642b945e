//! Memory subsystem errors.
//!
//! [`MemoryError`] covers failures in session and memory-store backends:
//! database access, message (de)serialization, and the sync-to-async
//! bridging used by the SQLite backends. It converts into the crate-level
//! [`Error`](crate::Error) via `Error::Memory`.

/// Errors produced by session and memory-store backends.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MemoryError {
    /// Underlying SQLite error.
    #[cfg(feature = "memory-sqlite")]
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored message could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The connection mutex was poisoned by a panicking thread.
    #[error("lock poisoned: {0}")]
    Lock(String),

    /// The blocking task was cancelled or panicked.
    #[error("blocking task failed: {0}")]
    Task(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serialization_wraps_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = MemoryError::from(serde_err);
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn lock_and_task_carry_messages() {
        assert!(
            MemoryError::Lock("poisoned".into())
                .to_string()
                .contains("poisoned")
        );
        assert!(
            MemoryError::Task("cancelled".into())
                .to_string()
                .contains("cancelled")
        );
    }

    #[test]
    fn converts_into_crate_error() {
        let err: crate::Error = MemoryError::Task("gone".into()).into();
        assert!(matches!(err, crate::Error::Memory(_)));
    }
}
