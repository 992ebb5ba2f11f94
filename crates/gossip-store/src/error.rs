//! Errors raised by an [`crate::store::EventStore`] (§4.1, §7).

use thiserror::Error;

/// Failure returned by any [`crate::store::EventStore`] operation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Underlying storage medium failed. Never returned by
    /// [`crate::in_memory::InMemoryEventStore`]; reserved for persistent backends.
    #[error("event store io failure: {message}")]
    Io {
        /// Human-readable detail.
        message: String,
    },
    /// Stored data failed an integrity check on read. Never returned by
    /// [`crate::in_memory::InMemoryEventStore`]; reserved for persistent backends.
    #[error("event store data corrupted: {message}")]
    Corrupted {
        /// Human-readable detail.
        message: String,
    },
    /// The store has already had `close()` called on it.
    #[error("event store is closed")]
    Closed,
}
