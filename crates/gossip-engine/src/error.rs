//! Errors raised by [`crate::engine::GossipEngine`] itself (§7).

use gossip_store::error::StoreError;
use gossip_transport::error::TransportError;
use thiserror::Error;

/// Failure from an engine-level operation. Transport and store failures that
/// occur *inside* a gossip round are logged and contained there (§4.5.8);
/// this type only surfaces failures an operation's direct caller must see.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// An operation was called after `stop()` completed.
    #[error("engine has already been stopped")]
    Stopped,
    /// `start()` or `stop()` failed to bring the transport up or down.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// `create_event` could not persist the new event.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
