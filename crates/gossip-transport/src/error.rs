//! Errors raised by a [`crate::transport::Transport`] (§4.3, §7).

use thiserror::Error;

/// Failure returned by a single transport exchange. Never fatal to the
/// engine; the caller logs it, updates its per-peer failure bookkeeping,
/// and moves on (§4.5.4, §4.5.8).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The transport could not reach the named peer at all.
    #[error("peer {peer} is unreachable")]
    PeerUnreachable {
        /// The peer that could not be reached.
        peer: String,
    },
    /// The exchange did not complete within its deadline.
    #[error("exchange with peer {peer} timed out after {elapsed_ms}ms")]
    Timeout {
        /// The peer the request was sent to.
        peer: String,
        /// How long the caller waited before giving up.
        elapsed_ms: u64,
    },
    /// `shutdown()` has already been called on this transport.
    #[error("transport is closed")]
    Closed,
    /// The peer returned a response that could not be decoded.
    #[error("malformed response from peer {peer}: {message}")]
    Malformed {
        /// The peer whose response failed to decode.
        peer: String,
        /// Human-readable detail.
        message: String,
    },
}
