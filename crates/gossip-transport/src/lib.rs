//! # Gossip Transport
//!
//! Wire message types ([`wire::GossipDigest`], [`wire::GossipDigestResponse`],
//! [`wire::GossipEventMessage`]) and the [`transport::Transport`] contract
//! the gossip engine consumes. No transport is implemented here; concrete
//! realizations (TCP, WebSocket, in-memory test doubles) live outside this
//! crate.

#![forbid(unsafe_code)]

/// Errors raised by a [`transport::Transport`].
pub mod error;
/// The `Transport` trait contract and incoming-stream item types.
pub mod transport;
/// Wire message types.
pub mod wire;

/// Convenient re-exports of the most commonly used types from `gossip-transport`.
pub mod prelude;
