//! # Gossip Core
//!
//! Shared value types for the gossip engine: node/peer/event identifiers,
//! the immutable [`event::Event`] record, and the [`clock::VectorClock`]
//! used to reason about causal order between nodes.
//!
//! This crate has no async runtime and no I/O; it is the foundation layer
//! that `gossip-store`, `gossip-transport`, and `gossip-engine` all build on.

#![forbid(unsafe_code)]

/// Vector clock: per-node logical timestamp map with merge and comparison.
pub mod clock;
/// Immutable event record.
pub mod event;
/// Node, peer, and event identifier newtypes.
pub mod identifiers;

/// Convenient re-exports of the most commonly used types from `gossip-core`.
pub mod prelude;
