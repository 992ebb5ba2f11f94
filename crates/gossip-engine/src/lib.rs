//! # Gossip Engine
//!
//! The periodic anti-entropy engine: round scheduler, peer selection,
//! digest exchange state machine, and event application pipeline. Builds on
//! `gossip-core`'s types, consumes a `gossip_store::EventStore` and a
//! `gossip_transport::Transport`, and exposes the public API described in
//! this codebase's gossip engine specification.

#![forbid(unsafe_code)]

/// Local fan-out of "event created" / "event received" notifications.
pub mod bus;
/// Validated engine configuration.
pub mod config;
/// The gossip engine itself.
pub mod engine;
/// Engine-level errors.
pub mod error;
/// The peer registry.
pub mod registry;

/// Convenient re-exports of the most commonly used types from `gossip-engine`.
pub mod prelude;
