//! # Gossip Store
//!
//! The [`store::EventStore`] contract the gossip engine consumes, plus
//! [`in_memory::InMemoryEventStore`], an in-process reference implementation
//! used in tests and for hosts with no durability requirement.

#![forbid(unsafe_code)]

/// Errors raised by an [`store::EventStore`].
pub mod error;
/// The in-memory reference implementation.
pub mod in_memory;
/// The `EventStore` trait contract.
pub mod store;

/// Convenient re-exports of the most commonly used types from `gossip-store`.
pub mod prelude;
