//! Immutable event record: origin, logical timestamp, and opaque payload (§3).

use crate::identifiers::{EventId, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single immutable record produced by exactly one node.
///
/// `(node_id, timestamp)` uniquely identifies an event and is the domain
/// `id` is generated from (§3). Events are never mutated once constructed;
/// `GossipEngine::create_event` is the only place a fresh one is minted, and
/// every other path into the system decodes one off the wire or out of a
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Globally unique identifier, by convention `"<node_id>-<timestamp>"`.
    pub id: EventId,
    /// The node that produced this event.
    #[serde(rename = "nodeId")]
    pub node_id: NodeId,
    /// Origin-local logical sequence number, ≥ 1. Forms a gap-free sequence
    /// per `node_id` at the origin, though a receiver may observe gaps
    /// transiently under out-of-order delivery (§4.5.6).
    pub timestamp: u64,
    /// Wall-clock milliseconds at creation. Used only for cross-node
    /// ordering heuristics, never for causality.
    #[serde(rename = "creationTimestamp")]
    pub creation_timestamp: u64,
    /// Opaque, JSON-serializable payload chosen by the host application.
    pub payload: Value,
}

/// Reasons an [`Event`] fails the inbound validity check (§4.5.6 step 2).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    /// `timestamp` was 0; origin-local sequence numbers start at 1.
    #[error("event {id} from node {node_id} carries timestamp 0, which is never valid")]
    ZeroTimestamp {
        /// The offending event's id.
        id: EventId,
        /// The offending event's origin.
        node_id: NodeId,
    },
    /// `id` does not match the `"<node_id>-<timestamp>"` scheme this engine
    /// mints, so it cannot have originated from `create_event`.
    #[error("event id {id} is not well-formed for node {node_id} at timestamp {timestamp}")]
    MalformedId {
        /// The offending event's id.
        id: EventId,
        /// The offending event's origin.
        node_id: NodeId,
        /// The offending event's declared timestamp.
        timestamp: u64,
    },
}

impl Event {
    /// Construct an event, used by `GossipEngine::create_event` after it has
    /// already incremented the local vector clock (§4.5.2).
    pub fn new(node_id: NodeId, timestamp: u64, creation_timestamp: u64, payload: Value) -> Self {
        let id = EventId::from_origin(&node_id, timestamp);
        Self {
            id,
            node_id,
            timestamp,
            creation_timestamp,
            payload,
        }
    }

    /// Validate the invariants an inbound event must satisfy before it is
    /// persisted (§4.5.6 step 2). Does not check `hasEvent` idempotence;
    /// that is the caller's responsibility since it requires the store.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.timestamp == 0 {
            return Err(EventValidationError::ZeroTimestamp {
                id: self.id.clone(),
                node_id: self.node_id.clone(),
            });
        }
        let expected = EventId::from_origin(&self.node_id, self.timestamp);
        if self.id != expected {
            return Err(EventValidationError::MalformedId {
                id: self.id.clone(),
                node_id: self.node_id.clone(),
                timestamp: self.timestamp,
            });
        }
        Ok(())
    }
}
