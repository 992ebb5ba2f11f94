//! Core identifier types shared across the gossip engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node participating in the cluster.
///
/// Carried on every [`crate::event::Event`] as its origin and used as the key
/// of a [`crate::clock::VectorClock`]. Construction is validated by
/// `gossip-engine`'s configuration layer (non-empty), not by this type itself —
/// `NodeId` is a plain value, not a smart constructor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a string as a node identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Identifier of a peer known to the local engine.
///
/// Distinct from [`NodeId`] in type even though peers are usually addressed
/// by the same string space: a `PeerId` names an entry in the peer registry
/// (§4.4), while a `NodeId` names an event origin (§3). A peer and an origin
/// frequently share the same value, but the registry never assumes it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId(String);

impl PeerId {
    /// Wrap a string as a peer identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PeerId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<NodeId> for PeerId {
    fn from(node_id: NodeId) -> Self {
        Self(node_id.0)
    }
}

/// Globally unique identifier of an [`crate::event::Event`].
///
/// Generated deterministically as `"{node_id}-{timestamp}"` by
/// `GossipEngine::create_event` (§4.5.2); any scheme that is globally unique
/// and stable under serialization is valid per §9, so callers must not parse
/// the string for structure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(String);

impl EventId {
    /// Wrap a string as an event identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Deterministically derive the id an event created on `node_id` at
    /// logical `timestamp` must carry.
    pub fn from_origin(node_id: &NodeId, timestamp: u64) -> Self {
        Self(format!("{node_id}-{timestamp}"))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_from_origin_matches_reference_scheme() {
        let node = NodeId::new("node-a");
        let id = EventId::from_origin(&node, 7);
        assert_eq!(id.as_str(), "node-a-7");
    }

    #[test]
    fn peer_id_from_node_id_preserves_string() {
        let node = NodeId::new("node-a");
        let peer: PeerId = node.clone().into();
        assert_eq!(peer.as_str(), node.as_str());
    }
}
