//! Wire message types carried by a [`crate::transport::Transport`] (§6).
//!
//! JSON is the reference encoding; these types derive `serde` so any
//! transport implementation may choose its own framing on top.

use gossip_core::prelude::{Event, NodeId, PeerId, VectorClock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A vector clock snapshot sent as the request payload of an anti-entropy
/// exchange: `{"clock": {"<nodeId>": <int>, ...}}` (§3, §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GossipDigest {
    /// Highest timestamp seen per origin node id.
    pub clock: BTreeMap<NodeId, u64>,
}

impl From<&VectorClock> for GossipDigest {
    fn from(clock: &VectorClock) -> Self {
        let clock = clock.iter().map(|(id, t)| (id.clone(), t)).collect();
        Self { clock }
    }
}

impl From<GossipDigest> for VectorClock {
    fn from(digest: GossipDigest) -> Self {
        VectorClock::from_entries(digest.clock)
    }
}

impl GossipDigest {
    /// The logical time this digest claims for `node_id`, or 0 if absent.
    pub fn get(&self, node_id: &NodeId) -> u64 {
        self.clock.get(node_id).copied().unwrap_or(0)
    }
}

/// The responder's reply to a [`GossipDigest`] request: the events the
/// requester is missing plus the responder's own digest (§3, §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GossipDigestResponse {
    /// Events the responder holds that the requester's digest shows it lacks,
    /// bounded by `max_events_per_exchange`.
    pub events: Vec<Event>,
    /// The responder's own digest, letting the requester discover events it
    /// is missing and request them on a later round.
    pub digest: GossipDigest,
}

/// A one-way batch push of events, used for proactive propagation of
/// freshly created local events (§4.3, §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GossipEventMessage {
    /// The events being pushed.
    pub events: Vec<Event>,
}

/// A peer as discovered or reported by the transport layer (§4.3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportPeer {
    /// The peer's identifier.
    pub peer_id: PeerId,
    /// Address the transport would dial to reach this peer. Opaque to the
    /// engine; interpreted only by the transport implementation.
    pub address: String,
}
