//! Mutable set of known peers with their last-known high-water marks (§4.4).

use gossip_core::prelude::{PeerId, VectorClock};
use gossip_transport::wire::GossipDigest;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A peer known to the local engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    /// The peer's identifier.
    pub peer_id: PeerId,
    /// Address the transport would dial to reach this peer.
    pub transport_address: String,
    /// The most recent digest this engine has received from this peer, if any.
    pub last_known_clock: Option<VectorClock>,
    /// Consecutive `sendDigest` failures against this peer since its last
    /// successful exchange (§4.5.4 step 2).
    pub failure_count: u64,
}

impl Peer {
    /// A freshly registered peer with no cached digest yet.
    pub fn new(peer_id: PeerId, transport_address: impl Into<String>) -> Self {
        Self {
            peer_id,
            transport_address: transport_address.into(),
            last_known_clock: None,
            failure_count: 0,
        }
    }
}

/// A mutable, concurrently-readable set of peers keyed by [`PeerId`] (§4.4).
///
/// Reads during mutation return a consistent snapshot; the engine takes one
/// such snapshot at the start of every gossip round rather than holding a
/// lock across the round's suspension points.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: RwLock<BTreeMap<PeerId, Peer>>,
}

impl PeerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `peer`. Replaces any existing entry with the same id,
    /// preserving no state across the replacement.
    pub fn add(&self, peer: Peer) {
        self.peers.write().insert(peer.peer_id.clone(), peer);
    }

    /// Remove the peer with `peer_id`, returning whether it was present.
    pub fn remove(&self, peer_id: &PeerId) -> bool {
        self.peers.write().remove(peer_id).is_some()
    }

    /// A snapshot of every currently registered peer.
    pub fn list(&self) -> Vec<Peer> {
        self.peers.read().values().cloned().collect()
    }

    /// Number of registered peers.
    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    /// Whether the registry currently holds no peers.
    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }

    /// Cache `digest` as `peer_id`'s last-known high-water mark, opportunistically
    /// updated after the most recent exchange (§4.4). A stale cache entry is
    /// tolerated; it causes at worst an extra round of redundant delta.
    /// Resets the peer's failure count, since this is only called after a
    /// successful exchange.
    pub fn record_digest(&self, peer_id: &PeerId, digest: &GossipDigest) {
        if let Some(peer) = self.peers.write().get_mut(peer_id) {
            peer.last_known_clock = Some(VectorClock::from(digest.clone()));
            peer.failure_count = 0;
        }
    }

    /// Bump `peer_id`'s consecutive-failure count after a failed exchange
    /// (§4.5.4 step 2). A no-op if the peer has since been removed.
    pub fn record_failure(&self, peer_id: &PeerId) {
        if let Some(peer) = self.peers.write().get_mut(peer_id) {
            peer.failure_count += 1;
        }
    }
}
