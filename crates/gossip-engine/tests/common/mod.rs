//! In-process [`gossip_transport::Transport`] test double.
//!
//! Not a shipped transport implementation — this only exists to drive the
//! engine's own test suite end to end without a real network, the same way
//! `icn-crdt`'s `gossip.rs` tests its synchronizer against a `MockTransport`.

use async_trait::async_trait;
use futures::stream::BoxStream;
use gossip_core::prelude::PeerId;
use gossip_transport::error::TransportError;
use gossip_transport::transport::{IncomingDigest, IncomingEvents, Transport};
use gossip_transport::wire::{GossipDigest, GossipDigestResponse, GossipEventMessage, TransportPeer};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Shared in-process network that a set of [`MockTransport`]s register
/// themselves with, so one node's `send_digest` can be routed to another
/// node's `incoming_digests` stream.
#[derive(Default)]
pub struct MockNetwork {
    nodes: Mutex<HashMap<PeerId, NodeHandle>>,
}

struct NodeHandle {
    digests: mpsc::UnboundedSender<IncomingDigest>,
    events: mpsc::UnboundedSender<IncomingEvents>,
    reachable: bool,
    digests_received: Arc<AtomicUsize>,
}

impl MockNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// How many digest requests `peer` has been sent, for asserting on
    /// fanout bounds.
    pub async fn digests_received(&self, peer: &PeerId) -> usize {
        self.nodes
            .lock()
            .await
            .get(peer)
            .map(|handle| handle.digests_received.load(Ordering::Acquire))
            .unwrap_or(0)
    }
}

/// Poll `check` until it returns `true` or `timeout` elapses, returning
/// whether it converged. Used instead of a fixed sleep to avoid flakiness
/// while still tolerating the engine's background tasks running async.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// One node's endpoint on a [`MockNetwork`].
pub struct MockTransport {
    peer_id: PeerId,
    network: Arc<MockNetwork>,
    digest_rx: Mutex<mpsc::UnboundedReceiver<IncomingDigest>>,
    events_rx: Mutex<mpsc::UnboundedReceiver<IncomingEvents>>,
}

impl MockTransport {
    /// Join `network` as `peer_id`, reachable by every other participant.
    pub async fn join(network: Arc<MockNetwork>, peer_id: PeerId) -> Arc<Self> {
        let (digest_tx, digest_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        network.nodes.lock().await.insert(
            peer_id.clone(),
            NodeHandle {
                digests: digest_tx,
                events: events_tx,
                reachable: true,
                digests_received: Arc::new(AtomicUsize::new(0)),
            },
        );
        Arc::new(Self {
            peer_id,
            network,
            digest_rx: Mutex::new(digest_rx),
            events_rx: Mutex::new(events_rx),
        })
    }

    /// Mark `peer_id` unreachable from every node on this network, so any
    /// subsequent `send_digest`/`send_events` to it fails.
    pub async fn cut_off(network: &Arc<MockNetwork>, peer_id: &PeerId) {
        if let Some(handle) = network.nodes.lock().await.get_mut(peer_id) {
            handle.reachable = false;
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn initialize(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn send_digest(
        &self,
        peer: &PeerId,
        digest: GossipDigest,
        timeout: Duration,
    ) -> Result<GossipDigestResponse, TransportError> {
        let digest_tx = {
            let nodes = self.network.nodes.lock().await;
            let handle = nodes
                .get(peer)
                .ok_or_else(|| TransportError::PeerUnreachable {
                    peer: peer.to_string(),
                })?;
            if !handle.reachable {
                return Err(TransportError::PeerUnreachable {
                    peer: peer.to_string(),
                });
            }
            handle.digests_received.fetch_add(1, Ordering::AcqRel);
            handle.digests.clone()
        };

        let (respond_tx, respond_rx) = tokio::sync::oneshot::channel();
        digest_tx
            .send(IncomingDigest {
                from_peer: self.peer_id.clone(),
                digest,
                respond: respond_tx,
            })
            .map_err(|_| TransportError::PeerUnreachable {
                peer: peer.to_string(),
            })?;

        tokio::time::timeout(timeout, respond_rx)
            .await
            .map_err(|_| TransportError::Timeout {
                peer: peer.to_string(),
                elapsed_ms: timeout.as_millis() as u64,
            })?
            .map_err(|_| TransportError::Malformed {
                peer: peer.to_string(),
                message: "responder dropped the reply channel".into(),
            })
    }

    async fn send_events(
        &self,
        peer: &PeerId,
        batch: GossipEventMessage,
        _timeout: Duration,
    ) -> Result<(), TransportError> {
        let nodes = self.network.nodes.lock().await;
        let handle = nodes
            .get(peer)
            .ok_or_else(|| TransportError::PeerUnreachable {
                peer: peer.to_string(),
            })?;
        if !handle.reachable {
            return Err(TransportError::PeerUnreachable {
                peer: peer.to_string(),
            });
        }
        handle
            .events
            .send(IncomingEvents {
                from_peer: self.peer_id.clone(),
                batch,
            })
            .map_err(|_| TransportError::PeerUnreachable {
                peer: peer.to_string(),
            })
    }

    fn incoming_digests(&self) -> BoxStream<'_, IncomingDigest> {
        Box::pin(futures::stream::unfold(&self.digest_rx, |rx| async move {
            rx.lock().await.recv().await.map(|item| (item, rx))
        }))
    }

    fn incoming_events(&self) -> BoxStream<'_, IncomingEvents> {
        Box::pin(futures::stream::unfold(&self.events_rx, |rx| async move {
            rx.lock().await.recv().await.map(|item| (item, rx))
        }))
    }

    async fn discover_peers(&self) -> Result<Vec<TransportPeer>, TransportError> {
        let nodes = self.network.nodes.lock().await;
        Ok(nodes
            .keys()
            .filter(|id| **id != self.peer_id)
            .map(|id| TransportPeer {
                peer_id: id.clone(),
                address: id.to_string(),
            })
            .collect())
    }

    async fn is_peer_reachable(&self, peer: &PeerId) -> bool {
        self.network
            .nodes
            .lock()
            .await
            .get(peer)
            .map(|handle| handle.reachable)
            .unwrap_or(false)
    }
}
