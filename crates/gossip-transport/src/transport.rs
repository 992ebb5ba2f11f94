//! The [`Transport`] contract consumed by the gossip engine (§4.3).

use crate::error::TransportError;
use crate::wire::{GossipDigest, GossipDigestResponse, GossipEventMessage, TransportPeer};
use async_trait::async_trait;
use futures::stream::BoxStream;
use gossip_core::prelude::PeerId;
use std::time::Duration;
use tokio::sync::oneshot;

/// A digest request arriving from a remote peer, paired with the one-shot
/// channel the engine must use to reply exactly once (§4.3, §9).
///
/// The transport owns `respond`'s other half and may enforce its own
/// timeout on it; dropping this value without sending is equivalent to a
/// responder failure the requester will observe as a timeout.
#[derive(Debug)]
pub struct IncomingDigest {
    /// The peer that sent the digest.
    pub from_peer: PeerId,
    /// The digest itself.
    pub digest: GossipDigest,
    /// Channel to deliver this engine's single reply on.
    pub respond: oneshot::Sender<GossipDigestResponse>,
}

/// A one-way event batch arriving from a remote peer (§4.3).
#[derive(Debug, Clone)]
pub struct IncomingEvents {
    /// The peer that sent the batch.
    pub from_peer: PeerId,
    /// The events pushed.
    pub batch: GossipEventMessage,
}

/// Bidirectional message exchange with named peers, consumed and not
/// implemented by the gossip engine (§1, §4.3).
///
/// Implementations make no reliability, ordering, or authentication
/// guarantee; the engine treats every exchange as best-effort and
/// independently idempotent.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Bring the transport up. Called once from `GossipEngine::start`.
    async fn initialize(&self) -> Result<(), TransportError>;

    /// Tear the transport down. Called once from `GossipEngine::stop`.
    async fn shutdown(&self) -> Result<(), TransportError>;

    /// Request/response digest exchange with `peer`, bounded by `timeout`.
    async fn send_digest(
        &self,
        peer: &PeerId,
        digest: GossipDigest,
        timeout: Duration,
    ) -> Result<GossipDigestResponse, TransportError>;

    /// One-way push of `batch` to `peer`, used for proactive propagation of
    /// freshly created local events (§4.5.4).
    async fn send_events(
        &self,
        peer: &PeerId,
        batch: GossipEventMessage,
        timeout: Duration,
    ) -> Result<(), TransportError>;

    /// A lazy, cancellable stream of incoming digest requests. The engine
    /// must eventually call `respond` exactly once per item (§4.3).
    fn incoming_digests(&self) -> BoxStream<'_, IncomingDigest>;

    /// A lazy stream of incoming one-way event batches (§4.3).
    fn incoming_events(&self) -> BoxStream<'_, IncomingEvents>;

    /// Point-in-time snapshot of peers reachable at the transport layer.
    async fn discover_peers(&self) -> Result<Vec<TransportPeer>, TransportError>;

    /// Whether `peer` currently appears reachable.
    async fn is_peer_reachable(&self, peer: &PeerId) -> bool;
}

/// Blanket implementation so `Arc<T>` can stand in for `T` wherever a
/// `Transport` is expected, e.g. when the same transport instance is shared
/// between an engine and a test harness.
#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn initialize(&self) -> Result<(), TransportError> {
        (**self).initialize().await
    }

    async fn shutdown(&self) -> Result<(), TransportError> {
        (**self).shutdown().await
    }

    async fn send_digest(
        &self,
        peer: &PeerId,
        digest: GossipDigest,
        timeout: Duration,
    ) -> Result<GossipDigestResponse, TransportError> {
        (**self).send_digest(peer, digest, timeout).await
    }

    async fn send_events(
        &self,
        peer: &PeerId,
        batch: GossipEventMessage,
        timeout: Duration,
    ) -> Result<(), TransportError> {
        (**self).send_events(peer, batch, timeout).await
    }

    fn incoming_digests(&self) -> BoxStream<'_, IncomingDigest> {
        (**self).incoming_digests()
    }

    fn incoming_events(&self) -> BoxStream<'_, IncomingEvents> {
        (**self).incoming_events()
    }

    async fn discover_peers(&self) -> Result<Vec<TransportPeer>, TransportError> {
        (**self).discover_peers().await
    }

    async fn is_peer_reachable(&self, peer: &PeerId) -> bool {
        (**self).is_peer_reachable(peer).await
    }
}
