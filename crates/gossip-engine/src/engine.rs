//! The gossip engine: periodic round scheduler, peer selection, digest
//! exchange state machine, and event application pipeline (§4.5).

use crate::bus::{EventBus, EventStream};
use crate::config::GossipConfig;
use crate::error::EngineError;
use crate::registry::{Peer, PeerRegistry};
use futures::StreamExt;
use gossip_core::prelude::{Event, PeerId, VectorClock};
use gossip_store::prelude::EventStore;
use gossip_transport::prelude::{
    GossipDigest, GossipDigestResponse, GossipEventMessage, IncomingDigest, IncomingEvents,
    Transport,
};
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How long `stop()` waits for in-flight rounds to drain before giving up
/// and shutting the transport down regardless (§4.5.1, §5). Not part of the
/// configuration surface; every engine instance uses the same bound.
const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(5);

/// Lifecycle state of a [`GossipEngine`] (§4.5.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Created,
    Running,
    Stopped,
}

struct EngineInner<T, S> {
    config: GossipConfig,
    transport: T,
    store: S,
    clock: AsyncMutex<VectorClock>,
    peers: PeerRegistry,
    bus: EventBus,
    state: parking_lot::Mutex<EngineState>,
    in_flight: parking_lot::Mutex<HashSet<PeerId>>,
    stopping: AtomicBool,
    background_tasks: parking_lot::Mutex<Vec<JoinHandle<()>>>,
    round_tasks: parking_lot::Mutex<Vec<JoinHandle<()>>>,
}

/// Periodic anti-entropy gossip engine (§4.5).
///
/// Cheaply `Clone`-able: every clone shares the same underlying state via an
/// `Arc`, which is how the engine hands copies of itself to its own
/// background tasks without a manager type.
pub struct GossipEngine<T, S> {
    inner: Arc<EngineInner<T, S>>,
}

impl<T, S> Clone for GossipEngine<T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl<T, S> GossipEngine<T, S>
where
    T: Transport + 'static,
    S: EventStore + 'static,
{
    /// Build an engine in the `created` state. Call `start()` to begin
    /// gossiping.
    pub fn new(config: GossipConfig, transport: T, store: S) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                config,
                transport,
                store,
                clock: AsyncMutex::new(VectorClock::new()),
                peers: PeerRegistry::new(),
                bus: EventBus::new(),
                state: parking_lot::Mutex::new(EngineState::Created),
                in_flight: parking_lot::Mutex::new(HashSet::new()),
                stopping: AtomicBool::new(false),
                background_tasks: parking_lot::Mutex::new(Vec::new()),
                round_tasks: parking_lot::Mutex::new(Vec::new()),
            }),
        }
    }

    /// This engine's configuration.
    pub fn config(&self) -> &GossipConfig {
        &self.inner.config
    }

    /// Read-only handle to the underlying store.
    pub fn event_store(&self) -> &S {
        &self.inner.store
    }

    /// Register a peer to gossip with.
    pub fn add_peer(&self, peer: Peer) {
        self.inner.peers.add(peer);
    }

    /// Remove a peer, returning whether it was present.
    pub fn remove_peer(&self, peer_id: &PeerId) -> bool {
        self.inner.peers.remove(peer_id)
    }

    /// Snapshot of every currently registered peer.
    pub fn peers(&self) -> Vec<Peer> {
        self.inner.peers.list()
    }

    /// Subscribe to locally created events.
    pub fn on_event_created(&self) -> EventStream {
        self.inner.bus.subscribe_created()
    }

    /// Subscribe to events received from peers.
    pub fn on_event_received(&self) -> EventStream {
        self.inner.bus.subscribe_received()
    }

    fn ensure_not_stopped(&self) -> Result<(), EngineError> {
        if *self.inner.state.lock() == EngineState::Stopped {
            Err(EngineError::Stopped)
        } else {
            Ok(())
        }
    }

    /// Bring the engine up: initialize the transport, subscribe to incoming
    /// digests and events, and arm the periodic ticker. Idempotent while
    /// already running (§4.5.1).
    pub async fn start(&self) -> Result<(), EngineError> {
        {
            let mut state = self.inner.state.lock();
            match *state {
                EngineState::Running => return Ok(()),
                EngineState::Stopped => return Err(EngineError::Stopped),
                EngineState::Created => *state = EngineState::Running,
            }
        }

        self.inner.transport.initialize().await?;

        let ticker = tokio::spawn(self.clone().run_ticker());
        let digests = tokio::spawn(self.clone().drive_incoming_digests());
        let events = tokio::spawn(self.clone().drive_incoming_events());
        *self.inner.background_tasks.lock() = vec![ticker, digests, events];

        info!(node_id = %self.inner.config.node_id(), "gossip engine started");
        Ok(())
    }

    /// Cancel the ticker, unsubscribe from incoming streams, wait for
    /// in-flight rounds to drain (bounded by a shutdown deadline), then shut
    /// the transport down. Terminal: the engine cannot be restarted (§4.5.1).
    pub async fn stop(&self) -> Result<(), EngineError> {
        {
            let mut state = self.inner.state.lock();
            if *state == EngineState::Stopped {
                return Ok(());
            }
            *state = EngineState::Stopped;
        }
        self.inner.stopping.store(true, Ordering::Release);

        for task in std::mem::take(&mut *self.inner.background_tasks.lock()) {
            task.abort();
        }

        let round_tasks = std::mem::take(&mut *self.inner.round_tasks.lock());
        let drain = futures::future::join_all(round_tasks);
        if tokio::time::timeout(SHUTDOWN_DEADLINE, drain).await.is_err() {
            warn!("shutdown deadline elapsed before in-flight rounds drained");
        }

        self.inner.transport.shutdown().await?;
        info!(node_id = %self.inner.config.node_id(), "gossip engine stopped");
        Ok(())
    }

    /// Stamp, persist, and publish a locally created event (§4.5.2).
    pub async fn create_event(&self, payload: serde_json::Value) -> Result<Event, EngineError> {
        self.ensure_not_stopped()?;

        let node_id = self.inner.config.node_id().clone();
        let mut clock = self.inner.clock.lock().await;
        let timestamp = clock.get(&node_id) + 1;
        let event = Event::new(node_id.clone(), timestamp, now_millis(), payload);

        self.inner.store.save_event(event.clone()).await?;
        clock.set(&node_id, timestamp);
        drop(clock);

        self.inner.bus.publish_created(event.clone());
        Ok(event)
    }

    /// Run one gossip round to completion: snapshot peers, select up to
    /// `fanout` of them, and exchange digests with each in parallel (§4.5.3).
    pub async fn gossip(&self) -> Result<(), EngineError> {
        self.ensure_not_stopped()?;

        let snapshot = self.inner.peers.list();
        if snapshot.is_empty() {
            debug!("gossip round skipped: no peers registered");
            return Ok(());
        }

        let busy = self.inner.in_flight.lock().clone();
        let mut candidates: Vec<Peer> = snapshot
            .into_iter()
            .filter(|peer| !busy.contains(&peer.peer_id))
            .collect();
        candidates.shuffle(&mut rand::thread_rng());
        let selected: Vec<Peer> = candidates
            .into_iter()
            .take(self.inner.config.fanout())
            .collect();
        if selected.is_empty() {
            return Ok(());
        }

        {
            let mut in_flight = self.inner.in_flight.lock();
            for peer in &selected {
                in_flight.insert(peer.peer_id.clone());
            }
        }

        let my_clock = self.inner.clock.lock().await.copy();
        let my_digest = GossipDigest::from(&my_clock);

        let exchanges = selected.into_iter().map(|peer| {
            let engine = self.clone();
            let my_digest = my_digest.clone();
            let my_clock = my_clock.clone();
            async move { engine.exchange_with_peer(peer, my_digest, my_clock).await }
        });
        futures::future::join_all(exchanges).await;
        Ok(())
    }

    async fn exchange_with_peer(&self, peer: Peer, my_digest: GossipDigest, my_clock: VectorClock) {
        let result = self
            .inner
            .transport
            .send_digest(&peer.peer_id, my_digest, self.inner.config.digest_timeout())
            .await;
        self.inner.in_flight.lock().remove(&peer.peer_id);

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                warn!(peer = %peer.peer_id, %error, "digest exchange failed");
                self.inner.peers.record_failure(&peer.peer_id);
                return;
            }
        };

        for event in &response.events {
            self.apply_inbound_event(event.clone()).await;
        }

        for (node_id, my_t) in my_clock.iter() {
            let their_t = response.digest.get(node_id);
            if their_t >= my_t {
                continue;
            }
            match self
                .inner
                .store
                .get_events_since(node_id, their_t)
                .await
            {
                Ok(mut events) => {
                    events.truncate(self.inner.config.max_events_per_exchange());
                    if events.is_empty() {
                        continue;
                    }
                    let batch = GossipEventMessage { events };
                    if let Err(error) = self
                        .inner
                        .transport
                        .send_events(&peer.peer_id, batch, self.inner.config.digest_timeout())
                        .await
                    {
                        warn!(peer = %peer.peer_id, %error, "gap-closing push failed");
                    }
                }
                Err(error) => {
                    warn!(peer = %peer.peer_id, node_id = %node_id, %error, "failed to read events to push");
                }
            }
        }

        self.inner.peers.record_digest(&peer.peer_id, &response.digest);
    }

    async fn handle_incoming_digest(&self, incoming: IncomingDigest) {
        let IncomingDigest {
            from_peer,
            digest,
            respond,
        } = incoming;

        let my_clock = self.inner.clock.lock().await.copy();
        let mut events = Vec::new();
        let max = self.inner.config.max_events_per_exchange();

        for (node_id, my_t) in my_clock.iter() {
            let since = digest.get(node_id);
            if since >= my_t {
                continue;
            }
            match self.inner.store.get_events_since(node_id, since).await {
                Ok(more) => {
                    events.extend(more.into_iter().take(max));
                }
                Err(error) => {
                    warn!(node_id = %node_id, %error, "failed to compute digest delta");
                }
            }
        }

        let response = GossipDigestResponse {
            events,
            digest: GossipDigest::from(&my_clock),
        };
        if respond.send(response).is_err() {
            warn!(peer = %from_peer, "failed to deliver digest response; requester will time out and retry");
        }

        // A reciprocal pull for anything `from_peer` has that we lack happens
        // passively: §4.5.3's uniform-random peer selection will eventually
        // pick `from_peer` again. Caching its digest here just keeps the
        // registry's opportunistic high-water mark fresh (§4.4).
        self.inner.peers.record_digest(&from_peer, &digest);
    }

    async fn apply_inbound_event(&self, event: Event) {
        match self.inner.store.has_event(&event.id).await {
            Ok(true) => return,
            Ok(false) => {}
            Err(error) => {
                warn!(event_id = %event.id, %error, "failed to check event presence, skipping");
                return;
            }
        }

        if let Err(error) = event.validate() {
            warn!(event_id = %event.id, %error, "discarding invalid inbound event");
            return;
        }

        if let Err(error) = self.inner.store.save_event(event.clone()).await {
            warn!(event_id = %event.id, %error, "failed to persist inbound event, skipping");
            return;
        }

        {
            let mut clock = self.inner.clock.lock().await;
            if event.timestamp > clock.get(&event.node_id) {
                clock.set(&event.node_id, event.timestamp);
            }
        }

        self.inner.bus.publish_received(event);
    }

    async fn run_ticker(self) {
        let mut interval = tokio::time::interval(self.inner.config.gossip_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if self.inner.stopping.load(Ordering::Acquire) {
                return;
            }
            let engine = self.clone();
            let handle = tokio::spawn(async move {
                if let Err(error) = engine.gossip().await {
                    warn!(%error, "gossip round failed");
                }
            });
            self.inner.round_tasks.lock().push(handle);
        }
    }

    async fn drive_incoming_digests(self) {
        let stream = self.inner.transport.incoming_digests();
        futures::pin_mut!(stream);
        while let Some(incoming) = stream.next().await {
            if self.inner.stopping.load(Ordering::Acquire) {
                return;
            }
            self.handle_incoming_digest(incoming).await;
        }
    }

    async fn drive_incoming_events(self) {
        let stream = self.inner.transport.incoming_events();
        futures::pin_mut!(stream);
        while let Some(IncomingEvents { batch, .. }) = stream.next().await {
            if self.inner.stopping.load(Ordering::Acquire) {
                return;
            }
            for event in batch.events {
                self.apply_inbound_event(event).await;
            }
        }
    }
}
