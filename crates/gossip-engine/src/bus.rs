//! Local fan-out of "event created" and "event received" notifications (§2, §6).

use gossip_core::prelude::Event;
use tokio::sync::broadcast;

/// Default per-subscriber buffer. A slow subscriber that falls behind by
/// more than this many events drops the oldest ones rather than blocking
/// the publisher; [`EventStream::recv`] skips over the resulting gap.
const CHANNEL_CAPACITY: usize = 1024;

/// A subscription to one of [`EventBus`]'s streams.
///
/// Wraps a [`broadcast::Receiver`] and transparently skips `Lagged` errors
/// so callers see an at-least-once, best-effort feed rather than having to
/// handle channel-internal bookkeeping themselves.
pub struct EventStream {
    receiver: broadcast::Receiver<Event>,
}

impl EventStream {
    fn new(receiver: broadcast::Receiver<Event>) -> Self {
        Self { receiver }
    }

    /// Receive the next event, waiting if necessary. Returns `None` once the
    /// publisher side has been dropped and no further events will arrive.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    }

    /// Receive the next event without waiting. Returns `None` if none is
    /// currently buffered or the publisher side has been dropped.
    pub fn try_recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

/// Local publish/subscribe hub for events the engine has just created or
/// just received from a peer (§2, §6).
///
/// Each call to `subscribe_*` opens an independent subscription; every
/// subscription observes every publication at-least-once, with no delivery
/// ordering guarantee across subscriptions (§5).
pub struct EventBus {
    created: broadcast::Sender<Event>,
    received: broadcast::Sender<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// A bus with no subscribers yet.
    pub fn new() -> Self {
        let (created, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (received, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { created, received }
    }

    /// Subscribe to locally created events (`onEventCreated`).
    pub fn subscribe_created(&self) -> EventStream {
        EventStream::new(self.created.subscribe())
    }

    /// Subscribe to events received from peers (`onEventReceived`).
    pub fn subscribe_received(&self) -> EventStream {
        EventStream::new(self.received.subscribe())
    }

    /// Publish a locally created event. A no-op (beyond dropping `event`) if
    /// there are currently no subscribers.
    pub fn publish_created(&self, event: Event) {
        let _ = self.created.send(event);
    }

    /// Publish an event received from a peer. A no-op (beyond dropping
    /// `event`) if there are currently no subscribers.
    pub fn publish_received(&self, event: Event) {
        let _ = self.received.send(event);
    }
}
