//! The [`EventStore`] contract consumed by the gossip engine (§4.1).

use crate::error::StoreError;
use async_trait::async_trait;
use gossip_core::prelude::{Event, EventId, NodeId};

/// Aggregate counts returned by [`EventStore::get_stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Total number of distinct events held.
    pub total_events: usize,
    /// Number of distinct origin node ids represented.
    pub unique_nodes: usize,
}

/// Durable (or in-memory) storage for the replicated event log.
///
/// Implementations must make `save_event` idempotent by [`EventId`] and must
/// never reorder or lose events once a save succeeds. The gossip engine
/// treats every method as independently fallible and does not assume any
/// two calls observe a consistent snapshot unless documented otherwise.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist `event`. A second call with the same `event.id` is a no-op,
    /// not an error (§4.1).
    async fn save_event(&self, event: Event) -> Result<(), StoreError>;

    /// Look up a single event by id.
    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, StoreError>;

    /// Whether an event with `id` is already stored.
    async fn has_event(&self, id: &EventId) -> Result<bool, StoreError>;

    /// All events from `node_id` with `timestamp > since`, ascending by
    /// timestamp. Prefix-complete: gaps in the stored sequence do not
    /// prevent later events from being returned (§4.1).
    async fn get_events_since(
        &self,
        node_id: &NodeId,
        since: u64,
    ) -> Result<Vec<Event>, StoreError>;

    /// Highest `timestamp` stored for `node_id`, or 0 if none.
    async fn get_latest_timestamp_for_node(&self, node_id: &NodeId) -> Result<u64, StoreError>;

    /// Every event currently held, in unspecified order.
    async fn get_all_events(&self) -> Result<Vec<Event>, StoreError>;

    /// Aggregate counts over the current contents.
    async fn get_stats(&self) -> Result<StoreStats, StoreError>;

    /// Release resources. Idempotent; subsequent calls to any other method
    /// return [`StoreError::Closed`].
    async fn close(&self) -> Result<(), StoreError>;
}

/// Blanket implementation so `Arc<T>` can stand in for `T` wherever an
/// `EventStore` is expected, e.g. when the same store instance is shared
/// between an engine and a test harness.
#[async_trait]
impl<T: EventStore + ?Sized> EventStore for std::sync::Arc<T> {
    async fn save_event(&self, event: Event) -> Result<(), StoreError> {
        (**self).save_event(event).await
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, StoreError> {
        (**self).get_event(id).await
    }

    async fn has_event(&self, id: &EventId) -> Result<bool, StoreError> {
        (**self).has_event(id).await
    }

    async fn get_events_since(
        &self,
        node_id: &NodeId,
        since: u64,
    ) -> Result<Vec<Event>, StoreError> {
        (**self).get_events_since(node_id, since).await
    }

    async fn get_latest_timestamp_for_node(&self, node_id: &NodeId) -> Result<u64, StoreError> {
        (**self).get_latest_timestamp_for_node(node_id).await
    }

    async fn get_all_events(&self) -> Result<Vec<Event>, StoreError> {
        (**self).get_all_events().await
    }

    async fn get_stats(&self) -> Result<StoreStats, StoreError> {
        (**self).get_stats().await
    }

    async fn close(&self) -> Result<(), StoreError> {
        (**self).close().await
    }
}
