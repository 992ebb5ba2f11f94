//! In-process reference [`EventStore`] implementation (§4.1).

use crate::error::StoreError;
use crate::store::{EventStore, StoreStats};
use async_trait::async_trait;
use gossip_core::prelude::{Event, EventId, NodeId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// An in-process [`EventStore`] backed by an index keyed by node id (ordered
/// map of timestamp → event) plus a flat id → event map for O(1)
/// `has_event`/`get_event`.
///
/// Never returns [`StoreError::Io`] or [`StoreError::Corrupted`] — those are
/// reserved for persistent backends outside this crate's scope — but does
/// honor [`StoreError::Closed`] once `close()` has run, so callers
/// exercising the store's failure contract can be tested against it without
/// a real disk-backed implementation (§4.1).
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    by_node: RwLock<BTreeMap<NodeId, BTreeMap<u64, Event>>>,
    by_id: RwLock<HashMap<EventId, Event>>,
    closed: AtomicBool,
}

impl InMemoryEventStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn save_event(&self, event: Event) -> Result<(), StoreError> {
        self.ensure_open()?;

        if self.by_id.read().contains_key(&event.id) {
            trace!(event_id = %event.id, "save_event: already present, no-op");
            return Ok(());
        }

        self.by_id
            .write()
            .insert(event.id.clone(), event.clone());
        self.by_node
            .write()
            .entry(event.node_id.clone())
            .or_default()
            .insert(event.timestamp, event);
        Ok(())
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, StoreError> {
        self.ensure_open()?;
        Ok(self.by_id.read().get(id).cloned())
    }

    async fn has_event(&self, id: &EventId) -> Result<bool, StoreError> {
        self.ensure_open()?;
        Ok(self.by_id.read().contains_key(id))
    }

    async fn get_events_since(
        &self,
        node_id: &NodeId,
        since: u64,
    ) -> Result<Vec<Event>, StoreError> {
        self.ensure_open()?;
        let by_node = self.by_node.read();
        let events = by_node
            .get(node_id)
            .map(|timestamps| {
                timestamps
                    .range((since + 1)..)
                    .map(|(_, event)| event.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(events)
    }

    async fn get_latest_timestamp_for_node(&self, node_id: &NodeId) -> Result<u64, StoreError> {
        self.ensure_open()?;
        let by_node = self.by_node.read();
        Ok(by_node
            .get(node_id)
            .and_then(|timestamps| timestamps.keys().next_back().copied())
            .unwrap_or(0))
    }

    async fn get_all_events(&self) -> Result<Vec<Event>, StoreError> {
        self.ensure_open()?;
        Ok(self.by_id.read().values().cloned().collect())
    }

    async fn get_stats(&self) -> Result<StoreStats, StoreError> {
        self.ensure_open()?;
        Ok(StoreStats {
            total_events: self.by_id.read().len(),
            unique_nodes: self.by_node.read().len(),
        })
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        debug!("event store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(node_id: &str, timestamp: u64) -> Event {
        Event::new(NodeId::new(node_id), timestamp, timestamp * 1000, json!({}))
    }

    #[tokio::test]
    async fn save_event_is_idempotent_by_id() {
        let store = InMemoryEventStore::new();
        store.save_event(event("a", 1)).await.unwrap();
        store.save_event(event("a", 1)).await.unwrap();
        assert_eq!(store.get_stats().await.unwrap().total_events, 1);
    }

    #[tokio::test]
    async fn has_event_and_get_event_agree() {
        let store = InMemoryEventStore::new();
        let e = event("a", 1);
        assert!(!store.has_event(&e.id).await.unwrap());
        store.save_event(e.clone()).await.unwrap();
        assert!(store.has_event(&e.id).await.unwrap());
        assert_eq!(store.get_event(&e.id).await.unwrap(), Some(e));
    }

    #[tokio::test]
    async fn get_events_since_is_prefix_complete_despite_gaps() {
        let store = InMemoryEventStore::new();
        for t in [3, 5, 6] {
            store.save_event(event("a", t)).await.unwrap();
        }
        let node_id = NodeId::new("a");
        let since_2 = store.get_events_since(&node_id, 2).await.unwrap();
        assert_eq!(
            since_2.iter().map(|e| e.timestamp).collect::<Vec<_>>(),
            vec![3, 5, 6]
        );

        let since_5 = store.get_events_since(&node_id, 5).await.unwrap();
        assert_eq!(
            since_5.iter().map(|e| e.timestamp).collect::<Vec<_>>(),
            vec![6]
        );
    }

    #[tokio::test]
    async fn get_latest_timestamp_defaults_to_zero() {
        let store = InMemoryEventStore::new();
        let missing = NodeId::new("missing");
        assert_eq!(store.get_latest_timestamp_for_node(&missing).await.unwrap(), 0);

        store.save_event(event("a", 4)).await.unwrap();
        store.save_event(event("a", 2)).await.unwrap();
        let node_id = NodeId::new("a");
        assert_eq!(store.get_latest_timestamp_for_node(&node_id).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn stats_counts_events_and_distinct_nodes() {
        let store = InMemoryEventStore::new();
        store.save_event(event("a", 1)).await.unwrap();
        store.save_event(event("a", 2)).await.unwrap();
        store.save_event(event("b", 1)).await.unwrap();
        let stats = store.get_stats().await.unwrap();
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.unique_nodes, 2);
    }

    #[tokio::test]
    async fn operations_fail_after_close() {
        let store = InMemoryEventStore::new();
        store.save_event(event("a", 1)).await.unwrap();
        store.close().await.unwrap();

        assert!(matches!(
            store.save_event(event("a", 2)).await,
            Err(StoreError::Closed)
        ));
        assert!(matches!(
            store.get_all_events().await,
            Err(StoreError::Closed)
        ));
    }
}
