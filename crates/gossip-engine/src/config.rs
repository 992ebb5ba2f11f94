//! Validated engine configuration (§6).

use gossip_core::prelude::NodeId;
use std::time::Duration;
use thiserror::Error;

/// Validation failure at construction time. Fatal to the caller; no
/// transport or store is touched before configuration is accepted (§1.1, §7).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GossipConfigError {
    /// `node_id` was the empty string.
    #[error("node_id must be non-empty")]
    EmptyNodeId,
    /// `gossip_interval` was zero.
    #[error("gossip_interval must be greater than zero")]
    NonPositiveGossipInterval,
    /// `max_events_per_exchange` was zero.
    #[error("max_events_per_exchange must be at least 1")]
    NonPositiveMaxEventsPerExchange,
    /// `digest_timeout` was zero.
    #[error("digest_timeout must be greater than zero")]
    NonPositiveDigestTimeout,
}

/// Validated tunables consumed by [`crate::engine::GossipEngine`] (§6).
///
/// Constructed via [`GossipConfig::builder`]; there is no public field
/// mutation after construction, matching the validated-defaults convention
/// this codebase uses for its other runtime config structs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GossipConfig {
    node_id: NodeId,
    gossip_interval: Duration,
    fanout: usize,
    max_events_per_exchange: usize,
    digest_timeout: Duration,
}

impl GossipConfig {
    /// Start building a configuration for `node_id`, with every other field
    /// defaulted per §6.
    pub fn builder(node_id: impl Into<String>) -> GossipConfigBuilder {
        GossipConfigBuilder::new(node_id)
    }

    /// Identity of this node.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Period of the background round.
    pub fn gossip_interval(&self) -> Duration {
        self.gossip_interval
    }

    /// Peers contacted per round.
    pub fn fanout(&self) -> usize {
        self.fanout
    }

    /// Bound on events returned per digest exchange and per push.
    pub fn max_events_per_exchange(&self) -> usize {
        self.max_events_per_exchange
    }

    /// Transport timeout applied to each exchange.
    pub fn digest_timeout(&self) -> Duration {
        self.digest_timeout
    }
}

/// Builder for [`GossipConfig`]. Defaults: `gossip_interval` = 1s, `fanout`
/// = 3, `max_events_per_exchange` = 100, `digest_timeout` = 2 ×
/// `gossip_interval` unless overridden (§6).
#[derive(Debug, Clone)]
pub struct GossipConfigBuilder {
    node_id: String,
    gossip_interval: Duration,
    fanout: usize,
    max_events_per_exchange: usize,
    digest_timeout: Option<Duration>,
}

impl GossipConfigBuilder {
    fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            gossip_interval: Duration::from_secs(1),
            fanout: 3,
            max_events_per_exchange: 100,
            digest_timeout: None,
        }
    }

    /// Override the background round period.
    pub fn gossip_interval(mut self, interval: Duration) -> Self {
        self.gossip_interval = interval;
        self
    }

    /// Override the number of peers contacted per round.
    pub fn fanout(mut self, fanout: usize) -> Self {
        self.fanout = fanout;
        self
    }

    /// Override the bound on events returned per exchange.
    pub fn max_events_per_exchange(mut self, max: usize) -> Self {
        self.max_events_per_exchange = max;
        self
    }

    /// Override the per-exchange transport timeout. Defaults to
    /// `2 × gossip_interval` when left unset.
    pub fn digest_timeout(mut self, timeout: Duration) -> Self {
        self.digest_timeout = Some(timeout);
        self
    }

    /// Validate and produce a [`GossipConfig`].
    pub fn build(self) -> Result<GossipConfig, GossipConfigError> {
        if self.node_id.is_empty() {
            return Err(GossipConfigError::EmptyNodeId);
        }
        if self.gossip_interval.is_zero() {
            return Err(GossipConfigError::NonPositiveGossipInterval);
        }
        if self.max_events_per_exchange == 0 {
            return Err(GossipConfigError::NonPositiveMaxEventsPerExchange);
        }
        let digest_timeout = self.digest_timeout.unwrap_or(self.gossip_interval * 2);
        if digest_timeout.is_zero() {
            return Err(GossipConfigError::NonPositiveDigestTimeout);
        }

        Ok(GossipConfig {
            node_id: NodeId::new(self.node_id),
            gossip_interval: self.gossip_interval,
            fanout: self.fanout,
            max_events_per_exchange: self.max_events_per_exchange,
            digest_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_table() {
        let config = GossipConfig::builder("node-a").build().unwrap();
        assert_eq!(config.gossip_interval(), Duration::from_secs(1));
        assert_eq!(config.fanout(), 3);
        assert_eq!(config.max_events_per_exchange(), 100);
        assert_eq!(config.digest_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn rejects_empty_node_id() {
        assert_eq!(
            GossipConfig::builder("").build(),
            Err(GossipConfigError::EmptyNodeId)
        );
    }

    #[test]
    fn rejects_zero_gossip_interval() {
        let result = GossipConfig::builder("node-a")
            .gossip_interval(Duration::ZERO)
            .build();
        assert_eq!(result, Err(GossipConfigError::NonPositiveGossipInterval));
    }

    #[test]
    fn rejects_zero_max_events_per_exchange() {
        let result = GossipConfig::builder("node-a")
            .max_events_per_exchange(0)
            .build();
        assert_eq!(
            result,
            Err(GossipConfigError::NonPositiveMaxEventsPerExchange)
        );
    }

    #[test]
    fn accepts_zero_fanout() {
        let config = GossipConfig::builder("node-a").fanout(0).build().unwrap();
        assert_eq!(config.fanout(), 0);
    }

    #[test]
    fn explicit_digest_timeout_overrides_default() {
        let config = GossipConfig::builder("node-a")
            .digest_timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        assert_eq!(config.digest_timeout(), Duration::from_millis(50));
    }
}
