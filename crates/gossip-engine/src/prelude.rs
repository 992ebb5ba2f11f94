//! Gossip Engine Prelude
//!
//! ```rust
//! use gossip_engine::prelude::*;
//! ```

pub use crate::bus::{EventBus, EventStream};
pub use crate::config::{GossipConfig, GossipConfigBuilder, GossipConfigError};
pub use crate::engine::GossipEngine;
pub use crate::error::EngineError;
pub use crate::registry::{Peer, PeerRegistry};
