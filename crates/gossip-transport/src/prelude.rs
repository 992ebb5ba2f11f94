//! Gossip Transport Prelude
//!
//! ```rust
//! use gossip_transport::prelude::*;
//! ```

pub use crate::error::TransportError;
pub use crate::transport::{IncomingDigest, IncomingEvents, Transport};
pub use crate::wire::{GossipDigest, GossipDigestResponse, GossipEventMessage, TransportPeer};
