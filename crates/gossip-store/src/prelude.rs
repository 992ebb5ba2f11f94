//! Gossip Store Prelude
//!
//! ```rust
//! use gossip_store::prelude::*;
//! ```

pub use crate::error::StoreError;
pub use crate::in_memory::InMemoryEventStore;
pub use crate::store::{EventStore, StoreStats};
