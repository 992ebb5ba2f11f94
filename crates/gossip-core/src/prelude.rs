//! Gossip Core Prelude
//!
//! ```rust
//! use gossip_core::prelude::*;
//! ```

pub use crate::clock::{ClockOrdering, VectorClock};
pub use crate::event::{Event, EventValidationError};
pub use crate::identifiers::{EventId, NodeId, PeerId};
