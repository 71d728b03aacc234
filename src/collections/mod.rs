//! Containers that survive a flatten/rehydrate round trip.
//!
//! Each container pairs an efficient runtime structure with a linear record
//! that a persistence layer can store, and keeps the two consistent across
//! every mutation and every round trip.
//!
//! # Example: Quick Start
//!
//! ```rust
//! use persisted_collections::collections::{Persist, PersistentQueue};
//!
//! let mut queue = PersistentQueue::new();
//! queue.enqueue_all(["scout", "worker", "tank"]);
//!
//! let record = queue.flatten();
//! let restored = PersistentQueue::from_record(record);
//! assert_eq!(restored.peek_first(), Some(&"scout"));
//! ```

pub mod error;
pub mod grid;
pub mod map;
pub mod ordered_set;
pub mod persist;
pub mod queue;

#[cfg(test)]
mod tests;

pub use error::CollectionError;
pub use grid::{Axis, Grid, GridRecord};
pub use map::{MapEntry, PersistentMap};
pub use ordered_set::OrderedSet;
pub use persist::Persist;
pub use queue::{PersistentQueue, QueueConfig, SortOrder};
