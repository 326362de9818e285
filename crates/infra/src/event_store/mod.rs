//! Append-only movement log boundary.
//!
//! Defines the storage abstraction for movement events without making any
//! storage assumptions: the in-memory implementation backs tests/dev, and a
//! database-backed implementation can plug in behind the same trait.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryEventStore;
pub use r#trait::{EventStore, EventStoreError};
