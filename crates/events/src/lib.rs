//! `fieldstock-events` — event abstractions shared across the workspace.
//!
//! The event *store* (append-only log, source of truth) lives in the infra
//! crate; this crate holds the domain-agnostic pieces: the [`Event`] trait
//! and the pub/sub [`EventBus`] used to fan committed events out to
//! downstream consumers (dashboards, notification feeds, projections).

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
