//! `fieldstock-infra` — infrastructure around the possession ledger.
//!
//! The event store and central stock counter are ports with in-memory
//! implementations (tests/dev); durable backends plug in behind the same
//! traits. The [`coordinator`] owns the write path, [`query`] the read path.

pub mod catalog;
pub mod central_stock;
pub mod coordinator;
pub mod event_store;
pub mod query;
