use std::sync::Arc;

use thiserror::Error;

use fieldstock_core::{MovementId, VendorId};
use fieldstock_ledger::MovementEvent;

/// Event store operation error.
///
/// These are **infrastructure errors**, as opposed to business rejections:
/// `Unavailable` is the retryable category (retry policy belongs to the
/// caller), `PartialAppend` must never be retried automatically because a
/// blind retry risks double-application.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The backing store could not be reached.
    #[error("event store unavailable: {0}")]
    Unavailable(String),

    /// An event id was already present in the log (ids are never reused).
    #[error("duplicate event id: {0}")]
    DuplicateEvent(MovementId),

    /// A batch append was interrupted part-way: the log no longer matches
    /// what the caller believes was written.
    #[error("partial append: {committed} of {attempted} events written")]
    PartialAppend { committed: usize, attempted: usize },
}

/// Append-only, durable record of movement events.
///
/// Append is the only mutation. Events are immutable once written;
/// corrections are new compensating events, never edits or deletes.
///
/// ## Append Semantics
///
/// `append` takes the whole batch of one logical operation and must be
/// **all-or-nothing**: a reader never observes part of a batch (this is what
/// keeps a transfer's two halves visible atomically). An implementation that
/// cannot complete a batch reports `PartialAppend` rather than pretending.
///
/// ## Ordering
///
/// Events are returned in insertion order. Order between different vendors'
/// events carries no meaning; within one vendor's stream, insertion order is
/// the causal submission order observed by the coordinator.
pub trait EventStore: Send + Sync {
    /// Append a batch of events atomically (append-only).
    fn append(&self, events: Vec<MovementEvent>) -> Result<(), EventStoreError>;

    /// All events for one vendor, in insertion order.
    fn vendor_events(&self, vendor_id: VendorId) -> Result<Vec<MovementEvent>, EventStoreError>;

    /// Every event in the log, in insertion order.
    fn all_events(&self) -> Result<Vec<MovementEvent>, EventStoreError>;
}

impl<S> EventStore for Arc<S>
where
    S: EventStore + ?Sized,
{
    fn append(&self, events: Vec<MovementEvent>) -> Result<(), EventStoreError> {
        (**self).append(events)
    }

    fn vendor_events(&self, vendor_id: VendorId) -> Result<Vec<MovementEvent>, EventStoreError> {
        (**self).vendor_events(vendor_id)
    }

    fn all_events(&self) -> Result<Vec<MovementEvent>, EventStoreError> {
        (**self).all_events()
    }
}
