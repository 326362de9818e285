use chrono::{DateTime, Utc};

/// A fact that happened in the domain.
///
/// Implementors are append-only records: once created they are never mutated,
/// and corrections are expressed as new events. The `event_type` string is
/// part of the public contract (consumers filter on it), so it must stay
/// stable across releases; `version` covers schema evolution of the payload.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "ledger.movement.outbound").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time, display ordering only).
    fn occurred_at(&self) -> DateTime<Utc>;
}
