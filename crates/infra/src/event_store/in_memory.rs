use std::collections::HashSet;
use std::sync::RwLock;

use fieldstock_core::{MovementId, VendorId};
use fieldstock_ledger::MovementEvent;

use super::r#trait::{EventStore, EventStoreError};

/// In-memory append-only movement log.
///
/// Intended for tests/dev. Not optimized for performance: a single lock
/// covers the whole log, which also makes batch appends trivially atomic
/// (a reader never sees half of a transfer).
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    inner: RwLock<Log>,
}

#[derive(Debug, Default)]
struct Log {
    events: Vec<MovementEvent>,
    ids: HashSet<MovementId>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&self, events: Vec<MovementEvent>) -> Result<(), EventStoreError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut log = self
            .inner
            .write()
            .map_err(|_| EventStoreError::Unavailable("lock poisoned".to_string()))?;

        // Validate the whole batch before touching the log (all-or-nothing).
        let mut seen = HashSet::new();
        for event in &events {
            if log.ids.contains(&event.id) || !seen.insert(event.id) {
                return Err(EventStoreError::DuplicateEvent(event.id));
            }
        }

        for event in events {
            log.ids.insert(event.id);
            log.events.push(event);
        }

        Ok(())
    }

    fn vendor_events(&self, vendor_id: VendorId) -> Result<Vec<MovementEvent>, EventStoreError> {
        let log = self
            .inner
            .read()
            .map_err(|_| EventStoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(log
            .events
            .iter()
            .filter(|e| e.vendor_id == vendor_id)
            .cloned()
            .collect())
    }

    fn all_events(&self) -> Result<Vec<MovementEvent>, EventStoreError> {
        let log = self
            .inner
            .read()
            .map_err(|_| EventStoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(log.events.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fieldstock_core::{OperationId, ProductId};
    use fieldstock_ledger::MovementKind;

    fn event(vendor_id: VendorId) -> MovementEvent {
        MovementEvent::new(
            OperationId::new(),
            vendor_id,
            ProductId::new(),
            1,
            MovementKind::Outbound,
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn append_then_query_by_vendor() {
        let store = InMemoryEventStore::new();
        let vendor = VendorId::new();
        let other = VendorId::new();

        store.append(vec![event(vendor), event(other), event(vendor)]).unwrap();

        assert_eq!(store.vendor_events(vendor).unwrap().len(), 2);
        assert_eq!(store.vendor_events(other).unwrap().len(), 1);
        assert_eq!(store.all_events().unwrap().len(), 3);
    }

    #[test]
    fn duplicate_event_ids_are_rejected() {
        let store = InMemoryEventStore::new();
        let ev = event(VendorId::new());

        store.append(vec![ev.clone()]).unwrap();
        let err = store.append(vec![ev.clone()]).unwrap_err();

        assert!(matches!(err, EventStoreError::DuplicateEvent(id) if id == ev.id));
        assert_eq!(store.all_events().unwrap().len(), 1);
    }

    #[test]
    fn rejected_batch_leaves_no_trace() {
        let store = InMemoryEventStore::new();
        let vendor = VendorId::new();
        let existing = event(vendor);
        store.append(vec![existing.clone()]).unwrap();

        // Fresh event followed by a duplicate: the whole batch must fail.
        let fresh = event(vendor);
        store.append(vec![fresh, existing]).unwrap_err();

        assert_eq!(store.all_events().unwrap().len(), 1);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let store = InMemoryEventStore::new();
        let vendor = VendorId::new();
        let first = event(vendor);
        let second = event(vendor);

        store.append(vec![first.clone()]).unwrap();
        store.append(vec![second.clone()]).unwrap();

        let events = store.vendor_events(vendor).unwrap();
        assert_eq!(events[0].id, first.id);
        assert_eq!(events[1].id, second.id);
    }
}
