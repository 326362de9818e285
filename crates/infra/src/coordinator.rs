//! Movement coordination: the write path of the possession ledger.
//!
//! Each operation runs a small state machine: `Validating → Applying →
//! Committed`, or `Validating → Rejected`. Validation only reads; Applying
//! is the only place the event store and the central stock counter are
//! touched, and the only place partial failure has to be compensated.
//!
//! ## Execution guarantees
//!
//! - An operation rejected in Validating has touched no resource.
//! - A `distribute` whose append fails rolls its reservation back via
//!   `release` before returning; a reservation never outlives its operation.
//! - A transfer's two events go to the store as one all-or-nothing batch; a
//!   store that reports partial application surfaces as a non-retryable
//!   integrity failure with both event attempts logged for reconciliation.
//! - Committed events are published on the bus *after* the append. Publish
//!   is best-effort: the store is the source of truth and consumers can
//!   rebuild from it, so a publish failure warns instead of un-committing.

use core::fmt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;

use fieldstock_core::{DomainError, OperationId, ProductId, VendorId};
use fieldstock_events::{Event, EventBus};
use fieldstock_ledger::{MovementEvent, MovementKind, vendor_quantities};

use crate::central_stock::{CentralStockError, CentralStockStore};
use crate::event_store::{EventStore, EventStoreError};

/// Terminal failure of a movement operation.
///
/// `InsufficientStock` and `ExceedsBalance` are expected business outcomes
/// of validation, not faults; callers should treat them as a normal branch.
/// `Integrity` is fatal and must never be retried automatically; `Store` and
/// `Counter` are the retryable infrastructure category.
#[derive(Debug, Error)]
pub enum MovementError {
    /// Malformed request (e.g. non-positive quantity); rejected before any
    /// resource is touched.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Transfer source and destination are the same vendor.
    #[error("transfer source and destination vendors must differ")]
    SameVendor,

    /// Warehouse stock cannot cover an outbound distribution.
    #[error("insufficient central stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u64,
    },

    /// The vendor's derived possession cannot cover a return or transfer.
    #[error("vendor {vendor_id} holds {available} of {product_id}, requested {requested}")]
    ExceedsBalance {
        vendor_id: VendorId,
        product_id: ProductId,
        requested: u32,
        available: i64,
    },

    /// The ledger and the central stock counter may disagree; manual
    /// reconciliation is required.
    #[error("integrity failure in operation {operation_id}: {detail}")]
    Integrity {
        operation_id: OperationId,
        detail: String,
    },

    /// The event store failed; the caller may retry the whole operation.
    #[error(transparent)]
    Store(#[from] EventStoreError),

    /// The central stock counter backend failed; the caller may retry.
    #[error("central stock counter failure: {0}")]
    Counter(String),
}

impl From<DomainError> for MovementError {
    fn from(value: DomainError) -> Self {
        MovementError::InvalidOperation(value.to_string())
    }
}

/// A successfully applied movement operation.
#[derive(Debug, Clone)]
pub struct Committed {
    pub operation_id: OperationId,
    /// The appended events, in append order (two for a transfer).
    pub events: Vec<MovementEvent>,
}

/// Lifecycle phase of an in-flight operation, surfaced in tracing output.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Validating,
    Applying,
    Committed,
    Rejected,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Validating => "validating",
            Phase::Applying => "applying",
            Phase::Committed => "committed",
            Phase::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Per-vendor serialization of balance-subtracting operations.
///
/// Validation reads a vendor's derived balance, then the append happens; two
/// concurrent subtractions against the same vendor must not both validate on
/// the same prior balance. Operations on different vendors stay concurrent.
#[derive(Debug, Default)]
struct VendorLocks {
    locks: Mutex<HashMap<VendorId, Arc<Mutex<()>>>>,
}

impl VendorLocks {
    fn for_vendor(&self, vendor_id: VendorId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(vendor_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Orchestrates multi-step movement operations as atomic units.
///
/// Composes the event store, the central stock counter, and the event bus
/// behind traits, so tests run against in-memory implementations and real
/// backends swap in without touching this code.
#[derive(Debug)]
pub struct MovementCoordinator<S, C, B> {
    store: S,
    stock: C,
    bus: B,
    vendor_locks: VendorLocks,
}

impl<S, C, B> MovementCoordinator<S, C, B> {
    pub fn new(store: S, stock: C, bus: B) -> Self {
        Self {
            store,
            stock,
            bus,
            vendor_locks: VendorLocks::default(),
        }
    }

    pub fn into_parts(self) -> (S, C, B) {
        (self.store, self.stock, self.bus)
    }
}

impl<S, C, B> MovementCoordinator<S, C, B>
where
    S: EventStore,
    C: CentralStockStore,
    B: EventBus<MovementEvent>,
{
    /// Move stock from the warehouse out to a vendor.
    ///
    /// Reserves central stock first; the `Outbound` event is appended only
    /// after the reservation succeeds, and the reservation is rolled back if
    /// the append fails.
    pub fn distribute(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<Committed, MovementError> {
        let operation_id = OperationId::new();
        tracing::debug!(
            op = %operation_id,
            phase = %Phase::Validating,
            %vendor_id,
            %product_id,
            quantity,
            "distribute"
        );

        let event = MovementEvent::new(
            operation_id,
            vendor_id,
            product_id,
            quantity,
            MovementKind::Outbound,
            notes,
            Utc::now(),
        )?;

        match self.stock.reserve(product_id, quantity) {
            Ok(_) => {}
            Err(CentralStockError::InsufficientStock {
                product_id,
                requested,
                available,
            }) => {
                tracing::debug!(op = %operation_id, phase = %Phase::Rejected, available, "insufficient central stock");
                return Err(MovementError::InsufficientStock {
                    product_id,
                    requested,
                    available,
                });
            }
            Err(CentralStockError::Unavailable(msg)) => {
                return Err(MovementError::Counter(msg));
            }
        }

        tracing::debug!(op = %operation_id, phase = %Phase::Applying, "distribute");
        if let Err(append_err) = self.store.append(vec![event.clone()]) {
            // The reservation must not outlive the failed append.
            if let Err(release_err) = self.stock.release(product_id, quantity) {
                tracing::error!(
                    op = %operation_id,
                    %vendor_id,
                    %product_id,
                    quantity,
                    append_error = %append_err,
                    release_error = %release_err,
                    "distribute rollback failed; central stock reservation leaked"
                );
                return Err(MovementError::Integrity {
                    operation_id,
                    detail: format!(
                        "append failed ({append_err}) and reservation rollback failed ({release_err})"
                    ),
                });
            }
            tracing::warn!(op = %operation_id, error = %append_err, "distribute append failed; reservation rolled back");
            return Err(append_err.into());
        }

        self.publish(std::slice::from_ref(&event));
        tracing::info!(
            op = %operation_id,
            phase = %Phase::Committed,
            event_type = event.event_type(),
            %vendor_id,
            %product_id,
            quantity,
            "distribute committed"
        );

        Ok(Committed {
            operation_id,
            events: vec![event],
        })
    }

    /// Take stock back from a vendor into the warehouse.
    ///
    /// Validates against the vendor's derived balance; once validation
    /// passes, only infrastructure failure can stop the operation (the
    /// central stock release cannot be rejected for stock reasons).
    pub fn return_stock(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<Committed, MovementError> {
        let operation_id = OperationId::new();
        tracing::debug!(
            op = %operation_id,
            phase = %Phase::Validating,
            %vendor_id,
            %product_id,
            quantity,
            "return"
        );

        let event = MovementEvent::new(
            operation_id,
            vendor_id,
            product_id,
            quantity,
            MovementKind::Return,
            notes,
            Utc::now(),
        )?;

        // Hold the vendor guard across validation and append so a concurrent
        // subtraction cannot validate against the same prior balance.
        let guard = self.vendor_locks.for_vendor(vendor_id);
        let _held = guard.lock().unwrap_or_else(|e| e.into_inner());

        let available = self.vendor_balance(vendor_id, product_id)?;
        if i64::from(quantity) > available {
            tracing::debug!(op = %operation_id, phase = %Phase::Rejected, available, "return exceeds balance");
            return Err(MovementError::ExceedsBalance {
                vendor_id,
                product_id,
                requested: quantity,
                available,
            });
        }

        tracing::debug!(op = %operation_id, phase = %Phase::Applying, "return");
        self.store.append(vec![event.clone()])?;

        if let Err(release_err) = self.stock.release(product_id, quantity) {
            // The return event is already committed; the warehouse counter
            // was not incremented to match.
            tracing::error!(
                op = %operation_id,
                %vendor_id,
                %product_id,
                quantity,
                release_error = %release_err,
                "return appended but central stock release failed"
            );
            return Err(MovementError::Integrity {
                operation_id,
                detail: format!("return appended but central stock release failed ({release_err})"),
            });
        }

        self.publish(std::slice::from_ref(&event));
        tracing::info!(
            op = %operation_id,
            phase = %Phase::Committed,
            event_type = event.event_type(),
            %vendor_id,
            %product_id,
            quantity,
            "return committed"
        );

        Ok(Committed {
            operation_id,
            events: vec![event],
        })
    }

    /// Move stock between two vendors without touching the warehouse.
    ///
    /// Appends exactly two events (`TransferOut` for the source,
    /// `TransferIn` for the destination) sharing one operation id, as a
    /// single all-or-nothing batch.
    pub fn transfer(
        &self,
        from_vendor_id: VendorId,
        to_vendor_id: VendorId,
        product_id: ProductId,
        quantity: u32,
        notes: Option<String>,
    ) -> Result<Committed, MovementError> {
        let operation_id = OperationId::new();
        tracing::debug!(
            op = %operation_id,
            phase = %Phase::Validating,
            %from_vendor_id,
            %to_vendor_id,
            %product_id,
            quantity,
            "transfer"
        );

        if from_vendor_id == to_vendor_id {
            tracing::debug!(op = %operation_id, phase = %Phase::Rejected, "same-vendor transfer");
            return Err(MovementError::SameVendor);
        }

        let occurred_at = Utc::now();
        let out_event = MovementEvent::new(
            operation_id,
            from_vendor_id,
            product_id,
            quantity,
            MovementKind::TransferOut,
            notes.clone(),
            occurred_at,
        )?;
        let in_event = MovementEvent::new(
            operation_id,
            to_vendor_id,
            product_id,
            quantity,
            MovementKind::TransferIn,
            notes,
            occurred_at,
        )?;

        // Only the subtracting side needs serializing; the receiving side
        // can only gain. Locking a single vendor also rules out deadlock
        // between crossing transfers.
        let guard = self.vendor_locks.for_vendor(from_vendor_id);
        let _held = guard.lock().unwrap_or_else(|e| e.into_inner());

        let available = self.vendor_balance(from_vendor_id, product_id)?;
        if i64::from(quantity) > available {
            tracing::debug!(op = %operation_id, phase = %Phase::Rejected, available, "transfer exceeds source balance");
            return Err(MovementError::ExceedsBalance {
                vendor_id: from_vendor_id,
                product_id,
                requested: quantity,
                available,
            });
        }

        tracing::debug!(op = %operation_id, phase = %Phase::Applying, "transfer");
        match self.store.append(vec![out_event.clone(), in_event.clone()]) {
            Ok(()) => {}
            Err(EventStoreError::PartialAppend { committed, attempted }) => {
                // Half a transfer is on the log. Compensating would require a
                // third event, so this is surfaced for manual reconciliation,
                // never retried.
                tracing::error!(
                    op = %operation_id,
                    %from_vendor_id,
                    %to_vendor_id,
                    %product_id,
                    quantity,
                    out_event = ?out_event,
                    in_event = ?in_event,
                    committed,
                    attempted,
                    "transfer half-applied; manual reconciliation required"
                );
                return Err(MovementError::Integrity {
                    operation_id,
                    detail: format!("transfer wrote {committed} of {attempted} events"),
                });
            }
            Err(e) => return Err(e.into()),
        }

        self.publish(&[out_event.clone(), in_event.clone()]);
        tracing::info!(
            op = %operation_id,
            phase = %Phase::Committed,
            %from_vendor_id,
            %to_vendor_id,
            %product_id,
            quantity,
            "transfer committed"
        );

        Ok(Committed {
            operation_id,
            events: vec![out_event, in_event],
        })
    }

    /// Derived balance of one product for one vendor, from the full stream.
    fn vendor_balance(
        &self,
        vendor_id: VendorId,
        product_id: ProductId,
    ) -> Result<i64, MovementError> {
        let history = self.store.vendor_events(vendor_id)?;
        Ok(vendor_quantities(vendor_id, &history)
            .get(&product_id)
            .copied()
            .unwrap_or(0))
    }

    /// Best-effort fan-out of committed events to downstream consumers.
    fn publish(&self, events: &[MovementEvent]) {
        for event in events {
            if let Err(e) = self.bus.publish(event.clone()) {
                tracing::warn!(
                    event_id = %event.id,
                    event_type = event.event_type(),
                    error = ?e,
                    "movement publish failed; consumers can rebuild from the store"
                );
            }
        }
    }
}
